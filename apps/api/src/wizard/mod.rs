//! The multi-section application wizard: per-applicant state, validation, rendering and
//! the HTTP surface that drives it.

pub mod handlers;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;
pub mod view;

pub use service::WizardService;
pub use store::WizardStore;
