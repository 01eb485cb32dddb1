use std::sync::Arc;

use crate::admin::AdminService;
use crate::schema::FormSchema;
use crate::wizard::WizardService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub schema: Arc<FormSchema>,
    pub wizard: WizardService,
    pub admin: AdminService,
    /// Largest accepted multipart body on the file route, in bytes.
    pub upload_limit: usize,
}
