use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::submission::{SubmissionAdapter, SubmissionDraft};
use crate::wizard::state::{Action, Confirmation, Outcome, WizardError, GENERIC_SUBMIT_ERROR};
use crate::wizard::store::WizardStore;
use crate::wizard::view::{render, WizardView};

/// Applies actions to stored wizards and drives submissions through the adapter.
#[derive(Clone)]
pub struct WizardService {
    store: WizardStore,
    adapter: Arc<dyn SubmissionAdapter>,
}

impl WizardService {
    pub fn new(store: WizardStore, adapter: Arc<dyn SubmissionAdapter>) -> Self {
        Self { store, adapter }
    }

    pub fn store(&self) -> &WizardStore {
        &self.store
    }

    pub fn backend(&self) -> &'static str {
        self.adapter.backend()
    }

    pub async fn start(&self) -> Result<WizardView, WizardError> {
        let id = self.store.create().await;
        self.view(id).await
    }

    pub async fn view(&self, id: Uuid) -> Result<WizardView, WizardError> {
        self.store.read(id, |state| render(id, state)).await
    }

    /// Applies one synchronous action (anything except `Submit`) and returns the new view.
    pub async fn dispatch(&self, id: Uuid, action: Action) -> Result<WizardView, WizardError> {
        self.store
            .update(id, |state| -> Result<WizardView, WizardError> {
                state.apply(action)?;
                Ok(render(id, state))
            })
            .await?
    }

    /// Validates every section and, if all pass, submits through the adapter. The wizard
    /// stays in `Submitting` (submit disabled) until the adapter resolves.
    ///
    /// The adapter call and its resolution run on a spawned task, so a dropped request
    /// still leaves the wizard `Submitted` or `Failed`, never stuck in `Submitting`.
    pub async fn submit(&self, id: Uuid) -> Result<WizardView, WizardError> {
        let outcome = self
            .store
            .update(id, |state| state.apply(Action::Submit))
            .await??;

        let Outcome::Ready(draft) = outcome else {
            return self.view(id).await;
        };

        let service = self.clone();
        let task = tokio::spawn(async move { service.complete_submission(id, draft).await });
        match task.await {
            Ok(view) => view,
            Err(e) => {
                error!("Submission task for wizard {id} aborted: {e}");
                let failed = Action::SubmitResolved(Err(GENERIC_SUBMIT_ERROR.to_string()));
                self.dispatch(id, failed).await
            }
        }
    }

    async fn complete_submission(
        &self,
        id: Uuid,
        draft: SubmissionDraft,
    ) -> Result<WizardView, WizardError> {
        info!(
            "Submitting wizard {id} through the {} backend",
            self.adapter.backend()
        );
        let result = match self.adapter.submit(&draft).await {
            Ok(record_id) => {
                info!("Wizard {id} submitted as {record_id}");
                Ok(record_id)
            }
            Err(e) => {
                error!("Submission of wizard {id} failed: {e}");
                Err(e.to_string())
            }
        };

        self.dispatch(id, Action::SubmitResolved(result)).await
    }

    pub async fn confirmation(&self, id: Uuid) -> Result<Confirmation, WizardError> {
        self.store.read(id, |state| state.confirmation()).await?
    }
}
