use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::schema::FormSchema;
use crate::wizard::state::{FormState, WizardError, WizardStatus};

struct Entry {
    state: FormState,
    touched: Instant,
}

/// In-memory wizard states keyed by wizard id. Each state is owned by one applicant's
/// browser session and never shared. Callers must not hold a state across a remote call;
/// `update` and `read` only lend it for the duration of a synchronous closure.
#[derive(Clone)]
pub struct WizardStore {
    schema: Arc<FormSchema>,
    entries: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl WizardStore {
    pub fn new(schema: Arc<FormSchema>) -> Self {
        Self {
            schema,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let entry = Entry {
            state: FormState::new(self.schema.clone()),
            touched: Instant::now(),
        };
        self.entries.write().await.insert(id, entry);
        debug!("Started wizard {id}");
        id
    }

    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut FormState) -> R,
    ) -> Result<R, WizardError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&id)
            .ok_or(WizardError::UnknownSession(id))?;
        entry.touched = Instant::now();
        Ok(f(&mut entry.state))
    }

    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&FormState) -> R) -> Result<R, WizardError> {
        let entries = self.entries.read().await;
        let entry = entries.get(&id).ok_or(WizardError::UnknownSession(id))?;
        Ok(f(&entry.state))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Drops wizards untouched for longer than `idle`. Submitted wizards are kept for twice
    /// that so the confirmation stays reachable. Returns how many were dropped.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| {
            let limit = match entry.state.status() {
                WizardStatus::Submitted { .. } => idle * 2,
                _ => idle,
            };
            entry.touched.elapsed() <= limit
        });
        before - entries.len()
    }

    /// Runs `evict_idle` periodically for the life of the process.
    pub fn spawn_reaper(&self, idle: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let period = (idle / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(idle).await;
                if evicted > 0 {
                    info!("Evicted {evicted} idle wizard sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::application::application_form;
    use crate::wizard::state::tests::{agree, fill_personal, fill_position};
    use crate::wizard::state::Action;

    fn store() -> WizardStore {
        WizardStore::new(Arc::new(application_form()))
    }

    #[tokio::test]
    async fn test_unknown_wizard_is_reported() {
        let id = Uuid::new_v4();
        let err = store().read(id, |s| s.section()).await.unwrap_err();
        assert_eq!(err, WizardError::UnknownSession(id));
    }

    #[tokio::test]
    async fn test_update_persists_between_calls() {
        let store = store();
        let id = store.create().await;
        store
            .update(id, |s| s.apply(Action::Next))
            .await
            .unwrap()
            .unwrap();
        let errors = store.read(id, |s| s.errors().len()).await.unwrap();
        assert!(errors > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_idle_drops_only_stale_wizards() {
        let store = store();
        let stale = store.create().await;
        tokio::time::advance(Duration::from_secs(120)).await;
        let fresh = store.create().await;

        let evicted = store.evict_idle(Duration::from_secs(60)).await;

        assert_eq!(evicted, 1);
        assert!(store.read(stale, |_| ()).await.is_err());
        assert!(store.read(fresh, |_| ()).await.is_ok());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitted_wizard_outlives_one_idle_period() {
        let store = store();
        let submitted = store.create().await;
        store
            .update(submitted, |state| {
                fill_personal(state);
                state.apply(Action::Next).unwrap();
                fill_position(state);
                state.apply(Action::Next).unwrap();
                agree(state);
                state.apply(Action::Submit).unwrap();
                state
                    .apply(Action::SubmitResolved(Ok("rec-9".to_string())))
                    .unwrap();
            })
            .await
            .unwrap();
        let abandoned = store.create().await;

        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(store.read(abandoned, |_| ()).await.is_err());
        let confirmation = store.read(submitted, |s| s.confirmation()).await.unwrap();
        assert_eq!(confirmation.unwrap().record_id, "rec-9");

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(store.read(submitted, |_| ()).await.is_err());
    }
}
