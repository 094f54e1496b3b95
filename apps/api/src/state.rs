use std::sync::Arc;

use crate::accounts::AccountStore;
use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::errors::AppError;
use crate::resumes::ResumeVault;
use crate::rooms::RoomStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Built once in `main`; both stores share one backing key-value store.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountStore,
    pub rooms: RoomStore,
    pub resumes: ResumeVault,
    /// Pluggable analyzer. Default: the HTTP `AnalysisClient`.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    pub config: Config,
}

impl AppState {
    /// Runs store or vault work on the blocking pool.
    ///
    /// Password hashing, whole-document rewrites with `sync_all` and the store
    /// write locks all block the calling thread.
    pub async fn blocking<T, E, F>(&self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(AppState) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<AppError> + Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || work(state))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed: {e}")))?
            .map_err(Into::into)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::test_support::test_state;
    use crate::analysis::stub::StubAnalyzer;
    use crate::errors::AppError;
    use crate::storage::StoreError;

    #[tokio::test]
    async fn test_blocking_runs_off_the_runtime_thread() {
        let (state, _dir) = test_state(Arc::new(StubAnalyzer::failing()));
        let caller = std::thread::current().id();

        let worker = state
            .blocking(|_| Ok::<_, AppError>(std::thread::current().id()))
            .await
            .unwrap();
        assert_ne!(worker, caller);
    }

    #[tokio::test]
    async fn test_blocking_converts_store_errors() {
        let (state, _dir) = test_state(Arc::new(StubAnalyzer::failing()));
        let err = state
            .blocking(|s| {
                s.accounts.register("a@x.com", "p1", "000")?;
                s.accounts.register("a@x.com", "p1", "000")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = state
            .blocking(|_| Err::<(), _>(StoreError::AccountNotFound("7".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blocking_reports_a_panicked_task_as_internal() {
        let (state, _dir) = test_state(Arc::new(StubAnalyzer::failing()));
        let err = state
            .blocking(|_| -> Result<(), AppError> { panic!("worker died") })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
