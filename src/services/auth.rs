/// Auth service
///
/// Wraps the store's login/logout endpoints with local field validation,
/// event signalling, and reminder scheduling. The returned [`Session`] is
/// the explicit identity every other service call takes; nothing here is
/// process-global.
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::events::{AppEvent, EventBus};
use crate::gateway::ObjectStore;
use crate::notify::ReminderScheduler;
use crate::session::Session;

pub struct AuthService {
    store: Arc<dyn ObjectStore>,
    events: EventBus,
    reminders: Arc<ReminderScheduler>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        events: EventBus,
        reminders: Arc<ReminderScheduler>,
    ) -> Self {
        Self {
            store,
            events,
            reminders,
        }
    }

    /// Log in, emit `LoggedIn`, and schedule the post reminder. Missing
    /// fields are rejected locally without a remote call.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "username and password are required".into(),
            ));
        }

        let session = self.store.login(username, password).await?;
        tracing::info!(username = %session.username(), "logged in");

        self.events.emit(AppEvent::LoggedIn);
        self.reminders.schedule();
        Ok(session)
    }

    /// Log out, cancel any pending reminder, and emit `LoggedOut`.
    pub async fn logout(&self, session: &Session) -> Result<()> {
        self.store.logout(session).await?;

        self.reminders.cancel();
        self.events.emit(AppEvent::LoggedOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockObjectStore;
    use crate::models::User;
    use crate::notify::{MockNotifier, Notifier};
    use std::time::Duration;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio_test::assert_ok;

    fn reminders() -> Arc<ReminderScheduler> {
        let notifier: Arc<dyn Notifier> = Arc::new(MockNotifier::new());
        Arc::new(ReminderScheduler::new(notifier, Duration::from_secs(600)))
    }

    fn stored_session() -> Session {
        Session::new(
            User {
                id: "u1".into(),
                username: "lou".into(),
                last_posted_at: None,
            },
            "r:abc",
        )
    }

    #[tokio::test]
    async fn missing_fields_never_reach_the_store() {
        let store = MockObjectStore::new();
        let auth = AuthService::new(Arc::new(store), EventBus::new(), reminders());

        let err = auth.login("", "hunter2").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let store = MockObjectStore::new();
        let auth = AuthService::new(Arc::new(store), EventBus::new(), reminders());
        let err = auth.login("lou", "").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn login_emits_the_signal_and_yields_the_session() {
        let mut store = MockObjectStore::new();
        store
            .expect_login()
            .times(1)
            .returning(|_, _| Ok(stored_session()));

        let events = EventBus::new();
        let mut rx = events.subscribe();
        let auth = AuthService::new(Arc::new(store), events, reminders());

        let session = auth.login("lou", "hunter2").await.unwrap();
        assert_eq!(session.username(), "lou");
        assert_eq!(rx.try_recv(), Ok(AppEvent::LoggedIn));
    }

    #[tokio::test]
    async fn logout_emits_after_the_store_confirms() {
        let mut store = MockObjectStore::new();
        store.expect_logout().times(1).returning(|_| Ok(()));

        let events = EventBus::new();
        let mut rx = events.subscribe();
        let auth = AuthService::new(Arc::new(store), events, reminders());

        tokio_test::assert_ok!(auth.logout(&stored_session()).await);
        assert_eq!(rx.try_recv(), Ok(AppEvent::LoggedOut));
    }

    #[tokio::test]
    async fn failed_logout_does_not_emit() {
        let mut store = MockObjectStore::new();
        store
            .expect_logout()
            .times(1)
            .returning(|_| Err(AppError::Remote("session gone".into())));

        let events = EventBus::new();
        let mut rx = events.subscribe();
        let auth = AuthService::new(Arc::new(store), events, reminders());

        let err = auth.logout(&stored_session()).await.unwrap_err();
        assert!(matches!(err, AppError::Remote(_)));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }
}
