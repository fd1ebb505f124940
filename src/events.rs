/// Application event bus
///
/// Replaces broadcast-style notification-center signals with an explicit
/// channel handed to the services that need it. The feed listens for
/// `PostPublished` to force a full re-query; the shell listens for
/// `LoggedIn`/`LoggedOut` to swap its root view.
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    LoggedIn,
    LoggedOut,
    /// Emitted strictly after both dependent writes of a post creation
    /// flow have completed.
    PostPublished,
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Send an event to all current subscribers. Having no subscriber is
    /// not an error; the event is simply dropped.
    pub fn emit(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test]
    async fn subscribers_receive_each_event_once() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(AppEvent::PostPublished);

        assert_eq!(rx.try_recv(), Ok(AppEvent::PostPublished));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn emitting_without_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.emit(AppEvent::LoggedOut);
    }
}
