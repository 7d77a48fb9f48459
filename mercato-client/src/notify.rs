//! Client event definitions
//!
//! Error notices and session loss are emitted as events on a broadcast
//! channel; rendering and navigation are left to the embedding UI.

use tokio::sync::broadcast;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Event emitted by the client for the embedding UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Transient user-facing notification
    Notice {
        level: NoticeLevel,
        message: String,
    },
    /// Session is gone: tokens were cleared, the UI should show the login
    /// entry point
    SessionExpired,
}

/// Broadcast bus for [`ClientEvent`]s.
///
/// Emission is best-effort: with no subscribers the event is dropped, which
/// is fine for notifications.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Subscribe to client events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all current subscribers.
    pub fn emit(&self, event: ClientEvent) {
        let _ = self.sender.send(event);
    }

    /// Emit a success notice.
    pub fn success(&self, message: impl Into<String>) {
        self.emit(ClientEvent::Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        });
    }

    /// Emit an error notice.
    pub fn error(&self, message: impl Into<String>) {
        self.emit(ClientEvent::Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        });
    }

    /// Signal that the session is irrecoverably gone.
    pub fn session_expired(&self) {
        self.emit(ClientEvent::SessionExpired);
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

    #[tokio::test]
    async fn subscribers_receive_notices() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.success("saved");
        assert_eq!(
            rx.recv().await.unwrap(),
            ClientEvent::Notice {
                level: NoticeLevel::Success,
                message: "saved".to_string()
            }
        );
    }

    #[test]
    fn emit_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.error("nobody listening");
        bus.session_expired();
    }
}
