use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn on_connecting(self) -> Self {
        match self {
            ConnectionState::Idle | ConnectionState::Closed => ConnectionState::Connecting,
            other => other,
        }
    }

    pub fn on_open(self) -> Self {
        match self {
            ConnectionState::Connecting => ConnectionState::Open,
            other => other,
        }
    }

    /// Messages never change the state; they are only processed while open.
    pub fn on_message(self) -> Self {
        self
    }

    pub fn on_error(self) -> Self {
        ConnectionState::Closed
    }

    pub fn on_close(self) -> Self {
        ConnectionState::Closed
    }

    pub fn accepts_messages(self) -> bool {
        self == ConnectionState::Open
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct FeedStatus {
    pub url: String,
    pub state: ConnectionState,
    pub messages_received: u64,
    pub decode_failures: u64,
    pub last_error: Option<String>,
    pub last_snapshot_at: Option<DateTime<Utc>>,
}

impl FeedStatus {
    pub fn new(url: String) -> Self {
        FeedStatus {
            url,
            ..Default::default()
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.state != ConnectionState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;

    #[test]
    fn nominal_lifecycle() {
        let s = Idle.on_connecting();
        assert_eq!(s, Connecting);
        assert!(!s.accepts_messages());
        let s = s.on_open();
        assert_eq!(s, Open);
        assert_eq!(s.on_message(), Open);
        assert!(s.accepts_messages());
        assert_eq!(s.on_close(), Closed);
    }

    #[test]
    fn errors_close_from_any_state() {
        for s in [Idle, Connecting, Open, Closed] {
            assert_eq!(s.on_error(), Closed);
        }
    }

    #[test]
    fn open_only_follows_connecting() {
        assert_eq!(Idle.on_open(), Idle);
        assert_eq!(Closed.on_open(), Closed);
    }

    #[test]
    fn closed_connection_can_be_reactivated() {
        assert_eq!(Closed.on_connecting(), Connecting);
        assert_eq!(Open.on_connecting(), Open);
    }

    #[test]
    fn label_matches_json() {
        for s in [Idle, Connecting, Open, Closed] {
            let json = serde_json::to_value(s).unwrap();
            assert_eq!(json, s.to_string());
        }
        assert_eq!(Idle.to_string(), "idle");
    }

    #[test]
    fn status_is_frozen_unless_open() {
        let mut status = FeedStatus::new("ws://localhost:9001/".into());
        assert!(status.is_frozen());
        status.state = Open;
        assert!(!status.is_frozen());
    }
}
