//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use pixel_music::websockets::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    connections: Vec<&'a str>,
}

fn message_type_of(raw: &str) -> Option<MessageType> {
    serde_json::from_str::<WebSocketMessage>(raw)
        .ok()
        .map(|m| m.message_type)
}

impl<'a> MessageAssertion<'a> {
    pub fn for_all_members(setup: &'a TestSetup) -> Self {
        let connections = setup.members.iter().map(String::as_str).collect();
        Self { setup, connections }
    }

    pub fn for_members(setup: &'a TestSetup, connections: Vec<&'a str>) -> Self {
        Self { setup, connections }
    }

    /// Assert every connection received a message of this type (consumes the first match).
    /// Payloads must be identical across connections.
    pub async fn received(self, expected_type: MessageType) -> MessageContent {
        let mut payloads = vec![];

        for connection in &self.connections {
            let raw = self
                .setup
                .mock_conn_manager
                .take_first_matching(connection, |m| message_type_of(m) == Some(expected_type))
                .await;
            let raw = raw.unwrap_or_else(|| {
                panic!(
                    "{} should have received a {:?} message",
                    connection, expected_type
                )
            });
            let message: WebSocketMessage = serde_json::from_str(&raw).unwrap();
            payloads.push(message.payload);
        }

        for (i, payload) in payloads.iter().enumerate().skip(1) {
            assert_eq!(
                payload, &payloads[0],
                "{} payload differs from {}",
                self.connections[i], self.connections[0]
            );
        }

        MessageContent {
            payload: payloads.into_iter().next().unwrap_or_default(),
        }
    }

    pub async fn received_nothing_of_type(self, unexpected: MessageType) {
        for connection in &self.connections {
            let count = self.count_message_type(connection, unexpected).await;
            assert_eq!(
                count, 0,
                "{} should not have received {:?}",
                connection, unexpected
            );
        }
    }

    pub async fn received_no_messages(self) {
        for connection in &self.connections {
            let messages = self.setup.mock_conn_manager.get_messages_for(connection).await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                connection,
                messages
            );
        }
    }

    pub async fn count_message_type(&self, connection: &str, message_type: MessageType) -> usize {
        self.setup
            .mock_conn_manager
            .get_messages_for(connection)
            .await
            .iter()
            .filter(|m| message_type_of(m) == Some(message_type))
            .count()
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    payload: serde_json::Value,
}

impl MessageContent {
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn with_room(self, expected: &str) -> Self {
        assert_eq!(self.payload["room"], expected);
        self
    }

    pub fn with_admin(self, expected: &str) -> Self {
        assert_eq!(self.payload["admin"], expected);
        self
    }

    pub fn with_by(self, expected: &str) -> Self {
        assert_eq!(self.payload["by"], expected);
        self
    }

    pub fn with_video(self, expected: &str) -> Self {
        assert_eq!(self.payload["track"]["video_id"], expected);
        self
    }

    pub fn with_action(self, expected: &str) -> Self {
        assert_eq!(self.payload["action"], expected);
        self
    }

    pub fn with_position(self, expected: f64) -> Self {
        let actual = self.payload["position"].as_f64().unwrap();
        assert!(
            (actual - expected).abs() < 0.5,
            "position {} not close to {}",
            actual,
            expected
        );
        self
    }

    pub fn playing(self, expected: bool) -> Self {
        assert_eq!(self.payload["is_playing"], expected);
        self
    }

    pub fn with_user_count(self, expected: usize) -> Self {
        let users = self.payload["users"].as_array().unwrap();
        assert_eq!(users.len(), expected);
        self
    }

    pub fn with_message(self, expected: &str) -> Self {
        assert_eq!(self.payload["message"], expected);
        self
    }

    pub fn with_message_containing(self, fragment: &str) -> Self {
        let message = self.payload["message"].as_str().unwrap();
        assert!(
            message.contains(fragment),
            "message {:?} should contain {:?}",
            message,
            fragment
        );
        self
    }
}
