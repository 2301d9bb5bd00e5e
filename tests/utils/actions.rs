use serde_json::json;
use tokio::time::{sleep, Duration};

use pixel_music::websockets::{MessageHandler, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

#[allow(dead_code)]
impl TestSetup {
    /// Send a WebSocket message and wait for the room subscription to process it
    pub async fn send_message(&self, connection_id: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(connection_id, &message_json).await;
    }

    pub async fn send_raw(&self, connection_id: &str, raw: &str) {
        self.deliver(connection_id, raw).await;
        sleep(Duration::from_millis(20)).await;
    }

    /// Hand messages to the receive handler back to back, without giving room
    /// subscriptions a chance to run in between, then wait once
    pub async fn send_burst(&self, connection_id: &str, messages: Vec<WebSocketMessage>) {
        for message in messages {
            let message_json = serde_json::to_string(&message).unwrap();
            self.deliver(connection_id, &message_json).await;
        }
        sleep(Duration::from_millis(20)).await;
    }

    async fn deliver(&self, connection_id: &str, raw: &str) {
        self.input_handler
            .handle_message(connection_id, connection_id, raw.to_string())
            .await;
    }

    pub async fn disconnect(&self, connection_id: &str) {
        self.input_handler.handle_disconnect(connection_id).await;
        sleep(Duration::from_millis(20)).await;
    }

    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_join(&self, connection_id: &str, room: &str, admin_only: bool) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(
                MessageType::Join,
                json!({ "room": room, "admin_only": admin_only }),
            ),
        )
        .await;
    }

    pub async fn send_play(&self, connection_id: &str, video_id: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(
                MessageType::Play,
                json!({ "video_id": video_id, "title": format!("Song {}", video_id), "position": 0.0 }),
            ),
        )
        .await;
    }

    pub async fn send_resume(&self, connection_id: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(MessageType::Play, json!({})),
        )
        .await;
    }

    pub async fn send_pause(&self, connection_id: &str, position: f64) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(MessageType::Pause, json!({ "position": position })),
        )
        .await;
    }

    pub async fn send_seek(&self, connection_id: &str, position: f64) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(MessageType::Seek, json!({ "position": position })),
        )
        .await;
    }

    pub async fn send_request_sync(&self, connection_id: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(MessageType::RequestSync, json!({})),
        )
        .await;
    }

    pub async fn send_transfer_admin(&self, connection_id: &str, target: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(MessageType::TransferAdmin, json!({ "connection_id": target })),
        )
        .await;
    }

    pub async fn send_end_jam(&self, connection_id: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(MessageType::EndJam, json!({})),
        )
        .await;
    }

    pub async fn send_leave(&self, connection_id: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(MessageType::LeaveRoom, json!({})),
        )
        .await;
    }
}
