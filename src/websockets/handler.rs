use async_trait::async_trait;
use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::{RoomEvent, RoomEventHandler, RoomSubscription};
use crate::jam::{ControlAction, ControlPolicy, JamError, JamService, LeaveOutcome, PlaybackCommand};
use crate::shared::{AppError, AppState};
use crate::websockets::messages::{
    JoinPayload, MessageType, PlayPayload, PositionPayload, SyncControlPayload,
    TransferAdminPayload, WebSocketMessage,
};

use super::{
    connection_manager::ConnectionManager,
    socket::{Connection, MessageHandler},
};

const MAX_NAME_LEN: usize = 32;

/// Message handler for receiving WebSocket messages from the client.
///
/// Membership changes go straight to the JamService; playback and admin
/// requests are emitted into the sender's room channel so each room's
/// requests are applied in order by its subscription.
pub struct WebsocketReceiveHandler {
    jam_service: Arc<JamService>,
    connection_manager: Arc<dyn ConnectionManager>,
    room_handler: Arc<dyn RoomEventHandler>,
}

impl WebsocketReceiveHandler {
    pub fn new(
        jam_service: Arc<JamService>,
        connection_manager: Arc<dyn ConnectionManager>,
        room_handler: Arc<dyn RoomEventHandler>,
    ) -> Self {
        Self {
            jam_service,
            connection_manager,
            room_handler,
        }
    }

    /// Removes a closed connection from its jam and from outbound routing
    pub async fn handle_disconnect(&self, connection_id: &str) {
        self.connection_manager.remove_connection(connection_id).await;
        let outcome = self.jam_service.leave(connection_id).await;
        debug!(connection_id = %connection_id, outcome = ?outcome, "Connection disconnected");
    }

    async fn handle_join(&self, connection_id: &str, name: &str, message: &WebSocketMessage) {
        let payload: JoinPayload = match message.parse_payload() {
            Ok(payload) => payload,
            Err(e) => {
                return self
                    .send_error(connection_id, format!("Invalid join request: {}", e))
                    .await
            }
        };

        let name = payload
            .name
            .as_deref()
            .and_then(clean_name)
            .unwrap_or_else(|| name.to_string());
        let policy = payload.admin_only.map(|admin_only| {
            if admin_only {
                ControlPolicy::AdminOnly
            } else {
                ControlPolicy::Everyone
            }
        });

        match self
            .jam_service
            .join(&payload.room, connection_id, &name, policy)
            .await
        {
            Ok(result) => {
                let snapshot = result.outcome.snapshot;
                if let Some(receiver) = result.receiver {
                    RoomSubscription::new(
                        snapshot.id.clone(),
                        Arc::clone(&self.room_handler),
                        receiver,
                    )
                    .start();
                }
                self.send(connection_id, &WebSocketMessage::sync(&snapshot))
                    .await;
            }
            Err(e) => {
                warn!(connection_id = %connection_id, room = %payload.room, error = %e, "Join rejected");
                self.send_error(connection_id, e.to_string()).await;
            }
        }
    }

    async fn handle_leave(&self, connection_id: &str) {
        match self.jam_service.leave(connection_id).await {
            LeaveOutcome::Left { room_id, .. } | LeaveOutcome::RoomClosed { room_id, .. } => {
                self.send(
                    connection_id,
                    &WebSocketMessage::notification(room_id, "You left the jam".to_string()),
                )
                .await;
            }
            LeaveOutcome::NotInRoom => {
                self.send_error(connection_id, JamError::NotInRoom.to_string())
                    .await
            }
        }
    }

    /// Emits a member request into the room the connection is in
    async fn emit_to_own_room(&self, connection_id: &str, event: RoomEvent) {
        match self.jam_service.room_of(connection_id).await {
            Some(room_id) => {
                self.jam_service
                    .event_bus()
                    .emit_to_room(&room_id, event)
                    .await
            }
            None => {
                self.send_error(connection_id, JamError::NotInRoom.to_string())
                    .await
            }
        }
    }

    async fn send(&self, connection_id: &str, message: &WebSocketMessage) {
        match message.to_json() {
            Ok(json) => {
                self.connection_manager
                    .send_to_connection(connection_id, &json)
                    .await
            }
            Err(e) => warn!(error = %e, "Failed to serialize outbound message"),
        }
    }

    async fn send_error(&self, connection_id: &str, message: String) {
        self.send(connection_id, &WebSocketMessage::error(message))
            .await;
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: &str, name: &str, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return self
                    .send_error(connection_id, "Invalid message".to_string())
                    .await;
            }
        };

        let command = match ws_message.message_type {
            MessageType::Join => return self.handle_join(connection_id, name, &ws_message).await,
            MessageType::LeaveRoom => return self.handle_leave(connection_id).await,
            MessageType::RequestSync => {
                return self
                    .emit_to_own_room(
                        connection_id,
                        RoomEvent::SyncRequested {
                            connection_id: connection_id.to_string(),
                        },
                    )
                    .await
            }
            MessageType::EndJam => {
                return self
                    .emit_to_own_room(
                        connection_id,
                        RoomEvent::EndRequested {
                            connection_id: connection_id.to_string(),
                        },
                    )
                    .await
            }
            MessageType::TransferAdmin => {
                let event = ws_message
                    .parse_payload::<TransferAdminPayload>()
                    .map(|payload| RoomEvent::AdminTransferRequested {
                        connection_id: connection_id.to_string(),
                        target: payload.connection_id,
                    });
                return match event {
                    Ok(event) => self.emit_to_own_room(connection_id, event).await,
                    Err(e) => {
                        self.send_error(connection_id, format!("Invalid transfer request: {}", e))
                            .await
                    }
                };
            }
            MessageType::Play
            | MessageType::Pause
            | MessageType::Seek
            | MessageType::SyncControl => playback_command(&ws_message),
            other => {
                debug!(message_type = ?other, "Unhandled message type");
                return self
                    .send_error(connection_id, "Unsupported message type".to_string())
                    .await;
            }
        };

        match command {
            Ok(command) => {
                self.emit_to_own_room(
                    connection_id,
                    RoomEvent::PlaybackRequested {
                        connection_id: connection_id.to_string(),
                        command,
                    },
                )
                .await
            }
            Err(reason) => self.send_error(connection_id, reason).await,
        }
    }
}

/// Decodes a play/pause/seek/sync-control message into a playback command
fn playback_command(message: &WebSocketMessage) -> Result<PlaybackCommand, String> {
    let invalid = |e: serde_json::Error| format!("Invalid playback request: {}", e);
    match message.message_type {
        MessageType::Play => {
            let payload: PlayPayload = message.parse_payload().map_err(invalid)?;
            Ok(PlaybackCommand::Play {
                track: payload.track(),
                position: payload.position,
            })
        }
        MessageType::Pause => {
            let payload: PositionPayload = message.parse_payload().map_err(invalid)?;
            Ok(PlaybackCommand::Pause {
                position: payload.position,
            })
        }
        MessageType::Seek => {
            let payload: PositionPayload = message.parse_payload().map_err(invalid)?;
            seek(payload.position)
        }
        MessageType::SyncControl => {
            let payload: SyncControlPayload = message.parse_payload().map_err(invalid)?;
            match payload.action {
                ControlAction::Play => Ok(PlaybackCommand::Play {
                    track: None,
                    position: payload.position,
                }),
                ControlAction::Pause => Ok(PlaybackCommand::Pause {
                    position: payload.position,
                }),
                ControlAction::Seek => seek(payload.position),
            }
        }
        other => Err(format!("{:?} is not a playback message", other)),
    }
}

fn seek(position: Option<f64>) -> Result<PlaybackCommand, String> {
    position
        .map(|position| PlaybackCommand::Seek { position })
        .ok_or_else(|| "Seek requires a position".to_string())
}

fn clean_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_NAME_LEN).collect())
    }
}

/// Query parameters for the WebSocket endpoint
#[derive(Debug, Deserialize)]
pub struct WebSocketQuery {
    pub token: Option<String>,
    pub name: Option<String>,
}

/// WebSocket endpoint
/// GET /ws?token=<jwt>&name=<display name>
///
/// A valid token supplies the display name; without one the connection is a
/// guest. An invalid token is rejected before the upgrade.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WebSocketQuery>,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    let name = match query.token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => app_state.auth_service.validate_token(token)?.name,
        None => query
            .name
            .as_deref()
            .and_then(clean_name)
            .unwrap_or_else(|| petname::Petnames::default().generate_one(2, "-")),
    };

    let connection_id = Uuid::new_v4().to_string();
    info!(
        connection_id = %connection_id,
        name = %name,
        "WebSocket connection requested"
    );

    Ok(ws.on_upgrade(move |socket| {
        handle_websocket_connection(socket, connection_id, name, app_state)
    }))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    connection_id: String,
    name: String,
    app_state: AppState,
) {
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender.clone())
        .await;

    match WebSocketMessage::connected(connection_id.clone(), name.clone()).to_json() {
        Ok(json) => {
            let _ = outbound_sender.send(json);
        }
        Err(e) => warn!(error = %e, "Failed to serialize connected message"),
    }
    // Only the ConnectionManager holds a sender from here on
    drop(outbound_sender);

    let handler = Arc::new(WebsocketReceiveHandler::new(
        Arc::clone(&app_state.jam_service),
        Arc::clone(&app_state.connection_manager),
        Arc::clone(&app_state.jam_subscriber),
    ));

    let connection = Connection::new(
        connection_id.clone(),
        name,
        Box::new(socket),
        outbound_receiver,
        handler.clone(),
    );

    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    handler.handle_disconnect(&connection_id).await;
}
