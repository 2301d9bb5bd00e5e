use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::{ControlPolicy, JamSnapshot, Member},
    registry::{
        AdminChange, EndedJam, JamError, JamRegistry, JoinOutcome, LeaveOutcome,
        PlaybackCommand, PlaybackUpdate,
    },
};
use crate::event::{EventBus, RoomEvent};

const CODE_ATTEMPTS: usize = 8;

/// Result of a join, including the departure from a previous room
pub struct JoinResult {
    pub outcome: JoinOutcome,
    pub left: Option<LeaveOutcome>,
    /// Receiver of the newly opened room channel; set only when the room was created
    pub receiver: Option<broadcast::Receiver<RoomEvent>>,
}

/// Service for Jam room business logic
///
/// Serializes registry access and keeps each room's event channel in step
/// with the room: channels are opened and closed while the registry lock is
/// held, and membership facts are emitted in the same critical section.
pub struct JamService {
    registry: Mutex<JamRegistry>,
    event_bus: EventBus,
    default_policy: ControlPolicy,
}

impl JamService {
    pub fn new(event_bus: EventBus, max_members: usize, default_policy: ControlPolicy) -> Self {
        Self {
            registry: Mutex::new(JamRegistry::new(max_members)),
            event_bus,
            default_policy,
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn default_policy(&self) -> ControlPolicy {
        self.default_policy
    }

    /// Joins a room, leaving the connection's previous room first
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        room_id: &str,
        connection_id: &str,
        name: &str,
        policy: Option<ControlPolicy>,
    ) -> Result<JoinResult, JamError> {
        let mut registry = self.registry.lock().await;

        let room_id = registry.check_join(room_id, connection_id)?;

        let in_other_room = registry
            .room_of(connection_id)
            .is_some_and(|current| current != room_id);
        let left = if in_other_room {
            let outcome = registry.leave(connection_id);
            self.publish_departure(&outcome).await;
            Some(outcome)
        } else {
            None
        };

        let member = Member::new(connection_id, name);
        let outcome = registry.join(
            &room_id,
            member,
            policy.unwrap_or(self.default_policy),
            Utc::now(),
        )?;

        let receiver = if outcome.created {
            Some(self.event_bus.open_room(&room_id).await)
        } else {
            None
        };

        if !outcome.already_member {
            self.event_bus
                .emit_to_room(
                    &room_id,
                    RoomEvent::MemberJoined {
                        connection_id: connection_id.to_string(),
                        name: name.to_string(),
                    },
                )
                .await;
        }

        info!(
            room_id = %room_id,
            connection_id = %connection_id,
            created = outcome.created,
            members = outcome.snapshot.members.len(),
            "Connection joined jam"
        );

        Ok(JoinResult {
            outcome,
            left,
            receiver,
        })
    }

    #[instrument(skip(self))]
    pub async fn leave(&self, connection_id: &str) -> LeaveOutcome {
        let mut registry = self.registry.lock().await;
        let outcome = registry.leave(connection_id);
        self.publish_departure(&outcome).await;
        outcome
    }

    #[instrument(skip(self))]
    pub async fn apply(
        &self,
        room_id: &str,
        connection_id: &str,
        command: PlaybackCommand,
    ) -> Result<PlaybackUpdate, JamError> {
        let mut registry = self.registry.lock().await;
        let update = registry.apply(room_id, connection_id, command, Utc::now())?;
        debug!(
            room_id = %update.room_id,
            connection_id = %connection_id,
            change = ?update.change,
            "Playback updated"
        );
        Ok(update)
    }

    #[instrument(skip(self))]
    pub async fn transfer_admin(
        &self,
        room_id: &str,
        connection_id: &str,
        target: &str,
    ) -> Result<AdminChange, JamError> {
        let mut registry = self.registry.lock().await;
        let change = registry.transfer_admin(room_id, connection_id, target)?;

        self.event_bus
            .emit_to_room(
                &change.room_id,
                RoomEvent::AdminChanged {
                    old_admin: Some(change.old_admin.clone()),
                    new_admin: change.new_admin.connection_id.clone(),
                    new_admin_name: change.new_admin.name.clone(),
                },
            )
            .await;

        info!(
            room_id = %change.room_id,
            old_admin = %change.old_admin,
            new_admin = %change.new_admin.connection_id,
            "Jam admin transferred"
        );
        Ok(change)
    }

    /// Ends the room for everyone; admin only
    #[instrument(skip(self))]
    pub async fn end(&self, room_id: &str, connection_id: &str) -> Result<EndedJam, JamError> {
        let mut registry = self.registry.lock().await;
        let ended = registry.end(room_id, connection_id)?;
        self.event_bus.close_room(&ended.room_id).await;

        info!(
            room_id = %ended.room_id,
            ended_by = %connection_id,
            members = ended.members.len(),
            "Jam ended by admin"
        );
        Ok(ended)
    }

    pub async fn room_of(&self, connection_id: &str) -> Option<String> {
        let registry = self.registry.lock().await;
        registry.room_of(connection_id).map(str::to_string)
    }

    pub async fn snapshot(&self, room_id: &str) -> Option<JamSnapshot> {
        let registry = self.registry.lock().await;
        registry.snapshot(room_id.trim(), Utc::now())
    }

    pub async fn list(&self) -> Vec<JamSnapshot> {
        let registry = self.registry.lock().await;
        registry.list(Utc::now())
    }

    /// Generates a petname jam code not currently in use
    pub async fn generate_room_code(&self) -> String {
        let registry = self.registry.lock().await;
        for _ in 0..CODE_ATTEMPTS {
            let code = petname::Petnames::default().generate_one(2, "-");
            if !registry.contains(&code) {
                return code;
            }
        }
        let suffix = Uuid::new_v4().simple().to_string();
        let code = format!(
            "{}-{}",
            petname::Petnames::default().generate_one(2, "-"),
            &suffix[..6]
        );
        warn!(code = %code, "Petname space crowded, using suffixed jam code");
        code
    }

    /// Emits membership facts for a departure; called with the registry locked
    async fn publish_departure(&self, outcome: &LeaveOutcome) {
        match outcome {
            LeaveOutcome::Left {
                room_id,
                member,
                new_admin,
            } => {
                self.event_bus
                    .emit_to_room(
                        room_id,
                        RoomEvent::MemberLeft {
                            connection_id: member.connection_id.clone(),
                            name: member.name.clone(),
                        },
                    )
                    .await;

                if let Some(new_admin) = new_admin {
                    info!(
                        room_id = %room_id,
                        old_admin = %member.connection_id,
                        new_admin = %new_admin.connection_id,
                        "Admin left, promoted next member"
                    );
                    self.event_bus
                        .emit_to_room(
                            room_id,
                            RoomEvent::AdminChanged {
                                old_admin: Some(member.connection_id.clone()),
                                new_admin: new_admin.connection_id.clone(),
                                new_admin_name: new_admin.name.clone(),
                            },
                        )
                        .await;
                }
            }
            LeaveOutcome::RoomClosed { room_id, member } => {
                info!(
                    room_id = %room_id,
                    connection_id = %member.connection_id,
                    "Last member left, closing jam"
                );
                self.event_bus.close_room(room_id).await;
            }
            LeaveOutcome::NotInRoom => {}
        }
    }
}
