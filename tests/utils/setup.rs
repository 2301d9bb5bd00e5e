use std::sync::Arc;

use pixel_music::{
    event::EventBus,
    jam::{ControlPolicy, JamService},
    websockets::{JamRoomSubscriber, WebsocketReceiveHandler},
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub jam_service: Arc<JamService>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: WebsocketReceiveHandler,
    pub room_id: String,
    /// Connection ids; each connection's display name equals its id
    pub members: Vec<String>,
}

pub struct TestSetupBuilder {
    members: Vec<String>,
    room_id: String,
    admin_only: bool,
    max_members: usize,
    join_members: bool,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            members: vec![],
            room_id: "lofi-room".to_string(),
            admin_only: false,
            max_members: 50,
            join_members: true,
        }
    }

    pub fn with_members(mut self, members: Vec<&str>) -> Self {
        self.members = members.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_members(self) -> Self {
        self.with_members(vec!["alice", "bob"])
    }

    pub fn with_three_members(self) -> Self {
        self.with_members(vec!["alice", "bob", "carol"])
    }

    pub fn with_room(mut self, room_id: &str) -> Self {
        self.room_id = room_id.to_string();
        self
    }

    /// The first member creates the room with the admin-only policy
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    pub fn with_max_members(mut self, max_members: usize) -> Self {
        self.max_members = max_members;
        self
    }

    /// Connect members without joining them to the room
    pub fn connected_only(mut self) -> Self {
        self.join_members = false;
        self
    }

    pub async fn build(self) -> TestSetup {
        let event_bus = EventBus::new(64);
        let jam_service = Arc::new(JamService::new(
            event_bus,
            self.max_members,
            ControlPolicy::Everyone,
        ));
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        let subscriber = Arc::new(JamRoomSubscriber::new(
            jam_service.clone(),
            mock_conn_manager.clone(),
        ));
        let input_handler =
            WebsocketReceiveHandler::new(jam_service.clone(), mock_conn_manager.clone(), subscriber);

        for member in &self.members {
            mock_conn_manager.add_connected(member).await;
        }

        let setup = TestSetup {
            jam_service,
            mock_conn_manager,
            input_handler,
            room_id: self.room_id,
            members: self.members,
        };

        if self.join_members {
            let room_id = setup.room_id.clone();
            for (i, member) in setup.members.iter().enumerate() {
                let admin_only = self.admin_only && i == 0;
                setup.send_join(member, &room_id, admin_only).await;
            }
            setup.clear_messages().await;
        }

        setup
    }
}
