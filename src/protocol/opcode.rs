//! Message kinds, scoped per transfer direction.
//!
//! The same numeric opcode can mean different things depending on which way the
//! message travels, so every lookup carries a [`Direction`] alongside the value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a captured message travelled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ServerToClient,
    ClientToServer,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ServerToClient => f.write_str("server->client"),
            Direction::ClientToServer => f.write_str("client->server"),
        }
    }
}

/// Known server->client message kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerOpcode {
    ActionEffect1,
    ActionEffect8,
    ActionEffect16,
    ActionEffect24,
    ActionEffect32,
    ActorCast,
    ActorControl,
    ActorControlSelf,
    EnvironmentControl,
    Waymark,
    PresetWaymark,
}

impl ServerOpcode {
    pub const ALL: [ServerOpcode; 11] = [
        ServerOpcode::ActionEffect1,
        ServerOpcode::ActionEffect8,
        ServerOpcode::ActionEffect16,
        ServerOpcode::ActionEffect24,
        ServerOpcode::ActionEffect32,
        ServerOpcode::ActorCast,
        ServerOpcode::ActorControl,
        ServerOpcode::ActorControlSelf,
        ServerOpcode::EnvironmentControl,
        ServerOpcode::Waymark,
        ServerOpcode::PresetWaymark,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ServerOpcode::ActionEffect1 => "ActionEffect1",
            ServerOpcode::ActionEffect8 => "ActionEffect8",
            ServerOpcode::ActionEffect16 => "ActionEffect16",
            ServerOpcode::ActionEffect24 => "ActionEffect24",
            ServerOpcode::ActionEffect32 => "ActionEffect32",
            ServerOpcode::ActorCast => "ActorCast",
            ServerOpcode::ActorControl => "ActorControl",
            ServerOpcode::ActorControlSelf => "ActorControlSelf",
            ServerOpcode::EnvironmentControl => "EnvironmentControl",
            ServerOpcode::Waymark => "Waymark",
            ServerOpcode::PresetWaymark => "PresetWaymark",
        }
    }

    /// Maximum target count of an action-effect variant
    pub fn effect_capacity(self) -> Option<usize> {
        match self {
            ServerOpcode::ActionEffect1 => Some(1),
            ServerOpcode::ActionEffect8 => Some(8),
            ServerOpcode::ActionEffect16 => Some(16),
            ServerOpcode::ActionEffect24 => Some(24),
            ServerOpcode::ActionEffect32 => Some(32),
            _ => None,
        }
    }
}

/// Known client->server message kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientOpcode {
    ActionRequest,
    ActionRequestGroundTargeted,
}

impl ClientOpcode {
    pub const ALL: [ClientOpcode; 2] = [
        ClientOpcode::ActionRequest,
        ClientOpcode::ActionRequestGroundTargeted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ClientOpcode::ActionRequest => "ActionRequest",
            ClientOpcode::ActionRequestGroundTargeted => "ActionRequestGroundTargeted",
        }
    }
}

/// A recognized message kind together with its direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Server(ServerOpcode),
    Client(ClientOpcode),
}

impl MessageKind {
    pub fn direction(self) -> Direction {
        match self {
            MessageKind::Server(_) => Direction::ServerToClient,
            MessageKind::Client(_) => Direction::ClientToServer,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Server(op) => op.name(),
            MessageKind::Client(op) => op.name(),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
