use crate::config::OpcodeConfig;
use crate::core::ipc::RawMessage;
use crate::error::{NetworkError, Result};
use crate::protocol::layout::{self, ParseFn, WireRecord};
use crate::protocol::opcode::{ClientOpcode, Direction, MessageKind, ServerOpcode};
use std::collections::HashMap;

/// Decode routine bound to an opcode
#[derive(Clone, Copy)]
pub struct Route {
    pub kind: MessageKind,
    pub parse: ParseFn,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").field("kind", &self.kind).finish()
    }
}

/// Opcode router with one table per direction.
/// Numeric opcodes collide across directions, so the tables never share keys.
#[derive(Debug, Default)]
pub struct Dispatcher {
    server: HashMap<u16, Route>,
    client: HashMap<u16, Route>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build both tables from configured opcode values
    pub fn from_config(config: &OpcodeConfig) -> Result<Self> {
        let mut dispatcher = Self::new();
        for (op, opcode) in config.server.entries() {
            dispatcher.register(opcode, MessageKind::Server(op), server_parser(op))?;
        }
        for (op, opcode) in config.client.entries() {
            dispatcher.register(opcode, MessageKind::Client(op), client_parser(op))?;
        }
        Ok(dispatcher)
    }

    /// Bind `opcode` to `parse` in the table of `kind`'s direction
    pub fn register(&mut self, opcode: u16, kind: MessageKind, parse: ParseFn) -> Result<()> {
        let direction = kind.direction();
        let table = self.table_mut(direction);
        if table.contains_key(&opcode) {
            return Err(NetworkError::DuplicateOpcode { direction, opcode });
        }
        table.insert(opcode, Route { kind, parse });
        Ok(())
    }

    /// Look up a route; `None` means the message is not one we decode
    #[inline]
    pub fn route(&self, direction: Direction, opcode: u16) -> Option<&Route> {
        self.table(direction).get(&opcode)
    }

    /// Route and parse a message. `Ok(None)` for unrecognized opcodes.
    pub fn dispatch(&self, msg: &RawMessage<'_>) -> Result<Option<(MessageKind, WireRecord)>> {
        match self.route(msg.direction, msg.opcode) {
            Some(route) => {
                let record = (route.parse)(msg.payload)?;
                Ok(Some((route.kind, record)))
            }
            None => Ok(None),
        }
    }

    /// Reverse lookup, mostly for diagnostics and tests
    pub fn opcode_of(&self, kind: MessageKind) -> Option<u16> {
        self.table(kind.direction())
            .iter()
            .find(|(_, route)| route.kind == kind)
            .map(|(opcode, _)| *opcode)
    }

    pub fn len(&self, direction: Direction) -> usize {
        self.table(direction).len()
    }

    fn table(&self, direction: Direction) -> &HashMap<u16, Route> {
        match direction {
            Direction::ServerToClient => &self.server,
            Direction::ClientToServer => &self.client,
        }
    }

    fn table_mut(&mut self, direction: Direction) -> &mut HashMap<u16, Route> {
        match direction {
            Direction::ServerToClient => &mut self.server,
            Direction::ClientToServer => &mut self.client,
        }
    }
}

fn server_parser(op: ServerOpcode) -> ParseFn {
    match op {
        ServerOpcode::ActionEffect1 => layout::parse_action_effect::<1>,
        ServerOpcode::ActionEffect8 => layout::parse_action_effect::<8>,
        ServerOpcode::ActionEffect16 => layout::parse_action_effect::<16>,
        ServerOpcode::ActionEffect24 => layout::parse_action_effect::<24>,
        ServerOpcode::ActionEffect32 => layout::parse_action_effect::<32>,
        ServerOpcode::ActorCast => layout::parse_actor_cast,
        ServerOpcode::ActorControl => layout::parse_actor_control,
        ServerOpcode::ActorControlSelf => layout::parse_actor_control_self,
        ServerOpcode::EnvironmentControl => layout::parse_environment_control,
        ServerOpcode::Waymark => layout::parse_waymark,
        ServerOpcode::PresetWaymark => layout::parse_preset_waymark,
    }
}

fn client_parser(op: ClientOpcode) -> ParseFn {
    match op {
        ClientOpcode::ActionRequest => layout::parse_action_request,
        ClientOpcode::ActionRequestGroundTargeted => layout::parse_action_request_ground_targeted,
    }
}
