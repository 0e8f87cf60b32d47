mod command;
mod communication;
mod instruction;
mod response;

pub use command::*;
pub use communication::*;
pub use instruction::*;
pub use response::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{FrcError, Result};
use crate::framer::Message;

/// Any request the client can put on the wire.
///
/// The tagged variants are the only way to build outbound traffic; they are
/// flattened into a generic [`Message`] only when handed to the framer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SendPacket {
    Communication(Communication),
    Command(Command),
    Instruction(Instruction),
}

impl SendPacket {
    /// The top-level key carrying the packet name.
    pub fn class_key(&self) -> &'static str {
        match self {
            SendPacket::Communication(_) => "Communication",
            SendPacket::Command(_) => "Command",
            SendPacket::Instruction(_) => "Instruction",
        }
    }

    pub fn sequence_id(&self) -> Option<u32> {
        match self {
            SendPacket::Instruction(instruction) => Some(instruction.sequence_id()),
            _ => None,
        }
    }

    /// Generic wire mapping of this packet.
    pub fn to_message(&self) -> Result<Message> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(FrcError::Serialization(format!(
                "packet did not serialize to an object: {}",
                other
            ))),
            Err(e) => Err(FrcError::Serialization(e.to_string())),
        }
    }
}

impl From<Communication> for SendPacket {
    fn from(packet: Communication) -> Self {
        SendPacket::Communication(packet)
    }
}

impl From<Command> for SendPacket {
    fn from(packet: Command) -> Self {
        SendPacket::Command(packet)
    }
}

impl From<Instruction> for SendPacket {
    fn from(packet: Instruction) -> Self {
        SendPacket::Instruction(packet)
    }
}
