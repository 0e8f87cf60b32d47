use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{FrcError, Result};
use crate::framer::Message;

const CLASS_KEYS: [&str; 3] = ["Communication", "Command", "Instruction"];

/// A decoded controller reply.
///
/// The full message is kept untouched so fields this client does not model are
/// never lost; typed views are derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    message: Message,
}

impl Response {
    pub fn new(message: Message) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn into_message(self) -> Message {
        self.message
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.message.get(key)
    }

    /// The `ErrorID` field, if present.
    ///
    /// A value that is not a non-negative integer fitting in `u32` is reported
    /// as `u32::MAX` so it can never be mistaken for success.
    pub fn error_id(&self) -> Option<u32> {
        let value = self.message.get("ErrorID")?;
        let code = match value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        Some(code.unwrap_or(u32::MAX))
    }

    /// Absent or zero `ErrorID`.
    pub fn is_success(&self) -> bool {
        self.error_id().unwrap_or(0) == 0
    }

    /// Turn a non-zero `ErrorID` into [`FrcError::ControllerFault`].
    pub fn into_result(self) -> Result<Response> {
        match self.error_id() {
            Some(code) if code != 0 => Err(FrcError::ControllerFault {
                code,
                payload: self.message,
            }),
            _ => Ok(self),
        }
    }

    /// `(class key, packet name)`, e.g. `("Command", "FRC_Abort")`.
    pub fn kind(&self) -> Option<(&'static str, &str)> {
        CLASS_KEYS.iter().find_map(|class| {
            self.message
                .get(*class)
                .and_then(Value::as_str)
                .map(|name| (*class, name))
        })
    }

    pub fn sequence_id(&self) -> Option<u32> {
        self.message
            .get("SequenceID")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
    }

    /// Deserialize the whole message into a typed view.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.message.clone()))
            .map_err(|e| FrcError::ProtocolDecode(format!("unexpected response shape: {}", e)))
    }

    /// Deserialize a single field, `None` when it is absent.
    pub fn field<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>> {
        match self.message.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| FrcError::ProtocolDecode(format!("field '{}': {}", key, e))),
        }
    }
}

impl From<Message> for Response {
    fn from(message: Message) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> Response {
        match value {
            Value::Object(map) => Response::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn error_id_drives_success() {
        assert!(response(json!({"Command": "FRC_Reset"})).is_success());
        assert!(response(json!({"Command": "FRC_Reset", "ErrorID": 0})).is_success());

        let fault = response(json!({"Instruction": "FRC_LinearMotion", "ErrorID": 9, "SequenceID": 3}))
            .into_result()
            .unwrap_err();
        match fault {
            FrcError::ControllerFault { code, payload } => {
                assert_eq!(code, 9);
                assert_eq!(payload["SequenceID"], 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn malformed_error_id_is_never_success() {
        let reply = response(json!({"Command": "FRC_Abort", "ErrorID": "oops"}));
        assert_eq!(reply.error_id(), Some(u32::MAX));
        assert!(!reply.is_success());
    }

    #[test]
    fn kind_reports_class_and_name() {
        let reply = response(json!({"ErrorID": 0, "Command": "FRC_GetStatus"}));
        assert_eq!(reply.kind(), Some(("Command", "FRC_GetStatus")));
    }
}
