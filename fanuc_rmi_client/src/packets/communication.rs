use serde::{Deserialize, Serialize};

/// Session control messages, answered immediately and never sequenced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "Communication")]
pub enum Communication {
    /// Sent on the startup port; the reply may reassign the main port.
    #[serde(rename = "FRC_Connect")]
    FrcConnect,
    #[serde(rename = "FRC_Disconnect")]
    FrcDisconnect,
}
