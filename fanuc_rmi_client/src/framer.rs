//! CRLF-delimited JSON framing for the RMI byte stream.
//!
//! The controller speaks one compact JSON object per message, each terminated
//! by `\r\n`. [`MessageFramer`] accumulates raw socket reads and hands back
//! complete objects one at a time; [`encode`] produces the exact bytes to write
//! for an outbound packet.
//!
//! ```
//! use fanuc_rmi_client::framer::MessageFramer;
//!
//! let mut framer = MessageFramer::new();
//! framer.extend(b"{\"Command\":\"FRC_Abort\",\"Err");
//! assert!(framer.next_message().is_none());
//! framer.extend(b"orID\":0}\r\n");
//! let message = framer.next_message().unwrap().unwrap();
//! assert_eq!(message["ErrorID"], 0);
//! ```

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

use crate::errors::{FrcError, Result};

/// A decoded wire message: an ordered mapping of keys to JSON values.
pub type Message = Map<String, Value>;

pub const DELIMITER: &[u8; 2] = b"\r\n";

/// Incremental decoder over an append-only receive buffer.
#[derive(Debug, Default, Clone)]
pub struct MessageFramer {
    buffer: Vec<u8>,
    // Bytes before this offset are known not to start a delimiter.
    scanned: usize,
}

impl MessageFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes exactly as they came off the socket.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of buffered bytes not yet consumed by a complete segment.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Pop the next complete message.
    ///
    /// Returns `None` when the buffer holds no further delimiter, leaving any
    /// partial segment in place for the next read. Whitespace-only segments are
    /// consumed and skipped. A segment that is not a JSON object is consumed and
    /// reported as [`FrcError::ProtocolDecode`].
    pub fn next_message(&mut self) -> Option<Result<Message>> {
        loop {
            let end = self.find_delimiter()?;
            let segment: Vec<u8> = self.buffer.drain(..end + DELIMITER.len()).collect();
            self.scanned = 0;

            let raw = &segment[..end];
            if raw.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Some(decode_segment(raw));
        }
    }

    /// Drain every complete message currently buffered.
    pub fn messages(&mut self) -> Messages<'_> {
        Messages { framer: self }
    }

    fn find_delimiter(&mut self) -> Option<usize> {
        let found = self.buffer[self.scanned..]
            .windows(DELIMITER.len())
            .position(|window| window == DELIMITER)
            .map(|offset| offset + self.scanned);
        if found.is_none() {
            // A trailing '\r' may be completed by the next read.
            self.scanned = self.buffer.len().saturating_sub(DELIMITER.len() - 1);
        }
        found
    }
}

/// Iterator returned by [`MessageFramer::messages`].
pub struct Messages<'a> {
    framer: &'a mut MessageFramer,
}

impl Iterator for Messages<'_> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        self.framer.next_message()
    }
}

fn decode_segment(raw: &[u8]) -> Result<Message> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| FrcError::ProtocolDecode(format!("segment is not text: {}", e)))?;
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(FrcError::ProtocolDecode(format!(
            "expected a JSON object, got: {}",
            other
        ))),
        Err(e) => Err(FrcError::ProtocolDecode(format!("{}: {}", e, text.trim()))),
    }
}

/// Serialize `packet` as ASCII-only compact JSON followed by the delimiter.
pub fn encode<T: Serialize + ?Sized>(packet: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, AsciiFormatter);
    packet
        .serialize(&mut serializer)
        .map_err(|e| FrcError::Serialization(e.to_string()))?;
    bytes.extend_from_slice(DELIMITER);
    Ok(bytes)
}

/// Compact formatter that escapes every non-ASCII character as `\uXXXX`.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
