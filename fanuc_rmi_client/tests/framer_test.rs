use fanuc_rmi_client::framer::{encode, MessageFramer};
use fanuc_rmi_client::packets::{Command, SendPacket};
use fanuc_rmi_client::{FrcError, Message};

fn stream() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"{\"Communication\":\"FRC_Connect\",\"ErrorID\":0,\"PortNumber\":16002}\r\n");
    bytes.extend_from_slice(b"  \r\n");
    bytes.extend_from_slice(b"{\"Command\":\"FRC_ReadJointAngles\",\"ErrorID\":0,\"JointAngle\":{\"J1\":1.5,\"J2\":-2.25}}\r\n");
    bytes.extend_from_slice(b"\r\n");
    bytes.extend_from_slice(b"{\"Instruction\":\"FRC_LinearMotion\",\"ErrorID\":0,\"SequenceID\":12,\"Note\":\"caf\\u00e9\"}\r\n");
    bytes
}

fn decode_all(framer: &mut MessageFramer) -> Vec<Message> {
    framer.messages().map(|message| message.unwrap()).collect()
}

#[test]
fn test_single_read_decodes_every_message() {
    let mut framer = MessageFramer::new();
    framer.extend(&stream());
    let messages = decode_all(&mut framer);

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["PortNumber"], 16002);
    assert_eq!(messages[1]["JointAngle"]["J2"], -2.25);
    assert_eq!(messages[2]["Note"], "café");
    assert_eq!(framer.pending(), 0);
}

#[test]
fn test_framing_is_chunk_boundary_invariant() {
    let bytes = stream();
    let mut whole = MessageFramer::new();
    whole.extend(&bytes);
    let expected = decode_all(&mut whole);

    for chunk in 1..=bytes.len() {
        let mut framer = MessageFramer::new();
        let mut decoded = Vec::new();
        for piece in bytes.chunks(chunk) {
            framer.extend(piece);
            decoded.extend(decode_all(&mut framer));
        }
        assert_eq!(decoded, expected, "chunk size {}", chunk);
        assert_eq!(framer.pending(), 0);
    }
}

#[test]
fn test_partial_segment_is_kept() {
    let mut framer = MessageFramer::new();
    framer.extend(b"{\"ErrorID\":0}\r\n{\"Command\":");
    assert_eq!(decode_all(&mut framer).len(), 1);
    assert_eq!(framer.pending(), "{\"Command\":".len());
}

#[test]
fn test_non_object_segment_is_protocol_error() {
    let mut framer = MessageFramer::new();
    framer.extend(b"[1,2,3]\r\nnot json\r\n{\"ErrorID\":0}\r\n");

    assert!(matches!(framer.next_message(), Some(Err(FrcError::ProtocolDecode(_)))));
    assert!(matches!(framer.next_message(), Some(Err(FrcError::ProtocolDecode(_)))));
    // Bad segments are consumed, so decoding resumes at the next delimiter.
    assert_eq!(framer.next_message().unwrap().unwrap()["ErrorID"], 0);
}

#[test]
fn test_encode_is_compact_with_crlf() {
    let packet = SendPacket::Command(Command::FrcAbort);
    let bytes = encode(&packet.to_message().unwrap()).unwrap();
    assert_eq!(bytes, b"{\"Command\":\"FRC_Abort\"}\r\n".to_vec());
}
