//! Length-prefixed framing over the host's standard streams
//!
//! The browser's native messaging wire format is fixed: every frame is a
//! 4-byte unsigned little-endian length followed by that many bytes of UTF-8
//! JSON, in both directions. The channel is generic over the underlying
//! reader and writer so tests can drive it with in-memory buffers.

use std::io::{Read, Write};

use crate::error::{HostError, Result};
use crate::protocol::{Message, Response};

/// Sanity cap on a declared frame length. A real message is a few hundred
/// bytes; anything near this is a corrupt prefix, not a command.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Bidirectional framed channel over a reader/writer pair
pub struct FramedChannel<R, W> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> FramedChannel<R, W> {
    /// Wrap a reader and writer in the framing protocol.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read one frame and decode it.
    ///
    /// Returns `Ok(None)` when the stream is already closed at a frame
    /// boundary, which is the peer's normal shutdown signal. A stream that
    /// closes mid-prefix or mid-body is a protocol error, as is a body that
    /// is not valid UTF-8 JSON. A body that is valid JSON of the wrong shape
    /// is NOT: field extraction is tolerant and the router answers such
    /// frames per request.
    pub fn read_message(&mut self) -> Result<Option<Message>> {
        let mut prefix = [0u8; 4];
        let mut filled = 0;
        while filled < prefix.len() {
            let n = self.reader.read(&mut prefix[filled..])?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(HostError::TruncatedFrame {
                    expected: prefix.len(),
                    actual: filled,
                });
            }
            filled += n;
        }

        let len = u32::from_le_bytes(prefix) as usize;
        if len > MAX_FRAME_LEN {
            return Err(HostError::OversizedFrame(len));
        }

        let mut body = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let n = self.reader.read(&mut body[filled..])?;
            if n == 0 {
                return Err(HostError::TruncatedFrame {
                    expected: len,
                    actual: filled,
                });
            }
            filled += n;
        }

        let value: serde_json::Value = serde_json::from_slice(&body)?;
        Ok(Some(Message::from_value(value)))
    }

    /// Consume the channel, returning the underlying reader and writer.
    pub(crate) fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Encode and write one response frame, flushing so the peer observes
    /// the full frame at once.
    pub fn write_response(&mut self, response: &Response) -> Result<()> {
        let body = serde_json::to_vec(response)?;
        let prefix = (body.len() as u32).to_le_bytes();
        self.writer.write_all(&prefix)?;
        self.writer.write_all(&body)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn frame(payload: &str) -> Vec<u8> {
        let mut bytes = (payload.len() as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(payload.as_bytes());
        bytes
    }

    fn channel_over(input: Vec<u8>) -> FramedChannel<Cursor<Vec<u8>>, Vec<u8>> {
        FramedChannel::new(Cursor::new(input), Vec::new())
    }

    #[test]
    fn reads_one_frame() {
        let mut channel = channel_over(frame(r#"{"cmd":"get"}"#));
        let message = channel.read_message().unwrap().unwrap();
        assert_eq!(message.cmd.as_deref(), Some("get"));
    }

    #[test]
    fn reads_frames_back_to_back() {
        let mut input = frame(r#"{"cmd":"get"}"#);
        input.extend(frame(r#"{"cmd":"health"}"#));
        let mut channel = channel_over(input);

        assert_eq!(
            channel.read_message().unwrap().unwrap().cmd.as_deref(),
            Some("get")
        );
        assert_eq!(
            channel.read_message().unwrap().unwrap().cmd.as_deref(),
            Some("health")
        );
        assert!(channel.read_message().unwrap().is_none());
    }

    #[test]
    fn empty_stream_is_end_of_stream_not_error() {
        let mut channel = channel_over(Vec::new());
        assert!(channel.read_message().unwrap().is_none());
    }

    #[test]
    fn short_prefix_is_truncated_frame() {
        let mut channel = channel_over(vec![0x05, 0x00]);
        match channel.read_message() {
            Err(HostError::TruncatedFrame {
                expected: 4,
                actual: 2,
            }) => {}
            other => panic!("expected truncated prefix, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn short_body_is_truncated_frame() {
        let mut input = (10u32).to_le_bytes().to_vec();
        input.extend_from_slice(b"abc");
        let mut channel = channel_over(input);
        match channel.read_message() {
            Err(HostError::TruncatedFrame {
                expected: 10,
                actual: 3,
            }) => {}
            other => panic!("expected truncated body, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn oversized_length_is_rejected_before_allocation() {
        let input = (u32::MAX).to_le_bytes().to_vec();
        let mut channel = channel_over(input);
        assert!(matches!(
            channel.read_message(),
            Err(HostError::OversizedFrame(_))
        ));
    }

    #[test]
    fn wrong_typed_fields_still_decode_as_a_message() {
        // Valid JSON with bad field types must reach the router, not kill
        // the session at the framing layer.
        let mut input = frame(r#"{"cmd":"set","pat":123}"#);
        input.extend(frame(r#"{"cmd":123}"#));
        let mut channel = channel_over(input);

        let first = channel.read_message().unwrap().unwrap();
        assert_eq!(first.cmd.as_deref(), Some("set"));
        let second = channel.read_message().unwrap().unwrap();
        assert_eq!(second.cmd.as_deref(), Some("123"));
    }

    #[test]
    fn invalid_json_body_is_malformed_frame() {
        let mut channel = channel_over(frame("not json"));
        assert!(matches!(
            channel.read_message(),
            Err(HostError::MalformedFrame(_))
        ));
    }

    #[test]
    fn invalid_utf8_body_is_malformed_frame() {
        let mut input = (4u32).to_le_bytes().to_vec();
        input.extend_from_slice(&[0xff, 0xfe, 0xfd, 0xfc]);
        let mut channel = channel_over(input);
        assert!(matches!(
            channel.read_message(),
            Err(HostError::MalformedFrame(_))
        ));
    }

    #[test]
    fn writes_length_prefixed_json() {
        let mut channel = channel_over(Vec::new());
        channel
            .write_response(&Response::success("PAT stored securely"))
            .unwrap();

        let out = channel.writer;
        let len = u32::from_le_bytes(out[..4].try_into().unwrap()) as usize;
        assert_eq!(len, out.len() - 4);
        assert_eq!(
            std::str::from_utf8(&out[4..]).unwrap(),
            r#"{"status":"success","message":"PAT stored securely"}"#
        );
    }
}
