//! Tokio codec for line-delimited protocol messages

use std::fmt;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::error::ProtocolError;

/// Maximum accepted line length in bytes (excluding the newline)
pub const MAX_LINE_LENGTH: usize = 256;

/// Codec splitting a byte stream into trimmed, non-blank lines
///
/// Decoding yields raw lines so callers can parse them as the message type
/// expected at that point of the session (a secret, a case count, a
/// [`Request`](crate::Request) or a [`Reply`](crate::Reply)). Encoding accepts
/// anything that implements `Display` and appends the line terminator.
#[derive(Debug)]
pub struct LineCodec {
    inner: LinesCodec,
}

impl LineCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn map_lines_error(err: LinesCodecError) -> ProtocolError {
    match err {
        LinesCodecError::MaxLineLengthExceeded => ProtocolError::LineTooLong {
            max: MAX_LINE_LENGTH,
        },
        LinesCodecError::Io(e) => ProtocolError::Io(e),
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Blank lines carry no message
        loop {
            match self.inner.decode(src).map_err(map_lines_error)? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(line.trim().to_string())),
                None => return Ok(None),
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.inner.decode_eof(src).map_err(map_lines_error)? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(line.trim().to_string())),
                None => return Ok(None),
            }
        }
    }
}

impl<T: fmt::Display> Encoder<T> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = item.to_string();
        if line.len() > MAX_LINE_LENGTH {
            return Err(ProtocolError::LineTooLong {
                max: MAX_LINE_LENGTH,
            });
        }

        tracing::trace!(line = %line, "encoding line");
        dst.reserve(line.len() + 1);
        dst.extend_from_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Reply, Request};
    use futures::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    #[test]
    fn test_encode_request_and_reply() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode(Request::Query(500), &mut buf).unwrap();
        codec.encode(Reply::Less, &mut buf).unwrap();
        codec.encode(Request::Answer(3), &mut buf).unwrap();

        assert_eq!(&buf[..], b"? 500\n<\n! 3\n");
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"\n   \n? 500\r\n"[..]);

        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(line, "? 500");
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"? 50"[..]);

        // Should return None (need more data)
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"0\n");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "? 500");
    }

    #[test]
    fn test_decode_eof_unterminated_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"! 42"[..]);

        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(codec.decode_eof(&mut buf).unwrap().unwrap(), "! 42");
    }

    #[test]
    fn test_decode_line_too_long() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(vec![b'7'; MAX_LINE_LENGTH + 10].as_slice());

        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::LineTooLong { max: MAX_LINE_LENGTH })
        ));
    }

    #[tokio::test]
    async fn test_framed_exchange() {
        let (client, server) = tokio::io::duplex(64);
        let (client_read, client_write) = tokio::io::split(client);
        let (server_read, server_write) = tokio::io::split(server);

        let mut client_tx = FramedWrite::new(client_write, LineCodec::new());
        let mut client_rx = FramedRead::new(client_read, LineCodec::new());
        let mut server_tx = FramedWrite::new(server_write, LineCodec::new());
        let mut server_rx = FramedRead::new(server_read, LineCodec::new());

        client_tx.send(Request::MaxQueries).await.unwrap();
        let line = server_rx.next().await.unwrap().unwrap();
        assert_eq!(line.parse::<Request>().unwrap(), Request::MaxQueries);

        server_tx.send(Reply::Budget(10)).await.unwrap();
        let line = client_rx.next().await.unwrap().unwrap();
        assert_eq!(line.parse::<Reply>().unwrap(), Reply::Budget(10));
    }
}
