//! Line channel over a pair of async byte streams

use std::fmt;
use std::str::FromStr;

use futures::{SinkExt, StreamExt};
use hl_protocol::{LineCodec, ProtocolError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};

/// Sequential duplex text channel
///
/// Protocol logic only talks to this type, so the transport (stdin/stdout,
/// child process pipes, `tokio::io::duplex`) is chosen by whoever builds it.
/// Every `send` is flushed before it returns.
pub struct Channel<R, W> {
    reader: FramedRead<R, LineCodec>,
    writer: FramedWrite<W, LineCodec>,
}

impl<R, W> Channel<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a channel reading from `reader` and writing to `writer`
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: FramedRead::new(reader, LineCodec::new()),
            writer: FramedWrite::new(writer, LineCodec::new()),
        }
    }

    /// Next non-blank line, or `None` at end of stream
    pub async fn recv_line(&mut self) -> Result<Option<String>, ProtocolError> {
        self.reader.next().await.transpose()
    }

    /// Next line parsed as `M`, or `None` at end of stream
    pub async fn recv<M>(&mut self) -> Result<Option<M>, ProtocolError>
    where
        M: FromStr<Err = ProtocolError>,
    {
        match self.recv_line().await? {
            Some(line) => line.parse().map(Some),
            None => Ok(None),
        }
    }

    /// Write one message line and flush it
    pub async fn send<M: fmt::Display>(&mut self, message: M) -> Result<(), ProtocolError> {
        self.writer.send(message).await
    }

    /// Release the underlying streams
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }
}
