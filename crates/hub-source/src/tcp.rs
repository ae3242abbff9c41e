//! Newline-delimited JSON frames over TCP
//!
//! The microcontroller side presents its serial stream as an NDJSON TCP
//! service (one frame per line). Junk bytes and foreign message types are
//! discarded by [`hub_core::decode_frame`]; only EOF and socket errors
//! surface as link loss.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::net::TcpStream;
use tracing::debug;

use hub_core::{decode_frame, RawFrame};

use crate::source::{FrameSource, SourceConnector, SourceError};

/// Connects to an NDJSON frame service
pub struct TcpConnector {
    addr: String,
    read_timeout: Duration,
}

impl TcpConnector {
    pub fn new(addr: impl Into<String>, read_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            read_timeout,
        }
    }
}

#[async_trait]
impl SourceConnector for TcpConnector {
    async fn connect(&self) -> Result<Box<dyn FrameSource>, SourceError> {
        let stream =
            TcpStream::connect(&self.addr)
                .await
                .map_err(|source| SourceError::Connect {
                    addr: self.addr.clone(),
                    source,
                })?;
        debug!(addr = %self.addr, "frame source connected");

        Ok(Box::new(TcpFrameSource {
            lines: BufReader::new(stream).lines(),
            read_timeout: self.read_timeout,
        }))
    }
}

/// One open NDJSON link
pub struct TcpFrameSource {
    lines: Lines<BufReader<TcpStream>>,
    read_timeout: Duration,
}

#[async_trait]
impl FrameSource for TcpFrameSource {
    async fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        match tokio::time::timeout(self.read_timeout, self.lines.next_line()).await {
            // Read timeout is not an error; the caller polls again
            Err(_) => Ok(None),
            Ok(Ok(Some(line))) => Ok(decode_frame(&line)),
            Ok(Ok(None)) => Err(SourceError::Disconnected),
            Ok(Err(e)) => Err(SourceError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_source_reads_frames_and_detects_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket
                .write_all(
                    b"{\"type\":\"vehicle_inputs\",\"seq\":1}\n\
                      not json\n\
                      {\"type\":\"debug\"}\n\
                      {\"type\":\"vehicle_inputs\",\"seq\":2}\n",
                )
                .await
                .unwrap();
            // Drop the socket: EOF on the client side
        });

        let connector = TcpConnector::new(addr.to_string(), Duration::from_millis(500));
        let mut source = connector.connect().await.unwrap();

        assert_eq!(source.next_frame().await.unwrap().unwrap().seq, Some(1));
        // Junk line and foreign type both read as "nothing this round"
        assert!(source.next_frame().await.unwrap().is_none());
        assert!(source.next_frame().await.unwrap().is_none());
        assert_eq!(source.next_frame().await.unwrap().unwrap().seq, Some(2));

        server.await.unwrap();
        assert!(matches!(
            source.next_frame().await,
            Err(SourceError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn test_tcp_connect_failure_is_connect_error() {
        // Port 1 on localhost is essentially never listening
        let connector = TcpConnector::new("127.0.0.1:1", Duration::from_millis(100));
        assert!(matches!(
            connector.connect().await,
            Err(SourceError::Connect { .. })
        ));
    }

    #[tokio::test]
    async fn test_tcp_read_timeout_is_not_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            // Hold the socket open without writing
            tokio::time::sleep(Duration::from_millis(200)).await;
            drop(socket);
        });

        let connector = TcpConnector::new(addr.to_string(), Duration::from_millis(50));
        let mut source = connector.connect().await.unwrap();
        assert!(source.next_frame().await.unwrap().is_none());
        server.await.unwrap();
    }
}
