//! Deepgram streaming transcription session
//!
//! One persistent WebSocket connection per session. The full audio chunk
//! sequence is forwarded before any response message is read, then a
//! `CloseStream` control frame marks end of input and the session switches to
//! a receive loop. Interim results emitted during upload sit in the transport
//! buffer until the receive phase; that is fine for file-length audio but
//! makes this session unsuitable for live microphone capture.

use crate::adapters::deepgram::response;
use crate::adapters::deepgram::DeepgramClient;
use crate::domain::models::TranscriptionResult;
use crate::error::{AppError, Result};
use crate::ports::transcription::TranscribeOptions;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Text frame signalling end of audio input to Deepgram
const CLOSE_STREAM_FRAME: &str = r#"{"type":"CloseStream"}"#;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

impl DeepgramClient {
    /// Open a streaming session, forward all audio chunks, and return the
    /// lazy result sequence.
    ///
    /// Fails with a configuration error when no WebSocket endpoint is
    /// configured, before any connection attempt. Empty chunks are skipped.
    pub async fn stream_transcription<I>(
        &self,
        chunks: I,
        mimetype: &str,
        options: &TranscribeOptions,
    ) -> Result<LiveTranscription>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let endpoint = self.config().websocket_endpoint.as_deref().ok_or_else(|| {
            AppError::Config("Streaming support requires a Deepgram WebSocket endpoint".to_string())
        })?;

        let url = if options.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, options.to_query_string())
        };

        log::info!("Connecting to Deepgram WebSocket: {}", url);

        let mut request = url
            .into_client_request()
            .map_err(|e| AppError::Transcription(format!("Failed to build request: {}", e)))?;
        let headers = request.headers_mut();
        headers.insert(
            "Authorization",
            self.authorization_header()
                .parse()
                .map_err(|_| AppError::Config("Deepgram API key is not a valid header value".to_string()))?,
        );
        headers.insert(
            "Content-Type",
            mimetype
                .parse()
                .map_err(|_| AppError::InvalidInput(format!("Invalid mimetype: {}", mimetype)))?,
        );

        let (ws, _) = connect_async(request)
            .await
            .map_err(|e| AppError::Transcription(format!("WebSocket connection failed: {}", e)))?;

        let mut session = LiveTranscription { ws, closed: false };
        if let Err(e) = session.send_all(chunks).await {
            session.close().await;
            return Err(e);
        }

        Ok(session)
    }
}

/// A live transcription session in its receive phase.
///
/// Forward-only and non-restartable: results are pulled one at a time with
/// `next`, and the sequence ends when the server closes the connection.
#[derive(Debug)]
pub struct LiveTranscription {
    ws: WsStream,
    closed: bool,
}

impl LiveTranscription {
    /// Drain the chunk sequence as binary frames, then signal end of input
    async fn send_all<I>(&mut self, chunks: I) -> Result<()>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        for chunk in chunks {
            if chunk.is_empty() {
                continue;
            }
            self.ws
                .send(Message::Binary(chunk))
                .await
                .map_err(|e| AppError::Transcription(format!("Failed to send audio: {}", e)))?;
        }

        self.ws
            .send(Message::Text(CLOSE_STREAM_FRAME.to_string()))
            .await
            .map_err(|e| AppError::Transcription(format!("Failed to signal end of stream: {}", e)))
    }

    /// Pull the next transcription result.
    ///
    /// Messages that fail to decode, and control/metadata messages without
    /// transcript data, are discarded silently. `Ok(None)` means the server
    /// closed the connection; the transport is closed at that point.
    pub async fn next(&mut self) -> Result<Option<TranscriptionResult>> {
        if self.closed {
            return Ok(None);
        }

        loop {
            match self.ws.next().await {
                None | Some(Ok(Message::Close(_))) => {
                    self.close().await;
                    return Ok(None);
                }
                Some(Ok(Message::Text(text))) => {
                    let Ok(payload) = serde_json::from_str::<serde_json::Value>(&text) else {
                        log::debug!("Discarding undecodable Deepgram message");
                        continue;
                    };
                    if !response::contains_transcript(&payload) {
                        continue;
                    }
                    return Ok(Some(response::normalize(payload)));
                }
                Some(Ok(_)) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => {
                    self.close().await;
                    return Ok(None);
                }
                Some(Err(e)) => {
                    self.close().await;
                    return Err(AppError::Transcription(format!(
                        "Deepgram WebSocket session failed: {}",
                        e
                    )));
                }
            }
        }
    }

    /// Close the underlying transport.
    ///
    /// Idempotent; errors raised by the close call itself are suppressed.
    /// Dropping the session without calling this still releases the
    /// connection, just without the close handshake.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.ws.close(None).await {
            log::debug!("Ignoring error while closing Deepgram WebSocket: {}", e);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::deepgram::DeepgramConfig;
    use serde_json::json;
    use tokio::net::TcpListener;

    fn local_client(addr: std::net::SocketAddr) -> DeepgramClient {
        let mut config = DeepgramConfig::new("test_api_key");
        config.websocket_endpoint = Some(format!("ws://{}/v1/listen", addr));
        DeepgramClient::new(config).unwrap()
    }

    /// Accepts one session: counts binary frames until the CloseStream text
    /// frame, replies with the given messages, then closes. Returns the
    /// number of binary frames received.
    async fn spawn_server(replies: Vec<String>) -> (std::net::SocketAddr, tokio::task::JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            let mut binary_frames = 0;
            while let Some(message) = ws.next().await {
                match message.unwrap() {
                    Message::Binary(_) => binary_frames += 1,
                    Message::Text(text) => {
                        assert_eq!(text, CLOSE_STREAM_FRAME);
                        break;
                    }
                    _ => {}
                }
            }

            for reply in replies {
                ws.send(Message::Text(reply)).await.unwrap();
            }
            let _ = ws.close(None).await;
            // Drain until the peer acknowledges the close
            while ws.next().await.is_some() {}
            binary_frames
        });

        (addr, handle)
    }

    #[tokio::test]
    async fn test_streaming_yields_qualifying_messages_only() {
        let (addr, server) = spawn_server(vec![
            json!({"type": "Metadata", "request_id": "r1"}).to_string(),
            "not json at all".to_string(),
            json!({"channel": {"alternatives": []}}).to_string(),
            json!({"channel": {"alternatives": [{"transcript": "streamed words"}]}}).to_string(),
        ])
        .await;

        let client = local_client(addr);
        let chunks = vec![b"a".to_vec(), Vec::new(), b"b".to_vec()];
        let mut session = client
            .stream_transcription(chunks, "audio/wav", &TranscribeOptions::new())
            .await
            .unwrap();

        let first = session.next().await.unwrap().expect("one result expected");
        assert_eq!(first.text, "streamed words");

        // Server close ends the sequence gracefully
        assert!(session.next().await.unwrap().is_none());
        assert!(session.is_closed());

        // Empty chunk was skipped during the drain phase
        assert_eq!(server.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_early_abandonment_closes_transport_once() {
        let (addr, server) = spawn_server(vec![
            json!({"channel": {"alternatives": [{"transcript": "first"}]}}).to_string(),
            json!({"channel": {"alternatives": [{"transcript": "second"}]}}).to_string(),
        ])
        .await;

        let client = local_client(addr);
        let mut session = client
            .stream_transcription(vec![b"a".to_vec()], "audio/wav", &TranscribeOptions::new())
            .await
            .unwrap();

        let first = session.next().await.unwrap().expect("one result expected");
        assert_eq!(first.text, "first");

        // Abandon the rest of the sequence; close must be idempotent
        session.close().await;
        session.close().await;
        assert!(session.is_closed());
        assert!(session.next().await.unwrap().is_none());

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_streaming_unconfigured_endpoint_fails_before_connecting() {
        let mut config = DeepgramConfig::new("test_api_key");
        config.websocket_endpoint = None;
        let client = DeepgramClient::new(config).unwrap();

        let err = client
            .stream_transcription(vec![b"a".to_vec()], "audio/wav", &TranscribeOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_options_are_appended_as_query_string() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut uri = String::new();
            let mut ws = tokio_tungstenite::accept_hdr_async(
                stream,
                |request: &tokio_tungstenite::tungstenite::handshake::server::Request, response| {
                    uri = request.uri().to_string();
                    Ok(response)
                },
            )
            .await
            .unwrap();

            while let Some(message) = ws.next().await {
                if matches!(message.unwrap(), Message::Text(_)) {
                    break;
                }
            }
            let _ = ws.close(None).await;
            while ws.next().await.is_some() {}
            uri
        });

        let client = local_client(addr);
        let options = TranscribeOptions::new().model("nova-2-meeting").punctuate(true);
        let mut session = client
            .stream_transcription(vec![b"a".to_vec()], "audio/wav", &options)
            .await
            .unwrap();
        assert!(session.next().await.unwrap().is_none());

        let uri = server.await.unwrap();
        assert!(uri.ends_with("?model=nova-2-meeting&punctuate=true"), "uri = {}", uri);
    }
}
