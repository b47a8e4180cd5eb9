//! TCP server for the leaderboard
//!
//! Accepts connections, reads one JSON request per line and answers each with
//! one JSON response line. Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::protocol::{
    create_error, extract_seq_best_effort, parse_request, ErrorCode, Request, Response,
};
use crate::store::MemoryStore;
use crate::types::LEADERBOARD_TOP_N;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Longest accepted request line in bytes
    pub max_line_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_line_bytes: 16 * 1024,
        }
    }
}

impl ServerConfig {
    /// Create from `TETRIS_LEADERBOARD_HOST` / `TETRIS_LEADERBOARD_PORT`
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("TETRIS_LEADERBOARD_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("TETRIS_LEADERBOARD_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self {
            host,
            port,
            max_line_bytes: defaults.max_line_bytes,
        }
    }

    /// `host:port`, suitable for both binding and connecting
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Serve until the listener fails.
///
/// `ready_tx` receives the bound address once the socket is listening, which
/// lets tests bind port 0.
pub async fn run_server(
    config: ServerConfig,
    store: Arc<MemoryStore>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.address()).await?;
    let bound = listener.local_addr()?;
    info!("leaderboard listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        debug!("client {} connected from {}", client_id, addr);

        let store = Arc::clone(&store);
        let max_line = config.max_line_bytes;
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, store, max_line).await {
                warn!("client {} error: {}", client_id, e);
            }
            debug!("client {} disconnected", client_id);
        });
    }
}

/// Outcome of reading one request line
#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Eof,
    /// Bytes of one line, without the newline
    Line,
    /// Over the limit; the rest of the line was discarded
    TooLong,
}

/// Read one line into `buf`, buffering at most `max_line_bytes` of it.
async fn read_request_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_line_bytes: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = max_line_bytes as u64 + 1;
    let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        return Ok(LineRead::Line);
    }
    if (n as u64) < limit {
        // Final line without a newline.
        return Ok(LineRead::Line);
    }

    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(LineRead::TooLong);
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(LineRead::TooLong);
        }
    }
}

async fn handle_client(
    socket: TcpStream,
    store: Arc<MemoryStore>,
    max_line_bytes: usize,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    let mut out: Vec<u8> = Vec::with_capacity(1024);

    loop {
        let read = read_request_line(&mut reader, &mut buf, max_line_bytes).await?;
        let response = match read {
            LineRead::Eof => return Ok(()),
            LineRead::TooLong => create_error(
                extract_seq_best_effort(&String::from_utf8_lossy(&buf)),
                ErrorCode::InvalidRequest,
                "request too large",
            ),
            LineRead::Line => match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => handle_line(&store, line.trim()).await,
                Err(_) => create_error(
                    extract_seq_best_effort(&String::from_utf8_lossy(&buf)),
                    ErrorCode::InvalidRequest,
                    "request is not valid UTF-8",
                ),
            },
        };

        out.clear();
        serde_json::to_writer(&mut out, &response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
    }
}

/// Answer one request line.
pub async fn handle_line(store: &MemoryStore, line: &str) -> Response {
    match parse_request(line) {
        Ok(request) => handle_request(store, request).await,
        Err(error) => error,
    }
}

pub async fn handle_request(store: &MemoryStore, request: Request) -> Response {
    match request {
        Request::Submit { seq, user, points } => match store.submit(&user, &points).await {
            Ok(record) => {
                info!(
                    "score {} saved for {} (id {})",
                    record.points, record.user_id, record.id
                );
                Response::Ack { seq, record }
            }
            Err(e) => {
                warn!("rejected submission seq {}: {}", seq, e);
                create_error(seq, ErrorCode::from(&e), &e.to_string())
            }
        },
        Request::Top { seq, limit } => Response::Scores {
            seq,
            scores: store.top(limit.unwrap_or(LEADERBOARD_TOP_N)).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_address() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "127.0.0.1:7878");
    }

    #[test]
    fn test_handle_line_round() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let ack = handle_line(
                &store,
                r#"{"type":"submit","seq":1,"user":{"id":"u1","email":"player@example.com"},"points":300}"#,
            )
            .await;
            assert!(matches!(ack, Response::Ack { seq: 1, .. }));

            let top = handle_line(&store, r#"{"type":"top","seq":2}"#).await;
            match top {
                Response::Scores { seq, scores } => {
                    assert_eq!(seq, 2);
                    assert_eq!(scores.len(), 1);
                    assert_eq!(scores[0].points, 300);
                    assert_eq!(scores[0].user.email.as_deref(), Some("pla***@example.com"));
                }
                other => panic!("unexpected response {:?}", other),
            }
        });
    }

    #[test]
    fn test_rejections_map_to_codes() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let cases = [
                (
                    r#"{"type":"submit","seq":3,"user":{"id":""},"points":10}"#,
                    ErrorCode::Unauthorized,
                ),
                (
                    r#"{"type":"submit","seq":4,"user":{"id":"u"},"points":-10}"#,
                    ErrorCode::InvalidScore,
                ),
                (
                    r#"{"type":"submit","seq":5,"user":{"id":"u"},"points":"lots"}"#,
                    ErrorCode::InvalidScore,
                ),
                (r#"{"seq":6"#, ErrorCode::InvalidRequest),
            ];
            for (line, expected) in cases {
                match handle_line(&store, line).await {
                    Response::Error { code, .. } => assert_eq!(code, expected, "{}", line),
                    other => panic!("unexpected response {:?}", other),
                }
            }
            assert!(store.is_empty().await);
        });
    }

    #[test]
    fn test_read_line_bounds_oversized_input() {
        tokio_test::block_on(async {
            let mut input = br#"{"type":"top","seq":3,"pad":""#.to_vec();
            input.extend(std::iter::repeat(b'x').take(100));
            input.extend_from_slice(b"\"}\n{\"type\":\"top\",\"seq\":4}\n");
            let mut reader = BufReader::new(&input[..]);
            let mut buf = Vec::new();

            let first = read_request_line(&mut reader, &mut buf, 32).await.unwrap();
            assert_eq!(first, LineRead::TooLong);
            assert_eq!(buf.len(), 33);
            assert_eq!(extract_seq_best_effort(&String::from_utf8_lossy(&buf)), 3);

            let second = read_request_line(&mut reader, &mut buf, 32).await.unwrap();
            assert_eq!(second, LineRead::Line);
            assert_eq!(buf, br#"{"type":"top","seq":4}"#.to_vec());

            let end = read_request_line(&mut reader, &mut buf, 32).await.unwrap();
            assert_eq!(end, LineRead::Eof);
        });
    }

    #[test]
    fn test_read_line_keeps_invalid_utf8_bytes() {
        tokio_test::block_on(async {
            let input = b"{\"seq\":5,\"x\":\"\xff\xfe\"}\nrest";
            let mut reader = BufReader::new(&input[..]);
            let mut buf = Vec::new();

            assert_eq!(
                read_request_line(&mut reader, &mut buf, 1024).await.unwrap(),
                LineRead::Line
            );
            assert!(std::str::from_utf8(&buf).is_err());
            assert_eq!(
                read_request_line(&mut reader, &mut buf, 1024).await.unwrap(),
                LineRead::Line
            );
            assert_eq!(buf, b"rest".to_vec());
        });
    }
}
