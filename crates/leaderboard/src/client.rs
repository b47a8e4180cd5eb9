//! Async client for the leaderboard service.

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::protocol::{Request, Response, ScoreEntry, ScoreRecord, UserInfo};

/// One connection; requests are sent and answered one at a time.
pub struct LeaderboardClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    next_seq: u64,
    line: String,
}

impl LeaderboardClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .context("connecting to leaderboard")?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
            next_seq: 1,
            line: String::new(),
        })
    }

    fn seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Send one request and wait for its response.
    pub async fn request(&mut self, request: &Request) -> anyhow::Result<Response> {
        let mut out = serde_json::to_vec(request)?;
        out.push(b'\n');
        self.writer.write_all(&out).await?;

        self.line.clear();
        if self.reader.read_line(&mut self.line).await? == 0 {
            bail!("leaderboard closed the connection");
        }
        let response: Response = serde_json::from_str(self.line.trim())?;
        if response.seq() != request.seq() {
            bail!(
                "response seq {} does not match request seq {}",
                response.seq(),
                request.seq()
            );
        }
        Ok(response)
    }

    /// Submit a final score. Service-side rejections become errors.
    pub async fn submit(&mut self, user: &UserInfo, points: u32) -> anyhow::Result<ScoreRecord> {
        let seq = self.seq();
        match self.request(&Request::submit(seq, user.clone(), points)).await? {
            Response::Ack { record, .. } => Ok(record),
            Response::Error { code, message, .. } => bail!("{}: {}", code.as_str(), message),
            other => bail!("unexpected response {:?}", other),
        }
    }

    /// Fetch up to `limit` best scores (the service caps this at 10).
    pub async fn top(&mut self, limit: usize) -> anyhow::Result<Vec<ScoreEntry>> {
        let seq = self.seq();
        match self.request(&Request::top(seq, limit)).await? {
            Response::Scores { scores, .. } => Ok(scores),
            Response::Error { code, message, .. } => bail!("{}: {}", code.as_str(), message),
            other => bail!("unexpected response {:?}", other),
        }
    }
}
