//! Score reporter runtime integration.
//!
//! Bridges the sync game loop with the async leaderboard client: each final
//! score is submitted on a background task, so the game never waits on the
//! network and never sees a submission failure.

use std::time::Duration;

use log::{info, warn};
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

use crate::client::LeaderboardClient;
use crate::engine::{EngineConfig, PlayerIdentity, ScoreSink, ScoreSubmission};
use crate::protocol::UserInfo;
use crate::server::ServerConfig;

impl From<&PlayerIdentity> for UserInfo {
    fn from(identity: &PlayerIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
        }
    }
}

/// Fire-and-forget score submitter.
pub struct ScoreReporter {
    rt: Runtime,
    address: String,
    user: UserInfo,
    timeout: Duration,
    pending: Vec<JoinHandle<()>>,
}

impl ScoreReporter {
    pub fn new(address: impl Into<String>, user: UserInfo) -> anyhow::Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("score-reporter")
            .enable_all()
            .build()?;
        Ok(Self {
            rt,
            address: address.into(),
            user,
            timeout: Duration::from_secs(5),
            pending: Vec::new(),
        })
    }

    /// Per-submission deadline covering connect, send and reply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Start a reporter for the configured identity.
    ///
    /// Returns None when submission is disabled or no identity is set.
    pub fn start_from_env(config: &EngineConfig) -> Option<Self> {
        let identity = config.submitter()?;
        let address = ServerConfig::from_env().address();
        match Self::new(address, UserInfo::from(identity)) {
            Ok(reporter) => Some(reporter),
            Err(e) => {
                warn!("score reporting disabled: {:#}", e);
                None
            }
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Submissions started and not yet finished
    pub fn in_flight(&mut self) -> usize {
        self.pending.retain(|h| !h.is_finished());
        self.pending.len()
    }
}

async fn submit_once(address: &str, user: &UserInfo, points: u32) -> anyhow::Result<u64> {
    let mut client = LeaderboardClient::connect(address).await?;
    let record = client.submit(user, points).await?;
    Ok(record.id)
}

impl ScoreSink for ScoreReporter {
    fn submit_score(&mut self, submission: ScoreSubmission) -> anyhow::Result<()> {
        self.pending.retain(|h| !h.is_finished());

        let address = self.address.clone();
        let user = self.user.clone();
        let timeout = self.timeout;
        let handle = self.rt.spawn(async move {
            let points = submission.points;
            match tokio::time::timeout(timeout, submit_once(&address, &user, points)).await {
                Ok(Ok(id)) => info!("submitted {} points as score {}", points, id),
                Ok(Err(e)) => warn!("score submission failed: {:#}", e),
                Err(_) => warn!("score submission timed out after {:?}", timeout),
            }
        });
        self.pending.push(handle);
        Ok(())
    }

    fn flush(&mut self, timeout: Duration) {
        if self.in_flight() == 0 {
            return;
        }
        let handles = std::mem::take(&mut self.pending);
        // The timer must be created inside the runtime.
        let waited = self.rt.block_on(async move {
            tokio::time::timeout(timeout, async move {
                for handle in handles {
                    let _ = handle.await;
                }
            })
            .await
        });
        if waited.is_err() {
            warn!("gave up waiting for score submissions after {:?}", timeout);
        }
    }
}
