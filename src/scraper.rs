use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::agents::UserAgentPool;
use crate::config::{Config, ARCHIVE_DELAY_RANGE, ARCHIVE_PAGE_SIZE, JACKPOT_DELAY_RANGE};
use crate::fetcher::{fetch_with_retry, jitter, FetchOutcome, RetryPolicy, Sleeper, Transport};
use crate::timestamps::{cursor_month_label, month_cursors, TimeCursor};
use crate::types::{flatten_events, JackpotEventRecord};

/// Mutable per-run collections. Owned by one `Scraper`, flushed to the sink
/// once when the full range has been walked.
#[derive(Debug, Default)]
pub struct RunState {
    /// Jackpot IDs whose events were aggregated; the dedup key. A failed
    /// detail fetch does not mark its ID, so a later reappearance retries.
    pub scraped_ids: HashSet<String>,
    /// Archive listing URLs that exhausted every attempt.
    pub failed_archive_urls: Vec<String>,
    /// Detail URLs that exhausted every attempt.
    pub failed_detail_urls: Vec<String>,
    /// User-Agents that produced a failed response this run.
    pub failed_agents: HashSet<String>,
    pub rows: Vec<JackpotEventRecord>,
}

pub struct Scraper<'a> {
    cfg: &'a Config,
    transport: &'a dyn Transport,
    sleeper: &'a dyn Sleeper,
    agents: UserAgentPool,
    rng: StdRng,
    pub state: RunState,
}

impl<'a> Scraper<'a> {
    pub fn new(cfg: &'a Config, transport: &'a dyn Transport, sleeper: &'a dyn Sleeper) -> Self {
        Self::with_rng(cfg, transport, sleeper, UserAgentPool::new(), StdRng::from_entropy())
    }

    /// Seeded variant for deterministic tests.
    pub fn with_rng(
        cfg: &'a Config,
        transport: &'a dyn Transport,
        sleeper: &'a dyn Sleeper,
        agents: UserAgentPool,
        rng: StdRng,
    ) -> Self {
        Self { cfg, transport, sleeper, agents, rng, state: RunState::default() }
    }

    pub fn archive_url(&self, cursor: TimeCursor) -> String {
        format!(
            "{}/api/jackpots/history?to={cursor}&pageNum=0&pageSize={ARCHIVE_PAGE_SIZE}",
            self.cfg.base_url
        )
    }

    pub fn detail_url(&self, jackpot_id: &str) -> String {
        format!("{}/api/jackpots/history/{jackpot_id}/details", self.cfg.base_url)
    }

    /// Walk every month cursor in the configured range, aggregating events
    /// for each novel jackpot. Best-effort: exhausted URLs are recorded and
    /// skipped, never fatal.
    pub async fn run(&mut self) {
        let cursors = month_cursors(
            self.cfg.start_year,
            self.cfg.end_year,
            self.cfg.start_month,
            self.cfg.end_month,
        );
        let total = cursors.len();

        for (i, cursor) in cursors.into_iter().enumerate() {
            info!(
                "cursor {}/{total} ({}): fetching archive listing",
                i + 1,
                cursor_month_label(cursor)
            );

            let Some(ids) = self.list_jackpot_ids(cursor).await else {
                continue;
            };
            let novel: Vec<String> = ids
                .into_iter()
                .filter(|id| !self.state.scraped_ids.contains(id))
                .collect();

            self.pause(ARCHIVE_DELAY_RANGE).await;

            for jackpot_id in novel {
                let Some(events) = self.fetch_events(&jackpot_id).await else {
                    continue;
                };

                self.state.scraped_ids.insert(jackpot_id.clone());
                self.state.rows.extend(flatten_events(&jackpot_id, &events));

                self.pause(JACKPOT_DELAY_RANGE).await;
            }
        }
    }

    /// One page of jackpot IDs for a month cursor, or `None` when the
    /// listing URL exhausted its attempts.
    async fn list_jackpot_ids(&mut self, cursor: TimeCursor) -> Option<Vec<String>> {
        let url = self.archive_url(cursor);
        match self.fetch(&url, &RetryPolicy::archive()).await {
            FetchOutcome::Success(payload) => {
                let ids = payload
                    .as_array()
                    .map(|items| items.iter().filter_map(item_jackpot_id).collect())
                    .unwrap_or_default();
                Some(ids)
            }
            FetchOutcome::Exhausted => {
                warn!(
                    "all attempts failed for jackpots played on {}",
                    cursor_month_label(cursor)
                );
                self.state.failed_archive_urls.push(url);
                None
            }
        }
    }

    /// The `events` array for one jackpot, or `None` when the detail URL
    /// exhausted its attempts.
    async fn fetch_events(&mut self, jackpot_id: &str) -> Option<Vec<serde_json::Value>> {
        let url = self.detail_url(jackpot_id);
        match self.fetch(&url, &RetryPolicy::detail()).await {
            FetchOutcome::Success(payload) => Some(
                payload
                    .get("events")
                    .and_then(|e| e.as_array())
                    .cloned()
                    .unwrap_or_default(),
            ),
            FetchOutcome::Exhausted => {
                warn!("all attempts failed for jackpot {jackpot_id}");
                self.state.failed_detail_urls.push(url);
                None
            }
        }
    }

    async fn fetch(&mut self, url: &str, policy: &RetryPolicy) -> FetchOutcome {
        fetch_with_retry(
            self.transport,
            self.sleeper,
            &mut self.agents,
            &mut self.rng,
            &mut self.state.failed_agents,
            policy,
            url,
        )
        .await
    }

    async fn pause(&mut self, range: (f64, f64)) {
        self.sleeper.sleep(jitter(&mut self.rng, range)).await;
    }
}

/// `jackpotId` from one archive listing item; IDs arrive as strings or
/// integers depending on API vintage.
fn item_jackpot_id(item: &serde_json::Value) -> Option<String> {
    match item.get("jackpotId")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
