//! # Helpful Votes
//!
//! File: cli/src/common/network/votes.rs
//!
//! ## Overview
//!
//! Readers can mark an FAQ item as helpful. Votes live in one of two places:
//!
//! - **Remote**: a PostgREST-style table (Supabase and friends). Each vote is
//!   one row `{faq_id, ip_address}`; counts are computed by fetching the
//!   `faq_id` column for the requested ids and counting rows. Rows are read
//!   in pages, because servers cap how many rows one response may carry.
//! - **Memory**: a process-local counter, used when no endpoint is configured.
//!
//! `VoteGuard` remembers which voter already voted for which item so a repeat
//! is refused before the backend is called. It only covers the current
//! process; the remote table is the source of truth for counts.
//!
//! ## Wire format (remote)
//!
//! ```text
//! GET  {endpoint}/{table}?select=faq_id&faq_id=in.("a","b")&limit=1000&offset=0
//!      Prefer: count=exact   -> [{"faq_id":"a"}, ...]  Content-Range: 0-999/2500
//! POST {endpoint}/{table}  {"faq_id":"a","ip_address":"203.0.113.7"}
//! ```
//!
//! With an API key, every request carries `apikey: KEY` and
//! `Authorization: Bearer KEY`.
//!
use crate::core::config::VotesConfig;
use crate::core::error::{Result, SupportError};
use reqwest::header::{HeaderMap, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::{debug, error, info};

const PAGE_SIZE: usize = 1000;

#[derive(Debug, Deserialize)]
struct VoteRow {
    faq_id: String,
}

#[derive(Debug, Serialize)]
struct NewVote<'a> {
    faq_id: &'a str,
    ip_address: &'a str,
}

/// Client for a PostgREST-style vote table.
#[derive(Debug, Clone)]
pub struct RemoteVoteClient {
    client: Client,
    table_url: String,
    api_key: Option<String>,
}

impl RemoteVoteClient {
    pub fn new(client: Client, endpoint: &str, table: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            table_url: format!("{}/{}", endpoint.trim_end_matches('/'), table),
            api_key,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    /// Returns the number of votes per id. Ids without votes map to 0.
    pub async fn counts(&self, ids: &[String]) -> Result<HashMap<String, u64>> {
        let mut counts: HashMap<String, u64> = ids.iter().map(|id| (id.clone(), 0)).collect();
        if ids.is_empty() {
            return Ok(counts);
        }

        let filter = in_filter(ids);
        let mut offset = 0;
        loop {
            let request = self
                .client
                .get(&self.table_url)
                .header("Prefer", "count=exact")
                .query(&[("select", "faq_id"), ("faq_id", filter.as_str())])
                .query(&[("limit", PAGE_SIZE), ("offset", offset)]);
            let response = self
                .authorize(request)
                .send()
                .await
                .map_err(SupportError::from)?;
            let response = ensure_success(response, "fetch vote counts").await?;
            let total = total_rows(response.headers());
            let rows: Vec<VoteRow> = response.json().await.map_err(SupportError::from)?;

            let fetched = rows.len();
            for row in rows {
                *counts.entry(row.faq_id).or_insert(0) += 1;
            }
            offset += fetched;

            let more = match total {
                Some(total) => offset < total,
                None => fetched == PAGE_SIZE,
            };
            if fetched == 0 || !more {
                break;
            }
            debug!("Fetched {} vote rows so far, continuing", offset);
        }
        debug!("Fetched vote counts for {} item(s)", ids.len());
        Ok(counts)
    }

    /// Inserts one vote row.
    pub async fn record(&self, faq_id: &str, voter: &str) -> Result<()> {
        let request = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=minimal")
            .json(&NewVote {
                faq_id,
                ip_address: voter,
            });
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(SupportError::from)?;
        ensure_success(response, "record vote").await?;
        info!("Recorded helpful vote for '{}'", faq_id);
        Ok(())
    }
}

/// PostgREST `in.(..)` filter with every id double-quoted, so ids may
/// contain `,`, `(` or `)`.
fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

/// Total row count from a `Content-Range: 0-999/2500` header, if known.
fn total_rows(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_RANGE)?
        .to_str()
        .ok()?
        .rsplit('/')
        .next()?
        .parse()
        .ok()
}

async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error!("Vote backend failed to {}: {} {}", action, status, body);
    Err(SupportError::VoteBackend(format!("failed to {}: {} {}", action, status, body)).into())
}

/// Process-local vote counter.
#[derive(Debug, Default)]
pub struct MemoryVotes {
    counts: Mutex<HashMap<String, u64>>,
}

impl MemoryVotes {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, u64>>> {
        self.counts
            .lock()
            .map_err(|_| SupportError::VoteBackend("vote counter lock poisoned".to_string()).into())
    }

    pub fn counts(&self, ids: &[String]) -> Result<HashMap<String, u64>> {
        let counts = self.lock()?;
        Ok(ids
            .iter()
            .map(|id| (id.clone(), counts.get(id).copied().unwrap_or(0)))
            .collect())
    }

    pub fn record(&self, faq_id: &str) -> Result<()> {
        *self.lock()?.entry(faq_id.to_string()).or_insert(0) += 1;
        Ok(())
    }
}

/// Where helpful votes are stored.
#[derive(Debug)]
pub enum VoteBackend {
    Remote(RemoteVoteClient),
    Memory(MemoryVotes),
}

impl VoteBackend {
    /// Remote when `votes.endpoint` is set, in-memory otherwise.
    pub fn from_config(config: &VotesConfig, client: Client) -> Self {
        match &config.endpoint {
            Some(endpoint) => {
                info!("Using remote vote storage at {}", endpoint);
                VoteBackend::Remote(RemoteVoteClient::new(
                    client,
                    endpoint,
                    &config.table,
                    config.api_key.clone(),
                ))
            }
            None => {
                info!("No vote endpoint configured; votes are kept in memory.");
                VoteBackend::Memory(MemoryVotes::default())
            }
        }
    }

    pub async fn counts(&self, ids: &[String]) -> Result<HashMap<String, u64>> {
        match self {
            VoteBackend::Remote(client) => client.counts(ids).await,
            VoteBackend::Memory(votes) => votes.counts(ids),
        }
    }

    pub async fn count(&self, faq_id: &str) -> Result<u64> {
        let ids = [faq_id.to_string()];
        Ok(self.counts(&ids).await?.get(faq_id).copied().unwrap_or(0))
    }

    pub async fn record(&self, faq_id: &str, voter: &str) -> Result<()> {
        match self {
            VoteBackend::Remote(client) => client.record(faq_id, voter).await,
            VoteBackend::Memory(votes) => votes.record(faq_id),
        }
    }
}

/// Remembers `(voter, faq_id)` pairs that already voted in this process.
#[derive(Debug, Default)]
pub struct VoteGuard {
    seen: Mutex<HashSet<(String, String)>>,
}

impl VoteGuard {
    /// Marks the pair as voted, or fails with `AlreadyVoted` if it was.
    pub fn claim(&self, voter: &str, faq_id: &str) -> Result<()> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|_| SupportError::VoteBackend("vote guard lock poisoned".to_string()))?;
        if !seen.insert((voter.to_string(), faq_id.to_string())) {
            return Err(SupportError::AlreadyVoted {
                id: faq_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Forgets a claim, so a vote the backend rejected can be retried.
    pub fn release(&self, voter: &str, faq_id: &str) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.remove(&(voter.to_string(), faq_id.to_string()));
        }
    }
}

/// # Cast Vote (`cast_vote`)
///
/// Claims the vote in `guard`, records it in `backend`, and returns the new
/// count for `faq_id`. A backend failure releases the claim.
pub async fn cast_vote(
    backend: &VoteBackend,
    guard: &VoteGuard,
    faq_id: &str,
    voter: &str,
) -> Result<u64> {
    guard.claim(voter, faq_id)?;
    if let Err(e) = backend.record(faq_id, voter).await {
        guard.release(voter, faq_id);
        return Err(e);
    }
    backend.count(faq_id).await
}
