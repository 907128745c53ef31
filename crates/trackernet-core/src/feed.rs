use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::FeedError;

/// One CSV row, keyed by lower-cased header field name.
pub type Record = BTreeMap<String, String>;

/// A timestamped batch of feed rows.
///
/// The timestamp is the publisher's (Last-Modified when the source
/// provides one), so consumers can detect stale or duplicate batches.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub rows: Vec<Record>,
    pub timestamp: DateTime<Utc>,
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// Parse headed CSV text into records.
///
/// Header names are lower-cased and become the record keys. Quoted cells
/// are unquoted, blank lines are skipped, and a row shorter than the
/// header gets empty strings for the missing trailing fields, so every
/// record carries every header key.
pub fn parse_csv(text: &str) -> Vec<Record> {
    let mut lines = text.lines();
    let header: Vec<String> = match lines.next() {
        Some(line) => line
            .split(',')
            .map(|f| strip_quotes(f).to_lowercase())
            .collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').map(strip_quotes).collect();
        let mut record = Record::new();
        for (i, name) in header.iter().enumerate() {
            let value = cells.get(i).copied().unwrap_or("");
            record.insert(name.clone(), value.to_string());
        }
        rows.push(record);
    }
    rows
}

/// Numeric field access that treats missing, empty, and malformed values
/// the same way: as absent.
pub fn field_f64(row: &Record, name: &str) -> Option<f64> {
    row.get(name).and_then(|v| v.trim().parse::<f64>().ok())
}

pub fn field_i64(row: &Record, name: &str) -> Option<i64> {
    row.get(name).and_then(|v| v.trim().parse::<i64>().ok())
}

/// Anything that can produce a position snapshot on demand.
///
/// The live implementation is [`HttpCsvSource`]; tests substitute a
/// canned source.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn acquire(&self) -> Result<Snapshot, FeedError>;
}

/// Fetches CSV snapshots over HTTP.
///
/// The snapshot timestamp comes from the Last-Modified response header
/// when present, otherwise the local receive time.
pub struct HttpCsvSource {
    url: String,
    client: reqwest::Client,
}

impl HttpCsvSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PositionSource for HttpCsvSource {
    async fn acquire(&self) -> Result<Snapshot, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }
        let timestamp = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        let text = response.text().await?;
        let rows = parse_csv(&text);
        debug!(rows = rows.len(), %timestamp, "feed snapshot acquired");
        Ok(Snapshot { rows, timestamp })
    }
}
