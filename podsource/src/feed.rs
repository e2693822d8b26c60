//! JSON episode feed.
//!
//! The episodes API returns records shaped like:
//!
//! ```json
//! {
//!   "id": "a-importancia-da-contribuicao-em-open-source",
//!   "title": "Faladev #30 | A importância da contribuição em Open Source",
//!   "members": "Diego Fernandes, João Pedro, Diego Haz e Bruno Lemos",
//!   "published_at": "2021-01-22 19:00:00",
//!   "thumbnail": "https://example.com/opensource.jpg",
//!   "description": "<p>...</p>",
//!   "file": { "url": "https://example.com/opensource.m4a", "type": "audio/x-m4a", "duration": 3981 }
//! }
//! ```
//!
//! `JsonFeedSource` reads an array of such records from disk, lists them
//! newest first and keeps the first `limit` of them, like the home page
//! query (`_sort=published_at&_order=desc&_limit=12`).

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};
use tracing::debug;

use crate::{Episode, EpisodeSource, EpisodeSourceError, Result};

/// Number of episodes the home page asks the API for.
pub const DEFAULT_FEED_LIMIT: usize = 12;

/// One episode record as served by the episodes API.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedRecord {
    pub id: String,
    pub title: String,
    pub members: String,
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "deserialize_published_at")]
    pub published_at: DateTime<Utc>,
    pub file: FeedFile,
}

/// Audio file attached to a record.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedFile {
    pub url: String,
    duration: RawDuration,
}

// L'API sert la durée tantôt en nombre, tantôt en chaîne
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(u64),
    Fractional(f64),
    Text(String),
}

impl FeedFile {
    /// Duration in whole seconds, or `None` if the feed value is negative or
    /// not a number.
    pub fn duration_seconds(&self) -> Option<u64> {
        match &self.duration {
            RawDuration::Seconds(secs) => Some(*secs),
            RawDuration::Fractional(secs) => whole_seconds(*secs),
            RawDuration::Text(text) => text.trim().parse::<f64>().ok().and_then(whole_seconds),
        }
    }
}

fn whole_seconds(secs: f64) -> Option<u64> {
    (secs.is_finite() && secs >= 0.0).then(|| secs.trunc() as u64)
}

impl FeedRecord {
    /// Parses a JSON array of records.
    pub fn parse_many(json: &str) -> Result<Vec<FeedRecord>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts the record into the player's episode type.
    ///
    /// # Errors
    /// Returns `EpisodeSourceError::InvalidRecord` when the audio duration
    /// cannot be read as a non-negative number of seconds.
    pub fn into_episode(self) -> Result<Episode> {
        let duration = self
            .file
            .duration_seconds()
            .ok_or_else(|| EpisodeSourceError::InvalidRecord {
                id: self.id.clone(),
                reason: "file.duration is not a non-negative number".to_string(),
            })?;

        Ok(Episode::new(self.id)
            .with_title(self.title)
            .with_members(self.members)
            .with_thumbnail_url(self.thumbnail)
            .with_audio_url(self.file.url)
            .with_duration_seconds(duration)
            .with_published_at(self.published_at)
            .with_description(self.description))
    }
}

fn deserialize_published_at<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_published_at(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid published_at '{raw}'")))
}

/// Accepts RFC 3339 timestamps and the API's `YYYY-MM-DD HH:MM:SS` (UTC).
fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Episode source backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFeedSource {
    name: String,
    path: PathBuf,
    limit: Option<usize>,
}

impl JsonFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            name: "JSON feed".to_string(),
            path: path.into(),
            limit: Some(DEFAULT_FEED_LIMIT),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Lists every record of the file.
    pub fn without_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record of the file, newest first.
    fn read_records(&self) -> Result<Vec<FeedRecord>> {
        let json = fs::read_to_string(&self.path).map_err(|source| EpisodeSourceError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut records = FeedRecord::parse_many(&json)?;
        records.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(records)
    }

    /// The records the home page would show: newest first, at most `limit`.
    pub fn records(&self) -> Result<Vec<FeedRecord>> {
        let mut records = self.read_records()?;
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }

        debug!(
            path = %self.path.display(),
            count = records.len(),
            "Loaded episode feed"
        );
        Ok(records)
    }
}

impl EpisodeSource for JsonFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn episodes(&self) -> Result<Vec<Episode>> {
        self.records()?
            .into_iter()
            .map(FeedRecord::into_episode)
            .collect()
    }

    /// Looks the episode up in the whole file, ignoring the listing limit,
    /// like the episode detail page does.
    fn episode(&self, id: &str) -> Result<Episode> {
        self.read_records()?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| EpisodeSourceError::NotFound(id.to_string()))?
            .into_episode()
    }
}
