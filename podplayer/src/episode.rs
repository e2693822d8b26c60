use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One playable podcast episode.
///
/// Episodes are immutable once built: the player only ever moves whole
/// records around, it never edits them. The record shape is trusted as-is,
/// validation belongs to whoever produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    id: String,
    title: String,
    members: String,
    thumbnail_url: String,
    audio_url: String,
    duration_seconds: u64,
    /// `None` for episodes that were never published through a feed.
    published_at: Option<DateTime<Utc>>,
    /// Show notes, HTML as served by the feed.
    description: String,
}

impl Episode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_members(mut self, members: impl Into<String>) -> Self {
        self.members = members.into();
        self
    }

    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = url.into();
        self
    }

    pub fn with_duration_seconds(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn members(&self) -> &str {
        &self.members
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    pub fn audio_url(&self) -> &str {
        &self.audio_url
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_seconds)
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_fills_every_field() {
        let episode = Episode::new("a-vida-e-boa")
            .with_title("A vida é boa")
            .with_members("Diego e Richard")
            .with_thumbnail_url("https://example.com/a-vida-e-boa.jpg")
            .with_audio_url("https://example.com/a-vida-e-boa.m4a")
            .with_duration_seconds(3981)
            .with_published_at(Utc.with_ymd_and_hms(2021, 1, 22, 19, 0, 0).unwrap())
            .with_description("<p>Notas</p>");

        assert_eq!(episode.id(), "a-vida-e-boa");
        assert_eq!(episode.title(), "A vida é boa");
        assert_eq!(episode.members(), "Diego e Richard");
        assert_eq!(episode.thumbnail_url(), "https://example.com/a-vida-e-boa.jpg");
        assert_eq!(episode.audio_url(), "https://example.com/a-vida-e-boa.m4a");
        assert_eq!(episode.duration(), Duration::from_secs(3981));
        assert_eq!(
            episode.published_at(),
            Some(Utc.with_ymd_and_hms(2021, 1, 22, 19, 0, 0).unwrap())
        );
        assert_eq!(episode.description(), "<p>Notas</p>");
        assert!(Episode::new("draft").published_at().is_none());
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let episode = Episode::new("ep-1")
            .with_thumbnail_url("thumb.jpg")
            .with_audio_url("audio.m4a")
            .with_duration_seconds(60);

        let json = serde_json::to_value(&episode).unwrap();
        assert_eq!(json["thumbnailUrl"], "thumb.jpg");
        assert_eq!(json["audioUrl"], "audio.m4a");
        assert_eq!(json["durationSeconds"], 60);
        assert!(json["publishedAt"].is_null());
    }
}
