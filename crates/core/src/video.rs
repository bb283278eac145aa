//! Video id extraction and derived playback URLs.

use serde::Serialize;
use tracing::debug;

use crate::time::{parse_time_param, parse_time_to_seconds};

const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Extract the video id from a watch, short or embed URL.
///
/// Returns an empty string when the URL matches none of the known forms.
pub fn extract_video_id(url: &str) -> String {
    let id = if url.contains("youtube.com/watch?v=") {
        url.split_once("v=")
            .map(|(_, rest)| rest.split('&').next().unwrap_or_default())
    } else if url.contains("youtu.be/") {
        url.split_once("youtu.be/")
            .map(|(_, rest)| rest.split('?').next().unwrap_or_default())
    } else if url.contains("youtube.com/embed/") {
        url.split_once("embed/")
            .map(|(_, rest)| rest.split('?').next().unwrap_or_default())
    } else {
        None
    };

    match id {
        Some(id) => id.to_string(),
        None => {
            debug!(url, "no video id in url");
            String::new()
        }
    }
}

/// Start offset carried by the URL itself (`t=` or `start=`), if any.
pub fn url_start_param(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| matches!(*key, "t" | "start"))
        .map(|(_, value)| parse_time_param(value))
}

pub fn clean_url(video_id: &str) -> String {
    format!("{WATCH_BASE}{video_id}")
}

pub fn timestamp_url(video_id: &str, start_seconds: u32) -> String {
    format!("{WATCH_BASE}{video_id}&t={start_seconds}s")
}

pub fn embed_url(video_id: &str, start_seconds: u32, end_seconds: u32) -> String {
    format!("{EMBED_BASE}{video_id}?start={start_seconds}&end={end_seconds}&autoplay=0&rel=0")
}

/// Embed URL for the live preview, before any time range is known.
pub fn preview_embed_url(video_id: &str) -> String {
    format!("{EMBED_BASE}{video_id}?autoplay=0&rel=0")
}

/// Normalized id plus derived playback URLs for one video segment.
///
/// Built fresh for every response or preview; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoDescriptor {
    video_id: String,
    original_url: String,
    start_seconds: u32,
    end_seconds: u32,
    clean_url: String,
    timestamp_url: String,
    embed_url: String,
}

impl VideoDescriptor {
    pub fn new(url: &str, start_seconds: u32, end_seconds: u32) -> Self {
        let video_id = extract_video_id(url);
        Self {
            clean_url: clean_url(&video_id),
            timestamp_url: timestamp_url(&video_id, start_seconds),
            embed_url: embed_url(&video_id, start_seconds, end_seconds),
            video_id,
            original_url: url.to_string(),
            start_seconds,
            end_seconds,
        }
    }

    /// Build a descriptor from raw time specs as they appear in a form or result.
    pub fn from_specs(url: &str, start: &str, end: &str) -> Self {
        Self::new(url, parse_time_to_seconds(start), parse_time_to_seconds(end))
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn start_seconds(&self) -> u32 {
        self.start_seconds
    }

    pub fn end_seconds(&self) -> u32 {
        self.end_seconds
    }

    pub fn clean_url(&self) -> &str {
        &self.clean_url
    }

    pub fn timestamp_url(&self) -> &str {
        &self.timestamp_url
    }

    pub fn embed_url(&self) -> &str {
        &self.embed_url
    }

    /// Playback must be gated on this.
    pub fn has_video(&self) -> bool {
        !self.video_id.is_empty()
    }

    /// Ordering is never enforced; this only reports it.
    pub fn has_ordered_range(&self) -> bool {
        self.end_seconds >= self.start_seconds
    }
}

/// Start/end seconds resolved for a request before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: u32,
    /// `None` means "until the end of the video".
    pub end: Option<u32>,
}

impl TimeWindow {
    /// Explicit start wins over a URL `t=` parameter; explicit end wins over
    /// `start + duration`.
    pub fn resolve(url: &str, start: &str, end: &str, duration: &str) -> Self {
        let start = if start.trim().is_empty() {
            url_start_param(url).unwrap_or(0)
        } else {
            parse_time_to_seconds(start)
        };

        let end = if !end.trim().is_empty() {
            Some(parse_time_to_seconds(end))
        } else {
            duration
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|d| *d > 0)
                .map(|d| start.saturating_add(d))
        };

        Self { start, end }
    }
}
