//! Front-end session state, threaded through [`Session::update`] by value.

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    time::{parse_time_strict, parse_time_to_seconds},
    types::{ExtractionOutcome, ExtractionRequest},
    video::VideoDescriptor,
    view::{PreviewView, ViewMode, ViewState, compute_preview_view, compute_result_view, loading_view},
};

#[derive(Debug, Clone)]
pub enum Message {
    /// Raw input edit. Does not touch the preview; callers debounce these.
    InputChanged(String),
    /// Input has been quiet long enough to recompute the preview.
    InputSettled,
    Submitted(ExtractionRequest),
    Responded(ExtractionOutcome),
    /// Clears an error so the user can retry.
    ErrorDismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: Uuid,
    pub request: ExtractionRequest,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    input: String,
    preview: Option<PreviewView>,
    submission: Option<Submission>,
    video: Option<VideoDescriptor>,
    view: Option<ViewState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(self, message: Message) -> Self {
        match message {
            Message::InputChanged(input) => Self { input, ..self },
            Message::InputSettled => Self {
                preview: compute_preview_view(&self.input),
                ..self
            },
            Message::Submitted(request) => {
                if let Some(previous) = &self.submission {
                    warn!(previous = %previous.id, "submitting while a request is still pending");
                }
                let submission = Submission {
                    id: Uuid::new_v4(),
                    request,
                };
                info!(id = %submission.id, url = %submission.request.url, "extraction submitted");
                Self {
                    submission: Some(submission),
                    video: None,
                    view: Some(loading_view()),
                    ..self
                }
            }
            Message::Responded(outcome) => {
                let video = match &outcome {
                    ExtractionOutcome::Completed(result) => VideoDescriptor::new(
                        &result.url,
                        result_time_seconds(&result.start_time),
                        result_time_seconds(&result.end_time),
                    ),
                    ExtractionOutcome::Failed(_) => match &self.submission {
                        Some(s) => VideoDescriptor::from_specs(
                            &s.request.url,
                            &s.request.start_time,
                            &s.request.end_time,
                        ),
                        None => VideoDescriptor::new("", 0, 0),
                    },
                };
                if !video.has_ordered_range() {
                    warn!(
                        start = video.start_seconds(),
                        end = video.end_seconds(),
                        "end time is before start time"
                    );
                }

                let view = compute_result_view(&outcome, &video);
                match &outcome {
                    ExtractionOutcome::Completed(_) => info!(video_id = video.video_id(), "extraction completed"),
                    ExtractionOutcome::Failed(failure) => warn!(%failure, "extraction failed"),
                }

                Self {
                    submission: None,
                    video: Some(video),
                    view: Some(view),
                    ..self
                }
            }
            Message::ErrorDismissed => {
                if self.view.as_ref().is_some_and(|v| v.mode == ViewMode::Error) {
                    Self {
                        video: None,
                        view: None,
                        ..self
                    }
                } else {
                    self
                }
            }
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn preview(&self) -> Option<&PreviewView> {
        self.preview.as_ref()
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    /// Descriptor of the last response, if any.
    pub fn video(&self) -> Option<&VideoDescriptor> {
        self.video.as_ref()
    }

    /// `None` while idle.
    pub fn view(&self) -> Option<&ViewState> {
        self.view.as_ref()
    }
}

/// Times echoed back by the backend may carry fractional seconds, as in
/// `"3605.48s"` for an open-ended segment. Those are truncated to whole seconds.
fn result_time_seconds(spec: &str) -> u32 {
    if let Ok(seconds) = parse_time_strict(spec) {
        return seconds;
    }
    let trimmed = spec.trim();
    let body = trimmed.strip_suffix('s').unwrap_or(trimmed);
    match body.split_once('.') {
        Some((whole, fraction))
            if !whole.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit()) =>
        {
            parse_time_to_seconds(whole)
        }
        _ => parse_time_to_seconds(spec),
    }
}
