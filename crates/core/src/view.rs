//! Pure projection of extraction outcomes into what the display shows.
//!
//! Every function here recomputes a complete [`ViewState`] from its inputs;
//! callers replace the previous state wholesale.

use serde::Serialize;

use crate::{
    controls::{PlayerControl, PreviewControl},
    time::format_seconds_to_time,
    types::{Category, ExtractionFailure, ExtractionOutcome, ExtractionResult},
    video::{VideoDescriptor, clean_url, extract_video_id, preview_embed_url},
};

/// Top-level display mode. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Loading,
    Results,
    Error,
}

/// Named sections of the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Loading,
    Results,
    Error,
    Player,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub category: Category,
    pub count: usize,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub video_id: String,
    pub embed_url: String,
    pub clean_url: String,
    pub timestamp_url: String,
    pub start_label: String,
    pub end_label: String,
    pub active: PlayerControl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    /// `None` when the descriptor has no video id.
    pub player: Option<PlayerView>,
    pub url: String,
    pub time_range: String,
    pub processed_at: String,
    pub summary: String,
    pub transcript: String,
    pub categories: Vec<CategoryView>,
}

impl ResultsView {
    pub fn category(&self, category: Category) -> Option<&CategoryView> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn count(&self, category: Category) -> usize {
        self.category(category).map(|c| c.count).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub mode: ViewMode,
    pub results: Option<ResultsView>,
    pub error_message: Option<String>,
}

impl ViewState {
    pub fn is_visible(&self, section: Section) -> bool {
        match section {
            Section::Loading => self.mode == ViewMode::Loading,
            Section::Results => self.mode == ViewMode::Results,
            Section::Error => self.mode == ViewMode::Error,
            Section::Player => self
                .results
                .as_ref()
                .is_some_and(|r| self.mode == ViewMode::Results && r.player.is_some()),
        }
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        [
            Section::Loading,
            Section::Results,
            Section::Error,
            Section::Player,
        ]
        .into_iter()
        .filter(|s| self.is_visible(*s))
        .collect()
    }
}

/// Live preview shown while the user is still typing a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewView {
    pub video_id: String,
    pub clean_url: String,
    pub embed_url: String,
    pub active: PreviewControl,
}

pub fn loading_view() -> ViewState {
    ViewState {
        mode: ViewMode::Loading,
        results: None,
        error_message: None,
    }
}

pub fn error_view(failure: &ExtractionFailure) -> ViewState {
    ViewState {
        mode: ViewMode::Error,
        results: None,
        error_message: Some(failure.user_message().to_string()),
    }
}

pub fn compute_result_view(outcome: &ExtractionOutcome, video: &VideoDescriptor) -> ViewState {
    match outcome {
        ExtractionOutcome::Completed(result) => ViewState {
            mode: ViewMode::Results,
            results: Some(results_view(result, video)),
            error_message: None,
        },
        ExtractionOutcome::Failed(failure) => error_view(failure),
    }
}

fn results_view(result: &ExtractionResult, video: &VideoDescriptor) -> ResultsView {
    let player = video.has_video().then(|| PlayerView {
        video_id: video.video_id().to_string(),
        embed_url: video.embed_url().to_string(),
        clean_url: video.clean_url().to_string(),
        timestamp_url: video.timestamp_url().to_string(),
        start_label: format_seconds_to_time(video.start_seconds()),
        end_label: format_seconds_to_time(video.end_seconds()),
        active: PlayerControl::default(),
    });

    let categories = Category::ALL
        .iter()
        .map(|category| {
            let items = result.items(*category).to_vec();
            CategoryView {
                category: *category,
                count: items.len(),
                items,
            }
        })
        .collect();

    ResultsView {
        player,
        url: result.url.clone(),
        time_range: time_range_text(&result.start_time, &result.end_time),
        processed_at: result.processed_at.clone(),
        summary: result.summary.clone(),
        transcript: result.transcription.clone(),
        categories,
    }
}

/// Display text for the requested range, using the literal strings.
pub fn time_range_text(start: &str, end: &str) -> String {
    if start == end {
        format!("From {}", start)
    } else {
        format!("{} - {}", start, end)
    }
}

pub fn compute_preview_view(url: &str) -> Option<PreviewView> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let video_id = extract_video_id(url);
    if video_id.is_empty() {
        return None;
    }
    Some(PreviewView {
        clean_url: clean_url(&video_id),
        embed_url: preview_embed_url(&video_id),
        video_id,
        active: PreviewControl::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(books: &[&str]) -> ExtractionResult {
        ExtractionResult {
            url: "https://www.youtube.com/watch?v=Q1Q2Q3".to_string(),
            start_time: "10".to_string(),
            end_time: "70".to_string(),
            processed_at: "2024-05-01 12:00:00".to_string(),
            summary: "A talk.".to_string(),
            transcription: "hello world".to_string(),
            books: books.iter().map(|b| b.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn successful_extraction_shows_results_only() {
        let video = VideoDescriptor::from_specs("https://www.youtube.com/watch?v=Q1Q2Q3", "10", "70");
        let outcome = ExtractionOutcome::Completed(result_with(&["Book A"]));
        let view = compute_result_view(&outcome, &video);

        assert!(view.is_visible(Section::Results));
        assert!(!view.is_visible(Section::Loading));
        assert!(!view.is_visible(Section::Error));
        assert!(view.is_visible(Section::Player));

        let results = view.results.unwrap();
        assert_eq!(results.count(Category::Books), 1);
        assert_eq!(
            results.category(Category::Books).unwrap().items,
            vec!["Book A".to_string()]
        );
        assert_eq!(results.count(Category::People), 0);
        assert_eq!(results.time_range, "10 - 70");

        let player = results.player.unwrap();
        assert_eq!(player.active, PlayerControl::Embed);
        assert_eq!(player.start_label, "0:10");
        assert_eq!(player.end_label, "1:10");
    }

    #[test]
    fn empty_books_list_is_zero_count() {
        let video = VideoDescriptor::from_specs("https://youtu.be/abc", "0", "10");
        let view = compute_result_view(&ExtractionOutcome::Completed(result_with(&[])), &video);
        let results = view.results.unwrap();
        let books = results.category(Category::Books).unwrap();
        assert_eq!(books.count, 0);
        assert!(books.items.is_empty());
    }

    #[test]
    fn backend_failure_shows_error_only() {
        let video = VideoDescriptor::from_specs("https://youtu.be/abc", "0", "10");
        let outcome = ExtractionOutcome::Failed(ExtractionFailure::Backend(
            "Transcript unavailable".to_string(),
        ));
        let view = compute_result_view(&outcome, &video);

        assert_eq!(view.visible_sections(), vec![Section::Error]);
        assert_eq!(view.error_message.as_deref(), Some("Transcript unavailable"));
        assert!(view.results.is_none());
    }

    #[test]
    fn player_is_suppressed_without_video_id() {
        let video = VideoDescriptor::from_specs("https://example.com/video", "0", "10");
        let view = compute_result_view(&ExtractionOutcome::Completed(result_with(&[])), &video);
        assert!(view.is_visible(Section::Results));
        assert!(!view.is_visible(Section::Player));
        assert!(view.results.unwrap().player.is_none());
    }

    #[test]
    fn loading_view_hides_everything_else() {
        assert_eq!(loading_view().visible_sections(), vec![Section::Loading]);
    }

    #[test]
    fn time_range_uses_string_equality() {
        assert_eq!(time_range_text("10", "70"), "10 - 70");
        assert_eq!(time_range_text("1:00", "1:00"), "From 1:00");
        assert_eq!(time_range_text("60", "1:00"), "60 - 1:00");
    }

    #[test]
    fn preview_for_known_url() {
        let preview = compute_preview_view("https://youtu.be/xyz789?t=5").unwrap();
        assert_eq!(preview.video_id, "xyz789");
        assert_eq!(preview.clean_url, "https://www.youtube.com/watch?v=xyz789");
        assert_eq!(
            preview.embed_url,
            "https://www.youtube.com/embed/xyz789?autoplay=0&rel=0"
        );
        assert_eq!(preview.active, PreviewControl::Embed);
    }

    #[test]
    fn preview_hidden_for_blank_or_unknown_input() {
        assert!(compute_preview_view("   ").is_none());
        assert!(compute_preview_view("https://vimeo.com/1").is_none());
    }
}
