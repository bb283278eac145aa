use std::path::Path;

use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::{
    error::{Result, YtknowError},
    types::{Category, ExtractionResult},
};

const RULE_WIDTH: usize = 60;
const SECTION_RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

/// Flatten an extraction result into the plain-text export.
///
/// Categories without items are left out entirely.
pub fn export_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    // Header
    output.push_str("YOUTUBE VIDEO KNOWLEDGE EXTRACTION\n");
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&format!("URL: {}\n", result.url));
    output.push_str(&format!(
        "Time Range: {} - {}\n",
        result.start_time, result.end_time
    ));
    output.push_str(&format!("Processed at: {}\n", result.processed_at));
    output.push('\n');

    push_heading(&mut output, "SUMMARY");
    output.push_str(&result.summary);
    output.push_str("\n\n");

    for category in Category::ALL {
        let items = result.items(category);
        if items.is_empty() {
            continue;
        }
        push_heading(
            &mut output,
            &format!("{} ({})", category.title().to_uppercase(), items.len()),
        );
        for item in items {
            output.push_str(&format!("• {}\n", item));
        }
        output.push('\n');
    }

    output.push_str("FULL TRANSCRIPT:\n");
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&result.transcription);
    output.push('\n');

    output
}

fn push_heading(output: &mut String, heading: &str) {
    output.push_str(&format!("{}:\n", heading));
    output.push_str(&"-".repeat(SECTION_RULE_WIDTH));
    output.push('\n');
}

pub fn export_json(result: &ExtractionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn render_export(result: &ExtractionResult, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(export_text(result)),
        ExportFormat::Json => export_json(result),
    }
}

/// Write an export to `path`, creating missing parent directories.
pub async fn write_export(result: &ExtractionResult, format: ExportFormat, path: &Path) -> Result<()> {
    let content = render_export(result, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| YtknowError::ExportFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
    }
    fs::write(path, content)
        .await
        .map_err(|e| YtknowError::ExportFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    info!(path = %path.display(), ?format, "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractionResult {
        ExtractionResult {
            url: "https://www.youtube.com/watch?v=abc&t=126".into(),
            start_time: "126s".into(),
            end_time: "186s".into(),
            processed_at: "2024-05-01 12:00:00".into(),
            summary: "Short summary.".into(),
            transcription: "full text".into(),
            books: vec!["Book A".into(), "Book B".into()],
            people: vec![],
            places: vec!["Lisbon".into()],
            facts: vec![],
            topics: vec!["History".into()],
        }
    }

    #[test]
    fn text_export_sections_in_order() {
        let text = export_text(&sample());

        let order = [
            "URL: https://www.youtube.com/watch?v=abc&t=126",
            "Time Range: 126s - 186s",
            "Processed at: 2024-05-01 12:00:00",
            "SUMMARY:",
            "BOOKS & PUBLICATIONS (2):",
            "PLACES MENTIONED (1):",
            "MAIN TOPICS (1):",
            "FULL TRANSCRIPT:",
        ];
        let mut last = 0;
        for needle in order {
            let pos = text[last..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing or out of order: {needle}"));
            last += pos + needle.len();
        }
        assert!(text.contains("• Book A\n• Book B\n"));
        assert!(text.trim_end().ends_with("full text"));
    }

    #[test]
    fn equal_bounds_keep_the_dash_form() {
        let result = ExtractionResult {
            start_time: "60".to_string(),
            end_time: "60".to_string(),
            ..sample()
        };
        let text = export_text(&result);
        assert!(text.contains("Time Range: 60 - 60\n"));
        assert!(!text.contains("From 60"));
    }

    #[test]
    fn empty_categories_are_omitted() {
        let text = export_text(&sample());
        assert!(!text.contains("PEOPLE MENTIONED"));
        assert!(!text.contains("KEY FACTS"));
    }

    #[test]
    fn json_export_round_trips_fields() {
        let json = export_json(&sample()).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[tokio::test]
    async fn writes_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("abc.txt");
        write_export(&sample(), ExportFormat::Text, &path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("YOUTUBE VIDEO KNOWLEDGE EXTRACTION"));
    }
}
