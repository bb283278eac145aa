use console::style;
use ytknow_core::{
    PreviewView, ViewMode, ViewState,
    view::{CategoryView, ResultsView},
};

const TRANSCRIPT_PREVIEW_CHARS: usize = 400;

fn rule() -> String {
    style("─".repeat(60)).dim().to_string()
}

/// Apply a view state to the terminal.
pub fn render_view(view: &ViewState, full_transcript: bool) {
    match view.mode {
        ViewMode::Loading => {
            println!("{} Extracting knowledge...", style("…").cyan().bold());
        }
        ViewMode::Error => {
            let message = view.error_message.as_deref().unwrap_or_default();
            eprintln!("{} {}", style("Error:").red().bold(), message);
        }
        ViewMode::Results => {
            if let Some(results) = &view.results {
                render_results(results, full_transcript);
            }
        }
    }
}

fn render_results(results: &ResultsView, full_transcript: bool) {
    println!("{}", rule());

    match &results.player {
        Some(player) => {
            println!(
                "{} {}  {}",
                style("▶").green().bold(),
                style(&player.video_id).cyan().bold(),
                style(format!("[{} – {}]", player.start_label, player.end_label)).dim()
            );
            println!("  {} {}", style("Embed:").dim(), player.embed_url);
            println!("  {} {}", style("Watch:").dim(), player.clean_url);
            println!("  {} {}", style("Jump: ").dim(), player.timestamp_url);
        }
        None => println!("{}", style("No playable video id; player hidden.").dim()),
    }

    println!(
        "\n{} {}    {} {}",
        style("Time range:").dim(),
        results.time_range,
        style("Processed:").dim(),
        results.processed_at
    );
    println!("{}", rule());

    println!("\n{}\n", style("Summary").bold().underlined());
    println!("{}", results.summary);

    for category in &results.categories {
        render_category(category);
    }

    println!("\n{}\n", style("Transcript").bold().underlined());
    println!("{}", transcript_excerpt(&results.transcript, full_transcript));
    println!();
}

fn render_category(category: &CategoryView) {
    println!(
        "\n{} {}",
        style(category.category.title()).bold().underlined(),
        style(format!("({})", category.count)).dim()
    );
    if category.items.is_empty() {
        println!("  {}", style("none").dim());
        return;
    }
    for item in &category.items {
        println!("  • {}", item);
    }
}

fn transcript_excerpt(transcript: &str, full: bool) -> String {
    if full || transcript.chars().count() <= TRANSCRIPT_PREVIEW_CHARS {
        return transcript.to_string();
    }
    let excerpt: String = transcript.chars().take(TRANSCRIPT_PREVIEW_CHARS).collect();
    format!(
        "{}… {}",
        excerpt.trim_end(),
        style("(use --full-transcript or --export for the rest)").dim()
    )
}

pub fn render_preview(preview: Option<&PreviewView>) {
    match preview {
        Some(preview) => {
            println!(
                "{} Preview {}",
                style("✓").green().bold(),
                style(&preview.video_id).cyan().bold()
            );
            println!("  {} {}", style("Embed:").dim(), preview.embed_url);
            println!("  {} {}", style("Watch:").dim(), preview.clean_url);
        }
        None => println!("{}", style("No video recognized; preview hidden.").dim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_transcripts_are_not_cut() {
        assert_eq!(transcript_excerpt("hello", false), "hello");
    }

    #[test]
    fn long_transcripts_are_cut_unless_full() {
        let long = "word ".repeat(200);
        let cut = transcript_excerpt(&long, false);
        assert!(cut.chars().count() < long.chars().count());
        assert!(cut.contains("--full-transcript"));
        assert_eq!(transcript_excerpt(&long, true), long);
    }
}
