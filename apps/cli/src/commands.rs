use std::{path::PathBuf, process::ExitCode, time::Instant};

use anyhow::{Context, Result};
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use ytknow_core::{
    Config, Debouncer, ExportFormat, ExtractionBackend, ExtractionOutcome, ExtractionRequest,
    HttpBackend, Message, PlayerControl, PlayerControls, PreviewControl, Session, TimeWindow,
    ViewMode, default_export_dir, extract_video_id, format_seconds_to_time,
    get_export_path, parse_time_strict, parse_time_to_seconds, write_export,
};

use crate::{create_spinner, format_duration, render};

pub struct ExtractArgs {
    pub url: String,
    pub start: String,
    pub end: String,
    pub duration: String,
    pub export: Option<Option<PathBuf>>,
    pub format: ExportFormat,
    pub open: Option<PlayerControl>,
    pub json: bool,
    pub full_transcript: bool,
}

pub async fn extract(config: &Config, args: ExtractArgs) -> Result<ExitCode> {
    let backend = HttpBackend::new(config)?;
    let request = ExtractionRequest::new(&args.url, &args.start, &args.end, &args.duration);

    if extract_video_id(&request.url).is_empty() {
        eprintln!(
            "{} {}",
            style("!").yellow().bold(),
            style("No YouTube video id in this URL; the player will be hidden.").dim()
        );
    }

    let window = TimeWindow::resolve(
        &request.url,
        &request.start_time,
        &request.end_time,
        &request.duration,
    );
    let end_label = window
        .end
        .map(format_seconds_to_time)
        .unwrap_or_else(|| "end".to_string());
    if !args.json {
        println!(
            "\n{}  {} {}\n",
            style("ytknow").cyan().bold(),
            style("Segment").dim(),
            style(format!("{} – {}", format_seconds_to_time(window.start), end_label)).yellow()
        );
    }

    let session = Session::new().update(Message::Submitted(request.clone()));
    let started = Instant::now();
    let spinner = create_spinner("Extracting knowledge...");
    let outcome = backend.extract(&request).await;
    spinner.finish_and_clear();
    debug!(elapsed = ?started.elapsed(), "extraction returned");

    let session = session.update(Message::Responded(outcome.clone()));
    let Some(view) = session.view() else {
        anyhow::bail!("no view after extraction response");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        if view.mode == ViewMode::Results {
            println!(
                "{} Extracted {}",
                style("✓").green().bold(),
                style(format!("[{}]", format_duration(started.elapsed()))).dim()
            );
        }
        render::render_view(view, args.full_transcript);
    }

    let ExtractionOutcome::Completed(result) = &outcome else {
        return Ok(ExitCode::FAILURE);
    };
    let Some(video) = session.video() else {
        return Ok(ExitCode::SUCCESS);
    };

    if let Some(export) = &args.export {
        let path = match export {
            Some(path) => path.clone(),
            None => get_export_path(&default_export_dir(), video, args.format),
        };
        write_export(result, args.format, &path).await?;
        eprintln!(
            "{} {}",
            style("Saved:").dim(),
            style(path.display()).cyan()
        );
    }

    if let Some(control) = args.open {
        if !video.has_video() {
            warn!("no video id, ignoring --open");
            return Ok(ExitCode::SUCCESS);
        }
        let mut controls = PlayerControls::new(config.relax_delay);
        let mut active = controls.main().subscribe();
        let target = controls.select_main(control, video);
        println!("{} {}", style("Open:").green().bold(), target);

        active
            .wait_for(|c| *c == PlayerControl::Embed)
            .await
            .context("player controls closed before relaxing")?;
        debug!("main player back to embed");
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn preview(config: &Config, url: &str, open: bool) -> Result<ExitCode> {
    let session = Session::new()
        .update(Message::InputChanged(url.to_string()))
        .update(Message::InputSettled);
    render::render_preview(session.preview());

    let Some(preview) = session.preview() else {
        return Ok(ExitCode::FAILURE);
    };

    if open {
        let mut controls = PlayerControls::new(config.relax_delay);
        let mut active = controls.preview().subscribe();
        let target = controls.select_preview(PreviewControl::ExternalLink, preview);
        println!("{} {}", style("Open:").green().bold(), target);

        active
            .wait_for(|c| *c == PreviewControl::Embed)
            .await
            .context("preview controls closed before relaxing")?;
    }

    Ok(ExitCode::SUCCESS)
}

pub fn time(specs: &[String], strict: bool) -> ExitCode {
    let mut failed = false;

    for spec in specs {
        let seconds = if strict {
            match parse_time_strict(spec) {
                Ok(seconds) => seconds,
                Err(e) => {
                    eprintln!("{} {:?}: {}", style("✗").red().bold(), spec, e);
                    failed = true;
                    continue;
                }
            }
        } else {
            parse_time_to_seconds(spec)
        };

        println!(
            "{} {} {} {}",
            style(spec).yellow(),
            style("→").dim(),
            seconds,
            style(format!("({})", format_seconds_to_time(seconds))).dim()
        );
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Preview each stdin line once input has been quiet for the debounce delay.
pub async fn watch(config: &Config) -> Result<ExitCode> {
    let (debouncer, mut settled, drain) = Debouncer::<String>::new(config.debounce_delay, 8);
    tokio::spawn(drain);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session::new();
    let mut input_open = true;
    let mut pending = false;
    let mut last_pushed = String::new();

    eprintln!(
        "{} {}",
        style("Watching stdin").cyan().bold(),
        style("(one URL per line, Ctrl-D to stop)").dim()
    );

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => {
                    session = session.update(Message::InputChanged(line.clone()));
                    last_pushed.clone_from(&line);
                    if debouncer.push(line).is_err() {
                        anyhow::bail!("debounce task stopped");
                    }
                    pending = true;
                }
                None => {
                    input_open = false;
                    if !pending {
                        break;
                    }
                }
            },
            value = settled.recv() => {
                let Some(value) = value else { break };
                pending = value != last_pushed;
                debug!(input = %value, "input settled");
                session = settle(session, value);
                render::render_preview(session.preview());
                if !input_open && !pending {
                    break;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Preview exactly the value that settled, even if newer lines were
/// already read and are still waiting out their own delay.
fn settle(session: Session, value: String) -> Session {
    session
        .update(Message::InputChanged(value))
        .update(Message::InputSettled)
}

pub async fn health(config: &Config) -> Result<ExitCode> {
    let backend = HttpBackend::new(config)?;
    let spinner = create_spinner(&format!("Checking {}...", backend.base_url()));
    let status = backend.health().await;
    spinner.finish_and_clear();

    let status = status.with_context(|| format!("extraction service at {}", backend.base_url()))?;
    let api_key = if status.openai_api_configured {
        style("configured").green()
    } else {
        style("missing").red()
    };
    println!(
        "{} {} {}",
        style("✓").green().bold(),
        style(&status.status).bold(),
        style(&status.timestamp).dim()
    );
    println!("  {} {}", style("OpenAI API key:").dim(), api_key);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settled_value_wins_over_newer_input() {
        let session = Session::new()
            .update(Message::InputChanged("https://youtu.be/first".into()))
            .update(Message::InputChanged("https://youtu.be/second".into()));

        let session = settle(session, "https://youtu.be/first".into());
        assert_eq!(session.preview().unwrap().video_id, "first");
    }

    #[test]
    fn time_command_fails_on_strict_errors() {
        assert_eq!(time(&["1:30".into()], true), ExitCode::SUCCESS);
        assert_eq!(time(&["1:xx".into()], true), ExitCode::FAILURE);
        assert_eq!(time(&["1:xx".into()], false), ExitCode::SUCCESS);
    }
}
