use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use ytknow_core::{Config, ExportFormat, PlayerControl};

mod commands;
mod logging;
mod render;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for ExportFormat (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliExportFormat {
    #[default]
    Text,
    Json,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli: CliExportFormat) -> Self {
        match cli {
            CliExportFormat::Text => ExportFormat::Text,
            CliExportFormat::Json => ExportFormat::Json,
        }
    }
}

/// Player action to take once results are in
#[derive(Clone, Copy, ValueEnum)]
enum CliOpen {
    /// Open the video page
    External,
    /// Open the video at the segment start
    Timestamp,
}

impl From<CliOpen> for PlayerControl {
    fn from(cli: CliOpen) -> Self {
        match cli {
            CliOpen::External => PlayerControl::ExternalLink,
            CliOpen::Timestamp => PlayerControl::JumpToTimestamp,
        }
    }
}

#[derive(Parser)]
#[command(name = "ytknow")]
#[command(about = "Extract summaries, people, places, books and facts from YouTube video segments")]
struct Cli {
    /// Extraction service base URL
    #[arg(long, global = true, env = "YTKNOW_BACKEND_URL")]
    backend_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract knowledge from a video segment
    Extract {
        /// Video URL
        url: String,

        /// Segment start (seconds, MM:SS or HH:MM:SS)
        #[arg(short, long)]
        start: Option<String>,

        /// Segment end (seconds, MM:SS or HH:MM:SS)
        #[arg(short, long)]
        end: Option<String>,

        /// Segment length in seconds, used when no end is given
        #[arg(short, long)]
        duration: Option<String>,

        /// Write the result to a file (defaults to the download directory)
        #[arg(long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,

        /// Export format
        #[arg(short, long, default_value = "text")]
        format: CliExportFormat,

        /// Player action after a successful extraction
        #[arg(long)]
        open: Option<CliOpen>,

        /// Print the view state as JSON instead of rendering it
        #[arg(long)]
        json: bool,

        /// Print the whole transcript
        #[arg(long)]
        full_transcript: bool,
    },

    /// Show the player preview for a URL
    Preview {
        /// Video URL
        url: String,

        /// Print the external link instead of the embed URL
        #[arg(long)]
        open: bool,
    },

    /// Parse time specs and show them in seconds and display form
    Time {
        #[arg(required = true)]
        specs: Vec<String>,

        /// Reject malformed specs instead of treating them as 0
        #[arg(long)]
        strict: bool,
    },

    /// Read URLs from stdin and preview each one once it settles
    Watch,

    /// Check the extraction service
    Health,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::from_env();
    if let Some(url) = cli.backend_url {
        config = config.with_backend_url(url);
    }

    let outcome = match cli.command {
        Command::Extract {
            url,
            start,
            end,
            duration,
            export,
            format,
            open,
            json,
            full_transcript,
        } => {
            let args = commands::ExtractArgs {
                url,
                start: start.unwrap_or_default(),
                end: end.unwrap_or_default(),
                duration: duration.unwrap_or_default(),
                export,
                format: format.into(),
                open: open.map(Into::into),
                json,
                full_transcript,
            };
            commands::extract(&config, args).await
        }
        Command::Preview { url, open } => commands::preview(&config, &url, open).await,
        Command::Time { specs, strict } => Ok(commands::time(&specs, strict)),
        Command::Watch => commands::watch(&config).await,
        Command::Health => commands::health(&config).await,
    };

    match outcome {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
