use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "ytknow=warn,ytknow_core=warn",
        1 => "ytknow=info,ytknow_core=info",
        2 => "ytknow=debug,ytknow_core=debug",
        _ => "ytknow=trace,ytknow_core=trace",
    }
}

/// Logs go to stderr so stdout stays clean for `--json` output.
/// `RUST_LOG` overrides the verbosity flag; `LOG_FORMAT=json` switches to JSON lines.
pub fn init(verbosity: u8) {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(console::colors_enabled_stderr())
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}
