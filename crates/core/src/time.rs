//! Time spec parsing and display formatting.
//!
//! Accepted forms are a bare number of seconds (optionally suffixed with a
//! single `s`), `MM:SS` and `HH:MM:SS`. The permissive entry point never fails
//! and maps anything else to 0; [`parse_time_strict`] reports why a spec was
//! rejected.

use tracing::debug;

use crate::error::TimeParseError;

/// Parse a time spec into seconds, falling back to 0 on invalid input.
pub fn parse_time_to_seconds(spec: &str) -> u32 {
    match parse_time_strict(spec) {
        Ok(secs) => secs,
        Err(err) => {
            debug!(spec, %err, "time spec degraded to 0 seconds");
            0
        }
    }
}

/// Parse a time spec into seconds, rejecting anything outside the three
/// accepted forms.
pub fn parse_time_strict(spec: &str) -> Result<u32, TimeParseError> {
    let spec = spec.trim();
    let body = spec.strip_suffix('s').unwrap_or(spec);
    if body.is_empty() {
        return Err(TimeParseError::Empty);
    }

    if !body.contains(':') {
        return parse_component("seconds", body, spec);
    }

    let parts: Vec<&str> = body.split(':').collect();
    let total = match parts.as_slice() {
        [minutes, seconds] => {
            let minutes = parse_component("minutes", minutes, spec)?;
            let seconds = parse_component("seconds", seconds, spec)?;
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
        }
        [hours, minutes, seconds] => {
            let hours = parse_component("hours", hours, spec)?;
            let minutes = parse_component("minutes", minutes, spec)?;
            let seconds = parse_component("seconds", seconds, spec)?;
            hours
                .checked_mul(3600)
                .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
                .and_then(|hm| hm.checked_add(seconds))
        }
        _ => {
            return Err(TimeParseError::TooManyComponents { parts: parts.len() });
        }
    };

    total.ok_or_else(|| TimeParseError::Overflow(spec.to_string()))
}

fn parse_component(field: &'static str, value: &str, spec: &str) -> Result<u32, TimeParseError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::InvalidComponent {
            field,
            value: value.to_string(),
        });
    }
    value
        .parse::<u32>()
        .map_err(|_| TimeParseError::Overflow(spec.to_string()))
}

/// Parse the value of a URL `t=` / `start=` parameter.
///
/// Besides the regular time specs this understands unit strings such as
/// `1h2m3s` or `2m`. Unknown characters are skipped.
pub fn parse_time_param(value: &str) -> u32 {
    let value = value.trim();
    if value.contains(':') {
        return parse_time_to_seconds(value);
    }
    if let Ok(secs) = value.parse::<u32>() {
        return secs;
    }

    let mut total: u32 = 0;
    let mut number: u32 = 0;
    for ch in value.chars() {
        if let Some(digit) = ch.to_digit(10) {
            number = number.saturating_mul(10).saturating_add(digit);
            continue;
        }
        let unit = match ch {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => 0,
        };
        total = total.saturating_add(number.saturating_mul(unit));
        number = 0;
    }
    total
}

/// Format seconds as `M:SS`, or `H:MM:SS` from one hour up.
pub fn format_seconds_to_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
