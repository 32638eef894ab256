//! Annotation and timestamp commands

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::output::Output;
use super::status_cmd::load_status_config;
use crate::domain::{self, Codec, ParsedAnnotation, TimestampToken};

/// Resolves an optional `--at` argument to an instant
pub(super) fn instant_arg(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("Invalid time '{}': expected RFC 3339", raw)),
    }
}

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Serialize)]
struct ParseReport<'a> {
    #[serde(flatten)]
    annotation: &'a ParsedAnnotation,
    created_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

pub fn parse_line(output: &Output, line: &str) -> Result<()> {
    let codec = Codec::default();
    let parsed = domain::parse(line);
    output.verbose_ctx(
        "parse",
        &format!("valid={}, id={:?}", parsed.is_valid_format(), parsed.id()),
    );

    let report = ParseReport {
        annotation: &parsed,
        created_at: parsed.created_at(&codec),
        finished_at: parsed.finished_at(&codec),
    };

    if output.is_json() {
        output.data(&report);
        return Ok(());
    }

    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    output.field("priority", or_dash(parsed.priority().map(str::to_string)));
    output.field("id", or_dash(parsed.id_part()));
    output.field("done", or_dash(parsed.done_part()));
    output.field("content", parsed.main_content());
    output.field("unique", parsed.is_unique());
    output.field("valid", parsed.is_valid_format());
    if let Some(created) = report.created_at {
        output.field("created", rfc3339(created));
    }
    if let Some(finished) = report.finished_at {
        output.field("finished", rfc3339(finished));
    }
    Ok(())
}

pub fn new_todo(
    output: &Output,
    config_path: Option<&Path>,
    text: &str,
    priority: Option<&str>,
    at: Option<&str>,
) -> Result<()> {
    let status = load_status_config(output, config_path)?;
    let now = instant_arg(at)?;
    let content = domain::new_todo_content(text, priority, &Codec::default(), now)?;
    let marker = status.primary_open_marker();
    output.verbose_ctx(
        "new",
        &format!("created at {}, marker={:?}", rfc3339(now), marker),
    );

    let line = match marker {
        Some(marker) => format!("{} {}", marker, content),
        None => content.clone(),
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "marker": marker,
            "content": content,
            "line": line,
        }));
    } else {
        output.success(&line);
    }
    Ok(())
}

pub fn encode(output: &Output, at: Option<&str>) -> Result<()> {
    let now = instant_arg(at)?;
    let token = domain::encode(now);
    output.verbose_ctx("encode", &format!("{} -> {} seconds", rfc3339(now), token.seconds()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "token": token,
            "seconds": token.seconds(),
            "at": rfc3339(now),
        }));
    } else {
        output.success(token.as_str());
    }
    Ok(())
}

pub fn decode(output: &Output, raw: &str) -> Result<()> {
    let bare = raw.trim_start_matches('@');
    let token: TimestampToken = bare
        .parse()
        .with_context(|| format!("Invalid timestamp token '{}'", raw))?;
    let instant = domain::decode(token.as_str())
        .ok_or_else(|| anyhow!("Timestamp token '{}' is out of range", raw))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "token": token,
            "seconds": token.seconds(),
            "at": rfc3339(instant),
        }));
    } else {
        output.success(&rfc3339(instant));
    }
    Ok(())
}
