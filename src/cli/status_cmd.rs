//! Status marker commands

use std::path::Path;

use anyhow::Result;

use super::annotate::instant_arg;
use super::output::Output;
use crate::domain::{self, Codec, CycleDirection, StatusConfig};
use crate::storage::Config;

/// Loads the active profile's state sets
pub(super) fn load_status_config(output: &Output, path: Option<&Path>) -> Result<StatusConfig> {
    let config = Config::load(path)?;
    output.verbose_ctx(
        "config",
        &format!(
            "path={:?}, profile={}",
            config.path, config.app.active_profile
        ),
    );

    let status = config.status_config();
    if status.is_unconfigured() {
        output.verbose_ctx("config", "no state sets configured; every marker ranks unknown");
    }
    Ok(status)
}

pub fn rank(output: &Output, config_path: Option<&Path>, marker: &str) -> Result<()> {
    let status = load_status_config(output, config_path)?;
    let rank = status.rank(marker);

    if output.is_json() {
        output.data(&serde_json::json!({
            "marker": marker,
            "rank": rank,
            "value": rank.value(),
            "done_like": status.is_done_like(marker),
        }));
    } else {
        output.success(&format!("{} ({})", rank.label(), rank.value()));
    }
    Ok(())
}

pub fn cycle(
    output: &Output,
    config_path: Option<&Path>,
    marker: &str,
    backward: bool,
) -> Result<()> {
    let status = load_status_config(output, config_path)?;
    let direction = if backward {
        CycleDirection::Backward
    } else {
        CycleDirection::Forward
    };
    let next = status.cycle(marker, direction)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "from": marker, "to": next }));
    } else {
        output.success(next);
    }
    Ok(())
}

pub fn transition(
    output: &Output,
    config_path: Option<&Path>,
    content: &str,
    from: &str,
    to: &str,
    at: Option<&str>,
) -> Result<()> {
    let status = load_status_config(output, config_path)?;
    let now = instant_arg(at)?;
    let rewritten =
        domain::transition_content(content, from, to, &status, &Codec::default(), now);
    output.verbose_ctx(
        "transition",
        &format!(
            "{} -> {} (closed: {} -> {})",
            from,
            to,
            status.is_done_like(from),
            status.is_done_like(to)
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({ "status": to, "content": rewritten }));
    } else {
        output.success(&rewritten);
    }
    Ok(())
}

pub fn mark_done(
    output: &Output,
    config_path: Option<&Path>,
    content: &str,
    from: &str,
    at: Option<&str>,
) -> Result<()> {
    let status = load_status_config(output, config_path)?;
    let now = instant_arg(at)?;
    let (marker, rewritten) = domain::mark_done(content, from, &status, &Codec::default(), now)?;
    output.verbose_ctx("mark-done", &format!("{} -> {}", from, marker));

    if output.is_json() {
        output.data(&serde_json::json!({ "status": marker, "content": rewritten }));
    } else {
        output.success(&format!("{} {}", marker, rewritten));
    }
    Ok(())
}
