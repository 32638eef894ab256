//! Sort command: filter and order scanner output

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::output::Output;
use crate::domain::{self, FilterMode, Location, Rank, ScanOutput, ScannedTodo, StatusConfig};
use crate::storage::Config;

/// One record in display order
#[derive(Debug, Serialize)]
struct SortedTodo<'a> {
    category: &'a str,
    status: &'a str,
    rank: Rank,
    content: &'a str,
    location: &'a str,
    #[serde(flatten)]
    place: Location,
    file: String,
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read scanner output: {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read scanner output from stdin")?;
            Ok(buf)
        }
    }
}

/// Applies the search query, then filter mode and ordering
fn select(
    scan: &ScanOutput,
    mode: FilterMode,
    query: Option<&str>,
    status: &StatusConfig,
) -> Vec<ScannedTodo> {
    let query = query.unwrap_or_default();
    let matching = scan
        .flatten()
        .into_iter()
        .filter(|todo| todo.record.matches_query(query));
    domain::sort_records(matching, mode, status)
}

pub fn run(
    output: &Output,
    config_path: Option<&Path>,
    file: Option<&Path>,
    filter: Option<FilterMode>,
    query: Option<&str>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let status = config.status_config();
    let mode = filter.unwrap_or_else(|| config.default_filter());

    let input = read_input(file)?;
    let scan: ScanOutput =
        serde_json::from_str(&input).context("Failed to parse scanner output")?;
    output.verbose_ctx(
        "sort",
        &format!(
            "{} records in {} categories, mode={}",
            scan.len(),
            scan.categories.len(),
            mode
        ),
    );

    let sorted = select(&scan, mode, query, &status);
    output.verbose_ctx("sort", &format!("{} records after filtering", sorted.len()));

    let rows: Vec<SortedTodo> = sorted
        .iter()
        .map(|todo| {
            let place = todo.record.parsed_location();
            SortedTodo {
                category: scan.category_name(todo.position).unwrap_or_default(),
                status: &todo.record.status,
                rank: status.rank(&todo.record.status),
                content: &todo.record.content,
                location: &todo.record.location,
                file: place.file_name().to_string(),
                place,
            }
        })
        .collect();

    if output.is_json() {
        output.data(&rows);
        return Ok(());
    }

    if rows.is_empty() {
        output.success("No matching todos");
        return Ok(());
    }
    for row in &rows {
        output.row(&[row.status, row.content, row.location]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::default_todo_states;

    fn scan() -> ScanOutput {
        serde_json::from_str(
            r#"{"categories":[
                {"name":"api","icon":"","todos":[
                    {"content":"1@AAAAB write docs","location":"api/lib.rs:3","status":"TODO"},
                    {"content":"fix parser","location":"api/parse.rs:9","status":"DOING"},
                    {"content":"@AAAAC@@AAAAD audit","location":"api/lib.rs:7","status":"DONE"}
                ]},
                {"name":"notes","icon":"","todos":[
                    {"content":"Archive notes","location":"notes.md:1","status":"- [ ]"}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    fn contents(todos: &[ScannedTodo]) -> Vec<&str> {
        todos.iter().map(|t| t.record.content.as_str()).collect()
    }

    #[test]
    fn active_puts_doing_first() {
        let sorted = select(&scan(), FilterMode::Active, None, &default_todo_states());
        assert_eq!(
            contents(&sorted),
            vec!["fix parser", "Archive notes", "1@AAAAB write docs"]
        );
    }

    #[test]
    fn closed_keeps_done_like_only() {
        let sorted = select(&scan(), FilterMode::Closed, None, &default_todo_states());
        assert_eq!(contents(&sorted), vec!["@AAAAC@@AAAAD audit"]);
    }

    #[test]
    fn query_narrows_before_sorting() {
        let sorted = select(&scan(), FilterMode::All, Some("LIB.RS"), &default_todo_states());
        assert_eq!(
            contents(&sorted),
            vec!["@AAAAC@@AAAAD audit", "1@AAAAB write docs"]
        );
    }
}
