//! Todo records as produced by the scanner
//!
//! Records are read-only input here: the scanner creates them, refreshes
//! them wholesale on every poll, and this crate only derives views.

use serde::{Deserialize, Serialize};

/// One todo line found by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    /// Line content after the status marker
    pub content: String,
    /// `path:line` where the todo was found
    pub location: String,
    /// Raw status marker matched at scan time
    #[serde(default)]
    pub status: String,
}

impl TodoRecord {
    pub fn new(
        content: impl Into<String>,
        location: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            location: location.into(),
            status: status.into(),
        }
    }

    /// Case-insensitive substring match on content or location.
    /// An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.content.to_lowercase().contains(&needle)
            || self.location.to_lowercase().contains(&needle)
    }

    pub fn parsed_location(&self) -> Location {
        Location::parse(&self.location)
    }
}

/// Where a record appeared in the scan output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScanPosition {
    pub category: usize,
    pub item: usize,
}

/// A record paired with its original scan position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedTodo {
    #[serde(flatten)]
    pub record: TodoRecord,
    pub position: ScanPosition,
}

/// A named group of records (a project or git repository)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCategory {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub todos: Vec<TodoRecord>,
}

/// Complete scanner output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutput {
    #[serde(default)]
    pub categories: Vec<TodoCategory>,
}

impl ScanOutput {
    /// Flattens categories into records tagged with their scan position
    pub fn flatten(&self) -> Vec<ScannedTodo> {
        self.categories
            .iter()
            .enumerate()
            .flat_map(|(category, cat)| {
                cat.todos
                    .iter()
                    .enumerate()
                    .map(move |(item, record)| ScannedTodo {
                        record: record.clone(),
                        position: ScanPosition { category, item },
                    })
            })
            .collect()
    }

    /// Total number of records across categories
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.todos.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Category name for a scan position
    pub fn category_name(&self, position: ScanPosition) -> Option<&str> {
        self.categories.get(position.category).map(|c| c.name.as_str())
    }
}

/// A location split into file path and optional line number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub line: Option<u32>,
}

impl Location {
    /// Splits a trailing `:<digits>` off the path
    pub fn parse(location: &str) -> Self {
        if let Some((path, line)) = location.rsplit_once(':') {
            if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(line) = line.parse() {
                    return Self {
                        path: path.to_string(),
                        line: Some(line),
                    };
                }
            }
        }
        Self {
            path: location.to_string(),
            line: None,
        }
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_content_or_location() {
        let record = TodoRecord::new("Fix the Parser", "src/lib.rs:10", "TODO");

        assert!(record.matches_query(""));
        assert!(record.matches_query("parser"));
        assert!(record.matches_query("LIB.RS"));
        assert!(!record.matches_query("lexer"));
    }

    #[test]
    fn record_exposes_parsed_location() {
        let record = TodoRecord::new("x", "notes/todo.md:42", "TODO");
        let loc = record.parsed_location();

        assert_eq!(loc.path, "notes/todo.md");
        assert_eq!(loc.line, Some(42));
        assert_eq!(loc.file_name(), "todo.md");
    }

    #[test]
    fn location_splits_line_number() {
        let loc = Location::parse("src/domain/task.rs:123");
        assert_eq!(loc.path, "src/domain/task.rs");
        assert_eq!(loc.line, Some(123));
        assert_eq!(loc.file_name(), "task.rs");
    }

    #[test]
    fn location_without_line_is_kept_whole() {
        let loc = Location::parse("C:\\notes\\todo.md");
        assert_eq!(loc.path, "C:\\notes\\todo.md");
        assert_eq!(loc.line, None);
        assert_eq!(loc.file_name(), "todo.md");

        assert_eq!(Location::parse("notes.md:").line, None);
        assert_eq!(Location::parse("notes.md:12a").line, None);
    }

    #[test]
    fn flatten_assigns_positions() {
        let output = ScanOutput {
            categories: vec![
                TodoCategory {
                    name: "alpha".into(),
                    icon: String::new(),
                    todos: vec![
                        TodoRecord::new("a", "a.rs:1", "TODO"),
                        TodoRecord::new("b", "a.rs:2", "TODO"),
                    ],
                },
                TodoCategory {
                    name: "beta".into(),
                    icon: String::new(),
                    todos: vec![TodoRecord::new("c", "b.rs:1", "DONE")],
                },
            ],
        };

        let flat = output.flatten();
        assert_eq!(output.len(), 3);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[2].position, ScanPosition { category: 1, item: 0 });
        assert_eq!(output.category_name(flat[2].position), Some("beta"));
    }

    #[test]
    fn scan_output_deserializes_without_status() {
        let json = r#"{"categories":[
            {"name":"Other","icon":"","todos":[{"content":"x","location":"y:1"}]}
        ]}"#;
        let output: ScanOutput = serde_json::from_str(json).unwrap();

        assert_eq!(output.categories[0].todos[0].status, "");
    }
}
