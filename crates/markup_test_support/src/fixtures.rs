//! Golden fixture discovery.
//!
//! A fixture is a directory holding `input.html` and an expected snapshot.
//! Snapshot files may open with `# key: value` header lines; blank lines are
//! ignored. Fixture names can be narrowed with an environment variable that
//! holds a substring of the directory name.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FixtureStatus {
    Active,
    Xfail,
}

#[derive(Debug)]
pub struct FixtureCase {
    pub name: String,
    pub dir: PathBuf,
    pub input: String,
    pub status: FixtureStatus,
    pub reason: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub lines: Vec<String>,
}

impl FixtureCase {
    pub fn header_bool(&self, key: &str, default: bool) -> bool {
        match self.headers.get(key).map(String::as_str) {
            None => default,
            Some("true") => true,
            Some("false") => false,
            Some(other) => panic!(
                "invalid boolean '{other}' for {key} in fixture '{}'",
                self.name
            ),
        }
    }
}

/// Load every fixture under `root`, sorted by name, that matches the filter
/// in `filter_var`. `expected_file` names the snapshot inside each fixture
/// directory and `format` must match its `format` header.
pub fn load_cases(root: &Path, expected_file: &str, format: &str, filter_var: &str) -> Vec<FixtureCase> {
    let filter = env::var(filter_var).ok();
    let mut entries: Vec<_> = fs::read_dir(root)
        .unwrap_or_else(|err| panic!("failed to read fixture root {root:?}: {err}"))
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut cases = Vec::new();
    for entry in entries {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if let Some(filter) = &filter
            && !name.contains(filter.as_str())
        {
            continue;
        }
        let input_path = dir.join("input.html");
        let input = fs::read_to_string(&input_path)
            .unwrap_or_else(|err| panic!("failed to read input {input_path:?}: {err}"));
        let (headers, lines) = parse_snapshot_file(&dir.join(expected_file));

        match headers.get("format") {
            Some(found) if found == format => {}
            Some(found) => panic!("unsupported format '{found}' in fixture '{name}'"),
            None => panic!("missing format header in fixture '{name}'"),
        }
        let status = match headers.get("status").map(String::as_str) {
            Some("active") | None => FixtureStatus::Active,
            Some("xfail") => FixtureStatus::Xfail,
            Some(other) => panic!("unsupported status '{other}' in fixture '{name}'"),
        };
        let reason = headers.get("reason").cloned();
        if status == FixtureStatus::Xfail && reason.as_deref().unwrap_or("").is_empty() {
            panic!("xfail fixture '{name}' is missing a reason");
        }

        cases.push(FixtureCase {
            name,
            dir,
            input,
            status,
            reason,
            headers,
            lines,
        });
    }
    cases
}

fn parse_snapshot_file(path: &Path) -> (BTreeMap<String, String>, Vec<String>) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read snapshot {path:?}: {err}"));
    let mut headers = BTreeMap::new();
    let mut lines = Vec::new();
    for raw_line in content.lines() {
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }
        // Header lines are only recognized before the first snapshot line,
        // since outline snapshots themselves begin with `#root`.
        if lines.is_empty()
            && let Some(stripped) = line.strip_prefix("# ")
        {
            let (key, value) = stripped
                .split_once(':')
                .unwrap_or_else(|| panic!("invalid header in {path:?}: '{line}'"));
            let key = key.trim().to_ascii_lowercase();
            if headers.insert(key.clone(), value.trim().to_string()).is_some() {
                panic!("duplicate header '{key}' in {path:?}");
            }
            continue;
        }
        lines.push(line.to_string());
    }
    (headers, lines)
}
