use markup::{LazyBuilder, LazyConfig};
use markup_test_support::fixtures::FixtureStatus;
use markup_test_support::{diff_lines, format_entries, load_cases};
use std::path::Path;

const FILTER_VAR: &str = "MARKUP_TABLE_FIXTURE";

#[test]
fn golden_table_fixtures() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tables");
    let cases = load_cases(&root, "expected.txt", "markup-entries-v1", FILTER_VAR);
    assert!(!cases.is_empty(), "no fixtures matched {FILTER_VAR}");

    for case in &cases {
        let config = LazyConfig {
            group_data: case.header_bool("group_data", true),
            tidy_tables: case.header_bool("tidy_tables", true),
        };
        let actual = format_entries(&LazyBuilder::new(config).feed(&case.input));
        let matched = actual == case.lines;
        match case.status {
            FixtureStatus::Active if !matched => panic!(
                "entries mismatch in fixture '{}'\npath: {}\n{}",
                case.name,
                case.dir.display(),
                diff_lines(&case.lines, &actual)
            ),
            FixtureStatus::Xfail if matched => panic!(
                "fixture '{}' matched but is marked xfail; reason: {}",
                case.name,
                case.reason.as_deref().unwrap_or("<missing reason>")
            ),
            _ => {}
        }
    }
}
