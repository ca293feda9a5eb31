#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{Cell, Entry, LazyBuilder, LazyConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut builder = LazyBuilder::new(LazyConfig {
        group_data: true,
        tidy_tables: false,
    });
    for entry in builder.feed(input) {
        assert!(!matches!(entry, Entry::Cell(Cell::Text(ref text)) if text.trim().is_empty()));
        assert!(!matches!(entry, Entry::Raw { .. } | Entry::Titled { .. }));
    }
    let _ = LazyBuilder::default().feed(input);
});
