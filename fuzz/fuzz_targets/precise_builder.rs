#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{Child, PreciseBuilder};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let tree = PreciseBuilder::new().feed(input);
    assert!(tree.is_root());
    assert!(tree.is_closed());
    tree.walk(&mut |child| match child {
        Child::Element(node) => assert!(node.is_closed()),
        Child::Text(text) => assert!(!text.contains('\u{200B}')),
        Child::Link(_) => {}
    });
});
