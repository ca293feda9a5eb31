#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{Token, tokenize};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    for token in tokenize(input) {
        if let Token::StartTag { name, .. } | Token::EndTag(name) = &token {
            assert!(!name.is_empty());
            assert_eq!(*name, name.to_ascii_lowercase());
        }
    }
});
