#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: blogc_template::parse on arbitrary UTF-8.
//
// The template lexer/parser has the widest error surface of the three
// hand-rolled parsers (unclosed constructs, nested blocks, bad operators,
// duplicated trim markers); this target only asserts it never panics.
fuzz_target!(|data: &str| {
    let _ = blogc_template::parse(data);
});
