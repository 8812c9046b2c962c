#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: blogc_content::parse_inline on arbitrary UTF-8.
//
// Isolates the inline state machine (emphasis/strong/code/link/image/
// dash/line-break) from block parsing, since it recurses on its own
// output for nested constructs (`[*bold*](url)`).
fuzz_target!(|data: &str| {
    let _ = blogc_content::parse_inline(data);
});
