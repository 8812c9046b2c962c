#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: blogc_source::parse on arbitrary UTF-8.
//
// Unlike the content parser, the source parser does have an error path
// (malformed preamble/separator); this target asserts only that it never
// panics, not that it never errors.
fuzz_target!(|data: &str| {
    let _ = blogc_source::parse(data, "fuzz.txt", None);
});
