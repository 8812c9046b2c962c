#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: blogc_content::parse on arbitrary UTF-8.
//
// The content parser never fails by contract; this target
// only catches panics (index-out-of-bounds in the block/inline state
// machines, UTF-8 boundary slicing bugs) since there is no error path to
// exercise.
fuzz_target!(|data: &str| {
    let result = blogc_content::parse(data, true, true);
    let _ = result.excerpt();
});
