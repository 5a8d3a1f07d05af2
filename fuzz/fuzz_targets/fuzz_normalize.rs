#![no_main]

use exambank::text::{matches, normalize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Folding must be idempotent and the matcher reflexive on any input
    let once = normalize(data);
    assert_eq!(normalize(&once), once);
    assert!(matches(&once, &once));
});
