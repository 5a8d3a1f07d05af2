#![no_main]

use exambank::session::Location;
use exambank::session::selection::fragment_id;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Any input is some location; rendering it must parse back to the same one
    let location = Location::parse(data);
    let _ = fragment_id(location.fragment());
    assert_eq!(Location::parse(&location.to_string()), location);
});
