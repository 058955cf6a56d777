//! Fuzz target for the multi-host URL parser.
//!
//! Feeds arbitrary strings to the splitter, the parser and node URI
//! reconstruction. None of them may panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_multihost_parser
//! ```

#![no_main]

use chjdbc_url::{MultiHostUrl, Properties, parse, remove_credentials_from_query};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(split) = MultiHostUrl::split(input) {
            assert!(!split.is_empty());
        }

        if let Ok(info) = parse(input, &Properties::new()) {
            assert!(!info.nodes().is_empty());
            let _ = info.uris();
        }

        let _ = remove_credentials_from_query(Some(input));
    }
});
