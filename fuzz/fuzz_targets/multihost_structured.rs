//! Structured fuzz target: builds URLs from arbitrary parts so most inputs
//! get past the splitter.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_multihost_structured
//! ```

#![no_main]

use arbitrary::Arbitrary;
use chjdbc_url::{Properties, parse};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzUrl {
    protocol: Option<String>,
    user_info: Option<String>,
    hosts: Vec<(String, Option<u16>)>,
    database: String,
    query: Vec<(String, String)>,
}

impl FuzzUrl {
    fn to_url(&self) -> String {
        let mut url = String::from("jdbc:ch:");
        if let Some(ref protocol) = self.protocol {
            url.push_str(protocol);
            url.push(':');
        }
        url.push_str("//");
        if let Some(ref user_info) = self.user_info {
            url.push_str(user_info);
            url.push('@');
        }
        let hosts: Vec<String> = self
            .hosts
            .iter()
            .map(|(host, port)| match port {
                Some(port) => format!("{}:{}", host, port),
                None => host.clone(),
            })
            .collect();
        url.push_str(&hosts.join(","));
        url.push('/');
        url.push_str(&self.database);
        if !self.query.is_empty() {
            let pairs: Vec<String> = self.query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }
}

fuzz_target!(|input: FuzzUrl| {
    let url = input.to_url();
    if let Ok(info) = parse(&url, &Properties::new()) {
        assert!(!info.nodes().is_empty());
        for node in info.nodes() {
            assert!(!node.host().chars().any(|c| c.is_ascii_control()));
            let _ = info.uri_for(node);
        }
    }
});
