#![no_main]

use lg_core::GraphOptions;
use lg_parser::parse_log;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let options = GraphOptions {
        include_files: true,
        ..GraphOptions::default()
    };
    if let Ok(parsed) = parse_log(input, options) {
        for edge in &parsed.graph.edges {
            assert!(parsed.graph.edge_endpoints(edge).is_some());
        }
    }
});
