#![no_main]

use lg_core::GraphOptions;
use lg_parser::parse_log;
use lg_render_dot::{DotRenderConfig, render_dot};
use lg_render_gxl::render_gxl;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(parsed) = parse_log(input, GraphOptions::default()) {
        let _ = render_gxl(&parsed.graph);
        let _ = render_dot(&parsed.graph, &DotRenderConfig::default());
    }
});
