#![no_main]

use lg_core::AuthorColorTable;
use lg_parser::parse_author_colors;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(overrides) = parse_author_colors(input) {
        let mut table = AuthorColorTable::new(true);
        let _ = table.load_overrides(&overrides);
    }
});
