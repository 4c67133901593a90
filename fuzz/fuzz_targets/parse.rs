#![no_main]

use glslx::frontend::source::SourceId;
use glslx::frontend::{lexer, parser};
use glslx::{FormatArgs, format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Recovering parse must terminate on any token stream
        let lexed = lexer::lex_all(s, SourceId(1));
        let _ = parser::parse_recovering(&lexed);

        // Formatting must be idempotent on any text
        let args = FormatArgs::default();
        let once = format(s, &args);
        assert_eq!(format(&once, &args), once);
    }
});
