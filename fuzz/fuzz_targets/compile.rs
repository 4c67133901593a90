#![no_main]

use glslx::{CompileArgs, NoFileAccess, OutputFormat, compile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for format in OutputFormat::ALL {
            let result = compile(s, &CompileArgs::new().with_format(format), &NoFileAccess);
            // Output is produced exactly when the log carries no error
            let has_error = result.log.lines().any(|l| l.starts_with("error: ") || l.contains(": error: "));
            assert_eq!(result.output.is_none(), has_error);
        }
    }
});
