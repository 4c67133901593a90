//! Compile options for the emitter.
//!
//! Defaults match the glslx command line: `json` output, rename everything, rewriting on, minified, unreachable
//! symbols dropped.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Js,
    Cpp,
    Skew,
    Rust,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Json,
        OutputFormat::Js,
        OutputFormat::Cpp,
        OutputFormat::Skew,
        OutputFormat::Rust,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Js => "js",
            OutputFormat::Cpp => "c++",
            OutputFormat::Skew => "skew",
            OutputFormat::Rust => "rust",
        }
    }
}

/// Which symbols get short names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenamingMode {
    /// Everything except exported and imported symbols.
    #[default]
    All,
    /// Only symbols the host cannot see: no uniforms, attributes or varyings.
    InternalOnly,
    None,
}

impl RenamingMode {
    pub const ALL: [RenamingMode; 3] = [RenamingMode::All, RenamingMode::InternalOnly, RenamingMode::None];

    pub fn as_str(self) -> &'static str {
        match self {
            RenamingMode::All => "all",
            RenamingMode::InternalOnly => "internal-only",
            RenamingMode::None => "none",
        }
    }
}

/// An option value that is not one of the accepted spellings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {option} \"{value}\" (expected one of: {expected})")]
pub struct OptionParseError {
    pub option: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! impl_option_str {
    ($ty:ty, $option:literal) => {
        impl FromStr for $ty {
            type Err = OptionParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL.into_iter().find(|v| v.as_str() == s).ok_or_else(|| OptionParseError {
                    option: $option,
                    value: s.to_string(),
                    expected: <$ty>::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", "),
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_option_str!(OutputFormat, "format");
impl_option_str!(RenamingMode, "renaming mode");

/// Options for one batch compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileArgs {
    pub format: OutputFormat,
    pub renaming: RenamingMode,
    /// Skip constant folding, dead code removal and constant inlining.
    pub disable_rewriting: bool,
    /// Indented output with one statement per line (renaming still applies).
    pub pretty_print: bool,
    /// Emit every declaration, reachable or not.
    pub keep_symbols: bool,
}

impl CompileArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_renaming(mut self, renaming: RenamingMode) -> Self {
        self.renaming = renaming;
        self
    }

    pub fn with_disable_rewriting(mut self, disable: bool) -> Self {
        self.disable_rewriting = disable;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_keep_symbols(mut self, keep: bool) -> Self {
        self.keep_symbols = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_command_line() {
        let args = CompileArgs::default();
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.renaming, RenamingMode::All);
        assert!(!args.disable_rewriting && !args.pretty_print && !args.keep_symbols);
    }

    #[test]
    fn test_option_spellings() {
        assert_eq!("c++".parse::<OutputFormat>(), Ok(OutputFormat::Cpp));
        assert_eq!("internal-only".parse::<RenamingMode>(), Ok(RenamingMode::InternalOnly));
        assert_eq!(OutputFormat::Rust.to_string(), "rust");
    }

    #[test]
    fn test_unknown_spelling_lists_choices() {
        let err = "cpp".parse::<OutputFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid format \"cpp\" (expected one of: json, js, c++, skew, rust)"
        );
    }
}
