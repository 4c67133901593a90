//! Formatting configuration for glslx

use std::fmt;
use std::str::FromStr;

/// What to do with the newline at the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingNewline {
    /// Keep one if the input had one.
    Preserve,
    Remove,
    #[default]
    Insert,
}

impl TrailingNewline {
    pub fn as_str(self) -> &'static str {
        match self {
            TrailingNewline::Preserve => "preserve",
            TrailingNewline::Remove => "remove",
            TrailingNewline::Insert => "insert",
        }
    }
}

impl fmt::Display for TrailingNewline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrailingNewline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(TrailingNewline::Preserve),
            "remove" => Ok(TrailingNewline::Remove),
            "insert" => Ok(TrailingNewline::Insert),
            other => Err(format!(
                "unknown trailing newline policy '{other}' (expected preserve, remove or insert)"
            )),
        }
    }
}

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatArgs {
    /// One level of indentation
    pub indent: String,
    /// Line break written between lines
    pub newline: String,
    pub trailing_newline: TrailingNewline,
}

impl Default for FormatArgs {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            newline: "\n".to_string(),
            trailing_newline: TrailingNewline::Insert,
        }
    }
}

impl FormatArgs {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    pub fn with_trailing_newline(mut self, policy: TrailingNewline) -> Self {
        self.trailing_newline = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = FormatArgs::default();
        assert_eq!(args.indent, "  ");
        assert_eq!(args.newline, "\n");
        assert_eq!(args.trailing_newline, TrailingNewline::Insert);
    }

    #[test]
    fn test_builder_chain() {
        let args = FormatArgs::new()
            .with_indent("\t")
            .with_newline("\r\n")
            .with_trailing_newline(TrailingNewline::Remove);
        assert_eq!(args.indent, "\t");
        assert_eq!(args.newline, "\r\n");
        assert_eq!(args.trailing_newline, TrailingNewline::Remove);
    }

    #[test]
    fn test_trailing_newline_from_str() {
        assert_eq!("preserve".parse::<TrailingNewline>(), Ok(TrailingNewline::Preserve));
        assert!("keep".parse::<TrailingNewline>().is_err());
    }
}
