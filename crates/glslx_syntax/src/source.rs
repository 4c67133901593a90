//! Source files and the offset ↔ line/column index.
//!
//! A [`SourceSet`] owns every file of one compilation (the builtin prelude, the inputs and whatever `#include`
//! pulled in). Files are immutable once added and are addressed by a stable [`SourceId`].
//!
//! ## Notes
//! - [`LineColumn`] is 0-based on both axes; columns count Unicode scalar values, not bytes.
//! - Offsets are byte offsets into [`SourceFile::contents`].

use std::fmt;

/// Stable identifier of a file inside a [`SourceSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SourceId(pub u32);

impl SourceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A 0-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl LineColumn {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for LineColumn {
    /// Human-readable, 1-based rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// One loaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: SourceId,
    pub name: String,
    pub contents: String,
    /// `true` for the bundled builtin prelude.
    pub is_builtin: bool,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(id: SourceId, name: impl Into<String>, contents: impl Into<String>) -> Self {
        let contents = contents.into();
        let line_starts = std::iter::once(0)
            .chain(contents.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            id,
            name: name.into(),
            contents,
            is_builtin: false,
            line_starts,
        }
    }

    pub fn builtin(mut self) -> Self {
        self.is_builtin = true;
        self
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Map a byte offset to a 0-based line/column.
    ///
    /// ## Notes
    /// - Offsets past the end clamp to the end of the file.
    /// - Offsets inside a multi-byte character snap back to its start.
    pub fn line_column(&self, offset: usize) -> LineColumn {
        let mut offset = offset.min(self.contents.len());
        while !self.contents.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = self.contents[self.line_starts[line]..offset].chars().count();
        LineColumn { line, column }
    }

    /// Map a 0-based line/column back to a byte offset.
    ///
    /// Returns `None` when `line` is past the last line. Columns past the end of the line clamp to the line end
    /// (before the line break).
    pub fn offset(&self, line: usize, column: usize) -> Option<usize> {
        let start = *self.line_starts.get(line)?;
        let text = self.line_text(line);
        let within = text
            .char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        Some(start + within)
    }

    /// Text of a 0-based line without its line break.
    pub fn line_text(&self, line: usize) -> &str {
        let Some(&start) = self.line_starts.get(line) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.contents.len());
        self.contents[start..end].trim_end_matches('\r')
    }

    pub fn slice(&self, start: usize, end: usize) -> &str {
        self.contents.get(start..end).unwrap_or("")
    }
}

/// Every file of one compilation, indexed by [`SourceId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    files: Vec<SourceFile>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next added file will receive.
    pub fn next_id(&self) -> SourceId {
        SourceId(self.files.len() as u32)
    }

    pub fn add(&mut self, name: impl Into<String>, contents: impl Into<String>) -> SourceId {
        let id = self.next_id();
        self.files.push(SourceFile::new(id, name, contents));
        id
    }

    pub fn add_builtin(&mut self, name: impl Into<String>, contents: impl Into<String>) -> SourceId {
        let id = self.next_id();
        self.files.push(SourceFile::new(id, name, contents).builtin());
        id
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_column_round_trips_through_offsets() {
        let file = SourceFile::new(SourceId(0), "a.glslx", "float x;\nvec2 y;\n");
        assert_eq!(file.line_column(0), LineColumn::new(0, 0));
        assert_eq!(file.line_column(9), LineColumn::new(1, 0));
        assert_eq!(file.line_column(14), LineColumn::new(1, 5));
        assert_eq!(file.offset(1, 5), Some(14));
        assert_eq!(file.line_count(), 3);
    }

    #[test]
    fn columns_count_unicode_scalars() {
        let file = SourceFile::new(SourceId(0), "u.glslx", "// é\nint a;");
        assert_eq!(file.line_column(5), LineColumn::new(0, 4));
        assert_eq!(file.offset(0, 4), Some(5));
    }

    #[test]
    fn out_of_range_positions_clamp() {
        let file = SourceFile::new(SourceId(0), "a.glslx", "int a;\r\nint b;");
        assert_eq!(file.line_text(0), "int a;");
        assert_eq!(file.offset(0, 100), Some(6));
        assert_eq!(file.offset(7, 0), None);
        assert_eq!(file.line_column(1000), LineColumn::new(1, 6));
    }

    #[test]
    fn display_is_one_based() {
        assert_eq!(LineColumn::new(0, 4).to_string(), "1:5");
    }
}
