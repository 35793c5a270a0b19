//! Source file building and writing.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::error::EmitError;

/// Header written at the top of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by rdfbind-codegen. Do not edit by hand.";

/// An in-memory Rust source file.
pub struct RustFile {
    /// Accumulated source text.
    pub buf: String,
}

impl RustFile {
    /// Starts a file with the generated-code header and a `//!` module doc.
    ///
    /// `doc` may span several lines; each line becomes its own `//!` line.
    #[must_use]
    pub fn new(doc: &str) -> Self {
        let mut buf = String::with_capacity(4096);
        let _ = writeln!(buf, "{GENERATED_HEADER}");
        let _ = writeln!(buf);
        for line in doc.lines() {
            if line.is_empty() {
                let _ = writeln!(buf, "//!");
            } else {
                let _ = writeln!(buf, "//! {line}");
            }
        }
        let _ = writeln!(buf);
        Self { buf }
    }

    /// Appends one line.
    pub fn line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    /// Appends an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends a `///` doc comment at column zero.
    pub fn doc_comment(&mut self, s: &str) {
        push_doc(&mut self.buf, s, "");
    }

    /// Appends a `///` doc comment indented by four spaces.
    pub fn indented_doc_comment(&mut self, s: &str) {
        push_doc(&mut self.buf, s, "    ");
    }

    /// Appends a block of text indented by `level` steps of four spaces.
    pub fn indented(&mut self, text: &str, level: usize) {
        self.buf.push_str(&indent(text, level));
    }

    /// Returns the finished source text with exactly one trailing newline.
    #[must_use]
    pub fn finish(self) -> String {
        let mut out = self.buf.trim_end().to_string();
        out.push('\n');
        out
    }
}

fn push_doc(buf: &mut String, s: &str, prefix: &str) {
    if s.is_empty() {
        let _ = writeln!(buf, "{prefix}///");
        return;
    }
    for line in s.lines() {
        if line.trim().is_empty() {
            let _ = writeln!(buf, "{prefix}///");
        } else {
            let _ = writeln!(buf, "{prefix}/// {line}");
        }
    }
}

/// Indents every non-empty line of `text` by `level` steps of four spaces.
#[must_use]
pub fn indent(text: &str, level: usize) -> String {
    let pad = "    ".repeat(level);
    let mut out = String::with_capacity(text.len() + 16);
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Collapses runs of whitespace inside each paragraph of `s` into single
/// spaces. Paragraphs (separated by blank lines) are kept apart by one
/// empty line.
#[must_use]
pub fn normalize_comment(s: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in s.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.extend(line.split_whitespace());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs.join("\n\n")
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`EmitError::Io`] if a directory or the file cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| EmitError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_doc_lines() {
        let f = RustFile::new("First line.\n\nSecond paragraph.");
        let text = f.finish();
        assert!(text.starts_with(GENERATED_HEADER));
        assert!(text.contains("//! First line.\n//!\n//! Second paragraph.\n"));
    }

    #[test]
    fn doc_comments() {
        let mut f = RustFile::new("x");
        f.doc_comment("");
        f.indented_doc_comment("a\nb");
        assert!(f.buf.ends_with("///\n    /// a\n    /// b\n"));
    }

    #[test]
    fn normalize_keeps_paragraphs() {
        assert_eq!(
            normalize_comment("  A   journey\n  between stops.\n\n\n Second. "),
            "A journey between stops.\n\nSecond."
        );
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb\n", 1), "    a\n\n    b\n");
    }
}
