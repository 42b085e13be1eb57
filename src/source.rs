/* The instruction stream: ordered source lines with bounds-checked access.
   Lines are trimmed once at construction so that classification and the
   preprocessing scans can match on the first character directly. */

use std::fs;
use std::io;
use std::path::Path;

/// What a line is, judged by its first non-space character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Label,
    Directive,
    Opcode,
}

pub fn classify(line: &str) -> LineKind {
    match line.chars().next() {
        None => LineKind::Blank,
        Some('#') => LineKind::Comment,
        Some(':') => LineKind::Label,
        Some('.') => LineKind::Directive,
        Some(_) => LineKind::Opcode,
    }
}

/// Holds the source lines of a single method body.
#[derive(Debug, Clone, Default)]
pub struct Source {
    lines: Vec<String>,
}

impl Source {
    pub fn from_lines<I, S>(lines: I) -> Source
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Source {
            lines: lines.into_iter().map(|l| l.as_ref().trim().to_string()).collect(),
        }
    }

    /// Reads a method body from a smali file.
    pub fn read_from_file(path: &Path) -> Result<Source, io::Error> {
        let text = fs::read_to_string(path)?;
        Ok(Source::from_lines(text.lines()))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_line(&self, index: usize) -> bool {
        index < self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|l| l.as_str())
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Source {
        Source::from_lines(text.lines())
    }
}
