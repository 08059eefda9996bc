//! Line-oriented text assembly.
//!
//! Every node renders itself into a [`TextAssembler`]. Indentation is applied
//! when lines are appended and is never recomputed afterwards, so a block
//! appended at depth 1 into a parent that is later appended at depth 1 ends up
//! at depth 2.

use std::fmt;

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// AL source files use Windows line endings.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Anything that can be appended to a [`TextAssembler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Line(String),
    Block(TextAssembler),
    List(Vec<Fragment>),
    /// Appends nothing. Produced from `None`.
    Empty,
}

impl From<&str> for Fragment {
    fn from(line: &str) -> Self {
        Fragment::Line(line.to_string())
    }
}

impl From<String> for Fragment {
    fn from(line: String) -> Self {
        Fragment::Line(line)
    }
}

impl From<TextAssembler> for Fragment {
    fn from(block: TextAssembler) -> Self {
        Fragment::Block(block)
    }
}

impl<T: Into<Fragment>> From<Option<T>> for Fragment {
    fn from(value: Option<T>) -> Self {
        value.map_or(Fragment::Empty, Into::into)
    }
}

impl<T: Into<Fragment>> From<Vec<T>> for Fragment {
    fn from(items: Vec<T>) -> Self {
        Fragment::List(items.into_iter().map(Into::into).collect())
    }
}

/// An ordered list of text lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAssembler {
    lines: Vec<String>,
}

impl TextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an assembler holding `content` at `indent`.
    pub fn with(content: impl Into<Fragment>, indent: usize) -> Self {
        let mut out = Self::new();
        out.append(content, indent);
        out
    }

    pub fn append(&mut self, content: impl Into<Fragment>, indent: usize) -> &mut Self {
        self.append_fragment(content.into(), indent);
        self
    }

    fn append_fragment(&mut self, fragment: Fragment, indent: usize) {
        match fragment {
            Fragment::Line(line) => self.push_line(line, indent),
            Fragment::Block(block) => {
                for line in block.lines {
                    self.push_line(line, indent);
                }
            }
            Fragment::List(items) => {
                for item in items {
                    self.append_fragment(item, indent);
                }
            }
            Fragment::Empty => {}
        }
    }

    fn push_line(&mut self, line: String, indent: usize) {
        if indent == 0 || line.is_empty() {
            self.lines.push(line);
        } else {
            let pad = indent * INDENT_WIDTH;
            self.lines.push(format!("{:pad$}{}", "", line, pad = pad));
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Append `suffix` to the last line, if there is one.
    pub fn terminate_last(&mut self, suffix: &str) {
        if let Some(last) = self.lines.last_mut() {
            last.push_str(suffix);
        }
    }
}

impl fmt::Display for TextAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join(LINE_TERMINATOR))
    }
}
