//! Pieces shared by every node: leading comments, the render contract and
//! list rendering.

use crate::text::{Fragment, TextAssembler};

/// A comment block rendered verbatim above a node.
///
/// The text is emitted as given, so it carries its own `//` markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comment {
    Text(String),
    Block(TextAssembler),
}

impl From<&str> for Comment {
    fn from(text: &str) -> Self {
        Comment::Text(text.to_string())
    }
}

impl From<String> for Comment {
    fn from(text: String) -> Self {
        Comment::Text(text)
    }
}

impl From<TextAssembler> for Comment {
    fn from(block: TextAssembler) -> Self {
        Comment::Block(block)
    }
}

impl From<Comment> for Fragment {
    fn from(comment: Comment) -> Self {
        match comment {
            Comment::Text(text) => Fragment::Line(text),
            Comment::Block(block) => Fragment::Block(block),
        }
    }
}

/// Rendering to AL source.
pub trait Render {
    fn comment(&self) -> Option<&Comment> {
        None
    }

    /// The node without its leading comment.
    fn render_body(&self) -> TextAssembler;

    fn render(&self) -> TextAssembler {
        let mut out = TextAssembler::new();
        out.append(self.comment().cloned(), 0);
        out.append(self.render_body(), 0);
        out
    }
}

/// Whether list entries get a blank line in front of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Compact,
    Separated,
}

/// Render `items` one after another.
///
/// Single-line entries (properties, variables) are terminated with `;`. The
/// leading comment of an entry does not count towards its line count.
pub fn render_all<T: Render>(items: &[T], spacing: Spacing) -> TextAssembler {
    let mut out = TextAssembler::new();
    for item in items {
        let mut body = item.render_body();
        if body.is_empty() {
            continue;
        }
        if spacing == Spacing::Separated {
            out.append("", 0);
        }
        out.append(item.comment().cloned(), 0);
        if body.line_count() == 1 {
            body.terminate_last(";");
        }
        out.append(body, 0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line(&'static str, Option<Comment>);

    impl Render for Line {
        fn comment(&self) -> Option<&Comment> {
            self.1.as_ref()
        }

        fn render_body(&self) -> TextAssembler {
            TextAssembler::with(self.0, 0)
        }
    }

    struct Block;

    impl Render for Block {
        fn render_body(&self) -> TextAssembler {
            TextAssembler::with(vec!["begin", "end;"], 0)
        }
    }

    #[test]
    fn test_single_line_entries_get_semicolons() {
        let items = [Line("a: Integer", None), Line("b: Boolean", None)];
        let out = render_all(&items, Spacing::Compact);
        assert_eq!(out.lines(), &["a: Integer;", "b: Boolean;"]);
    }

    #[test]
    fn test_multi_line_entries_are_untouched() {
        let out = render_all(&[Block, Block], Spacing::Separated);
        assert_eq!(out.lines(), &["", "begin", "end;", "", "begin", "end;"]);
    }

    #[test]
    fn test_comment_does_not_suppress_semicolon() {
        let items = [Line("Visible = false", Some("// toggle me".into()))];
        let out = render_all(&items, Spacing::Compact);
        assert_eq!(out.lines(), &["// toggle me", "Visible = false;"]);
    }

    #[test]
    fn test_render_puts_comment_first() {
        let line = Line("x", Some(Comment::Block(TextAssembler::with(vec!["// a", "// b"], 0))));
        assert_eq!(line.render().lines(), &["// a", "// b", "x"]);
    }
}
