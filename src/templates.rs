//! Markdown snippets inserted by the template shortcuts.

use crate::editor::MarkdownBuffer;

/// A block of markdown that can be inserted at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Table,
    CodeBlock,
    Quote,
    Image,
    Link,
    Heading,
}

impl Template {
    pub const ALL: [Self; 6] = [
        Self::Table,
        Self::CodeBlock,
        Self::Quote,
        Self::Image,
        Self::Link,
        Self::Heading,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::CodeBlock => "code block",
            Self::Quote => "quote",
            Self::Image => "image",
            Self::Link => "link",
            Self::Heading => "heading",
        }
    }

    /// Snippet text split at the point where the cursor lands.
    const fn parts(self) -> (&'static str, &'static str) {
        match self {
            Self::Table => (
                "| ",
                "Column 1 | Column 2 | Column 3 |\n\
                 |----------|----------|----------|\n\
                 | Row 1    | Data     | Data     |\n\
                 | Row 2    | Data     | Data     |",
            ),
            Self::CodeBlock => ("```", "\ncode here\n```"),
            Self::Quote => ("> ", "Quote text"),
            Self::Image => ("![", "alt text](https://example.com/image.png)"),
            Self::Link => ("[", "link text](https://example.com)"),
            Self::Heading => ("## ", "Heading"),
        }
    }

    const fn is_block(self) -> bool {
        !matches!(self, Self::Link | Self::Image)
    }

    /// Insert into `buffer` at the cursor.
    ///
    /// Block templates start on a fresh line and are followed by a blank
    /// line so they do not merge with surrounding paragraphs.
    pub fn insert_into(self, buffer: &mut MarkdownBuffer) {
        let (before, after) = self.parts();

        let mut head = String::new();
        if self.is_block() {
            let cursor = buffer.cursor();
            let line = buffer.line(cursor.line).unwrap_or_default();
            if !line[..cursor.col.min(line.len())].trim().is_empty() {
                head.push_str("\n\n");
            }
        }
        head.push_str(before);

        let mut tail = after.to_string();
        if self.is_block() {
            tail.push_str("\n\n");
        }

        buffer.insert_str(&head);
        let cursor = buffer.cursor();
        buffer.insert_str(&tail);
        buffer.move_to(cursor.line, cursor.col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Cursor;

    fn insert(start: &str, template: Template) -> MarkdownBuffer {
        let mut buf = MarkdownBuffer::from_text(start);
        buf.move_to_end();
        template.insert_into(&mut buf);
        buf
    }

    #[test]
    fn test_table_template_in_empty_document() {
        let buf = insert("", Template::Table);
        let text = buf.text();
        assert!(text.starts_with("| Column 1 | Column 2 | Column 3 |\n|----------|"));
        assert!(text.ends_with("| Row 2    | Data     | Data     |\n\n"));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_code_block_places_cursor_on_language() {
        let buf = insert("", Template::CodeBlock);
        assert_eq!(buf.text(), "```\ncode here\n```\n\n");
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_block_template_after_text_starts_new_paragraph() {
        let buf = insert("Some text", Template::Quote);
        assert_eq!(buf.text(), "Some text\n\n> Quote text\n\n");
        assert_eq!(buf.cursor(), Cursor::at(2, 2));
    }

    #[test]
    fn test_inline_templates_stay_on_line() {
        let buf = insert("See ", Template::Link);
        assert_eq!(buf.text(), "See [link text](https://example.com)");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));

        let buf = insert("", Template::Image);
        assert_eq!(buf.text(), "![alt text](https://example.com/image.png)");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_every_template_renders_to_html() {
        let pipeline = crate::convert::Pipeline::default();
        for template in Template::ALL {
            let buf = insert("", template);
            let out = pipeline.convert(buf.revision(), &buf.text());
            assert!(!out.is_fallback(), "{} fell back", template.label());
            assert!(!out.html.trim().is_empty(), "{} rendered empty", template.label());
        }
    }
}
