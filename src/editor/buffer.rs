use ropey::Rope;

/// Position of the insertion point.
///
/// `col` is a byte offset into the line, always on a char boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    /// Column to aim for when moving vertically.
    goal_col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            goal_col: col,
        }
    }

    const fn place(&mut self, line: usize, col: usize) {
        self.line = line;
        self.col = col;
        self.goal_col = col;
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The markdown document being edited.
///
/// Every mutation bumps [`MarkdownBuffer::revision`], which the conversion
/// pipeline uses to tell stale output from current output.
pub struct MarkdownBuffer {
    rope: Rope,
    cursor: Cursor,
    revision: u64,
}

impl MarkdownBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            revision: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line terminator.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let mut s = self.rope.line(idx).to_string();
        while s.ends_with(is_line_break) {
            s.pop();
        }
        Some(s)
    }

    fn line_len(&self, idx: usize) -> usize {
        self.line(idx).map_or(0, |s| s.len())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole document and put the cursor at the start.
    pub fn replace_all(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::default();
        self.touch();
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = self.char_index();
        self.rope.insert_char(idx, ch);
        self.place_at_char(idx + 1);
        self.touch();
    }

    /// Insert `s` at the cursor and leave the cursor after it.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let idx = self.char_index();
        self.rope.insert(idx, s);
        self.place_at_char(idx + s.chars().count());
        self.touch();
    }

    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Backspace. Returns `false` at the start of the document.
    pub fn delete_back(&mut self) -> bool {
        let (text, col) = self.current_line();
        let line = self.cursor.line;
        if line == 0 && col == 0 {
            return false;
        }
        let idx = self.char_index();
        if col == 0 {
            let prev_len = self.line_len(line - 1);
            // removes the previous line's terminator
            let start = self.rope.line_to_char(line) - self.terminator_len(line - 1);
            self.rope.remove(start..idx);
            self.cursor.place(line - 1, prev_len);
        } else {
            let width = text[..col].chars().next_back().map_or(1, char::len_utf8);
            self.rope.remove(idx - 1..idx);
            self.cursor.place(line, col - width);
        }
        self.touch();
        true
    }

    /// Delete. Returns `false` at the end of the document.
    pub fn delete_forward(&mut self) -> bool {
        let Cursor { line, col, .. } = self.cursor;
        let at_line_end = col >= self.line_len(line);
        if at_line_end && line + 1 >= self.line_count() {
            return false;
        }
        let idx = self.char_index();
        let span = if at_line_end {
            self.terminator_len(line)
        } else {
            1
        };
        self.rope.remove(idx..idx + span);
        self.touch();
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let (text, col) = self.current_line();
        let Cursor { line, goal_col, .. } = self.cursor;
        match direction {
            Direction::Left => {
                if col > 0 {
                    let width = text[..col].chars().next_back().map_or(1, char::len_utf8);
                    self.cursor.place(line, col - width);
                } else if line > 0 {
                    self.cursor.place(line - 1, self.line_len(line - 1));
                }
            }
            Direction::Right => {
                if let Some(ch) = text[col..].chars().next() {
                    self.cursor.place(line, col + ch.len_utf8());
                } else if line + 1 < self.line_count() {
                    self.cursor.place(line + 1, 0);
                }
            }
            Direction::Up if line > 0 => self.move_vertical(line - 1, goal_col),
            Direction::Down if line + 1 < self.line_count() => {
                self.move_vertical(line + 1, goal_col);
            }
            Direction::Up | Direction::Down => {}
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.place(self.cursor.line, 0);
    }

    pub fn move_end(&mut self) {
        self.cursor.place(self.cursor.line, self.line_len(self.cursor.line));
    }

    pub fn move_word_left(&mut self) {
        let (text, col) = self.current_line();
        let line = self.cursor.line;
        if col == 0 {
            if line > 0 {
                self.cursor.place(line - 1, self.line_len(line - 1));
            }
            return;
        }
        let before = text[..col].trim_end();
        let start = before
            .rfind(|c: char| !is_word_char(c))
            .map_or(0, |i| i + before[i..].chars().next().map_or(1, char::len_utf8));
        self.cursor.place(line, start);
    }

    pub fn move_word_right(&mut self) {
        let (text, col) = self.current_line();
        let line = self.cursor.line;
        if col >= text.len() {
            if line + 1 < self.line_count() {
                self.cursor.place(line + 1, 0);
            }
            return;
        }
        let rest = &text[col..];
        let word_end = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
        let gap = rest[word_end..]
            .find(is_word_char)
            .unwrap_or(rest.len() - word_end);
        self.cursor.place(line, col + word_end + gap);
    }

    /// Clamp and move to `(line, col)`, snapping `col` to a char boundary.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let text = self.line(line).unwrap_or_default();
        self.cursor.place(line, snap_col(&text, col));
    }

    pub const fn move_to_start(&mut self) {
        self.cursor.place(0, 0);
    }

    pub fn move_to_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.cursor.place(last, self.line_len(last));
    }

    fn move_vertical(&mut self, target: usize, goal_col: usize) {
        let text = self.line(target).unwrap_or_default();
        self.cursor.line = target;
        self.cursor.col = snap_col(&text, goal_col);
    }

    const fn touch(&mut self) {
        self.revision += 1;
    }

    fn char_index(&self) -> usize {
        let line = self.cursor.line.min(self.rope.len_lines().saturating_sub(1));
        let text = self.line(line).unwrap_or_default();
        let col = snap_col(&text, self.cursor.col);
        self.rope.line_to_char(line) + text[..col].chars().count()
    }

    /// The cursor line and the cursor column clamped to it.
    fn current_line(&self) -> (String, usize) {
        let text = self.line(self.cursor.line).unwrap_or_default();
        let col = snap_col(&text, self.cursor.col);
        (text, col)
    }

    /// Put the cursor at rope char index `idx`, as ropey splits lines.
    fn place_at_char(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let start = self.rope.line_to_char(line);
        let col = self.rope.slice(start..idx).len_bytes();
        let text = self.line(line).unwrap_or_default();
        self.cursor.place(line, snap_col(&text, col));
    }

    fn terminator_len(&self, idx: usize) -> usize {
        let raw = self.rope.line(idx);
        let content = self.line(idx).map_or(0, |s| s.chars().count());
        raw.len_chars() - content
    }
}

/// Line breaks recognised by ropey.
const fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn snap_col(text: &str, col: usize) -> usize {
    let mut col = col.min(text.len());
    while !text.is_char_boundary(col) {
        col -= 1;
    }
    col
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl std::fmt::Debug for MarkdownBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownBuffer")
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for MarkdownBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = MarkdownBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), Some(String::new()));
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn test_line_strips_terminators() {
        let buf = MarkdownBuffer::from_text("one\r\ntwo\n");
        assert_eq!(buf.line(0).as_deref(), Some("one"));
        assert_eq!(buf.line(1).as_deref(), Some("two"));
        assert_eq!(buf.line(2).as_deref(), Some(""));
        assert_eq!(buf.line(3), None);
    }

    #[test]
    fn test_typing_bumps_revision_each_keystroke() {
        let mut buf = MarkdownBuffer::empty();
        for ch in "# Hi".chars() {
            buf.insert_char(ch);
        }
        assert_eq!(buf.text(), "# Hi");
        assert_eq!(buf.revision(), 4);
        assert_eq!(buf.cursor(), Cursor::at(0, 4));
    }

    #[test]
    fn test_cursor_movement_does_not_bump_revision() {
        let mut buf = MarkdownBuffer::from_text("abc\ndef");
        buf.move_cursor(Direction::Down);
        buf.move_end();
        buf.move_word_left();
        buf.move_to_start();
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn test_insert_multibyte_advances_by_bytes() {
        let mut buf = MarkdownBuffer::empty();
        buf.insert_char('é');
        buf.insert_char('x');
        assert_eq!(buf.text(), "éx");
        assert_eq!(buf.cursor().col, 3);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_insert_str_with_newlines_moves_cursor_to_tail() {
        let mut buf = MarkdownBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_str("X\nYZ\n12");
        assert_eq!(buf.text(), "aX\nYZ\n12b");
        assert_eq!(buf.cursor(), Cursor::at(2, 2));
    }

    #[test]
    fn test_split_line_and_backspace_join() {
        let mut buf = MarkdownBuffer::from_text("hello");
        buf.move_to(0, 2);
        buf.split_line();
        assert_eq!(buf.text(), "he\nllo");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_backspace_joins_crlf_lines() {
        let mut buf = MarkdownBuffer::from_text("a\r\nb");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buf = MarkdownBuffer::from_text("x");
        assert!(!buf.delete_back());
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn test_delete_forward_joins_next_line() {
        let mut buf = MarkdownBuffer::from_text("ab\ncd");
        buf.move_to(0, 2);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "abcd");
        buf.move_to_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_vertical_movement_remembers_goal_column() {
        let mut buf = MarkdownBuffer::from_text("long line\nab\nanother line");
        buf.move_to(0, 7);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 7);
    }

    #[test]
    fn test_word_jumps() {
        let mut buf = MarkdownBuffer::from_text("foo bar_baz qux");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 4);
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 12);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 4);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_to_clamps_and_snaps_to_char_boundary() {
        let mut buf = MarkdownBuffer::from_text("aé\nb");
        buf.move_to(0, 2);
        assert_eq!(buf.cursor().col, 1);
        buf.move_to(10, 10);
        assert_eq!(buf.cursor(), Cursor::at(1, 1));
    }

    #[test]
    fn test_form_feed_paste_keeps_cursor_on_its_line() {
        let mut buf = MarkdownBuffer::empty();
        buf.insert_str("a\u{c}b");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(0).as_deref(), Some("a"));
        assert_eq!(buf.cursor(), Cursor::at(1, 1));

        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "\u{c}b");
    }

    #[test]
    fn test_line_separator_paste_then_left_and_backspace() {
        let mut buf = MarkdownBuffer::from_text("x");
        buf.move_end();
        buf.insert_str("\u{2028}y");
        assert_eq!(buf.cursor(), Cursor::at(1, 1));

        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "xy");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "y");
    }

    #[test]
    fn test_unicode_line_breaks_in_loaded_text() {
        let mut buf = MarkdownBuffer::from_text("a\u{b}b\u{85}c\u{2029}d");
        assert_eq!(buf.line_count(), 4);
        for (idx, expected) in ["a", "b", "c", "d"].into_iter().enumerate() {
            assert_eq!(buf.line(idx).as_deref(), Some(expected));
        }
        buf.move_to(2, 10);
        assert_eq!(buf.cursor(), Cursor::at(2, 1));
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "a\u{b}b\u{85}cd");
        buf.insert_char('\u{c}');
        assert_eq!(buf.cursor(), Cursor::at(3, 0));
        assert_eq!(buf.line(3).as_deref(), Some("d"));
    }

    #[test]
    fn test_replace_all_resets_cursor_and_bumps_revision() {
        let mut buf = MarkdownBuffer::from_text("old");
        buf.move_to_end();
        buf.replace_all("new\ntext");
        assert_eq!(buf.text(), "new\ntext");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
        assert_eq!(buf.revision(), 1);
    }
}
