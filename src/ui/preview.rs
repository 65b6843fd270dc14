//! Terminal layout of converted HTML.
//!
//! The preview pane shows the committed HTML string, not the markdown. This
//! module reads the subset of HTML the markdown renderer emits (headings,
//! paragraphs, lists, quotes, code, tables, inline emphasis, links and
//! images) and lays it out as wrapped, styled [`Line`]s. Unknown tags are
//! ignored and their text is kept, so raw HTML passed through by the
//! renderer still shows up as text.

use std::borrow::Cow;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::style::Palette;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Open {
        name: String,
        attrs: &'a str,
    },
    Close(String),
    Text(&'a str),
}

fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = html;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }
        if rest.starts_with('<') {
            let tag = rest[1..]
                .find(['<', '>'])
                .map(|i| i + 1)
                .filter(|&end| rest.as_bytes()[end] == b'>')
                .and_then(|end| parse_tag(&rest[1..end]).map(|token| (token, end)));
            match tag {
                Some((token, end)) => {
                    tokens.push(token);
                    rest = &rest[end + 1..];
                }
                None => {
                    // stray angle bracket: keep it as text and rescan after it
                    tokens.push(Token::Text(&rest[..1]));
                    rest = &rest[1..];
                }
            }
            continue;
        }
        let end = rest.find('<').unwrap_or(rest.len());
        tokens.push(Token::Text(&rest[..end]));
        rest = &rest[end..];
    }
    tokens
}

/// Parse the inside of `<...>`. Returns `None` for anything that is not a tag.
fn parse_tag(tag: &str) -> Option<Token<'_>> {
    if let Some(name) = tag.strip_prefix('/') {
        let name = name.trim();
        return is_tag_name(name).then(|| Token::Close(name.to_ascii_lowercase()));
    }
    let body = tag.trim_end().trim_end_matches('/');
    let (name, attrs) = body
        .split_once(char::is_whitespace)
        .unwrap_or((body, ""));
    is_tag_name(name).then(|| Token::Open {
        name: name.to_ascii_lowercase(),
        attrs,
    })
}

fn is_tag_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Value of a double-quoted attribute.
fn attr(attrs: &str, key: &str) -> Option<String> {
    let needle = format!("{key}=\"");
    let mut search = 0;
    while let Some(rel) = attrs[search..].find(&needle) {
        let start = search + rel;
        let at_boundary = attrs[..start]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        let value_start = start + needle.len();
        if at_boundary {
            let value_end = attrs[value_start..].find('"')? + value_start;
            return Some(decode_entities(&attrs[value_start..value_end]).into_owned());
        }
        search = value_start;
    }
    None
}

fn has_attr(attrs: &str, key: &str) -> bool {
    attr(attrs, key).is_some() || attrs.split_whitespace().any(|word| word == key)
}

/// Replace character references with the characters they name.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&rest[1..end]).map(|ch| (ch, end)));
        if let Some((ch, end)) = decoded {
            out.push(ch);
            rest = &rest[end + 1..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = if let Some(hex) = number.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                number.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[derive(Debug)]
struct ListState {
    ordered: bool,
    next: u64,
}

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<(Vec<String>, bool)>,
    row: Vec<String>,
    cell: Option<String>,
    in_head: bool,
}

/// Incremental layout state while walking the token stream.
struct HtmlLayout<'p> {
    palette: &'p Palette,
    width: usize,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    quote_depth: usize,
    lists: Vec<ListState>,
    marker: Option<String>,
    item_indent: usize,
    pre: bool,
    table: Option<TableState>,
}

impl<'p> HtmlLayout<'p> {
    fn new(palette: &'p Palette, width: usize) -> Self {
        Self {
            palette,
            width: width.max(1),
            lines: Vec::new(),
            spans: Vec::new(),
            styles: Vec::new(),
            quote_depth: 0,
            lists: Vec::new(),
            marker: None,
            item_indent: 0,
            pre: false,
            table: None,
        }
    }

    fn style(&self) -> Style {
        let base = if self.quote_depth > 0 {
            self.palette.quote
        } else {
            Style::default()
        };
        self.styles.last().copied().unwrap_or(base)
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        self.push_style(Style::new().add_modifier(modifier));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn quote_prefix(&self) -> String {
        "│ ".repeat(self.quote_depth)
    }

    fn list_indent(&self) -> String {
        "  ".repeat(self.lists.len().saturating_sub(1))
    }

    /// Prefix for the first wrapped row of the current block and for the rest.
    fn prefixes(&mut self) -> (String, String) {
        let base = format!("{}{}", self.quote_prefix(), self.list_indent());
        match self.marker.take() {
            Some(marker) => (
                format!("{base}{marker}"),
                format!("{base}{}", " ".repeat(self.item_indent)),
            ),
            None if !self.lists.is_empty() => {
                let cont = format!("{base}{}", " ".repeat(self.item_indent));
                (cont.clone(), cont)
            }
            None => (base.clone(), base),
        }
    }

    fn open(&mut self, name: &str, attrs: &str) {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush_block();
                let level = name.as_bytes()[1] - b'0';
                let style = self.palette.heading(level);
                self.push_style(style);
                let hashes = "#".repeat(usize::from(level));
                if level > 1 {
                    self.spans
                        .push(Span::styled(format!("{hashes} "), self.palette.muted));
                }
            }
            "p" | "div" | "section" | "dl" | "dt" | "dd" | "details" | "summary" => {
                self.flush_block();
            }
            "blockquote" => {
                self.flush_block();
                self.quote_depth += 1;
            }
            "ul" | "ol" => {
                self.flush_block();
                let next = attr(attrs, "start")
                    .and_then(|start| start.parse().ok())
                    .unwrap_or(1);
                self.lists.push(ListState {
                    ordered: name == "ol",
                    next,
                });
            }
            "li" => {
                self.flush_block();
                let marker = match self.lists.last_mut() {
                    Some(list) if list.ordered => {
                        let marker = format!("{}. ", list.next);
                        list.next += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.item_indent = marker.width();
                self.marker = Some(marker);
            }
            "pre" => {
                self.flush_block();
                self.pre = true;
                self.push_style(self.palette.code_block);
            }
            "code" if !self.pre => self.push_style(self.palette.code_inline),
            "strong" | "b" => self.push_modifier(Modifier::BOLD),
            "em" | "i" => self.push_modifier(Modifier::ITALIC),
            "del" | "s" => self.push_modifier(Modifier::CROSSED_OUT),
            "a" => self.push_style(self.palette.link),
            "sup" | "sub" => self.push_style(Style::new()),
            "hr" => {
                self.flush_block();
                let (prefix, _) = self.prefixes();
                let rule = "─".repeat(self.width.saturating_sub(prefix.width()).max(1));
                self.lines.push(Line::from(vec![
                    Span::raw(prefix),
                    Span::styled(rule, self.palette.rule),
                ]));
                self.blank();
            }
            "br" => self.flush_line(),
            "img" => {
                let alt = attr(attrs, "alt").unwrap_or_default();
                let label = if alt.is_empty() {
                    "[image]".to_string()
                } else {
                    format!("[image: {alt}]")
                };
                self.spans.push(Span::styled(label, self.palette.muted));
            }
            "input" if attr(attrs, "type").as_deref() == Some("checkbox") => {
                let mark = if has_attr(attrs, "checked") {
                    "[x]"
                } else {
                    "[ ]"
                };
                self.spans.push(Span::styled(mark, self.style()));
            }
            "table" => {
                self.flush_block();
                self.table = Some(TableState::default());
            }
            "thead" => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            "tr" => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            "th" | "td" => {
                if let Some(table) = self.table.as_mut() {
                    table.cell = Some(String::new());
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush_block();
                self.pop_style();
                self.blank();
            }
            "p" => {
                self.flush_block();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            "div" | "section" | "dl" | "dt" | "dd" | "details" | "summary" => self.flush_block(),
            "blockquote" => {
                self.flush_block();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            "ul" | "ol" => {
                self.flush_block();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            "li" => {
                self.flush_block();
                self.marker = None;
            }
            "pre" => {
                self.flush_block();
                self.pre = false;
                self.pop_style();
                self.blank();
            }
            "code" if !self.pre => self.pop_style(),
            "strong" | "b" | "em" | "i" | "del" | "s" | "a" | "sup" | "sub" => self.pop_style(),
            "th" | "td" => {
                if let Some(table) = self.table.as_mut()
                    && let Some(cell) = table.cell.take()
                {
                    table.row.push(cell.trim().to_string());
                }
            }
            "tr" => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push((row, table.in_head));
                }
            }
            "thead" => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
            }
            "table" => {
                if let Some(table) = self.table.take() {
                    self.emit_table(table);
                    self.blank();
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, raw: &str) {
        let text = decode_entities(raw);
        if let Some(table) = self.table.as_mut() {
            if let Some(cell) = table.cell.as_mut() {
                cell.push_str(&text);
            }
            return;
        }
        let style = self.style();
        if self.pre {
            let mut parts = text.split('\n').peekable();
            while let Some(part) = parts.next() {
                if !part.is_empty() {
                    self.spans.push(Span::styled(part.to_string(), style));
                }
                if parts.peek().is_some() {
                    self.flush_line();
                }
            }
            return;
        }
        if self.spans.is_empty() && text.trim().is_empty() {
            return;
        }
        self.spans
            .push(Span::styled(text.replace('\n', " "), style));
    }

    /// Emit pending inline content, if any, as a new block of rows.
    fn flush_block(&mut self) {
        if !self.spans.is_empty() {
            self.flush_line();
        }
    }

    /// Emit pending inline content as rows, even when it is empty.
    fn flush_line(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        let (first, rest) = self.prefixes();
        if self.pre {
            let mut row = vec![Span::raw(first)];
            row.extend(spans);
            self.lines.push(Line::from(row));
            return;
        }
        let avail = self
            .width
            .saturating_sub(first.width().max(rest.width()))
            .max(1);
        for (idx, row_spans) in wrap_spans(spans, avail).into_iter().enumerate() {
            let prefix = if idx == 0 { first.clone() } else { rest.clone() };
            let mut row = vec![Span::styled(prefix, self.prefix_style())];
            row.extend(row_spans);
            self.lines.push(Line::from(row));
        }
    }

    fn prefix_style(&self) -> Style {
        if self.quote_depth > 0 {
            self.palette.quote
        } else {
            Style::default()
        }
    }

    /// A blank separator row, never doubled.
    fn blank(&mut self) {
        if self.lines.last().is_none_or(is_blank) {
            return;
        }
        let prefix = self.quote_prefix();
        self.lines
            .push(Line::styled(prefix.trim_end().to_string(), self.palette.quote));
    }

    fn emit_table(&mut self, table: TableState) {
        let columns = table.rows.iter().map(|(row, _)| row.len()).max().unwrap_or(0);
        if columns == 0 {
            return;
        }
        let mut widths = vec![1; columns];
        for (row, _) in &table.rows {
            for (col, cell) in row.iter().enumerate() {
                widths[col] = widths[col].max(cell.width());
            }
        }
        let prefix = format!("{}{}", self.quote_prefix(), self.list_indent());
        let border = |left: &str, mid: &str, right: &str| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{prefix}{left}{}{right}", inner.join(mid))
        };

        self.lines
            .push(Line::styled(border("┌", "┬", "┐"), self.palette.rule));
        let header_rows = table.rows.iter().filter(|(_, head)| *head).count();
        for (idx, (row, head)) in table.rows.iter().enumerate() {
            let cell_style = if *head {
                Style::new().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::raw(prefix.clone()),
                Span::styled("│", self.palette.rule),
            ];
            for (col, width) in widths.iter().enumerate() {
                let cell = row.get(col).map_or("", String::as_str);
                let pad = width.saturating_sub(cell.width());
                spans.push(Span::styled(
                    format!(" {cell}{} ", " ".repeat(pad)),
                    cell_style,
                ));
                spans.push(Span::styled("│", self.palette.rule));
            }
            self.lines.push(Line::from(spans));
            if header_rows > 0 && idx + 1 == header_rows {
                self.lines
                    .push(Line::styled(border("├", "┼", "┤"), self.palette.rule));
            }
        }
        self.lines
            .push(Line::styled(border("└", "┴", "┘"), self.palette.rule));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if let Some(table) = self.table.take() {
            self.emit_table(table);
        }
        self.flush_block();
        while self.lines.last().is_some_and(is_blank) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Empty apart from quote bars.
fn is_blank(line: &Line) -> bool {
    line.spans
        .iter()
        .all(|span| span.content.chars().all(|c| c == '│' || c.is_whitespace()))
}

/// Lay out `html` as styled rows at most `width` columns wide.
pub fn html_to_lines(html: &str, width: usize, palette: &Palette) -> Vec<Line<'static>> {
    let mut layout = HtmlLayout::new(palette, width);
    for token in tokenize(html) {
        match token {
            Token::Open { name, attrs } => layout.open(&name, attrs),
            Token::Close(name) => layout.close(&name),
            Token::Text(text) => layout.text(text),
        }
    }
    layout.finish()
}

/// The raw HTML string, hard-wrapped at `width` columns.
pub fn source_lines(html: &str, width: usize, palette: &Palette) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for line in html.lines() {
        let mut row = String::new();
        let mut used = 0;
        for ch in line.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                lines.push(Line::styled(std::mem::take(&mut row), palette.markup));
                used = 0;
            }
            row.push(ch);
            used += w;
        }
        lines.push(Line::styled(row, palette.markup));
    }
    lines
}

/// Runs of whitespace and non-whitespace, in order.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            words.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        words.push(&text[start..]);
    }
    words
}

fn push_piece(row: &mut Vec<Span<'static>>, piece: &str, style: Style) {
    if let Some(last) = row.last_mut()
        && last.style == style
    {
        last.content.to_mut().push_str(piece);
    } else {
        row.push(Span::styled(piece.to_string(), style));
    }
}

/// Word-wrap styled spans into rows of at most `width` columns.
///
/// Words longer than a row are split between characters.
fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut rows = vec![Vec::new()];
    let mut used = 0;
    for span in spans {
        let style = span.style;
        for word in split_words(&span.content) {
            let w = word.width();
            if word.starts_with(char::is_whitespace) {
                if used == 0 {
                    continue;
                }
                if used + w > width {
                    rows.push(Vec::new());
                    used = 0;
                    continue;
                }
                if let Some(row) = rows.last_mut() {
                    push_piece(row, word, style);
                }
                used += w;
                continue;
            }
            if used > 0 && used + w > width {
                rows.push(Vec::new());
                used = 0;
            }
            if w <= width {
                if let Some(row) = rows.last_mut() {
                    push_piece(row, word, style);
                }
                used += w;
                continue;
            }
            let mut chunk = String::new();
            for ch in word.chars() {
                let cw = ch.width().unwrap_or(0);
                if used + cw > width && used > 0 {
                    if let Some(row) = rows.last_mut() {
                        push_piece(row, &chunk, style);
                    }
                    chunk.clear();
                    rows.push(Vec::new());
                    used = 0;
                }
                chunk.push(ch);
                used += cw;
            }
            if let Some(row) = rows.last_mut() {
                push_piece(row, &chunk, style);
            }
        }
    }
    for row in &mut rows {
        while let Some(last) = row.last_mut() {
            let kept = last.content.trim_end().len();
            if kept == 0 {
                row.pop();
            } else {
                last.content.to_mut().truncate(kept);
                break;
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{FALLBACK_HTML, Pipeline};
    use crate::ui::style::palette;
    use crate::view::Theme;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn layout(markdown: &str, width: usize) -> Vec<String> {
        let html = Pipeline::default().convert(0, markdown).html;
        html_to_lines(&html, width, &palette(Theme::Dark))
            .iter()
            .map(text_of)
            .collect()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let lines = layout("# Title\n\nBody text.\n", 40);
        assert_eq!(lines, vec!["Title", "", "Body text."]);
    }

    #[test]
    fn test_heading_style_and_bold_span() {
        let p = palette(Theme::Dark);
        let html = Pipeline::default().convert(0, "# Big\n\nsome **bold** text\n").html;
        let lines = html_to_lines(&html, 40, &p);
        let title = lines[0].spans.iter().find(|s| s.content == "Big").unwrap();
        assert!(title.style.add_modifier.contains(Modifier::BOLD));
        let bold = lines[2].spans.iter().find(|s| s.content == "bold").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_lists_get_markers() {
        let lines = layout("- one\n- two\n\n1. first\n2. second\n", 40);
        assert_eq!(lines, vec!["• one", "• two", "", "1. first", "2. second"]);
    }

    #[test]
    fn test_nested_list_is_indented() {
        let lines = layout("- Item 1\n  - Nested item\n", 40);
        assert_eq!(lines, vec!["• Item 1", "  • Nested item"]);
    }

    #[test]
    fn test_task_list_checkboxes() {
        let lines = layout("- [x] done\n- [ ] todo\n", 40);
        assert_eq!(lines, vec!["• [x] done", "• [ ] todo"]);
    }

    #[test]
    fn test_code_block_keeps_lines() {
        let lines = layout("```\nlet a = 1;\n\nlet b = 2;\n```\n", 40);
        assert_eq!(lines, vec!["let a = 1;", "", "let b = 2;"]);
    }

    #[test]
    fn test_blockquote_prefix() {
        let lines = layout("> quoted words\n", 40);
        assert_eq!(lines, vec!["│ quoted words"]);
    }

    #[test]
    fn test_table_layout() {
        let lines = layout("| a | bb |\n|---|---|\n| 1 | 2 |\n", 40);
        assert_eq!(
            lines,
            vec![
                "┌───┬────┐",
                "│ a │ bb │",
                "├───┼────┤",
                "│ 1 │ 2  │",
                "└───┴────┘",
            ]
        );
    }

    #[test]
    fn test_entities_are_decoded() {
        let lines = layout("a < b & \"c\"\n", 40);
        assert_eq!(lines, vec!["a < b & \"c\""]);
        assert_eq!(decode_entities("&#65;&#x42;&bogus;"), "AB&bogus;");
    }

    #[test]
    fn test_paragraph_wraps_at_width() {
        let lines = layout("alpha beta gamma delta\n", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = layout("abcdefghij\n", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_image_and_link() {
        let lines = layout("[site](https://example.com) ![logo](logo.png)\n", 60);
        assert_eq!(lines, vec!["site [image: logo]"]);
    }

    #[test]
    fn test_rule() {
        let lines = layout("above\n\n---\n\nbelow\n", 5);
        assert_eq!(lines, vec!["above", "", "─────", "", "below"]);
    }

    #[test]
    fn test_fallback_markup_is_readable() {
        let lines: Vec<String> = html_to_lines(FALLBACK_HTML, 80, &palette(Theme::Light))
            .iter()
            .map(text_of)
            .collect();
        assert_eq!(lines, vec!["Error: unable to render markdown preview."]);
    }

    #[test]
    fn test_empty_html_has_no_lines() {
        assert!(html_to_lines("", 80, &palette(Theme::Dark)).is_empty());
    }

    #[test]
    fn test_source_lines_hard_wrap() {
        let lines = source_lines("<p>abcdef</p>\n", 5, &palette(Theme::Dark));
        let text: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(text, vec!["<p>ab", "cdef<", "/p>"]);
    }

    #[test]
    fn test_tokenize_keeps_tags_after_stray_angle() {
        let tokens = tokenize("<p>1 <2</p>");
        assert_eq!(
            tokens,
            vec![
                Token::Open {
                    name: "p".to_string(),
                    attrs: ""
                },
                Token::Text("1 "),
                Token::Text("<"),
                Token::Text("2"),
                Token::Close("p".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_stray_angle_before_tag() {
        let tokens = tokenize("a <b<em>x</em>");
        assert_eq!(
            tokens,
            vec![
                Token::Text("a "),
                Token::Text("<"),
                Token::Text("b"),
                Token::Open {
                    name: "em".to_string(),
                    attrs: ""
                },
                Token::Text("x"),
                Token::Close("em".to_string()),
            ]
        );
    }

    #[test]
    fn test_stray_angle_does_not_swallow_paragraph_end() {
        let html = "<p>a <b</p>\n<p>next</p>\n";
        let lines = html_to_lines(html, 40, &palette(Theme::Dark));
        let text: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(text, vec!["a <b", "", "next"]);
    }
}
