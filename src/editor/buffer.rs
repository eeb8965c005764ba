use ropey::Rope;

use crate::sync::TextSurface;

/// Cursor position in the editor buffer.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    /// Column to return to on vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    pub const fn new() -> Self {
        Self::at(0, 0)
    }

    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
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

/// The WKT text the user edits, backed by a rope.
#[derive(Clone, Default)]
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line without its line break.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Characters on a line, excluding its line break.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole buffer and park the cursor at the end.
    pub fn replace(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.move_to_end();
    }

    pub fn clear(&mut self) {
        self.rope = Rope::new();
        self.cursor = Cursor::new();
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line();
            return;
        }
        self.rope.insert_char(self.cursor_char_idx(), ch);
        self.cursor.set_col(self.cursor.col + 1);
    }

    /// Insert pasted text at the cursor and move past it.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let start = self.cursor_char_idx();
        self.rope.insert(start, s);
        self.set_cursor_char_idx(start + s.chars().count());
    }

    /// Split the current line at the cursor (Enter).
    pub fn split_line(&mut self) {
        self.rope.insert_char(self.cursor_char_idx(), '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        self.rope.remove(idx - 1..idx);
        self.set_cursor_char_idx(idx - 1);
        true
    }

    /// Delete the character at the cursor (Delete).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(idx..=idx);
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                let idx = self.cursor_char_idx();
                if idx > 0 {
                    self.set_cursor_char_idx(idx - 1);
                }
            }
            Direction::Right => {
                let idx = self.cursor_char_idx();
                if idx < self.rope.len_chars() {
                    self.set_cursor_char_idx(idx + 1);
                }
            }
            Direction::Up if self.cursor.line > 0 => {
                self.cursor.line -= 1;
                self.cursor.col = self.cursor.col_memory.min(self.line_len(self.cursor.line));
            }
            Direction::Down if self.cursor.line + 1 < self.line_count() => {
                self.cursor.line += 1;
                self.cursor.col = self.cursor.col_memory.min(self.line_len(self.cursor.line));
            }
            Direction::Up | Direction::Down => {}
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_end(&mut self) {
        self.cursor.set_col(self.line_len(self.cursor.line));
    }

    /// Jump to the start of the previous number or keyword (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        let chars: Vec<char> = self.rope.chars().collect();
        let mut idx = self.cursor_char_idx();
        while idx > 0 && !is_word_char(chars[idx - 1]) {
            idx -= 1;
        }
        while idx > 0 && is_word_char(chars[idx - 1]) {
            idx -= 1;
        }
        self.set_cursor_char_idx(idx);
    }

    /// Jump to the start of the next number or keyword (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let chars: Vec<char> = self.rope.chars().collect();
        let mut idx = self.cursor_char_idx();
        while idx < chars.len() && is_word_char(chars[idx]) {
            idx += 1;
        }
        while idx < chars.len() && !is_word_char(chars[idx]) {
            idx += 1;
        }
        self.set_cursor_char_idx(idx);
    }

    /// Move the cursor to a line and column, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.cursor.set_col(col.min(self.line_len(self.cursor.line)));
    }

    pub const fn move_to_start(&mut self) {
        self.cursor = Cursor::new();
    }

    pub fn move_to_end(&mut self) {
        self.set_cursor_char_idx(self.rope.len_chars());
    }

    fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    fn set_cursor_char_idx(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        self.cursor.line = line;
        self.cursor.set_col(idx - self.rope.line_to_char(line));
    }
}

/// Numbers and keywords are words; parens, commas and spaces separate them.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '-' | '_')
}

impl TextSurface for EditorBuffer {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn set_text(&mut self, text: &str) {
        self.replace(text);
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_preserves_lines() {
        let buf = EditorBuffer::from_text("POLYGON ((\n0 0, 1 0))");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some("0 0, 1 0))".to_string()));
        assert_eq!(buf.line_at(2), None);
    }

    #[test]
    fn test_insert_char_advances_cursor() {
        let mut buf = EditorBuffer::from_text("POINT (1 2)");
        buf.move_to(0, 7);
        buf.insert_char('-');
        assert_eq!(buf.text(), "POINT (-1 2)");
        assert_eq!(buf.cursor(), Cursor::at(0, 8));
    }

    #[test]
    fn test_insert_newline_char_splits_line() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_char('\n');
        assert_eq!(buf.text(), "a\nb");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_insert_str_moves_past_multiline_paste() {
        let mut buf = EditorBuffer::empty();
        buf.insert_str("POINT\n(1 2)");
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
        assert_eq!(buf.text(), "POINT\n(1 2)");
    }

    #[test]
    fn test_replace_parks_cursor_at_end() {
        let mut buf = EditorBuffer::from_text("old");
        buf.replace("POINT(10 20)");
        assert_eq!(buf.text(), "POINT(10 20)");
        assert_eq!(buf.cursor(), Cursor::at(0, 12));
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut buf = EditorBuffer::from_text("POINT (1 2)");
        buf.move_end();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), Cursor::new());
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("POINT\n(1 2)");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "POINT(1 2)");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("x");
        assert!(!buf.delete_back());
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("x");
        buf.move_end();
        assert!(!buf.delete_forward());
        buf.move_home();
        assert!(buf.delete_forward());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_multibyte_columns_count_chars() {
        let mut buf = EditorBuffer::from_text("é1");
        buf.move_end();
        assert_eq!(buf.cursor().col, 2);
        buf.delete_back();
        assert_eq!(buf.text(), "é");
    }

    #[test]
    fn test_vertical_movement_remembers_column() {
        let mut buf = EditorBuffer::from_text("POINT (1 2)\n,\nPOINT (3 4)");
        buf.move_to(0, 8);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 1);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Cursor::at(2, 8));
    }

    #[test]
    fn test_left_right_wrap_lines() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_word_movement_steps_over_numbers() {
        let mut buf = EditorBuffer::from_text("POINT (-10.5 20)");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 7, "start of -10.5");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 13, "start of 20");
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 7);
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(9, 99);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_text_surface_set_text_replaces() {
        let mut buf = EditorBuffer::from_text("a");
        TextSurface::set_text(&mut buf, "b");
        assert_eq!(TextSurface::text(&buf), "b");
    }
}
