//! Single-line text field for formula entry.
//!
//! The cursor counts characters, not bytes. The view scrolls horizontally to
//! keep the cursor visible.

#[derive(Debug, Clone, Default)]
pub struct TextField {
    text: String,
    cursor: usize,
    scroll_offset: usize,
    viewport_width: usize,
}

impl TextField {
    pub fn new(text: &str) -> Self {
        let mut field = Self {
            viewport_width: 40,
            ..Self::default()
        };
        field.set_text(text);
        field
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the content and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.char_count();
        self.ensure_cursor_visible();
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        self.ensure_cursor_visible();
    }

    /// Delete the character before the cursor. Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        self.ensure_cursor_visible();
        true
    }

    /// Delete the character at the cursor. Returns whether anything changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.ensure_cursor_visible();
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
        self.ensure_cursor_visible();
    }

    pub fn home(&mut self) {
        self.cursor = 0;
        self.ensure_cursor_visible();
    }

    pub fn end(&mut self) {
        self.cursor = self.char_count();
        self.ensure_cursor_visible();
    }

    pub fn set_viewport_width(&mut self, width: usize) {
        self.viewport_width = width.max(1);
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        if self.viewport_width == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + self.viewport_width {
            self.scroll_offset = self.cursor + 1 - self.viewport_width;
        }
    }

    /// The visible slice of text and the cursor column within it.
    pub fn visible(&self) -> (String, usize) {
        let shown: String = self
            .text
            .chars()
            .skip(self.scroll_offset)
            .take(self.viewport_width)
            .collect();
        (shown, self.cursor - self.scroll_offset)
    }
}
