//! Input mode and editable text fields.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys navigate between panels and fields.
    #[default]
    Normal,
    /// Keys edit the focused field.
    Insert,
}

/// Single text field with a grapheme-based cursor.
///
/// `cursor` counts grapheme clusters, not bytes, so "ñ" written as `n` plus a
/// combining tilde is one cursor step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DraftInput {
    text: String,
    cursor: usize,
}

impl DraftInput {
    /// A field pre-filled with `text`, cursor at the end.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut draft = Self::default();
        draft.set_text(text);
        draft
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Byte offset of the cursor in `text()`.
    #[must_use]
    pub fn byte_index(&self) -> usize {
        self.byte_offset(self.cursor)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.grapheme_count();
    }

    pub fn take_text(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    /// Insert at the cursor and move the cursor past the inserted text.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let before = self.grapheme_count();
        let at = self.byte_index();
        self.text.insert_str(at, text);
        // A combining mark can merge into the previous cluster, so measure.
        let after = self.grapheme_count();
        self.cursor = (self.cursor + after.saturating_sub(before)).min(after);
    }

    /// Delete the grapheme before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_index();
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    /// Delete the grapheme under the cursor.
    pub fn delete(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }
        let start = self.byte_index();
        let end = self.byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    /// Delete trailing whitespace, then the word before it.
    pub fn delete_word_backwards(&mut self) {
        let graphemes: Vec<&str> = self.text.graphemes(true).take(self.cursor).collect();
        let is_space = |g: &str| g.chars().all(char::is_whitespace);

        let spaces = graphemes
            .iter()
            .rev()
            .take_while(|g| is_space(g))
            .count();
        let word = graphemes
            .iter()
            .rev()
            .skip(spaces)
            .take_while(|g| !is_space(g))
            .count();

        let start = self.byte_offset(self.cursor - spaces - word);
        let end = self.byte_index();
        self.text.replace_range(start..end, "");
        self.cursor -= spaces + word;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.grapheme_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    fn byte_offset(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}
