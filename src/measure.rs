use unicode_width::UnicodeWidthStr;

/// Fixed-advance text measurement for surfaces without a font engine.
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub char_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        // Roughly a bold 14px sans-serif
        Self { char_width: 8.0 }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }
}
