// Text fitting helpers
//
// Widths are terminal columns (unicode-width), not bytes or chars.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `width` columns, marking the cut with "…"
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Slice of a single-line value that keeps the cursor visible
///
/// Returns the visible text and the cursor column inside it. When the value
/// is wider than `width`, the window scrolls so the cursor sits at the right
/// edge.
pub fn visible_window(value: &str, cursor: usize, width: usize) -> (String, usize) {
    let chars: Vec<char> = value.chars().collect();
    let cursor = cursor.min(chars.len());
    if width == 0 {
        return (String::new(), 0);
    }

    // Leave one column for the cursor itself
    let budget = width - 1;
    let mut start = cursor;
    let mut before = 0;
    while start > 0 {
        let w = chars[start - 1].width().unwrap_or(0);
        if before + w > budget {
            break;
        }
        before += w;
        start -= 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for c in &chars[start..] {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        visible.push(*c);
        used += w;
    }
    (visible, before)
}
