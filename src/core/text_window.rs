//! 固定宽度区域里的单行文本横向滚动窗口。
//!
//! 所有索引都是 UTF-8 字节偏移,窗口边界永远落在字符边界上。

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn clamp_to_char_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn cursor_visible_end(text: &str, cursor: usize) -> usize {
    let cursor = clamp_to_char_boundary(text, cursor);
    match text[cursor..].chars().next() {
        Some(ch) => cursor + ch.len_utf8(),
        None => cursor,
    }
}

/// 计算窗口 `[start, end)`:显示宽度不超过 `available_width`,
/// 且 `cursor` 一定落在窗口里。
pub fn window(text: &str, cursor: usize, available_width: usize) -> (usize, usize) {
    let cursor = clamp_to_char_boundary(text, cursor);
    if available_width == 0 || text.is_empty() {
        return (cursor, cursor);
    }

    let start = compute_window_start(text, cursor, available_width);
    let end = start + truncate_to_width(&text[start..], available_width);
    (start, end.min(text.len()))
}

/// 保证光标可见的窗口起点。前缀放得下就从头显示,
/// 否则从光标往回数,填满可用宽度为止。
pub fn compute_window_start(text: &str, cursor: usize, available_width: usize) -> usize {
    let cursor = clamp_to_char_boundary(text, cursor);
    if available_width == 0 {
        return cursor;
    }

    let prefix = &text[..cursor_visible_end(text, cursor)];
    if UnicodeWidthStr::width(prefix) <= available_width {
        return 0;
    }

    let mut start = cursor;
    let mut used = 0usize;
    for (idx, ch) in prefix.char_indices().rev() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > available_width {
            break;
        }
        used += w;
        start = idx;
    }
    start
}

/// 从头数最多能放进 `max_width` 列的字节数。
pub fn truncate_to_width(s: &str, max_width: usize) -> usize {
    let mut used = 0usize;
    for (idx, ch) in s.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max_width {
            return idx;
        }
        used += w;
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_handles_empty_and_zero_width() {
        assert_eq!(window("", 0, 0), (0, 0));
        assert_eq!(window("", 10, 0), (0, 0));

        let text = "abc";
        assert_eq!(window(text, 0, 0), (0, 0));
        assert_eq!(window(text, 2, 0), (2, 2));
        assert_eq!(window(text, 10, 0), (3, 3));
    }

    #[test]
    fn window_keeps_cursor_visible_in_ascii() {
        let text = "abcdefghij";
        assert_eq!(window(text, 0, 5), (0, 5));
        assert_eq!(window(text, 3, 5), (0, 5));
        assert_eq!(window(text, 6, 5), (2, 7));
        assert_eq!(window(text, 10, 5), (5, 10));
    }

    #[test]
    fn window_respects_wide_char_boundaries() {
        let text = "你好世界";
        let (start, end) = window(text, text.len(), 4);
        assert_eq!((start, end), (6, 12));
        assert!(text.is_char_boundary(start));
        assert!(text.is_char_boundary(end));
        assert_eq!(&text[start..end], "世界");
    }

    #[test]
    fn truncate_does_not_split_utf8() {
        let text = "éé";
        let end = truncate_to_width(text, 1);
        assert_eq!(end, "é".len());
        assert!(text.is_char_boundary(end));

        assert_eq!(truncate_to_width("", 5), 0);
        assert_eq!(truncate_to_width("abc", 0), 0);
        assert_eq!(truncate_to_width("abc", 10), 3);
    }

    #[test]
    fn combining_marks_stay_on_boundaries() {
        let text = "e\u{301}e\u{301}e\u{301}";
        let cursor = text.len();
        let start = compute_window_start(text, cursor, 1);
        assert!(text.is_char_boundary(start));
        let (s, e) = window(text, cursor, 1);
        assert!(text.is_char_boundary(s));
        assert!(text.is_char_boundary(e));
        assert!(s <= cursor);
    }

    #[test]
    fn clamp_lands_on_boundaries() {
        let text = "你好";
        assert_eq!(clamp_to_char_boundary(text, 1), 0);
        assert_eq!(clamp_to_char_boundary(text, 3), 3);
        assert_eq!(clamp_to_char_boundary(text, 100), text.len());
    }
}
