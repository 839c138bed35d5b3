//! UI 主题:把颜色集中管理,避免散落在渲染代码里。
//!
//! 默认按真彩色配置;终端能力不足时退化到 256 色或 16 色索引。

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct UiTheme {
    pub fg: Color,
    pub muted_fg: Color,
    pub accent_fg: Color,
    pub header_fg: Color,
    pub focus_border: Color,
    pub inactive_border: Color,
    pub error_fg: Color,
    pub warning_fg: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    /// 聊天气泡:用户与助手各一色。
    pub user_fg: Color,
    pub assistant_fg: Color,
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub tab_inactive_fg: Color,
    pub line_number_fg: Color,
    pub folder_fg: Color,
    pub syntax_comment_fg: Color,
    pub syntax_keyword_fg: Color,
    pub syntax_string_fg: Color,
    pub syntax_number_fg: Color,
    pub syntax_type_fg: Color,
    pub syntax_attribute_fg: Color,
    pub syntax_function_fg: Color,
    pub syntax_variable_fg: Color,
    pub syntax_property_fg: Color,
    pub syntax_regex_fg: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalColorSupport {
    TrueColor,
    Ansi256,
    Ansi16,
}

pub fn detect_terminal_color_support() -> TerminalColorSupport {
    if let Ok(value) = std::env::var("ZSITE_COLOR_SUPPORT") {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "truecolor" | "24bit" | "rgb" => return TerminalColorSupport::TrueColor,
            "256" | "ansi256" => return TerminalColorSupport::Ansi256,
            "16" | "ansi16" | "basic" => return TerminalColorSupport::Ansi16,
            _ => {}
        }
    }

    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    let term = std::env::var("TERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor")
        || colorterm.contains("24bit")
        || colorterm.contains("direct")
        || term.contains("truecolor")
        || term.contains("24bit")
        || term.contains("direct")
    {
        return TerminalColorSupport::TrueColor;
    }

    if term.contains("256color") {
        return TerminalColorSupport::Ansi256;
    }

    TerminalColorSupport::Ansi16
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            fg: Color::Indexed(15),            // White
            muted_fg: Color::Indexed(8),       // DarkGray
            accent_fg: Color::Indexed(3),      // Yellow
            header_fg: Color::Indexed(6),      // Cyan
            focus_border: Color::Indexed(6),   // Cyan
            inactive_border: Color::Indexed(8),
            error_fg: Color::Indexed(1),
            warning_fg: Color::Indexed(3),
            selected_bg: Color::Indexed(8),
            selected_fg: Color::Indexed(15),
            user_fg: Color::Indexed(14),      // LightCyan
            assistant_fg: Color::Indexed(10), // LightGreen
            tab_active_bg: Color::Indexed(8),
            tab_active_fg: Color::Indexed(15),
            tab_inactive_fg: Color::Indexed(8),
            line_number_fg: Color::Indexed(8),
            folder_fg: Color::Indexed(12), // LightBlue
            syntax_comment_fg: Color::Rgb(0x6A, 0x99, 0x55),
            syntax_keyword_fg: Color::Rgb(0x56, 0x9C, 0xD6),
            syntax_string_fg: Color::Rgb(0xCE, 0x91, 0x78),
            syntax_number_fg: Color::Rgb(0xB5, 0xCE, 0xA8),
            syntax_type_fg: Color::Rgb(0x4E, 0xC9, 0xB0),
            syntax_attribute_fg: Color::Rgb(0x4E, 0xC9, 0xB0),
            syntax_function_fg: Color::Rgb(0xDC, 0xDC, 0xAA),
            syntax_variable_fg: Color::Rgb(0x9C, 0xDC, 0xFE),
            syntax_property_fg: Color::Rgb(0x9C, 0xDC, 0xFE),
            syntax_regex_fg: Color::Rgb(0xD1, 0x69, 0x69),
        }
    }
}

impl UiTheme {
    pub fn adapt_to_terminal_capabilities(&mut self) {
        self.apply_color_support(detect_terminal_color_support());
    }

    fn apply_color_support(&mut self, support: TerminalColorSupport) {
        if support == TerminalColorSupport::TrueColor {
            return;
        }

        self.fg = map_color_for_support(self.fg, support);
        self.muted_fg = map_color_for_support(self.muted_fg, support);
        self.accent_fg = map_color_for_support(self.accent_fg, support);
        self.header_fg = map_color_for_support(self.header_fg, support);
        self.focus_border = map_color_for_support(self.focus_border, support);
        self.inactive_border = map_color_for_support(self.inactive_border, support);
        self.error_fg = map_color_for_support(self.error_fg, support);
        self.warning_fg = map_color_for_support(self.warning_fg, support);
        self.selected_bg = map_color_for_support(self.selected_bg, support);
        self.selected_fg = map_color_for_support(self.selected_fg, support);
        self.user_fg = map_color_for_support(self.user_fg, support);
        self.assistant_fg = map_color_for_support(self.assistant_fg, support);
        self.tab_active_bg = map_color_for_support(self.tab_active_bg, support);
        self.tab_active_fg = map_color_for_support(self.tab_active_fg, support);
        self.tab_inactive_fg = map_color_for_support(self.tab_inactive_fg, support);
        self.line_number_fg = map_color_for_support(self.line_number_fg, support);
        self.folder_fg = map_color_for_support(self.folder_fg, support);

        self.apply_non_truecolor_syntax_palette(support);
    }

    fn apply_non_truecolor_syntax_palette(&mut self, support: TerminalColorSupport) {
        self.syntax_comment_fg = syntax_fallback_color(support, 65, 2);
        self.syntax_keyword_fg = syntax_fallback_color(support, 33, 4);
        self.syntax_string_fg = syntax_fallback_color(support, 114, 10);
        self.syntax_number_fg = syntax_fallback_color(support, 108, 10);
        self.syntax_type_fg = syntax_fallback_color(support, 44, 6);
        self.syntax_attribute_fg = syntax_fallback_color(support, 44, 6);
        self.syntax_function_fg = syntax_fallback_color(support, 179, 11);
        self.syntax_variable_fg = syntax_fallback_color(support, 81, 6);
        self.syntax_property_fg = syntax_fallback_color(support, 81, 6);
        self.syntax_regex_fg = syntax_fallback_color(support, 167, 9);
    }

    /// 高亮类别对应的前景色。
    pub fn syntax_color(&self, kind: crate::syntax::HighlightKind) -> Color {
        use crate::syntax::HighlightKind;
        match kind {
            HighlightKind::Comment => self.syntax_comment_fg,
            HighlightKind::String => self.syntax_string_fg,
            HighlightKind::Regex => self.syntax_regex_fg,
            HighlightKind::Keyword | HighlightKind::KeywordControl => self.syntax_keyword_fg,
            HighlightKind::Type => self.syntax_type_fg,
            HighlightKind::Number => self.syntax_number_fg,
            HighlightKind::Function | HighlightKind::Method => self.syntax_function_fg,
            HighlightKind::Variable | HighlightKind::Parameter => self.syntax_variable_fg,
            HighlightKind::Property => self.syntax_property_fg,
            HighlightKind::Attribute => self.syntax_attribute_fg,
        }
    }
}

fn map_color_for_support(color: Color, support: TerminalColorSupport) -> Color {
    match (support, color) {
        (TerminalColorSupport::TrueColor, value) => value,
        (_, Color::Reset) => Color::Reset,
        (TerminalColorSupport::Ansi256, Color::Rgb(r, g, b)) => {
            Color::Indexed(rgb_to_ansi256_index(r, g, b))
        }
        (TerminalColorSupport::Ansi256, value) => value,
        (TerminalColorSupport::Ansi16, Color::Rgb(r, g, b)) => {
            Color::Indexed(rgb_to_ansi16_index(r, g, b))
        }
        (TerminalColorSupport::Ansi16, Color::Indexed(i)) if i <= 15 => Color::Indexed(i),
        (TerminalColorSupport::Ansi16, Color::Indexed(i)) => {
            let (r, g, b) = ansi256_index_to_rgb(i);
            Color::Indexed(rgb_to_ansi16_index(r, g, b))
        }
        (TerminalColorSupport::Ansi16, value) => value,
    }
}

fn syntax_fallback_color(
    support: TerminalColorSupport,
    ansi256_index: u8,
    ansi16_index: u8,
) -> Color {
    match support {
        TerminalColorSupport::TrueColor => {
            unreachable!("syntax fallback palette should only apply in non-truecolor mode")
        }
        TerminalColorSupport::Ansi256 => Color::Indexed(ansi256_index),
        TerminalColorSupport::Ansi16 => Color::Indexed(ansi16_index),
    }
}

fn rgb_to_ansi256_index(r: u8, g: u8, b: u8) -> u8 {
    let mut best_index = 0u8;
    let mut best_distance = u32::MAX;

    for index in 0u16..=255u16 {
        let index_u8 = index as u8;
        let (pr, pg, pb) = ansi256_index_to_rgb(index_u8);
        let distance = color_distance_sq(r, g, b, pr, pg, pb);
        if distance < best_distance {
            best_distance = distance;
            best_index = index_u8;
        }
    }

    best_index
}

fn rgb_to_ansi16_index(r: u8, g: u8, b: u8) -> u8 {
    let mut best_index = 0u8;
    let mut best_distance = u32::MAX;

    for (index, (pr, pg, pb)) in ANSI16_RGB.iter().copied().enumerate() {
        let distance = color_distance_sq(r, g, b, pr, pg, pb);
        if distance < best_distance {
            best_distance = distance;
            best_index = index as u8;
        }
    }

    best_index
}

fn ansi256_index_to_rgb(index: u8) -> (u8, u8, u8) {
    if index <= 15 {
        return ANSI16_RGB[index as usize];
    }

    if (16..=231).contains(&index) {
        let level = [0u8, 95, 135, 175, 215, 255];
        let offset = index - 16;
        let r = level[(offset / 36) as usize];
        let g = level[((offset / 6) % 6) as usize];
        let b = level[(offset % 6) as usize];
        return (r, g, b);
    }

    let gray = 8u8.saturating_add((index - 232).saturating_mul(10));
    (gray, gray, gray)
}

fn color_distance_sq(r1: u8, g1: u8, b1: u8, r2: u8, g2: u8, b2: u8) -> u32 {
    let dr = i32::from(r1) - i32::from(r2);
    let dg = i32::from(g1) - i32::from(g2);
    let db = i32::from(b1) - i32::from(b2);
    (dr * dr + dg * dg + db * db) as u32
}

const ANSI16_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 0, 0),
    (0, 205, 0),
    (205, 205, 0),
    (0, 0, 238),
    (205, 0, 205),
    (0, 205, 205),
    (229, 229, 229),
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::HighlightKind;

    #[test]
    fn ansi256_fallback_converts_rgb_to_indexed_colors() {
        let mut theme = UiTheme::default();
        theme.apply_color_support(TerminalColorSupport::Ansi256);

        assert_eq!(theme.syntax_comment_fg, Color::Indexed(65));
        assert_eq!(theme.syntax_keyword_fg, Color::Indexed(33));
        assert_eq!(theme.syntax_string_fg, Color::Indexed(114));
        assert_eq!(theme.syntax_number_fg, Color::Indexed(108));
        assert_eq!(theme.syntax_type_fg, Color::Indexed(44));
        assert_eq!(theme.syntax_function_fg, Color::Indexed(179));
        assert_eq!(theme.syntax_variable_fg, Color::Indexed(81));
        assert_eq!(theme.syntax_regex_fg, Color::Indexed(167));
    }

    #[test]
    fn ansi16_fallback_converts_rgb_to_indexed_colors() {
        let mut theme = UiTheme::default();
        theme.apply_color_support(TerminalColorSupport::Ansi16);

        assert_eq!(theme.syntax_comment_fg, Color::Indexed(2));
        assert_eq!(theme.syntax_keyword_fg, Color::Indexed(4));
        assert_eq!(theme.syntax_string_fg, Color::Indexed(10));
        assert_eq!(theme.syntax_type_fg, Color::Indexed(6));
        assert_eq!(theme.syntax_function_fg, Color::Indexed(11));
        assert_eq!(theme.syntax_regex_fg, Color::Indexed(9));
    }

    #[test]
    fn truecolor_keeps_rgb_values() {
        let mut theme = UiTheme::default();
        theme.apply_color_support(TerminalColorSupport::TrueColor);
        assert_eq!(theme.syntax_comment_fg, Color::Rgb(0x6A, 0x99, 0x55));
    }

    #[test]
    fn syntax_color_covers_every_kind() {
        let theme = UiTheme::default();
        assert_eq!(
            theme.syntax_color(HighlightKind::Method),
            theme.syntax_function_fg
        );
        assert_eq!(
            theme.syntax_color(HighlightKind::KeywordControl),
            theme.syntax_keyword_fg
        );
        assert_eq!(
            theme.syntax_color(HighlightKind::Parameter),
            theme.syntax_variable_fg
        );
    }
}
