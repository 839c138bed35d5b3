//! Tree-sitter 语法高亮,给代码面板用。
//!
//! 一次性解析整份文件,产出逐行的字节区间着色。重叠的节点按
//! 深度裁剪:深的盖浅的,叶子类(注释/字符串/正则/属性)不再下钻。

mod data;
mod js;
mod markup;
mod util;

use ropey::Rope;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tree_sitter::{Node, Parser, Tree};

use self::util::{is_comment_kind, is_regex_kind, is_string_kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    Json,
    Html,
    Css,
}

impl Language {
    /// 按扩展名认语言。认不出来返回 None,面板照常渲染纯文本。
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            "css" => Some(Self::Css),
            _ => None,
        }
    }

    fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript | Self::Jsx => tree_sitter_javascript::language(),
            Self::TypeScript => tree_sitter_typescript::language_typescript(),
            Self::Tsx => tree_sitter_typescript::language_tsx(),
            Self::Json => tree_sitter_json::language(),
            Self::Html => tree_sitter_html::language(),
            Self::Css => tree_sitter_css::language(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Comment,
    String,
    Regex,
    Keyword,
    KeywordControl,
    Type,
    Number,
    Function,
    Method,
    Variable,
    Parameter,
    Property,
    Attribute,
}

impl HighlightKind {
    /// 叶子类整段着色,子节点不再遍历。
    pub const fn is_leaf(self) -> bool {
        matches!(
            self,
            Self::Comment | Self::String | Self::Regex | Self::Attribute
        )
    }
}

/// 行内的字节区间,start/end 相对行首。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub kind: HighlightKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AbsSpan {
    start: usize,
    end: usize,
    kind: HighlightKind,
    depth: usize,
}

/// 整份文件的逐行高亮。解析失败时每行都是空的。
pub fn highlight_lines(language: Language, rope: &Rope) -> Vec<Vec<HighlightSpan>> {
    let total_lines = rope.len_lines().max(1);
    let Some(tree) = parse(language, rope) else {
        return vec![Vec::new(); total_lines];
    };
    let spans = collect_spans(language, &tree, rope);
    project_to_lines(rope, total_lines, &spans)
}

fn parse(language: Language, rope: &Rope) -> Option<Tree> {
    let mut parser = Parser::new();
    parser.set_language(language.grammar()).ok()?;
    let mut cursor = ChunkCursor::new(rope);
    parser.parse_with(&mut |byte_offset, _| cursor.bytes_from(byte_offset), None)
}

/// 让 tree-sitter 直接读 rope 分块,缓存当前块避免重复定位。
struct ChunkCursor<'a> {
    rope: &'a Rope,
    chunk: &'a str,
    start: usize,
    end: usize,
}

impl<'a> ChunkCursor<'a> {
    fn new(rope: &'a Rope) -> Self {
        Self {
            rope,
            chunk: "",
            start: 0,
            end: 0,
        }
    }

    fn bytes_from(&mut self, byte_offset: usize) -> &'a [u8] {
        if byte_offset >= self.rope.len_bytes() {
            return &[];
        }
        if byte_offset < self.start || byte_offset >= self.end {
            let (chunk, chunk_start, _, _) = self.rope.chunk_at_byte(byte_offset);
            self.chunk = chunk;
            self.start = chunk_start;
            self.end = chunk_start + chunk.len();
        }
        &self.chunk.as_bytes()[byte_offset - self.start..]
    }
}

fn collect_spans(language: Language, tree: &Tree, rope: &Rope) -> Vec<AbsSpan> {
    let end_byte = rope.len_bytes();
    let mut stack = vec![(tree.root_node(), 0usize)];
    let mut spans = Vec::new();

    while let Some((node, depth)) = stack.pop() {
        if node.start_byte() >= end_byte {
            continue;
        }

        if let Some(kind) = classify(language, node) {
            spans.push(AbsSpan {
                start: node.start_byte(),
                end: node.end_byte(),
                kind,
                depth,
            });
            if kind.is_leaf() {
                continue;
            }
        }

        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push((child, depth.saturating_add(1)));
            }
        }
    }

    normalize_overlapping_spans(spans, end_byte)
}

fn classify(language: Language, node: Node<'_>) -> Option<HighlightKind> {
    let kind = node.kind();

    if is_comment_kind(kind) {
        return Some(HighlightKind::Comment);
    }
    if is_regex_kind(kind) {
        return Some(HighlightKind::Regex);
    }
    if is_string_kind(kind) {
        return Some(HighlightKind::String);
    }
    if kind.contains("number") || kind.contains("integer") || kind.contains("float") {
        return Some(HighlightKind::Number);
    }
    if matches!(kind, "predefined_type" | "type_identifier") {
        return Some(HighlightKind::Type);
    }

    let classified = match language {
        Language::JavaScript | Language::Jsx | Language::TypeScript | Language::Tsx => {
            js::classify(node)
        }
        Language::Json => None,
        Language::Html => markup::classify_html(node),
        Language::Css => markup::classify_css(node),
    };
    if classified.is_some() {
        return classified;
    }

    if is_keyword(language, kind) {
        return Some(HighlightKind::Keyword);
    }
    None
}

fn is_keyword(language: Language, kind: &str) -> bool {
    match language {
        Language::JavaScript | Language::Jsx | Language::TypeScript | Language::Tsx => {
            js::is_keyword(kind)
        }
        Language::Json => data::is_json_keyword(kind),
        Language::Html | Language::Css => false,
    }
}

/// 扫描线消重叠:同一段字节只留最深(最具体)的那个 kind。
fn normalize_overlapping_spans(spans: Vec<AbsSpan>, end_byte: usize) -> Vec<AbsSpan> {
    if spans.is_empty() || end_byte == 0 {
        return Vec::new();
    }

    let mut keys = Vec::with_capacity(spans.len());
    let mut events = Vec::with_capacity(spans.len().saturating_mul(2));
    for (seq, span) in spans.into_iter().enumerate() {
        let clipped_end = span.end.min(end_byte);
        if span.start >= clipped_end {
            continue;
        }
        let id = keys.len();
        keys.push(ActiveSpanKey::from_span(span, seq));
        events.push(SpanEvent {
            pos: span.start,
            kind: SpanEventKind::Start,
            id,
        });
        events.push(SpanEvent {
            pos: clipped_end,
            kind: SpanEventKind::End,
            id,
        });
    }
    if events.is_empty() {
        return Vec::new();
    }

    // 同一位置先处理 End 再处理 Start,零长区间不会出现。
    events.sort_by(|a, b| {
        a.pos
            .cmp(&b.pos)
            .then_with(|| match (a.kind, b.kind) {
                (SpanEventKind::End, SpanEventKind::Start) => Ordering::Less,
                (SpanEventKind::Start, SpanEventKind::End) => Ordering::Greater,
                _ => Ordering::Equal,
            })
            .then(a.id.cmp(&b.id))
    });

    let mut active: BTreeSet<ActiveSpanKey> = BTreeSet::new();
    let mut flattened: Vec<AbsSpan> = Vec::with_capacity(events.len() / 2);
    let mut prev_pos = events[0].pos;

    for event in events {
        if prev_pos < event.pos {
            if let Some(top) = active.iter().next_back() {
                flattened.push(AbsSpan {
                    start: prev_pos,
                    end: event.pos,
                    kind: top.kind,
                    depth: top.depth,
                });
            }
            prev_pos = event.pos;
        }
        let key = keys[event.id];
        match event.kind {
            SpanEventKind::Start => {
                active.insert(key);
            }
            SpanEventKind::End => {
                active.remove(&key);
            }
        }
    }

    merge_adjacent_abs_spans(&mut flattened);
    flattened
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanEventKind {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpanEvent {
    pos: usize,
    kind: SpanEventKind,
    id: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveSpanKey {
    depth: usize,
    len: usize,
    start: usize,
    end: usize,
    seq: usize,
    kind: HighlightKind,
}

impl ActiveSpanKey {
    fn from_span(span: AbsSpan, seq: usize) -> Self {
        Self {
            depth: span.depth,
            len: span.end.saturating_sub(span.start),
            start: span.start,
            end: span.end,
            seq,
            kind: span.kind,
        }
    }
}

impl Ord for ActiveSpanKey {
    // 深度优先,同深度短的赢。next_back 取到的就是该段的胜者。
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth
            .cmp(&other.depth)
            .then_with(|| other.len.cmp(&self.len))
            .then_with(|| other.start.cmp(&self.start))
            .then_with(|| other.end.cmp(&self.end))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ActiveSpanKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn merge_adjacent_abs_spans(spans: &mut Vec<AbsSpan>) {
    if spans.len() <= 1 {
        return;
    }
    let mut out: Vec<AbsSpan> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        if let Some(prev) = out.last_mut() {
            if prev.kind == span.kind && prev.depth == span.depth && span.start <= prev.end {
                prev.end = prev.end.max(span.end);
                continue;
            }
        }
        out.push(span);
    }
    *spans = out;
}

fn project_to_lines(rope: &Rope, total_lines: usize, spans: &[AbsSpan]) -> Vec<Vec<HighlightSpan>> {
    let mut per_line = vec![Vec::new(); total_lines];

    for span in spans {
        if span.start >= span.end {
            continue;
        }
        let first_line = rope.byte_to_line(span.start.min(rope.len_bytes()));
        let last_line = rope.byte_to_line(span.end.saturating_sub(1).min(rope.len_bytes()));

        for line in first_line..=last_line.min(total_lines.saturating_sub(1)) {
            let line_start = rope.line_to_byte(line);
            let line_end = if line + 1 < total_lines {
                rope.line_to_byte(line + 1)
            } else {
                rope.len_bytes()
            };
            let s = span.start.max(line_start);
            let e = span.end.min(line_end);
            if s >= e {
                continue;
            }
            per_line[line].push(HighlightSpan {
                start: s - line_start,
                end: e - line_start,
                kind: span.kind,
            });
        }
    }

    for line_spans in &mut per_line {
        merge_adjacent_line_spans(line_spans);
    }
    per_line
}

fn merge_adjacent_line_spans(spans: &mut Vec<HighlightSpan>) {
    if spans.len() <= 1 {
        return;
    }
    spans.sort_by_key(|span| (span.start, span.end));
    let mut out: Vec<HighlightSpan> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        if let Some(prev) = out.last_mut() {
            if prev.kind == span.kind && span.start <= prev.end {
                prev.end = prev.end.max(span.end);
                continue;
            }
        }
        out.push(span);
    }
    *spans = out;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(language: Language, text: &str) -> Vec<Vec<HighlightSpan>> {
        highlight_lines(language, &Rope::from_str(text))
    }

    fn kinds(spans: &[HighlightSpan]) -> Vec<HighlightKind> {
        spans.iter().map(|span| span.kind).collect()
    }

    #[test]
    fn language_detection_by_extension() {
        assert_eq!(Language::from_path("src/App.js"), Some(Language::JavaScript));
        assert_eq!(Language::from_path("src/App.jsx"), Some(Language::Jsx));
        assert_eq!(Language::from_path("src/main.tsx"), Some(Language::Tsx));
        assert_eq!(Language::from_path("src/util.ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_path("package.json"), Some(Language::Json));
        assert_eq!(Language::from_path("public/index.html"), Some(Language::Html));
        assert_eq!(Language::from_path("src/App.css"), Some(Language::Css));
        assert_eq!(Language::from_path("README.md"), None);
        assert_eq!(Language::from_path("Makefile"), None);
    }

    #[test]
    fn javascript_declaration_gets_keyword_variable_number() {
        let lines = lines_of(Language::JavaScript, "const answer = 42;\n");
        let spans = &lines[0];
        assert!(spans
            .iter()
            .any(|s| s.kind == HighlightKind::Keyword && s.start == 0 && s.end == 5));
        assert!(kinds(spans).contains(&HighlightKind::Variable));
        assert!(kinds(spans).contains(&HighlightKind::Number));
    }

    #[test]
    fn member_call_is_a_method() {
        let lines = lines_of(Language::JavaScript, "console.log('hi');\n");
        assert!(kinds(&lines[0]).contains(&HighlightKind::Method));
        assert!(kinds(&lines[0]).contains(&HighlightKind::String));
    }

    #[test]
    fn spans_are_sorted_and_disjoint() {
        let source = "function greet(name) { return `hey ${name}`; }\n";
        let lines = lines_of(Language::JavaScript, source);
        for line_spans in &lines {
            for pair in line_spans.windows(2) {
                assert!(pair[0].end <= pair[1].start, "overlap: {pair:?}");
            }
            for span in line_spans {
                assert!(span.start < span.end);
            }
        }
    }

    #[test]
    fn multiline_comment_is_projected_per_line() {
        let lines = lines_of(Language::JavaScript, "/* one\ntwo */\nlet x = 1;\n");
        assert_eq!(kinds(&lines[0]), vec![HighlightKind::Comment]);
        assert_eq!(kinds(&lines[1]), vec![HighlightKind::Comment]);
        assert!(kinds(&lines[2]).contains(&HighlightKind::Keyword));
    }

    #[test]
    fn json_literals_are_keywords() {
        let lines = lines_of(Language::Json, "{\"enabled\": true}\n");
        let spans = &lines[0];
        assert!(kinds(spans).contains(&HighlightKind::String));
        assert!(kinds(spans).contains(&HighlightKind::Keyword));
    }

    #[test]
    fn html_tag_attribute_and_value() {
        let lines = lines_of(Language::Html, "<div class=\"box\">hi</div>\n");
        let spans = &lines[0];
        assert!(kinds(spans).contains(&HighlightKind::Keyword));
        assert!(kinds(spans).contains(&HighlightKind::Attribute));
        assert!(kinds(spans).contains(&HighlightKind::String));
    }

    #[test]
    fn css_selector_property_and_color() {
        let lines = lines_of(Language::Css, "body { color: #fff; }\n");
        let spans = &lines[0];
        assert!(kinds(spans).contains(&HighlightKind::Type));
        assert!(kinds(spans).contains(&HighlightKind::Variable));
        assert!(kinds(spans).contains(&HighlightKind::Number));
    }

    #[test]
    fn typescript_predefined_type() {
        let lines = lines_of(Language::TypeScript, "let count: number = 1;\n");
        assert!(kinds(&lines[0]).contains(&HighlightKind::Type));
    }

    #[test]
    fn blank_document_has_one_empty_line() {
        let lines = lines_of(Language::JavaScript, "");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
    }

    #[test]
    fn line_count_matches_rope() {
        let source = "let a = 1;\nlet b = 2;\n";
        let rope = Rope::from_str(source);
        let lines = highlight_lines(Language::JavaScript, &rope);
        assert_eq!(lines.len(), rope.len_lines());
    }
}
