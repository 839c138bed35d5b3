use tree_sitter::Node;

use super::HighlightKind;

pub(super) fn classify_html(node: Node<'_>) -> Option<HighlightKind> {
    match node.kind() {
        "tag_name" => Some(HighlightKind::Keyword),
        "attribute_name" => Some(HighlightKind::Attribute),
        "attribute_value" | "quoted_attribute_value" => Some(HighlightKind::String),
        _ => None,
    }
}

pub(super) fn classify_css(node: Node<'_>) -> Option<HighlightKind> {
    match node.kind() {
        "tag_name"
        | "class_name"
        | "id_name"
        | "pseudo_class_selector"
        | "pseudo_element_selector" => Some(HighlightKind::Type),
        "property_name" | "feature_name" => Some(HighlightKind::Variable),
        "color_value" | "integer_value" | "float_value" => Some(HighlightKind::Number),
        "at_keyword" | "important" => Some(HighlightKind::Keyword),
        "function_name" => Some(HighlightKind::Function),
        _ => None,
    }
}
