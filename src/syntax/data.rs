pub(super) fn is_json_keyword(kind: &str) -> bool {
    matches!(kind, "true" | "false" | "null")
}
