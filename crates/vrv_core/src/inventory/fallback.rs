use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::types::{InventoryItem, InventoryResponse};

const SCANNED_FIELDS: [&str; 6] = [
    "id",
    "name",
    "description",
    "imageUrl",
    "multimediaUrl",
    "origin",
];
const LOG_PREVIEW_CHARS: usize = 120;

struct ScannerPatterns {
    total: Regex,
    items_span: Regex,
    numeric_key_wrapper: Regex,
    fields: Vec<FieldPatterns>,
}

struct FieldPatterns {
    key: &'static str,
    // Tried in order; the first match wins.
    candidates: [Regex; 3],
}

fn patterns() -> &'static ScannerPatterns {
    static PATTERNS: OnceLock<ScannerPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ScannerPatterns {
        total: compile(r#""total"\s*:\s*(\d+)"#),
        items_span: compile(r#"(?s)"items"\s*:\s*\[(.*?)\]"#),
        numeric_key_wrapper: compile(r#"(?s)"\d+"\s*:\s*\{(.*)\}\s*$"#),
        fields: SCANNED_FIELDS
            .into_iter()
            .map(|key| FieldPatterns {
                key,
                candidates: [
                    compile(&format!(r#""{key}"\s*:\s*"([^"]*?)""#)),
                    compile(&format!(r#""{key}"\s*:\s*([^,}}\s]+)"#)),
                    compile(&format!(r#""{key}"\s*:\s*"(.*?)"[,}}]"#)),
                ],
            })
            .collect(),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in inventory scanner pattern should compile")
}

pub(crate) fn scan_inventory(raw: &str) -> InventoryResponse {
    let patterns = patterns();
    let mut response = InventoryResponse {
        total: extract_total(patterns, raw),
        ..InventoryResponse::default()
    };

    let Some(items_span) = patterns
        .items_span
        .captures(raw)
        .and_then(|captures| captures.get(1))
    else {
        debug!("inventory_scan_items_array_missing");
        return response;
    };

    let fragments = split_top_level(items_span.as_str());
    debug!(fragment_count = fragments.len(), "inventory_scan_split");

    for fragment in fragments {
        let unwrapped = unwrap_numeric_key(patterns, fragment);
        let item = extract_item(patterns, &unwrapped);
        if item.is_usable() {
            debug!(id = %item.id, name = %item.name, "inventory_scan_item_accepted");
            response.items.push(item);
        } else {
            debug!(
                fragment = %preview(fragment),
                "inventory_scan_item_skipped_missing_id_or_name"
            );
        }
    }

    response
}

fn extract_total(patterns: &ScannerPatterns, raw: &str) -> u64 {
    patterns
        .total
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Splits the inner text of an array on commas that sit outside any braces.
///
/// Only braces are tracked; brackets and quotes are not, so a `{` or `}` inside a
/// string value shifts the depth.
pub(crate) fn split_top_level(content: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;

    for (index, ch) in content.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            ',' if depth == 0 => {
                push_fragment(&mut fragments, &content[start..index]);
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    if start < content.len() {
        push_fragment(&mut fragments, &content[start..]);
    }

    fragments
}

fn push_fragment<'a>(fragments: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed);
    }
}

fn unwrap_numeric_key(patterns: &ScannerPatterns, fragment: &str) -> String {
    match patterns
        .numeric_key_wrapper
        .captures(fragment)
        .and_then(|captures| captures.get(1))
    {
        Some(inner) => {
            debug!(fragment = %preview(fragment), "inventory_scan_unwrapped_numeric_key");
            format!("{{{}}}", inner.as_str())
        }
        None => fragment.to_string(),
    }
}

fn extract_item(patterns: &ScannerPatterns, fragment: &str) -> InventoryItem {
    let mut item = InventoryItem::default();
    for field in &patterns.fields {
        let value = extract_field(field, fragment);
        match field.key {
            "id" => item.id = value,
            "name" => item.name = value,
            "description" => item.description = value,
            "imageUrl" => item.image_url = value,
            "multimediaUrl" => item.multimedia_url = value,
            "origin" => item.origin = value,
            _ => {}
        }
    }
    item
}

fn extract_field(field: &FieldPatterns, fragment: &str) -> String {
    for (index, candidate) in field.candidates.iter().enumerate() {
        if let Some(value) = candidate
            .captures(fragment)
            .and_then(|captures| captures.get(1))
        {
            debug!(key = field.key, pattern = index + 1, "inventory_scan_field_matched");
            return value.as_str().trim().to_string();
        }
    }
    String::new()
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(response: &InventoryResponse) -> Vec<&str> {
        response.items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn split_respects_nested_braces() {
        let content = r#"{"id":"a","meta":{"x":1,"y":2}}, {"id":"b"}"#;
        assert_eq!(
            split_top_level(content),
            vec![r#"{"id":"a","meta":{"x":1,"y":2}}"#, r#"{"id":"b"}"#]
        );
    }

    #[test]
    fn split_keeps_tail_and_drops_blank_fragments() {
        assert_eq!(
            split_top_level(r#" {"a":1} ,, {"b":2}"#),
            vec![r#"{"a":1}"#, r#"{"b":2}"#]
        );
        assert!(split_top_level("   ").is_empty());
        assert!(split_top_level("").is_empty());
    }

    #[test]
    fn scan_reads_total_and_items() {
        let raw = r#"{"total": 7, "items": [{"id":"a1","name":"Sword"},{"id":"a2","name":"Shield"}]}"#;
        let response = scan_inventory(raw);
        assert_eq!(response.total, 7);
        assert_eq!(ids(&response), vec!["a1", "a2"]);
        assert!(!response.has_more);
    }

    #[test]
    fn scan_defaults_total_when_absent() {
        let response = scan_inventory(r#"{"items":[{"id":"a","name":"A"}]}"#);
        assert_eq!(response.total, 0);
        assert_eq!(response.item_count(), 1);
    }

    #[test]
    fn scan_unwraps_numeric_key_items() {
        let raw = r#"{"total":2,"items":[{"0":{"id":"x","name":"Potion"}},{"1":{"id":"y","name":"Elixir"}}]}"#;
        let response = scan_inventory(raw);
        assert_eq!(ids(&response), vec!["x", "y"]);
        assert_eq!(response.items[1].name, "Elixir");
    }

    #[test]
    fn scan_handles_multiline_payloads() {
        let raw = "{\n  \"total\": 1,\n  \"items\": [\n    {\n      \"id\": \"m1\",\n      \"name\": \"Map\",\n      \"origin\": \"store\"\n    }\n  ]\n}";
        let response = scan_inventory(raw);
        assert_eq!(ids(&response), vec!["m1"]);
        assert_eq!(response.items[0].origin, "store");
    }

    #[test]
    fn field_patterns_apply_in_order() {
        let raw = r#"{"items":[{"id": 42, "name":"Crate", "imageUrl":"https://cdn/a.png"}]}"#;
        let response = scan_inventory(raw);
        let item = &response.items[0];
        assert_eq!(item.id, "42");
        assert_eq!(item.image_url, "https://cdn/a.png");
        assert_eq!(item.description, "");
    }

    #[test]
    fn escaped_quote_value_is_cut_at_first_quote() {
        let raw = r#"{"items":[{"id":"q1","name":"Big \"Hammer\"","origin":"forge"}]}"#;
        let response = scan_inventory(raw);
        assert_eq!(response.items[0].name, r"Big \");
        assert_eq!(response.items[0].origin, "forge");
    }

    #[test]
    fn scan_without_items_array_is_empty() {
        let response = scan_inventory(r#"{"total":3}"#);
        assert_eq!(response.total, 3);
        assert!(response.is_empty());
        assert!(scan_inventory("").is_empty());
        assert!(scan_inventory(r#"{"items":[]}"#).is_empty());
    }

    #[test]
    fn scan_tolerates_unterminated_objects() {
        let response = scan_inventory(r#"{"items": [ { "id": "z", "name": "Incomplete" ]"#);
        assert!(response.item_count() <= 1);
        if let Some(item) = response.items.first() {
            assert_eq!(item.id, "z");
        }
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "é".repeat(LOG_PREVIEW_CHARS + 10);
        assert_eq!(preview(&text).chars().count(), LOG_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
