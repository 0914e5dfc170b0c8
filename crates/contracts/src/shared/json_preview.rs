//! Compact one-line previews of JSON values for collapsed tree rows.

use serde_json::Value;
use std::collections::HashSet;

pub const DEFAULT_PREVIEW_DEPTH: usize = 2;

const SEPARATOR: &str = ", ";
const ELLIPSIS: &str = "…";

/// Stringify `value`, replacing containers nested `max_depth` levels deep
/// (or already visited in this call) with an ellipsis.
pub fn preview(value: &Value, max_depth: usize) -> String {
    let mut seen = HashSet::new();
    stringify(value, max_depth, 0, &mut seen)
}

fn stringify(value: &Value, max_depth: usize, depth: usize, seen: &mut HashSet<*const Value>) -> String {
    match value {
        Value::Array(items) => {
            let is_circular = !seen.insert(value as *const Value);

            if items.is_empty() {
                wrap_array(None)
            } else if depth >= max_depth || is_circular {
                wrap_array(Some(ELLIPSIS))
            } else {
                let values = items
                    .iter()
                    .map(|item| stringify(item, max_depth, depth + 1, seen))
                    .collect::<Vec<_>>()
                    .join(SEPARATOR);
                wrap_array(Some(values.as_str()))
            }
        }
        Value::Object(map) => {
            let is_circular = !seen.insert(value as *const Value);

            if map.is_empty() {
                wrap_object(None)
            } else if depth >= max_depth || is_circular {
                wrap_object(Some(ELLIPSIS))
            } else {
                let values = map
                    .iter()
                    .map(|(key, item)| {
                        wrap_property(key, &stringify(item, max_depth, depth + 1, seen))
                    })
                    .collect::<Vec<_>>()
                    .join(SEPARATOR);
                wrap_object(Some(values.as_str()))
            }
        }
        scalar => scalar.to_string(),
    }
}

fn wrap_property(key: &str, value: &str) -> String {
    format!("{key}: {value}")
}

fn wrap_array(values: Option<&str>) -> String {
    format!("[{}]", values.unwrap_or_default())
}

fn wrap_object(values: Option<&str>) -> String {
    match values {
        Some(values) => format!("{{ {values} }}"),
        None => "{}".to_string(),
    }
}

/// `[N items]` label shown for an expanded array or object.
pub fn item_count_label(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => Some(format!("[{} items]", items.len())),
        Value::Object(map) => Some(format!("[{} items]", map.len())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_use_json_literals() {
        assert_eq!(preview(&json!("hi"), 2), "\"hi\"");
        assert_eq!(preview(&json!(3), 2), "3");
        assert_eq!(preview(&json!(true), 2), "true");
        assert_eq!(preview(&Value::Null, 2), "null");
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(preview(&json!([]), 2), "[]");
        assert_eq!(preview(&json!({}), 2), "{}");
    }

    #[test]
    fn test_depth_limit() {
        let value = json!({ "format": 0, "children": [{ "text": "a", "style": { "bold": true } }] });
        assert_eq!(
            preview(&value, DEFAULT_PREVIEW_DEPTH),
            "{ format: 0, children: [{ … }] }"
        );
        assert_eq!(preview(&value, 0), "{ … }");
        assert_eq!(
            preview(&value, 3),
            "{ format: 0, children: [{ text: \"a\", style: { … } }] }"
        );
    }

    #[test]
    fn test_preserves_key_order() {
        let value: Value = serde_json::from_str(r#"{"type":"text","detail":0,"format":1}"#).unwrap();
        assert_eq!(preview(&value, 2), "{ type: \"text\", detail: 0, format: 1 }");
    }

    #[test]
    fn test_item_count_label() {
        assert_eq!(item_count_label(&json!([1, 2, 3])), Some("[3 items]".to_string()));
        assert_eq!(item_count_label(&json!({ "a": 1 })), Some("[1 items]".to_string()));
        assert_eq!(item_count_label(&json!(1)), None);
    }
}
