//! ASCII Text Normalization
//!
//! Controller responses carry free-form text (port descriptions, vendor strings) that may
//! contain accented or otherwise non-ASCII characters. Index documents are written as
//! plain ASCII, so every field passes through this module first.
//!
//! - Pure ASCII input is returned unchanged.
//! - Other input is NFKD-decomposed and any remaining non-ASCII code points are dropped,
//!   so `"Café"` becomes `"Cafe"` and `"東京"` becomes `""`.
//! - JSON lists and mappings are flattened into one comma-separated string.
//!
//! Nothing here fails: the worst case is an empty string.

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Separator used when flattening lists and mappings.
pub const SEPARATOR: char = ',';

/// Converts arbitrary text into ASCII.
///
/// # Examples
///
/// ```
/// use dnac_interface_collector::normalize::to_ascii;
///
/// assert_eq!(to_ascii("GigabitEthernet1/0/1"), "GigabitEthernet1/0/1");
/// assert_eq!(to_ascii("Zürich"), "Zurich");
/// ```
pub fn to_ascii(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    text.nfkd().filter(char::is_ascii).collect()
}

/// Like [`to_ascii`] but keeps only the first line of `text`.
pub fn first_line_ascii(text: &str) -> String {
    to_ascii(text.split('\n').next().unwrap_or_default())
}

/// Normalizes any JSON value into a single ASCII string.
///
/// - `null` → `""`
/// - strings → [`to_ascii`]
/// - numbers and booleans → their JSON text
/// - lists → each item normalized, joined with `,`
/// - mappings → `key:value` pairs, joined with `,`
///
/// List items and mapping entries keep only their first line.
///
/// ```
/// use dnac_interface_collector::normalize::normalize_value;
/// use serde_json::json;
///
/// assert_eq!(normalize_value(&json!(["a", "b"])), "a,b");
/// assert_eq!(normalize_value(&json!({"vlan": 10})), "vlan:10");
/// ```
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => to_ascii(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(item_text)
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string()),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}:{}", first_line_ascii(k), item_text(v)))
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string()),
    }
}

fn item_text(value: &Value) -> String {
    match value {
        Value::String(s) => first_line_ascii(s),
        other => normalize_value(other),
    }
}
