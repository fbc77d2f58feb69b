use std::io::Write;

use serde_json::Value;

const INDENT: &str = "  ";

/// Renders a JSON value as indented `key: value` lines, two spaces per level.
///
/// Nested objects and arrays open one level deeper; strings print without quotes.
pub fn render(value: &Value, level: usize) -> String {
    let mut out = String::new();
    render_into(&mut out, value, level);
    out
}

/// Writes [`render`] output. Write failures are ignored.
pub fn print_value<W: Write>(out: &mut W, value: &Value, level: usize) {
    let _ = out.write_all(render(value, level).as_bytes());
}

fn render_into(out: &mut String, value: &Value, level: usize) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                if is_container(v) {
                    line(out, level, &format!("{key}:"));
                    render_into(out, v, level + 1);
                } else {
                    line(out, level, &format!("{key}: {}", scalar(v)));
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if is_container(item) {
                    render_into(out, item, level + 1);
                } else {
                    line(out, level, &scalar(item));
                }
            }
        }
        _ => line(out, level, &scalar(value)),
    }
}

fn is_container(v: &Value) -> bool {
    matches!(v, Value::Object(_) | Value::Array(_))
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn line(out: &mut String, level: usize, text: &str) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}
