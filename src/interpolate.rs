// src/interpolate.rs

//! `{{ placeholder }}` substitution against an incoming event.
//!
//! A placeholder names a dotted path into the event (`{{ user.name }}`,
//! `{{ items.0 }}`). Strings are inserted as-is, other values as JSON, and
//! missing values as the empty string. Only string leaves of the option map
//! are touched.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\s*\}\}")
        .expect("placeholder regex is valid")
});

/// True if `s` contains at least one placeholder.
pub fn contains_placeholder(s: &str) -> bool {
    PLACEHOLDER.is_match(s)
}

/// Resolve every placeholder in `template`.
pub fn interpolate_str(template: &str, event: &Value) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| render(lookup(event, &caps[1])))
        .into_owned()
}

/// Resolve placeholders in every string inside `options`, recursively.
pub fn interpolate_options(options: &Map<String, Value>, event: &Value) -> Map<String, Value> {
    options
        .iter()
        .map(|(key, value)| (key.clone(), interpolate_value(value, event)))
        .collect()
}

fn interpolate_value(value: &Value, event: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(interpolate_str(s, event)),
        Value::Array(items) => Value::Array(items.iter().map(|v| interpolate_value(v, event)).collect()),
        Value::Object(map) => Value::Object(interpolate_options(map, event)),
        other => other.clone(),
    }
}

fn lookup<'a>(event: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(event, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_dotted_paths_and_indexes() {
        let event = json!({"user": {"name": "ada"}, "items": ["x", "y"]});
        assert_eq!(interpolate_str("hi {{ user.name }}", &event), "hi ada");
        assert_eq!(interpolate_str("{{items.1}}", &event), "y");
    }

    #[test]
    fn renders_non_strings_as_json_and_missing_as_empty() {
        let event = json!({"n": 3, "flag": true, "obj": {"a": 1}, "nothing": null});
        assert_eq!(interpolate_str("{{n}}-{{flag}}", &event), "3-true");
        assert_eq!(interpolate_str("{{ obj }}", &event), r#"{"a":1}"#);
        assert_eq!(interpolate_str("[{{ nothing }}{{ missing.deep }}]", &event), "[]");
    }

    #[test]
    fn detects_placeholders() {
        assert!(contains_placeholder("/srv/{{ dir }}"));
        assert!(!contains_placeholder("/srv/{dir}"));
    }

    #[test]
    fn leaves_text_without_placeholders_alone() {
        let event = json!({});
        assert_eq!(interpolate_str("echo {not a placeholder}", &event), "echo {not a placeholder}");
    }

    #[test]
    fn interpolates_nested_option_values_only_in_strings() {
        let options = json!({
            "path": "/srv/{{ dir }}",
            "command": ["grep", "{{ needle }}"],
            "merge": true,
            "expected_update_period_in_days": 1,
        });
        let event = json!({"dir": "logs", "needle": "ERROR"});

        let resolved = interpolate_options(options.as_object().unwrap(), &event);
        assert_eq!(resolved["path"], json!("/srv/logs"));
        assert_eq!(resolved["command"], json!(["grep", "ERROR"]));
        assert_eq!(resolved["merge"], json!(true));
        assert_eq!(resolved["expected_update_period_in_days"], json!(1));
    }
}
