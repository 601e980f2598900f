//! 文本转义与插件配置摘要。任何配置值写入 markup 前都必须经过这里。

use serde_json::Value;

/// 摘要最多展示的条目数
const SUMMARY_ENTRIES: usize = 3;
const ELLIPSIS: &str = "…";
const EMPTY_SUMMARY: &str = "{}";

/// 转义 `& < > " '`
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// 任意 JSON 值先转字符串再转义，null 输出空串
pub fn escape_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => escape_html(&display_value(other)),
    }
}

/// 属性值专用：转义后把连续空白折叠为单个空格
pub fn escape_attr(s: &str) -> String {
    let escaped = escape_html(s);
    let mut out = String::with_capacity(escaped.len());
    let mut in_space = false;
    for c in escaped.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// 字符串原样输出，其他类型输出紧凑 JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 插件配置摘要：前 3 项 `key: value`，超出追加省略号；空或非对象返回 `{}`
pub fn summarize_config(config: &Value) -> String {
    let map = match config {
        Value::Object(map) if !map.is_empty() => map,
        _ => return EMPTY_SUMMARY.to_string(),
    };

    let short = map
        .iter()
        .take(SUMMARY_ENTRIES)
        .map(|(k, v)| format!("{}: {}", k, display_value(v)))
        .collect::<Vec<_>>()
        .join(", ");

    if map.len() > SUMMARY_ENTRIES {
        format!("{}, {}", short, ELLIPSIS)
    } else {
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_escape_html_all_specials() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_value_null_is_empty() {
        assert_eq!(escape_value(&Value::Null), "");
        assert_eq!(escape_value(&json!(42)), "42");
        assert_eq!(escape_value(&json!("<b>")), "&lt;b&gt;");
    }

    #[test]
    fn test_escape_attr_collapses_whitespace() {
        assert_eq!(escape_attr("/a \t\n b"), "/a b");
        assert_eq!(escape_attr("  x  "), " x ");
    }

    #[test]
    fn test_summary_empty_and_absent() {
        assert_eq!(summarize_config(&json!({})), "{}");
        assert_eq!(summarize_config(&Value::Null), "{}");
    }

    #[test]
    fn test_summary_non_object_falls_back() {
        assert_eq!(summarize_config(&json!([1, 2, 3])), "{}");
        assert_eq!(summarize_config(&json!("oops")), "{}");
    }

    #[test]
    fn test_summary_up_to_three_entries() {
        let cfg = json!({"limit": 10, "window": "1s", "burst": true});
        assert_eq!(summarize_config(&cfg), "limit: 10, window: 1s, burst: true");
    }

    #[test]
    fn test_summary_truncates_with_ellipsis() {
        let cfg = json!({"d": 4, "c": 3, "b": 2, "a": 1});
        assert_eq!(summarize_config(&cfg), "d: 4, c: 3, b: 2, …");
    }

    #[test]
    fn test_summary_nested_value() {
        let cfg = json!({"hosts": ["a", "b"], "tls": {"on": true}});
        assert_eq!(summarize_config(&cfg), r#"hosts: ["a","b"], tls: {"on":true}"#);
    }

    proptest! {
        #[test]
        fn prop_escaped_text_has_no_raw_specials(s in ".*") {
            let out = escape_html(&s);
            prop_assert!(!out.contains('<'));
            prop_assert!(!out.contains('>'));
            prop_assert!(!out.contains('"'));
            prop_assert!(!out.contains('\''));
            let stripped = out
                .replace("&amp;", "")
                .replace("&lt;", "")
                .replace("&gt;", "")
                .replace("&quot;", "")
                .replace("&#039;", "");
            prop_assert!(!stripped.contains('&'));
        }

        #[test]
        fn prop_summary_keeps_first_three(n in 0usize..8) {
            let mut map = serde_json::Map::new();
            for i in 0..n {
                map.insert(format!("k{}", i), json!(i));
            }
            let summary = summarize_config(&Value::Object(map));
            if n == 0 {
                prop_assert_eq!(summary, "{}");
            } else {
                let expected: Vec<String> = (0..n.min(3)).map(|i| format!("k{}: {}", i, i)).collect();
                let mut expected = expected.join(", ");
                if n > 3 {
                    expected.push_str(", …");
                }
                prop_assert_eq!(summary, expected);
            }
        }
    }
}
