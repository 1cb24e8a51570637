use crate::runner::Payload;

/// 紧凑模式下内联显示的最大字符数
const INLINE_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Compact,
    Verbose,
}

/// 把测试结果附带的数据格式化为可读文本
pub struct PayloadFormatter {
    format: PayloadFormat,
}

impl PayloadFormatter {
    pub fn new(format: PayloadFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, payload: &Payload) -> String {
        match payload {
            Payload::Error(e) => e.clone(),
            Payload::Value(value) => match self.format {
                PayloadFormat::Compact => self.format_compact(value),
                PayloadFormat::Verbose => self.format_verbose(value),
            },
        }
    }

    fn format_compact(&self, value: &serde_json::Value) -> String {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        if text.chars().count() < INLINE_LIMIT {
            text
        } else {
            format!("<{} bytes>", text.len())
        }
    }

    fn format_verbose(&self, value: &serde_json::Value) -> String {
        match value {
            // 导出类方法返回 JSON 文本，尝试美化，失败则原样显示
            serde_json::Value::String(s) => self.try_format_json(s).unwrap_or_else(|_| s.clone()),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }

    /// 尝试将文本格式化为漂亮的 JSON
    fn try_format_json(&self, text: &str) -> serde_json::Result<String> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        serde_json::to_string_pretty(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_inline() {
        let formatter = PayloadFormatter::new(PayloadFormat::Compact);
        let payload = Payload::Value(json!({"width": 10.0}));
        assert_eq!(formatter.format(&payload), r#"{"width":10.0}"#);
    }

    #[test]
    fn test_compact_long_value_shows_size() {
        let formatter = PayloadFormatter::new(PayloadFormat::Compact);
        let long = "x".repeat(500);
        let payload = Payload::Value(json!(long));
        assert_eq!(formatter.format(&payload), "<500 bytes>");
    }

    #[test]
    fn test_verbose_pretty_prints_json_text() {
        let formatter = PayloadFormatter::new(PayloadFormat::Verbose);
        let payload = Payload::Value(json!(r#"{"name":"Cabin"}"#));
        let formatted = formatter.format(&payload);
        assert!(formatted.contains('\n'));
        assert!(formatted.contains("\"name\": \"Cabin\""));
    }

    #[test]
    fn test_verbose_plain_text_unchanged() {
        let formatter = PayloadFormatter::new(PayloadFormat::Verbose);
        let payload = Payload::Value(json!("not json"));
        assert_eq!(formatter.format(&payload), "not json");
    }

    #[test]
    fn test_error_shown_as_is() {
        let formatter = PayloadFormatter::new(PayloadFormat::Compact);
        let payload = Payload::Error("service unavailable: walls".to_string());
        assert_eq!(formatter.format(&payload), "service unavailable: walls");
    }
}
