use serde::{Deserialize, Serialize};

/// A rendered notification, built once per event. The webhook body is
/// produced with a JSON serializer, so field values never need manual
/// quote or brace escaping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub title: String,
    pub fields: Vec<AlertField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<AlertBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertField {
    pub label: String,
    pub value: String,
}

/// A preformatted multi-line section, rendered after the fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertBlock {
    pub label: String,
    pub lines: Vec<String>,
}

impl Alert {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            block: None,
        }
    }

    pub fn field(mut self, label: &str, value: impl Into<String>) -> Self {
        self.fields.push(AlertField {
            label: label.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn with_block(mut self, label: &str, lines: Vec<String>) -> Self {
        self.block = Some(AlertBlock {
            label: label.to_string(),
            lines,
        });
        self
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(":red_circle: {}", self.title);
        for field in &self.fields {
            out.push_str(&format!("\n*{}*: {}", field.label, field.value));
        }
        if let Some(block) = &self.block {
            out.push_str(&format!("\n*{}*:", block.label));
            for line in &block.lines {
                out.push('\n');
                out.push_str(line);
            }
        }
        out
    }

    pub fn webhook_payload(&self) -> serde_json::Value {
        serde_json::json!({ "text": self.render_text() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Alert {
        Alert::new("Connector Failed.")
            .field("Project", "acme")
            .field("Alert Reason", "credentials \"rejected\" {again}")
            .with_block("Traceback Details", vec![
                "Traceback (most recent call last):".to_string(),
                "ValueError: bad state".to_string(),
            ])
    }

    #[test]
    fn renders_fields_in_order() {
        let text = sample().render_text();
        assert!(text.starts_with(":red_circle: Connector Failed."));
        let project = text.find("*Project*: acme").unwrap();
        let reason = text.find("*Alert Reason*").unwrap();
        let block = text.find("*Traceback Details*:\nTraceback").unwrap();
        assert!(project < reason && reason < block);
    }

    #[test]
    fn rendering_is_idempotent() {
        let alert = sample();
        assert_eq!(alert.render_text(), alert.render_text());
        assert_eq!(alert.webhook_payload(), alert.webhook_payload());
    }

    #[test]
    fn payload_survives_quotes_and_braces() {
        let payload = sample().webhook_payload().to_string();
        let back: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let text = back["text"].as_str().unwrap();
        assert!(text.contains("credentials \"rejected\" {again}"));
    }
}
