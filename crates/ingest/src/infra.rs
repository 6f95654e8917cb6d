use siren_core::error::{Result, SirenError};
use siren_core::model::alert::Alert;
use siren_core::model::envelope::LogEnvelope;
use siren_core::time;

pub const TITLE: &str = "Log storage handler experienced HTTP 404 Error.";
pub const RESOURCE_LABEL: &str = "compute.googleapis.com/resource_name";

// No severity filter here: every pushed entry from this source alerts.
pub fn handle(envelope: &LogEnvelope) -> Result<Option<Alert>> {
    let resource = envelope
        .labels
        .get(RESOURCE_LABEL)
        .ok_or_else(|| SirenError::MissingField(format!("labels.{RESOURCE_LABEL}")))?;
    let text = envelope
        .text_payload
        .as_ref()
        .ok_or_else(|| SirenError::MissingField("textPayload".to_string()))?;

    Ok(Some(
        Alert::new(TITLE)
            .field("Log ID", envelope.insert_id.clone())
            .field("Resource", resource.clone())
            .field("Log Name", envelope.log_name.clone())
            .field("Received Timestamp", time::to_pst_micros(&envelope.receive_timestamp))
            .field("Error Message", text.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use siren_core::severity::Severity;

    use super::*;

    fn envelope() -> LogEnvelope {
        let mut labels = HashMap::new();
        labels.insert(RESOURCE_LABEL.to_string(), "scheduler-vm-0".to_string());
        LogEnvelope {
            insert_id: "i-2".to_string(),
            severity: Severity::Info,
            log_name: "projects/acme/logs/gcs-handler".to_string(),
            receive_timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap(),
            json_payload: None,
            labels,
            text_payload: Some("404 GET {\"bucket\": \"logs\"} \\ not found".to_string()),
        }
    }

    #[test]
    fn alerts_regardless_of_severity() {
        let alert = handle(&envelope()).unwrap().unwrap();
        let text = alert.render_text();
        assert!(text.contains("*Resource*: scheduler-vm-0"));
        assert!(text.contains("*Received Timestamp*: 2023-01-01T03:00:00.000000"));
    }

    #[test]
    fn payload_text_is_embedded_verbatim() {
        let alert = handle(&envelope()).unwrap().unwrap();
        let payload = alert.webhook_payload().to_string();
        let back: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert!(
            back["text"]
                .as_str()
                .unwrap()
                .contains("404 GET {\"bucket\": \"logs\"} \\ not found")
        );
    }

    #[test]
    fn missing_resource_label_fails_loudly() {
        let mut env = envelope();
        env.labels.clear();
        assert!(matches!(handle(&env), Err(SirenError::MissingField(_))));
    }

    #[test]
    fn missing_text_payload_fails_loudly() {
        let mut env = envelope();
        env.text_payload = None;
        assert!(matches!(handle(&env), Err(SirenError::MissingField(_))));
    }
}
