use siren_core::error::{Result, SirenError};
use siren_core::model::alert::Alert;
use siren_core::model::envelope::LogEnvelope;
use siren_core::severity::Severity;
use siren_core::time;

pub const TITLE: &str = "Connector Failed.";

/// Project and job identifiers are dash-separated inside the last path
/// segment of the log name.
fn log_name_ids(log_name: &str) -> Result<(&str, &str)> {
    let last = log_name.rsplit('/').next().unwrap_or(log_name);
    let tokens: Vec<&str> = last.split('-').collect();
    if tokens.len() < 3 {
        return Err(SirenError::Parse(format!(
            "log name segment {last:?} has {} dash token(s), expected at least 3",
            tokens.len()
        )));
    }
    Ok((tokens[1], tokens[2]))
}

pub fn handle(envelope: &LogEnvelope, console_base: &str) -> Result<Option<Alert>> {
    if envelope.severity != Severity::Error {
        return Ok(None);
    }

    let payload = envelope
        .json_payload
        .as_ref()
        .ok_or_else(|| SirenError::MissingField("jsonPayload".to_string()))?;
    let data = payload
        .data
        .as_ref()
        .ok_or_else(|| SirenError::MissingField("jsonPayload.data".to_string()))?;
    let (project, job_id) = log_name_ids(&envelope.log_name)?;

    let dash_url = format!(
        "{console_base}/dashboard/connectors/{job_id}/{}",
        payload.connector_id
    );

    Ok(Some(
        Alert::new(TITLE)
            .field("Project", project)
            .field("Connector Type", payload.connector_type.clone())
            .field("Connector Schema", payload.connector_id.clone())
            .field("Alert Reason", data.reason.clone())
            .field("Alert Status", data.status.clone())
            .field("Log ID", envelope.insert_id.clone())
            .field("Received Timestamp", time::to_pst_micros(&envelope.receive_timestamp))
            .field("Severity", envelope.severity.as_str())
            .field("Dashboard URL", dash_url),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use siren_core::model::envelope::{ConnectorData, ConnectorPayload};

    use super::*;

    fn envelope(severity: Severity, data: Option<ConnectorData>) -> LogEnvelope {
        LogEnvelope {
            insert_id: "i-1".to_string(),
            severity,
            log_name: "projects/acme/logs/connector-acme-warehouse-prod".to_string(),
            receive_timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap(),
            json_payload: Some(ConnectorPayload {
                connector_id: "orders".to_string(),
                connector_type: "postgres".to_string(),
                data,
            }),
            labels: Default::default(),
            text_payload: None,
        }
    }

    fn failure_data() -> ConnectorData {
        ConnectorData {
            reason: "credentials rejected".to_string(),
            status: "broken".to_string(),
        }
    }

    #[test]
    fn non_error_is_a_no_op() {
        let env = envelope(Severity::Warning, Some(failure_data()));
        assert_eq!(handle(&env, "https://console.example.com").unwrap(), None);
    }

    #[test]
    fn error_renders_alert() {
        let env = envelope(Severity::Error, Some(failure_data()));
        let alert = handle(&env, "https://console.example.com").unwrap().unwrap();
        let text = alert.render_text();
        assert!(text.contains("*Project*: acme"));
        assert!(text.contains("*Connector Schema*: orders"));
        assert!(text.contains("*Alert Status*: broken"));
        assert!(text.contains("*Received Timestamp*: 2023-01-01T03:00:00.000000"));
        assert!(text.contains("https://console.example.com/dashboard/connectors/warehouse/orders"));
    }

    #[test]
    fn missing_data_fails_loudly() {
        let env = envelope(Severity::Error, None);
        assert!(matches!(
            handle(&env, "https://console.example.com"),
            Err(SirenError::MissingField(_))
        ));
    }

    #[test]
    fn missing_payload_fails_loudly() {
        let mut env = envelope(Severity::Error, Some(failure_data()));
        env.json_payload = None;
        assert!(matches!(
            handle(&env, "https://console.example.com"),
            Err(SirenError::MissingField(_))
        ));
    }

    #[test]
    fn short_log_name_is_a_validation_error() {
        let mut env = envelope(Severity::Error, Some(failure_data()));
        env.log_name = "projects/acme/logs/syslog".to_string();
        assert!(matches!(
            handle(&env, "https://console.example.com"),
            Err(SirenError::Parse(_))
        ));
    }
}
