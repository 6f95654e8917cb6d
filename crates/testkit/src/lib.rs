use base64::Engine;
use serde_json::json;

pub fn connector_event(severity: &str) -> serde_json::Value {
    json!({
        "insertId": "entry-1",
        "severity": severity,
        "logName": "projects/acme/logs/connector-acme-warehouse-prod",
        "receiveTimestamp": "2023-01-01T10:00:00.000000Z",
        "jsonPayload": {
            "connector_id": "orders",
            "connector_type": "postgres",
            "data": {
                "reason": "credentials rejected",
                "status": "broken"
            }
        }
    })
}

pub fn infra_event() -> serde_json::Value {
    json!({
        "insertId": "entry-2",
        "severity": "INFO",
        "logName": "projects/acme/logs/gcs-handler",
        "receiveTimestamp": "2023-01-01T10:00:00.000000Z",
        "labels": {
            "compute.googleapis.com/resource_name": "scheduler-vm-0"
        },
        "textPayload": "HTTP 404 fetching {\"bucket\": \"logs\"}"
    })
}

/// Wraps an event payload the way the push transport delivers it.
pub fn push_envelope(event: &serde_json::Value) -> serde_json::Value {
    let data = base64::engine::general_purpose::STANDARD.encode(event.to_string());
    json!({ "message": { "data": data } })
}

pub fn failing_batch_log() -> String {
    [
        "[2023-01-01 10:00:00,123] {taskinstance.py:1035} INFO - Starting attempt 2 of 2",
        "[2023-01-01 10:00:01,200] {taskinstance.py:1508} INFO - Traceback (most recent call last):",
        "[2023-01-01 10:00:01,201] {taskinstance.py:1508} INFO -   File \"load.py\", line 10, in run",
        "[2023-01-01 10:00:01,202] {taskinstance.py:1508} INFO - ValueError: bad row",
        "[2023-01-01 10:00:01,203] {taskinstance.py:1508} INFO - marker one",
        "[2023-01-01 10:00:01,204] {taskinstance.py:1508} INFO - marker two",
        "[2023-01-01 10:00:01,205] {taskinstance.py:1150} ERROR - Task failed with exception",
        "[2023-01-01 10:00:02,000] {logging_mixin.py:104} INFO - Task exited with return code 1",
        "",
    ]
    .join("\n")
}

pub fn passing_batch_log() -> String {
    [
        "[2023-01-01 10:00:00,123] {taskinstance.py:1035} INFO - Starting attempt 1 of 1",
        "[2023-01-01 10:00:01,000] {taskinstance.py:1150} INFO - all rows loaded",
        "[2023-01-01 10:00:02,000] {logging_mixin.py:104} INFO - Task exited with return code 0",
        "",
    ]
    .join("\n")
}
