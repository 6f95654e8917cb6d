use tracing::debug;

use siren_core::error::{Result, SirenError};
use siren_core::model::alert::Alert;
use siren_core::severity::Severity;
use siren_core::time;

use crate::storage::BlobClient;
use crate::traceback;

pub const TITLE: &str = "Batch DAG Failed.";

// Standard footer the task runner writes on the second-to-last line of a
// failed run's log.
pub const FAILURE_FOOTER: &str = "Task exited with return code 1";

pub async fn handle(
    blobs: &BlobClient,
    bucket: &str,
    name: &str,
    ui_base: &str,
) -> Result<Option<Alert>> {
    let text = blobs.fetch_text(bucket, name).await?;
    analyze(name, &text, ui_base)
}

/// Everything after blob retrieval: pure, one pass over the log text.
pub fn analyze(name: &str, text: &str, ui_base: &str) -> Result<Option<Alert>> {
    let (dag_id, task_id, exec_date) = path_ids(name)?;
    let lines: Vec<&str> = text.split('\n').collect();

    if lines.len() < 2 || !lines[lines.len() - 2].contains(FAILURE_FOOTER) {
        return Ok(None);
    }

    let Some(attempt) = traceback::attempt(&lines) else {
        debug!(blob = name, "no attempt marker, skipping");
        return Ok(None);
    };
    if !attempt.is_final() {
        debug!(
            blob = name,
            current = attempt.current,
            max = attempt.max,
            "not the final attempt, skipping"
        );
        return Ok(None);
    }
    let Some(trace) = traceback::last_trace(&lines) else {
        debug!(blob = name, "final attempt without a captured traceback, skipping");
        return Ok(None);
    };

    let exec_ts = time::parse_exec_ts(lines[0])?;
    let status_url = format!(
        "http://{ui_base}/admin/airflow/log?task_id={task_id}&dag_id={dag_id}&execution_date={}&format=json",
        encode_exec_date(exec_date)
    );

    Ok(Some(
        Alert::new(TITLE)
            .field("DAG ID", dag_id)
            .field("Task ID", task_id)
            .field("Attempts of Retries", attempt.display)
            .field("Execution Timestamp", exec_ts)
            .field("Severity", Severity::Error.as_str())
            .field("DAG Status URL", status_url)
            .with_block("Traceback Details", trace),
    ))
}

/// Blob names follow `dag_id/task_id/execution_date/...`.
fn path_ids(name: &str) -> Result<(&str, &str, &str)> {
    let mut parts = name.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(dag), Some(task), Some(date)) if !dag.is_empty() && !task.is_empty() && !date.is_empty() => {
            Ok((dag, task, date))
        }
        _ => Err(SirenError::Parse(format!(
            "blob name {name:?} does not match dag_id/task_id/execution_date/..."
        ))),
    }
}

fn encode_exec_date(date: &str) -> String {
    date.replace(':', "%3A").replace('+', "%2B")
}
