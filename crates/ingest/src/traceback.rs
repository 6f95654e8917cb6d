use std::sync::OnceLock;

use regex::Regex;

pub const TRACE_START: &str = "Traceback";
pub const INFO_MARKER: &str = "INFO";
pub const ERROR_MARKER: &str = "ERROR";
pub const INFO_SEPARATOR: &str = "INFO - ";
const ATTEMPT_MARKER: &str = "Starting attempt";

// Framework appends two boilerplate lines between the trace body and the
// closing error line.
const FOOTER_LINES: usize = 2;

/// Line range `[begin, end)` of one captured stack trace: `begin` holds the
/// trace-start marker, `end` the first error marker at or after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSegment {
    pub begin: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptInfo {
    pub current: u32,
    pub max: u32,
    pub display: String,
}

impl AttemptInfo {
    pub fn is_final(&self) -> bool {
        self.current == self.max
    }
}

/// All trace segments in scan order. A file holds one segment per retry
/// attempt that crashed.
pub fn segments(lines: &[&str]) -> Vec<TraceSegment> {
    let mut found = Vec::new();
    for (begin, line) in lines.iter().enumerate() {
        if !(line.contains(TRACE_START) && line.contains(INFO_MARKER)) {
            continue;
        }
        if let Some(offset) = lines[begin..].iter().position(|l| l.contains(ERROR_MARKER)) {
            found.push(TraceSegment {
                begin,
                end: begin + offset,
            });
        }
    }
    found
}

fn attempt_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"attempt (\d+) of (\d+)").unwrap())
}

/// Retry progress parsed from the first attempt-marker line, if any.
pub fn attempt(lines: &[&str]) -> Option<AttemptInfo> {
    let line = lines.iter().find(|l| l.contains(ATTEMPT_MARKER))?;
    let caps = attempt_re().captures(line)?;
    let current = caps[1].parse().ok()?;
    let max = caps[2].parse().ok()?;
    let display = line
        .rsplit_once('-')
        .map(|(_, tail)| tail.trim())
        .unwrap_or(line)
        .to_string();
    Some(AttemptInfo {
        current,
        max,
        display,
    })
}

/// The last captured trace, minus the framework footer lines, trimmed down
/// to the message remainder of each line.
pub fn last_trace(lines: &[&str]) -> Option<Vec<String>> {
    let segment = *segments(lines).last()?;
    let stop = segment.end.saturating_sub(FOOTER_LINES).max(segment.begin);
    let trimmed = trim_lines(&lines[segment.begin..stop]);
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Keeps only what follows the informational marker on each line; lines
/// without the marker are dropped.
pub fn trim_lines(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| l.split_once(INFO_SEPARATOR).map(|(_, rest)| rest.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_segment() {
        let lines = ["x INFO Traceback A", "y", "z ERROR boom", "a", "b"];
        assert_eq!(segments(&lines), vec![TraceSegment { begin: 0, end: 2 }]);
    }

    #[test]
    fn finds_segment_per_attempt() {
        let lines = [
            "t1 INFO - Starting attempt 1 of 2",
            "t2 INFO - Traceback (most recent call last):",
            "t3 INFO -   raise ValueError",
            "t4 ERROR - task failed",
            "t5 INFO - Starting attempt 2 of 2",
            "t6 INFO - Traceback (most recent call last):",
            "t7 INFO -   raise ValueError",
            "t8 ERROR - task failed",
        ];
        assert_eq!(
            segments(&lines),
            vec![
                TraceSegment { begin: 1, end: 3 },
                TraceSegment { begin: 5, end: 7 },
            ]
        );
    }

    #[test]
    fn ignores_trace_start_without_info() {
        let lines = ["Traceback (most recent call last):", "oops ERROR"];
        assert!(segments(&lines).is_empty());
    }

    #[test]
    fn parses_final_attempt() {
        let lines = ["[ts] {taskinstance.py:1035} INFO - Starting attempt 3 of 3"];
        let info = attempt(&lines).unwrap();
        assert_eq!(info.current, 3);
        assert_eq!(info.max, 3);
        assert!(info.is_final());
        assert_eq!(info.display, "Starting attempt 3 of 3");
    }

    #[test]
    fn parses_intermediate_attempt() {
        let lines = ["x INFO - Starting attempt 1 of 3"];
        let info = attempt(&lines).unwrap();
        assert_eq!((info.current, info.max), (1, 3));
        assert!(!info.is_final());
    }

    #[test]
    fn no_attempt_marker() {
        assert!(attempt(&["just a line", "another"]).is_none());
    }

    #[test]
    fn last_trace_keeps_final_segment_without_footer() {
        let lines = [
            "t1 INFO - Traceback (most recent call last):",
            "t2 INFO -   raise ValueError",
            "t3 ERROR - first failure",
            "t4 INFO - Traceback (most recent call last):",
            "t5 INFO -   raise RuntimeError",
            "t6 INFO - footer one",
            "t7 INFO - footer two",
            "t8 ERROR - final failure",
        ];
        assert_eq!(
            last_trace(&lines).unwrap(),
            vec![
                "Traceback (most recent call last):".to_string(),
                "  raise RuntimeError".to_string(),
            ]
        );
    }

    #[test]
    fn trim_drops_lines_without_marker() {
        let out = trim_lines(&["a INFO - kept", "no marker", "b INFO - also kept"]);
        assert_eq!(out, vec!["kept".to_string(), "also kept".to_string()]);
    }
}
