use crate::domain::constants::RUN_LOG_FILE;
use crate::domain::models::HarnessConfig;
use std::io::Write;

/// Appends `{"ts", "action", "data"}` to `<results_dir>/runs.jsonl` when enabled.
/// Failures are logged and otherwise ignored.
pub fn record_run(config: &HarnessConfig, action: &str, data: serde_json::Value) {
    if !config.record_runs {
        return;
    }
    let path = config.results_dir.join(RUN_LOG_FILE);
    let event = serde_json::json!({
        "ts": unix_now(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let written = std::fs::create_dir_all(&config.results_dir).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut f| f.write_all(line.as_bytes()))
    });
    if let Err(err) = written {
        tracing::warn!(path = %path.display(), %err, "could not append run log");
    }
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_event_per_call_when_enabled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = HarnessConfig {
            results_dir: dir.path().join("results"),
            ..HarnessConfig::default()
        };
        record_run(&config, "repair", serde_json::json!({"records": 1}));
        assert!(!config.results_dir.join(RUN_LOG_FILE).exists());

        config.record_runs = true;
        record_run(&config, "repair", serde_json::json!({"records": 1}));
        record_run(&config, "bench", serde_json::json!({"parsers": 3}));
        let body = std::fs::read_to_string(config.results_dir.join(RUN_LOG_FILE)).expect("log");
        let events: Vec<serde_json::Value> = body
            .lines()
            .map(|l| serde_json::from_str(l).expect("event json"))
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["action"], "bench");
        assert_eq!(events[0]["data"]["records"], 1);
    }
}
