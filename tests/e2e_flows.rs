mod common;

use common::{TestEnv, EVENTS_HOUR_0, EVENTS_HOUR_1, FIG9_CSV};
use predicates::str::contains;
use std::fs;

#[test]
fn repair_then_query_twitter() {
    let env = TestEnv::new();

    let repaired = env.run_json(&["repair", &env.arg("data/twitter_pretty.json")]);
    assert_eq!(repaired["data"]["records_written"], 2);
    assert_eq!(repaired["data"]["pending_bytes"], 0);

    let jsonl = fs::read_to_string(env.path("data/twitter_pretty.jsonl")).expect("repaired file");
    let lines: Vec<&str> = jsonl.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("{\"lang\":\"en\",\"user\":{\"id\":42"));

    let run = env.run_json(&[
        "query",
        &env.arg("data/twitter_pretty.jsonl"),
        "--query",
        "1",
        "--query",
        "4",
    ]);
    let doc = &run["data"]["document"];
    assert_eq!(doc["format"], "lines");
    assert_eq!(doc["records"], 2);

    let queries = run["data"]["queries"].as_array().expect("queries");
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0]["id"], 1);
    assert_eq!(queries[0]["hits"][0]["value"], "ja");
    assert_eq!(queries[0]["hits"][1]["value"], "en");
    assert_eq!(queries[1]["hits"][0]["value"], 23);
}

#[test]
fn repair_respects_explicit_output_and_refuses_in_place() {
    let env = TestEnv::new();
    let out = env.arg("clean/tweets.jsonl");

    env.cmd()
        .args(["repair", &env.arg("data/twitter_pretty.json"), "-o", &out])
        .assert()
        .success()
        .stdout(contains("saved clean JSONL to"));
    assert!(env.path("clean/tweets.jsonl").exists());

    let input = env.arg("data/twitter_pretty.json");
    env.cmd()
        .args(["repair", &input, "--output", &input])
        .assert()
        .failure();
}

#[test]
fn truncated_input_reports_pending_bytes() {
    let env = TestEnv::new();
    env.write("data/cut.json", "{\"id\": 1}\n{\n  \"id\": 2,\n");

    let repaired = env.run_json(&["repair", &env.arg("data/cut.json")]);
    assert_eq!(repaired["data"]["records_written"], 1);
    assert!(repaired["data"]["pending_bytes"].as_u64().expect("bytes") > 0);
}

#[test]
fn dataset_queries_on_standard_json() {
    let env = TestEnv::new();
    let run = env.run_json(&["query", &env.arg("data/bestbuy.json"), "--dataset", "bestbuy"]);
    assert_eq!(run["data"]["document"]["format"], "standard");

    let queries = run["data"]["queries"].as_array().expect("queries");
    let ids: Vec<u64> = queries.iter().filter_map(|q| q["id"].as_u64()).collect();
    assert_eq!(ids, vec![10, 11]);
    assert_eq!(queries[0]["hits"][0]["value"], 9.99);
    assert_eq!(queries[1]["hits"][0]["value"], "abcat0100000");
    assert_eq!(queries[1]["hits"][1]["value"], "abcat0101000");
}

#[test]
fn query_errors_are_reported_before_loading() {
    let env = TestEnv::new();
    let input = env.arg("data/bestbuy.json");

    env.cmd().args(["query", &input]).assert().failure();
    env.cmd()
        .args(["query", &input, "--query", "12"])
        .assert()
        .failure()
        .stderr(contains("wrong query number: 12"));
    env.cmd()
        .args(["query", &input, "--dataset", "nspl"])
        .assert()
        .failure();
    env.cmd()
        .args(["query", &input, "--pointer", "products.0"])
        .assert()
        .failure();
}

#[test]
fn missing_pointer_is_a_miss_not_an_error() {
    let env = TestEnv::new();
    let run = env.run_json(&[
        "query",
        &env.arg("data/bestbuy.json"),
        "--pointer",
        "/products/3/name",
    ]);
    let hit = &run["data"]["queries"][0]["hits"][0];
    assert_eq!(hit["found"], false);
    assert!(hit["value"].is_null());
}

#[test]
fn bench_appends_averages_to_results_csv() {
    let env = TestEnv::new();
    let input = env.arg("data/bestbuy.json");
    let csv = env.arg("results/cpu_parse.csv");

    for label in ["BB", "BB2"] {
        let report = env.run_json(&[
            "bench",
            &input,
            "--parser",
            "serde_json",
            "--parser",
            "sonic-rs",
            "--iterations",
            "3",
            "--warmup",
            "1",
            "--csv",
            &csv,
            "--dataset",
            label,
        ]);
        let results = report["data"]["results"].as_array().expect("results");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["parser"], "serde_json");
        assert_eq!(results[1]["iterations"], 3);
    }

    let body = fs::read_to_string(env.path("results/cpu_parse.csv")).expect("csv");
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "Dataset,serde_json,sonic-rs");
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("BB2,"));
}

#[test]
fn bench_rejects_zero_iterations_and_bad_json() {
    let env = TestEnv::new();
    env.cmd()
        .args(["bench", &env.arg("data/bestbuy.json"), "--iterations", "0"])
        .assert()
        .failure();

    env.write("data/broken.json", "{\"a\": [1, 2");
    env.cmd()
        .args(["bench", &env.arg("data/broken.json"), "--format", "standard"])
        .assert()
        .failure();
}

#[test]
fn plot_single_figure_writes_svg() {
    let env = TestEnv::new();
    let reports = env.run_json(&["plot", "fig9"]);
    let report = &reports["data"][0];
    assert_eq!(report["status"], "saved");
    assert_eq!(report["rows"], 3);
    assert_eq!(report["series"], 4);

    let svg = fs::read_to_string(env.path("figures/fig9.svg")).expect("svg");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("cuJSON"));
}

#[test]
fn plot_all_skips_missing_csvs() {
    let env = TestEnv::new();
    let reports = env.run_json(&["plot", "--all"]);
    let reports = reports["data"].as_array().expect("reports");
    assert_eq!(reports.len(), 7);

    let status = |id: &str| {
        reports
            .iter()
            .find(|r| r["id"] == id)
            .map(|r| r["status"].as_str().unwrap_or_default().to_string())
            .expect("figure present")
    };
    assert_eq!(status("fig9"), "saved");
    assert_eq!(status("fig16"), "saved");
    assert_eq!(status("fig13"), "skipped");
    assert!(env.path("figures/fig16.svg").exists());
    assert!(!env.path("figures/fig13.svg").exists());
}

#[test]
fn plot_overrides_and_argument_errors() {
    let env = TestEnv::new();
    env.write("elsewhere/numbers.csv", FIG9_CSV);
    let out = env.arg("out/custom.svg");

    env.cmd()
        .args(["plot", "fig9", "--csv", &env.arg("elsewhere/numbers.csv"), "--out", &out])
        .assert()
        .success()
        .stdout(contains("custom.svg"));
    assert!(env.path("out/custom.svg").exists());

    env.cmd().arg("plot").assert().failure();
    env.cmd()
        .args(["plot", "fig9", "fig16", "--out", &out])
        .assert()
        .failure();
    env.cmd().args(["plot", "fig10"]).assert().failure();
    env.cmd()
        .args(["plot", "fig11"])
        .assert()
        .failure();
}

#[test]
fn config_file_adds_figures_and_run_log() {
    let env = TestEnv::new();
    env.write(
        "cujson-bench.toml",
        r#"
results_dir = "results"
figures_dir = "charts"
record_runs = true

[[figures]]
id = "cpu"
kind = "grouped-bar"
title = "CPU Parsing"
y_label = "Time (ms)"
csv = "results/fig9_data.csv"
"#,
    );

    let rows = env.run_json(&["figures"]);
    let ids: Vec<&str> = rows["data"]
        .as_array()
        .expect("rows")
        .iter()
        .filter_map(|r| r["id"].as_str())
        .collect();
    assert_eq!(ids.last(), Some(&"cpu"));

    env.run_json(&["plot", "cpu"]);
    assert!(env.path("charts/cpu.svg").exists());

    let log = fs::read_to_string(env.path("results/runs.jsonl")).expect("run log");
    assert!(log.contains("\"action\":\"plot\""));
}

#[test]
fn explicit_missing_config_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--config", &env.arg("nope.toml"), "figures"])
        .assert()
        .failure();
}

#[test]
fn merge_archives_then_scan_events() {
    let env = TestEnv::new();
    env.write_gz("archive/2025-01-01-0.json.gz", EVENTS_HOUR_0);
    env.write_gz("archive/2025-01-01-1.json.gz", EVENTS_HOUR_1);
    env.write("archive/broken.gz", "not gzip");
    env.write("archive/README", "skip me");

    let merged = env.run_json(&["merge", &env.arg("archive")]);
    let data = &merged["data"];
    assert_eq!(data["files"].as_array().map(Vec::len), Some(2));
    assert_eq!(data["failed"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        data["bytes_written"].as_u64(),
        Some((EVENTS_HOUR_0.len() + EVENTS_HOUR_1.len()) as u64)
    );

    let body = fs::read_to_string(env.path("archive.json")).expect("merged file");
    assert_eq!(body, format!("{EVENTS_HOUR_0}{EVENTS_HOUR_1}"));

    let run = env.run_json(&[
        "query",
        &env.arg("archive.json"),
        "--format",
        "lines",
        "--scan",
        "ids",
        "--scan",
        "push-repos",
    ]);
    let scans = run["data"]["scans"].as_array().expect("scans");
    assert_eq!(scans[0]["scan"], "ids");
    assert_eq!(scans[0]["scanned"], 4);
    assert_eq!(scans[0]["matched"], 3);
    assert_eq!(scans[1]["scan"], "push-repos");
    assert_eq!(scans[1]["matched"], 2);
    assert!(run["data"]["queries"].as_array().is_some_and(Vec::is_empty));
}

#[test]
fn merge_text_output_and_scan_on_single_object() {
    let env = TestEnv::new();
    env.write_gz("hours/a.gz", EVENTS_HOUR_0);
    let out = env.arg("out/all.jsonl");

    env.cmd()
        .args(["merge", &env.arg("hours"), "-o", &out])
        .assert()
        .success()
        .stdout(contains("merged 1 archives into"));
    assert!(env.path("out/all.jsonl").exists());

    env.cmd()
        .args(["query", &env.arg("data/bestbuy.json"), "--scan", "ids"])
        .assert()
        .failure()
        .stderr(contains("top-level array"));
}
