mod common;

use common::TestEnv;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn figures_lists_catalogue() {
    let env = TestEnv::new();
    env.cmd()
        .arg("figures")
        .assert()
        .success()
        .stdout(contains("fig9\tgrouped-bar"))
        .stdout(contains("fig13\tstacked-bar"))
        .stdout(contains("fig16\tscaling"));
}

#[test]
fn figures_json_envelope() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--json", "figures"])
        .assert()
        .success()
        .stdout(contains("\"ok\": true"))
        .stdout(contains("results/fig14_data.csv"));
}

#[test]
fn query_text_output() {
    let env = TestEnv::new();
    env.cmd()
        .args(["query", &env.arg("data/bestbuy.json"), "--query", "10"])
        .assert()
        .success()
        .stdout(contains("time taken to parse"))
        .stdout(contains("Q10\t"))
        .stdout(contains("/products/0/regularPrice=9.99"));
}

#[test]
fn bench_text_output() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "bench",
            &env.arg("data/bestbuy.json"),
            "--parser",
            "simd-json",
            "--iterations",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("simd-json\titerations=2"))
        .stdout(contains("GB/s"));
}

#[test]
fn unknown_parser_rejected_by_clap() {
    let env = TestEnv::new();
    env.cmd()
        .args(["bench", &env.arg("data/bestbuy.json"), "--parser", "rapidjson"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));
}

#[test]
fn logs_stay_off_stdout() {
    let env = TestEnv::new();
    env.cmd()
        .args(["-vv", "--json", "repair", &env.arg("data/twitter_pretty.json")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stderr(contains("saved clean JSONL"));
}

#[test]
fn csv_requires_dataset_label() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "bench",
            &env.arg("data/bestbuy.json"),
            "--csv",
            &env.arg("results/x.csv"),
        ])
        .assert()
        .failure();
}
