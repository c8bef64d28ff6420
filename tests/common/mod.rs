#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PRETTY_TWEETS: &str = r#"{
  "lang": "en",
  "user": {
    "id": 42,
    "lang": "ja"
  },
  "entities": {"urls": [{"indices": [23, 46]}]}
}
{
  "lang": "fr",
  "user": {"id": 7, "lang": "fr"}
}
"#;

pub const BESTBUY: &str = r#"{"products": [{"regularPrice": 9.99, "categoryPath": [
{"id": "cat00000"}, {"id": "abcat0100000"}, {"id": "abcat0101000"}]}]}"#;

pub const EVENTS_HOUR_0: &str = concat!(
    r#"{"id":"1","type":"PushEvent","repo":{"name":"a/b"}}"#,
    "\n",
    r#"{"id":"2","type":"WatchEvent","repo":{"name":"c/d"}}"#,
    "\n",
);

pub const EVENTS_HOUR_1: &str = concat!(
    r#"{"id":"3","type":"PushEvent","repo":{"name":"e/f"}}"#,
    "\n",
    r#"{"type":"PushEvent","repo":{}}"#,
    "\n",
);

pub const FIG9_CSV: &str = "Dataset,cuJSON,simdjson,RapidJSON,Pison\n\
TT,120.5,310.2,880.0,402.1\n\
BB,98.1,250.7,701.3,333.3\n\
GMD,110.0,290.0,790.4,380.9\n";

pub const FIG16_CSV: &str = "Dataset,2,4,8,16,32,64,128,256\n\
cujson,1.1,1.9,3.5,6.8,13.0,25.2,49.9,98.0\n\
cudf,2.5,4.4,8.1,15.9,31.0,60.2,119.5,240.0\n";

/// Isolated working directory holding fixtures. Commands run with it as cwd so the
/// default `results/`, `figures/` and config lookups stay inside the temp dir.
pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("data")).expect("create data dir");
        fs::create_dir_all(root.join("results")).expect("create results dir");

        fs::write(root.join("data/twitter_pretty.json"), PRETTY_TWEETS)
            .expect("write pretty tweets");
        fs::write(root.join("data/bestbuy.json"), BESTBUY).expect("write bestbuy");
        fs::write(root.join("results/fig9_data.csv"), FIG9_CSV).expect("write fig9 csv");
        fs::write(root.join("results/fig16_data.csv"), FIG16_CSV).expect("write fig16 csv");

        Self { _tmp: tmp, root }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn arg(&self, rel: &str) -> String {
        path_str(&self.path(rel))
    }

    pub fn write(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parent");
        }
        fs::write(&path, body).expect("write fixture");
        path
    }

    /// Writes `body` gzip-compressed.
    pub fn write_gz(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parent");
        }
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(body.as_bytes()).expect("compress fixture");
        fs::write(&path, enc.finish().expect("finish gzip")).expect("write fixture");
        path
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("cujson-bench");
        cmd.current_dir(&self.root).env_remove("RUST_LOG");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

pub fn path_str(path: &Path) -> String {
    path.to_str().expect("utf8 path").to_string()
}
