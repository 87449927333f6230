use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const DATASET: &str = r#"{"file_path":"cafe/wide.webp","has_step":false,"width_class":["wide"],"chair":{"has_movable_chair":true}}
{"file_path":"bar/step.webp","has_step":true,"width_class":["wide"],"chair":{"has_movable_chair":true}}
{"file_path":"diner/narrow.webp","has_step":true,"width_class":["narrow"],"chair":{"has_movable_chair":false}}

{"file_path":"pub/blocked.webp","has_step":true,"width_class":["not_passable"],"chair":{"has_movable_chair":false}}
{"file_path": broken
{"file_path":"test/sample.webp","width_class":["normal"]}
"#;

/// Isolated home, dataset, collections and config for one test
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub config: PathBuf,
    pub review_state: PathBuf,
    pub collections: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_scoring("")
    }

    /// Extra YAML appended to the generated config
    pub fn with_scoring(extra: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let dataset = tmp.path().join("gt.jsonl");
        fs::write(&dataset, DATASET).expect("write dataset");

        let collections = tmp.path().join("spider");
        let batch = collections.join("batch_001");
        fs::create_dir_all(&batch).expect("create batch dir");
        fs::write(batch.join("a.jpg"), b"").expect("write image");
        fs::write(batch.join("b.webp"), b"").expect("write image");
        fs::write(batch.join("readme.txt"), b"").expect("write other file");

        let review_state = tmp.path().join("state").join("review.json");
        let config = tmp.path().join("config.yaml");
        let yaml = format!(
            "sources:\n  dataset: '{}'\n  collections_dir: '{}'\nimages:\n  base_url: 'http://img.test'\nreview_state: '{}'\n{}",
            dataset.display(),
            collections.display(),
            review_state.display(),
            extra
        );
        fs::write(&config, yaml).expect("write config");

        Self {
            _tmp: tmp,
            home,
            config,
            review_state,
            collections,
        }
    }

    /// The binary with an isolated HOME and this env's config
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("dongjeop");
        cmd.env("HOME", &self.home)
            .env("XDG_CACHE_HOME", self.home.join(".cache"))
            .env_remove("RUST_LOG")
            .arg("--no-cache")
            .arg("-c")
            .arg(&self.config);
        cmd
    }

    pub fn stdout(&self, args: &[&str]) -> String {
        let out = self.cmd().args(args).assert().success().get_output().stdout.clone();
        String::from_utf8(out).expect("utf8 stdout")
    }

    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        serde_json::from_str(&self.stdout(args)).expect("valid json")
    }
}
