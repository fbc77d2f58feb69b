use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use helper_core::{ExecutionError, RunnerBuilder, RunnerRequest};
use helper_model::{HostCommand, ImageFormat, ImageHandle, MetricsDescriptor};
use helper_observe::LogSink;
use serde_json::Value;

use super::*;

#[derive(Default)]
struct Recorder {
    lines: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl LogSink for Recorder {
    fn log(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    sink: Arc<Recorder>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gt.xml"), "<tracks/>").unwrap();
        fs::write(dir.path().join("helper.json"), r#"{"detector": "LoG"}"#).unwrap();
        Self {
            dir,
            sink: Arc::default(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn request(&self, host: Option<HostCommand>) -> RunnerRequest {
        let sink: Arc<dyn LogSink> = self.sink.clone();
        RunnerRequest {
            metrics: MetricsDescriptor::spt(15.0),
            ground_truth_path: self.path("gt.xml"),
            save_folder: self.dir.path().to_path_buf(),
            task_definition_path: self.path("helper.json"),
            image: ImageHandle {
                path: self.path("movie.tif"),
                format: ImageFormat::Tiff,
                size_bytes: 8,
            },
            batch_logger: Arc::clone(&sink),
            trackmate_logger: sink,
            target_channel: 1,
            save_trackmate_files: false,
            host,
            log_file: None,
        }
    }
}

fn sh(script: &str) -> Option<HostCommand> {
    Some(HostCommand {
        program: "sh".into(),
        args: vec!["-c".into(), script.into()],
        env: Default::default(),
    })
}

#[test]
fn valid_request_has_no_problems() {
    let fx = Fixture::new();
    let problems = ProcessRunnerBuilder::new().validate(&fx.request(sh("true")));
    assert!(problems.is_empty(), "{problems:?}");
}

#[test]
fn all_problems_are_reported_together() {
    let fx = Fixture::new();
    let mut req = fx.request(None);
    req.ground_truth_path = PathBuf::new();
    req.task_definition_path = fx.path("absent.json");
    req.save_folder = fx.path("gt.xml");
    req.target_channel = 0;

    let err = ProcessRunnerBuilder::new().build(req).err().unwrap();
    let lines: Vec<&str> = err.0.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Please specify the path to a ground-truth file or folder.".to_string(),
            format!(
                "Could not find the helper runner settings file: {}",
                fx.path("absent.json").display()
            ),
            format!("Cannot write to results folder: {}", fx.path("gt.xml").display()),
            "Target channel must be 1 or greater.".to_string(),
            "Please specify the host program that runs the parameter sweep.".to_string(),
        ]
    );
}

#[test]
fn missing_ground_truth_is_named() {
    let fx = Fixture::new();
    let mut req = fx.request(sh("true"));
    req.ground_truth_path = fx.path("nope.xml");

    let problems = ProcessRunnerBuilder::new().validate(&req);
    assert_eq!(
        problems,
        vec![format!(
            "Could not find the ground-truth file or folder: {}",
            fx.path("nope.xml").display()
        )]
    );
}

#[test]
fn settings_file_must_be_an_object() {
    let fx = Fixture::new();
    fs::write(fx.path("helper.json"), "[1, 2]").unwrap();

    let problems = ProcessRunnerBuilder::new().validate(&fx.request(sh("true")));
    assert_eq!(problems.len(), 1);
    assert!(problems[0].starts_with("Could not parse the helper runner settings file:"));
}

#[test]
fn blank_host_program_is_rejected() {
    let fx = Fixture::new();
    let host = HostCommand {
        program: "  ".into(),
        args: Vec::new(),
        env: Default::default(),
    };

    let problems = ProcessRunnerBuilder::new().validate(&fx.request(Some(host)));
    assert_eq!(
        problems,
        vec!["Please specify the host program that runs the parameter sweep.".to_string()]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn completed_run_forwards_output() {
    let fx = Fixture::new();
    let script = r#"echo "request $(basename "$0")"; echo "test 1/2"; echo "bad combo" >&2"#;
    let mut runner = ProcessRunnerBuilder::new().build(fx.request(sh(script))).unwrap();

    runner.run().await.unwrap();

    assert_eq!(runner.name(), "proc");
    assert_eq!(runner.cancel_reason(), None);
    let lines = fx.sink.lines.lock().unwrap().clone();
    assert!(lines.contains(&format!("request {REQUEST_FILE_NAME}")));
    assert!(lines.contains(&"test 1/2".to_string()));
    assert_eq!(*fx.sink.errors.lock().unwrap(), vec!["bad combo".to_string()]);
}

#[cfg(unix)]
#[test]
fn results_folder_check_matches_real_write_access() {
    use std::os::unix::fs::PermissionsExt;

    let fx = Fixture::new();
    let locked = fx.path("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
    // Privileged users write through the mode bits, the check must agree either way.
    let writable = fs::write(locked.join("attempt"), "").is_ok();
    let _ = fs::remove_file(locked.join("attempt"));

    let mut req = fx.request(sh("true"));
    req.save_folder = locked.clone();
    let problems = ProcessRunnerBuilder::new().validate(&req);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let rejected = format!("Cannot write to results folder: {}", locked.display());
    assert_eq!(problems.contains(&rejected), !writable, "{problems:?}");
    assert_eq!(fs::read_dir(&locked).unwrap().count(), 0);
}

#[test]
fn results_folder_check_leaves_nothing_behind() {
    let fx = Fixture::new();
    let before = fs::read_dir(fx.dir.path()).unwrap().count();

    assert!(ProcessRunnerBuilder::new().validate(&fx.request(sh("true"))).is_empty());
    assert_eq!(fs::read_dir(fx.dir.path()).unwrap().count(), before);
}

#[cfg(unix)]
#[tokio::test]
async fn invalid_utf8_output_does_not_stop_forwarding() {
    let fx = Fixture::new();
    let script = r#"printf 'bad \377 byte\n'
sleep 0.2
i=1
while [ $i -le 2000 ]; do echo "line $i"; i=$((i+1)); done
printf 'err \377\n' >&2"#;
    let mut runner = ProcessRunnerBuilder::new().build(fx.request(sh(script))).unwrap();

    runner.run().await.unwrap();

    assert_eq!(runner.cancel_reason(), None);
    let lines = fx.sink.lines.lock().unwrap().clone();
    assert!(lines.contains(&"bad \u{fffd} byte".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("line 2000"));
    assert_eq!(lines.iter().filter(|l| l.starts_with("line ")).count(), 2000);
    assert_eq!(*fx.sink.errors.lock().unwrap(), vec!["err \u{fffd}".to_string()]);
}

#[cfg(unix)]
#[tokio::test]
async fn request_file_describes_the_run() {
    let fx = Fixture::new();
    let mut runner = ProcessRunnerBuilder::new().build(fx.request(sh("true"))).unwrap();

    runner.run().await.unwrap();

    let body = fs::read_to_string(fx.path(REQUEST_FILE_NAME)).unwrap();
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["metrics"]["type"], "SPT");
    assert_eq!(doc["metrics"]["max_linking_distance"], 15.0);
    assert_eq!(doc["default_metric"], "alpha");
    assert_eq!(doc["target_channel"], 1);
    assert_eq!(doc["metric_columns"].as_array().unwrap().len(), 8);
    assert!(doc.get("log_file").is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn host_env_is_passed() {
    let fx = Fixture::new();
    let mut host = sh(r#"echo "mode=$SWEEP_MODE""#).unwrap();
    host.env.insert("SWEEP_MODE".into(), "headless".into());
    let mut runner = ProcessRunnerBuilder::new().build(fx.request(Some(host))).unwrap();

    runner.run().await.unwrap();

    assert_eq!(*fx.sink.lines.lock().unwrap().last().unwrap(), "mode=headless");
}

#[cfg(unix)]
#[tokio::test]
async fn signal_is_a_cancellation() {
    let fx = Fixture::new();
    let mut runner = ProcessRunnerBuilder::new()
        .build(fx.request(sh("kill -TERM $$")))
        .unwrap();

    runner.run().await.unwrap();

    assert_eq!(
        runner.cancel_reason().as_deref(),
        Some("host program terminated by signal 15")
    );
}

#[cfg(unix)]
#[tokio::test]
async fn interrupt_exit_is_a_cancellation() {
    let fx = Fixture::new();
    let mut runner = ProcessRunnerBuilder::new().build(fx.request(sh("exit 130"))).unwrap();

    runner.run().await.unwrap();

    assert_eq!(
        runner.cancel_reason().as_deref(),
        Some("host program was interrupted")
    );
}

#[cfg(unix)]
#[tokio::test]
async fn other_exit_codes_fail() {
    let fx = Fixture::new();
    let mut runner = ProcessRunnerBuilder::new().build(fx.request(sh("exit 3"))).unwrap();

    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, ExecutionError::NonZeroExit { code: 3 }));
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let fx = Fixture::new();
    let host = HostCommand {
        program: "helper-no-such-program".into(),
        args: Vec::new(),
        env: Default::default(),
    };
    let mut runner = ProcessRunnerBuilder::new().build(fx.request(Some(host))).unwrap();

    let err = runner.run().await.unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::Spawn { ref program, .. } if program == "helper-no-such-program"
    ));
}
