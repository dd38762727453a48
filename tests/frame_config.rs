// tests/frame_config.rs

mod common;

use std::io::Write;

use common::builders::{FrameFileBuilder, JobConfigBuilder};
use common::{init_tracing, with_timeout};
use jobgraph::cli::CliArgs;
use jobgraph::config::{FrameFile, load_and_validate, parse_str};
use jobgraph::errors::SchedulerError;
use jobgraph::frame::{build_frame_jobs, run_frame};
use jobgraph::{JobScheduler, JobState};
use tempfile::NamedTempFile;

const PIPELINE: &str = r#"
[scheduler]
worker_threads = 3
thread_name_prefix = "frame-worker"

[job.input]
cost_us = 50

[job.physics]
after = ["input"]
cost_us = 200

[job.animation]
after = ["input"]

[job.render]
after = ["physics", "animation"]
"#;

fn write_frame(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_valid_frame_loads_with_settings() {
    let file = write_frame(PIPELINE);
    let frame = load_and_validate(file.path()).unwrap();

    assert_eq!(frame.scheduler.worker_threads, 3);
    assert_eq!(frame.scheduler.thread_name_prefix, "frame-worker");
    assert_eq!(frame.job.len(), 4);
    assert_eq!(frame.job["render"].after, vec!["physics", "animation"]);
    assert_eq!(frame.job["physics"].cost_us, 200);
    assert!(!frame.job["animation"].fail);
}

#[test]
fn test_scheduler_section_is_optional() {
    let raw = parse_str("[job.only]\n").unwrap();
    let frame = FrameFile::try_from(raw).unwrap();

    assert_eq!(frame.scheduler.worker_threads, 0);
    assert_eq!(frame.scheduler.thread_name_prefix, "jobgraph-worker");
}

#[test]
fn test_topological_order_puts_prerequisites_first() {
    let frame = FrameFile::try_from(parse_str(PIPELINE).unwrap()).unwrap();
    let order = frame.topological_order();
    let pos = |name: &str| order.iter().position(|n| *n == name).unwrap();

    assert_eq!(order.len(), 4);
    assert!(pos("input") < pos("physics"));
    assert!(pos("input") < pos("animation"));
    assert!(pos("physics") < pos("render"));
    assert!(pos("animation") < pos("render"));
}

#[test]
fn test_unknown_dependency_returns_config_error() {
    let file = write_frame(
        r#"
[job.A]
after = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(SchedulerError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_self_dependency_returns_config_error() {
    let raw = FrameFileBuilder::new()
        .with_job("loop", JobConfigBuilder::new().after("loop").build())
        .build_raw();

    match FrameFile::try_from(raw) {
        Err(SchedulerError::ConfigError(msg)) => assert!(msg.contains("itself")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_frame_cycle_returns_structured_error() {
    let file = write_frame(
        r#"
[job.A]
after = ["B"]

[job.B]
after = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(SchedulerError::DependencyCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("A") || msg.contains("B"));
        }
        Err(e) => panic!("Expected DependencyCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_frame_without_jobs_is_rejected() {
    let file = write_frame("[scheduler]\nworker_threads = 2\n");

    match load_and_validate(file.path()) {
        Err(SchedulerError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_empty_thread_prefix_is_rejected() {
    let file = write_frame(
        r#"
[scheduler]
thread_name_prefix = "  "

[job.A]
"#,
    );

    match load_and_validate(file.path()) {
        Err(SchedulerError::ConfigError(msg)) => assert!(msg.contains("thread_name_prefix")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_malformed_toml_returns_toml_error() {
    let file = write_frame("[job.A\nafter = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SchedulerError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(SchedulerError::IoError(_))));
}

#[test]
fn test_built_jobs_mirror_frame_dependencies() {
    let frame = FrameFile::try_from(parse_str(PIPELINE).unwrap()).unwrap();
    let built = build_frame_jobs(&frame, 0);

    assert_eq!(built.jobs.len(), 4);
    let render = built
        .jobs
        .iter()
        .find(|job| job.name() == Some("render"))
        .unwrap();
    let mut deps: Vec<_> = render.dependencies().collect();
    deps.sort();
    let mut expected = vec![built.handles["physics"].id(), built.handles["animation"].id()];
    expected.sort();
    assert_eq!(deps, expected);
}

#[test]
fn test_run_frame_reports_faulted_jobs() {
    init_tracing();
    with_timeout(|| {
        let frame = FrameFileBuilder::new()
            .with_job("load", JobConfigBuilder::new().cost_us(100).build())
            .with_job(
                "decode",
                JobConfigBuilder::new().after("load").fail(true).build(),
            )
            .with_job("present", JobConfigBuilder::new().after("decode").build())
            .build();
        let scheduler = JobScheduler::new(&frame.scheduler).unwrap();

        for index in 0..3 {
            let summary = run_frame(&scheduler, &frame, index).unwrap();
            assert_eq!(summary.frame, index);
            assert_eq!(summary.jobs, 3);
            assert_eq!(summary.faulted, vec!["decode".to_string()]);
        }

        assert_eq!(scheduler.stats().completed, 9);
        assert_eq!(scheduler.stats().faulted, 3);
    });
}

#[test]
fn test_built_jobs_run_to_done() {
    init_tracing();
    with_timeout(|| {
        let frame = FrameFile::try_from(parse_str(PIPELINE).unwrap()).unwrap();
        let scheduler = JobScheduler::new(&frame.scheduler).unwrap();
        let built = build_frame_jobs(&frame, 7);

        scheduler.enqueue(built.jobs).unwrap();
        scheduler.wait_for_all().unwrap();

        for handle in built.handles.values() {
            assert_eq!(handle.state(), JobState::Done);
            assert!(handle.fault().is_none());
        }
    });
}

#[test]
fn test_cli_run_executes_frames_and_shuts_down() {
    init_tracing();
    with_timeout(|| {
        let file = write_frame(PIPELINE);
        let args = CliArgs {
            config: file.path().to_string_lossy().into_owned(),
            threads: Some(2),
            frames: 2,
            log_level: None,
            dry_run: false,
        };
        jobgraph::run(args).unwrap();
    });
}

#[test]
fn test_cli_dry_run_accepts_valid_frame() {
    let file = write_frame(PIPELINE);
    let args = CliArgs {
        config: file.path().to_string_lossy().into_owned(),
        threads: None,
        frames: 1,
        log_level: None,
        dry_run: true,
    };
    jobgraph::run(args).unwrap();
}
