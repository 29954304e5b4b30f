//! Orchestrator: settle-all, fault isolation, status tracking.

use std::rc::Rc;
use std::time::Duration;

use mfe_shell::domain::loaders::FederatedModuleLoader;
use mfe_shell::test_support::{CallbackLog, ScriptedImporter, StubLoader, TokioClock, remote_info};
use mfe_shell::{MfeOrchestrator, MfeRegistry, RemoteDescriptor};
use mfe_shell_sdk::{Clock, LoadError, MfeStatus};

fn import_error(module: &str) -> LoadError {
    LoadError::Import {
        module: module.to_owned(),
        reason: "remote unreachable".to_owned(),
    }
}

#[tokio::test]
async fn test_two_remote_scenario() {
    let a = CallbackLog::new();
    let b = CallbackLog::new();

    let mut builder = MfeRegistry::builder();
    builder
        .register(
            RemoteDescriptor::new(
                remote_info("A"),
                FederatedModuleLoader::new(Rc::new(ScriptedImporter::mounting("a/App")), "A-mfe"),
            )
            .on_success(a.on_success())
            .on_error(a.on_error()),
        )
        .unwrap()
        .register(
            RemoteDescriptor::new(
                remote_info("B"),
                FederatedModuleLoader::new(
                    Rc::new(ScriptedImporter::unreachable("b/App", "remote unreachable")),
                    "B-mfe",
                ),
            )
            .on_success(b.on_success())
            .on_error(b.on_error()),
        )
        .unwrap();
    let orchestrator = MfeOrchestrator::new(builder.build());

    assert_eq!(orchestrator.status("A"), MfeStatus::Unknown);
    assert_eq!(orchestrator.status("B"), MfeStatus::Unknown);

    let summary = orchestrator.load_all().await;

    assert_eq!((summary.total, summary.loaded, summary.failed), (2, 1, 1));
    assert_eq!(a.successes(), 1);
    assert!(a.errors().is_empty());
    assert_eq!(b.successes(), 0);
    assert_eq!(b.errors(), [import_error("b/App")]);
    assert_eq!(orchestrator.status("A"), MfeStatus::Loaded);
    assert_eq!(orchestrator.status("B"), MfeStatus::Failed);
    assert_eq!(summary.failed_remotes[0].remote.name, "B");
    assert_eq!(summary.failed_remotes[0].error, import_error("b/App"));
}

#[tokio::test]
async fn test_one_failing_remote_does_not_affect_others() {
    let logs: Vec<CallbackLog> = (0..5).map(|_| CallbackLog::new()).collect();
    let mut builder = MfeRegistry::builder();
    for (i, log) in logs.iter().enumerate() {
        let loader = if i == 2 {
            StubLoader::failing_load(import_error("broken"))
        } else {
            StubLoader::succeeding()
        };
        builder
            .register(
                RemoteDescriptor::new(remote_info(&format!("remote-{i}")), loader)
                    .on_success(log.on_success())
                    .on_error(log.on_error()),
            )
            .unwrap();
    }
    let orchestrator = MfeOrchestrator::new(builder.build());

    let summary = orchestrator.load_all().await;

    assert_eq!(summary.total, 5);
    assert_eq!(summary.loaded, 4);
    assert_eq!(summary.loaded + summary.failed, summary.total);
    for (i, log) in logs.iter().enumerate() {
        if i == 2 {
            assert_eq!(log.errors().len(), 1);
            assert_eq!(log.successes(), 0);
        } else {
            assert_eq!(log.successes(), 1);
            assert!(log.errors().is_empty());
        }
    }
}

#[tokio::test]
async fn test_mount_failure_is_recorded_and_load_not_repeated() {
    let stub = StubLoader::failing_mount(LoadError::MountFailed {
        reason: "boom".to_owned(),
    });
    let calls = stub.calls();
    let mut builder = MfeRegistry::builder();
    builder
        .register(RemoteDescriptor::new(remote_info("cart"), stub))
        .unwrap();
    let orchestrator = MfeOrchestrator::new(builder.build());

    let summary = orchestrator.load_all().await;

    assert_eq!(summary.failed, 1);
    assert_eq!((calls.loads(), calls.mounts()), (1, 1));
    assert_eq!(orchestrator.failed()[0].remote.name, "cart");
}

#[tokio::test]
async fn test_failed_load_skips_mount() {
    let stub = StubLoader::failing_load(import_error("x"));
    let calls = stub.calls();
    let mut builder = MfeRegistry::builder();
    builder
        .register(RemoteDescriptor::new(remote_info("x"), stub))
        .unwrap();

    MfeOrchestrator::new(builder.build()).load_all().await;

    assert_eq!((calls.loads(), calls.mounts()), (1, 0));
}

#[tokio::test]
async fn test_empty_registry_yields_empty_summary() {
    let summary = MfeOrchestrator::new(MfeRegistry::default()).load_all().await;
    assert_eq!(summary.total, 0);
    assert!(summary.all_loaded());
}

#[tokio::test(start_paused = true)]
async fn test_status_is_unknown_until_attempt_settles() {
    let clock = Rc::new(TokioClock::new());
    let mut builder = MfeRegistry::builder();
    builder
        .register(RemoteDescriptor::new(
            remote_info("slow"),
            StubLoader::succeeding().with_delay(clock.clone(), Duration::from_millis(500)),
        ))
        .unwrap()
        .register(RemoteDescriptor::new(
            remote_info("fast"),
            StubLoader::failing_load(import_error("fast"))
                .with_delay(clock.clone(), Duration::from_millis(10)),
        ))
        .unwrap();
    let orchestrator = MfeOrchestrator::new(builder.build());

    let observe = async {
        clock.sleep(Duration::from_millis(100)).await;
        (orchestrator.status("slow"), orchestrator.status("fast"))
    };
    let (summary, (slow_mid, fast_mid)) = futures::join!(orchestrator.load_all(), observe);

    // the fast remote settled without waiting on the slow one
    assert_eq!(slow_mid, MfeStatus::Unknown);
    assert_eq!(fast_mid, MfeStatus::Failed);
    assert_eq!(orchestrator.status("slow"), MfeStatus::Loaded);
    assert_eq!(summary.loaded, 1);
    // concurrent, not serialized: 500ms total rather than 510ms
    assert!(clock.elapsed() < Duration::from_millis(510));
}

#[tokio::test]
async fn test_each_run_starts_from_clean_state() {
    let mut builder = MfeRegistry::builder();
    builder
        .register(RemoteDescriptor::new(remote_info("a"), StubLoader::succeeding()))
        .unwrap();
    let orchestrator = MfeOrchestrator::new(builder.build());

    orchestrator.load_all().await;
    let second = orchestrator.load_all().await;

    assert_eq!(second.total, 1);
    assert_eq!(second.loaded, 1);
    assert_eq!(orchestrator.loaded().len(), 1);
    assert!(orchestrator.failed().is_empty());
}

#[tokio::test]
async fn test_summary_lists_remotes_in_registry_order() {
    let mut builder = MfeRegistry::builder();
    for name in ["c", "a", "b"] {
        builder
            .register(RemoteDescriptor::new(remote_info(name), StubLoader::succeeding()))
            .unwrap();
    }
    let orchestrator = MfeOrchestrator::new(builder.build());

    let summary = orchestrator.load_all().await;
    let names: Vec<&str> = summary
        .loaded_remotes
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, ["c", "a", "b"]);
}

#[tokio::test]
async fn test_status_of_unregistered_remote_is_unknown() {
    let orchestrator = MfeOrchestrator::new(MfeRegistry::default());
    orchestrator.load_all().await;
    assert_eq!(orchestrator.status("nope"), MfeStatus::Unknown);
}
