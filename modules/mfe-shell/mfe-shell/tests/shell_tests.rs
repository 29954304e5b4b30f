//! Shell controller: orchestration gated on authentication.

use std::cell::RefCell;
use std::rc::Rc;

use futures::StreamExt;
use mfe_shell::auth::{AuthService, DemoAuthProvider, MemorySessionStore};
use mfe_shell::test_support::{LoaderCalls, ScriptedAuthGate, StubLoader, remote_info};
use mfe_shell::{MfeOrchestrator, MfeRegistry, RemoteDescriptor, ShellController};
use mfe_shell_sdk::{AuthGate, AuthState, MfeStatus, UserProfile};

fn user() -> UserProfile {
    UserProfile {
        id: "u1".to_owned(),
        name: "Test User".to_owned(),
        email: "test@example.com".to_owned(),
        picture: None,
        provider: "demo".to_owned(),
    }
}

fn controller() -> (ShellController, LoaderCalls) {
    let stub = StubLoader::succeeding();
    let calls = stub.calls();
    let mut builder = MfeRegistry::builder();
    builder
        .register(RemoteDescriptor::new(remote_info("products"), stub))
        .unwrap();
    let orchestrator = Rc::new(MfeOrchestrator::new(builder.build()));
    (ShellController::new(orchestrator), calls)
}

#[tokio::test]
async fn test_no_loading_while_signed_out() {
    let (shell, calls) = controller();
    let gate = ScriptedAuthGate::new(vec![AuthState::signed_out(), AuthState::signed_out()]);

    let runs = shell.run_gate(&gate).await;

    assert!(runs.is_empty());
    assert_eq!(calls.loads(), 0);
}

#[tokio::test]
async fn test_loads_once_per_transition_into_authenticated() {
    let (shell, calls) = controller();
    let gate = ScriptedAuthGate::new(vec![
        AuthState::signed_out(),
        AuthState::signed_in(user()),
        AuthState::signed_in(user()),
        AuthState::signed_out(),
        AuthState::signed_in(user()),
    ]);

    let runs = shell.run_gate(&gate).await;

    assert_eq!(runs.len(), 2);
    assert_eq!(calls.loads(), 2);
    assert!(runs.iter().all(|s| s.loaded == 1));
}

#[tokio::test]
async fn test_already_authenticated_loads_immediately() {
    let (shell, calls) = controller();
    let gate = ScriptedAuthGate::new(vec![AuthState::signed_in(user())]);

    shell.run_gate(&gate).await;
    assert_eq!(calls.loads(), 1);
}

#[tokio::test]
async fn test_view_sees_every_state() {
    let (shell, _) = controller();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let shell = shell.with_view(move |s| sink.borrow_mut().push(s.is_authenticated));
    let gate = ScriptedAuthGate::new(vec![AuthState::signed_out(), AuthState::signed_in(user())]);

    shell.run_gate(&gate).await;
    assert_eq!(*seen.borrow(), [false, true]);
}

#[tokio::test]
async fn test_auth_service_drives_the_shell() {
    let (shell, calls) = controller();
    let auth = AuthService::new(Rc::new(MemorySessionStore::new()))
        .with_provider(Rc::new(DemoAuthProvider));

    // The service stream never ends; take the replayed state plus one login.
    let states = auth.subscribe().take(2).boxed_local();
    let login = async {
        auth.login("demo").await.unwrap();
    };
    let (runs, ()) = futures::join!(shell.run(states), login);

    assert_eq!(runs.len(), 1);
    assert_eq!(calls.loads(), 1);
    assert_eq!(shell.orchestrator().status("products"), MfeStatus::Loaded);
}
