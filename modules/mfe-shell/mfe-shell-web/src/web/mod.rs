//! wasm entry point and browser bindings of the host traits.

mod clock;
mod federation;
mod globals;
mod script_host;
mod session;
mod surface;

use std::cell::RefCell;
use std::rc::Rc;

use mfe_shell::auth::{AuthService, DemoAuthProvider};
use mfe_shell::config::{Environment, ShellConfig};
use mfe_shell::ui::EnvironmentBadge;
use mfe_shell::{MfeOrchestrator, MfeRegistry, RegistryWiring, ShellController, StatusReporter};
use mfe_shell_sdk::{AuthGate, AuthState};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use self::clock::BrowserClock;
use self::federation::federation_table;
use self::globals::WindowGlobalScope;
use self::script_host::DomScriptHost;
use self::session::SessionStorageStore;
use self::surface::DomSurface;

thread_local! {
    static AUTH: RefCell<Option<Rc<AuthService>>> = const { RefCell::new(None) };
}

fn auth_service() -> Result<Rc<AuthService>, JsValue> {
    AUTH.with(|cell| cell.borrow().clone())
        .ok_or_else(|| JsValue::from_str("shell not started"))
}

fn build_environment() -> Result<Environment, JsValue> {
    option_env!("BUILD_ENV")
        .map_or(Ok(Environment::Dev), str::parse)
        .map_err(|e: mfe_shell::ConfigError| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    wasm_logger::init(wasm_logger::Config::default());

    let environment = build_environment()?;
    let config = ShellConfig::for_environment(environment);
    log::info!("MFE shell starting ({environment})");

    let document = web_sys::window()
        .as_ref()
        .and_then(web_sys::Window::document)
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let surface = Rc::new(DomSurface::new(document.clone()));
    surface.show_badge(EnvironmentBadge::for_environment(environment));

    let wiring = RegistryWiring {
        scripts: Rc::new(DomScriptHost::new(document)),
        globals: Rc::new(WindowGlobalScope),
        clock: Rc::new(BrowserClock::new()?),
        federation: federation_table(),
        reporter: Some(Rc::new(StatusReporter::new(surface.clone()))),
    };
    let registry = MfeRegistry::from_config(&config, &wiring)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let auth = Rc::new(
        AuthService::new(Rc::new(SessionStorageStore::new()?))
            .with_provider(Rc::new(DemoAuthProvider)),
    );
    AUTH.with(|cell| *cell.borrow_mut() = Some(auth.clone()));

    let view_surface = surface;
    let shell = ShellController::new(Rc::new(MfeOrchestrator::new(registry)))
        .with_view(move |state: &AuthState| view_surface.show_auth_state(state));

    spawn_local(async move {
        auth.initialize_providers().await;
        if let Err(e) = auth.restore_session() {
            log::warn!("session restore failed: {e}");
        }
        // The service's stream never ends; the shell follows it for the page lifetime.
        shell.run(auth.subscribe()).await;
    });

    Ok(())
}

/// Sign in with the named provider.
///
/// # Errors
/// Rejects with the login error message.
#[wasm_bindgen]
#[allow(clippy::needless_pass_by_value)] // async exports take owned arguments
pub async fn login(provider: String) -> Result<(), JsValue> {
    auth_service()?
        .login(&provider)
        .await
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sign out of the current session.
///
/// # Errors
/// Rejects if the session could not be cleared.
#[wasm_bindgen]
pub async fn logout() -> Result<(), JsValue> {
    auth_service()?
        .logout()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Human-readable message of a JavaScript error value.
fn js_reason(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    "unknown JavaScript error".to_owned()
}
