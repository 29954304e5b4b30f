//! Fakes of the host boundary for unit and integration tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::{self, LocalBoxStream};
use mfe_shell_sdk::{
    AuthGate, AuthState, Clock, DiagnosticPanel, GlobalCallError, GlobalScope, LoadError,
    LoadedModule, LoaderStrategy, MfeLoader, ModuleImporter, PresentationSurface, RegionState,
    RemoteInfo, RemoteModule, ScriptFailure, ScriptHost, ScriptTag, SurfaceError,
};

pub use crate::clock::TokioClock;

/// `RemoteInfo` with container and mount ids derived from `name`.
#[must_use]
pub fn remote_info(name: &str) -> RemoteInfo {
    RemoteInfo {
        name: name.to_owned(),
        tech: "React".to_owned(),
        container_id: format!("{name}-container"),
        mount_id: format!("{name}-mfe"),
        port: Some(3001),
    }
}

/// Last path segment of a script URL.
fn file_name(src: &str) -> &str {
    src.rsplit('/').next().unwrap_or(src)
}

// ---------------------------------------------------------------------------
// Script host
// ---------------------------------------------------------------------------

enum ScriptBehavior {
    Fail(String),
    Hang,
    Register {
        globals: Rc<FakeGlobalScope>,
        function: String,
    },
}

/// Records every injected tag. Scripts load instantly unless configured to
/// fail, hang, or register a global function when they load.
#[derive(Default)]
pub struct RecordingScriptHost {
    requests: RefCell<Vec<ScriptTag>>,
    behaviors: RefCell<HashMap<String, ScriptBehavior>>,
}

impl RecordingScriptHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `file` fires its error event.
    #[must_use]
    pub fn failing(self, file: &str, reason: &str) -> Self {
        self.behaviors
            .borrow_mut()
            .insert(file.to_owned(), ScriptBehavior::Fail(reason.to_owned()));
        self
    }

    /// Script `file` never fires load or error.
    #[must_use]
    pub fn hanging(self, file: &str) -> Self {
        self.behaviors
            .borrow_mut()
            .insert(file.to_owned(), ScriptBehavior::Hang);
        self
    }

    /// Loading `file` registers `function` on `globals`.
    #[must_use]
    pub fn registering(self, file: &str, globals: &Rc<FakeGlobalScope>, function: &str) -> Self {
        self.behaviors.borrow_mut().insert(
            file.to_owned(),
            ScriptBehavior::Register {
                globals: Rc::clone(globals),
                function: function.to_owned(),
            },
        );
        self
    }

    #[must_use]
    pub fn tags(&self) -> Vec<ScriptTag> {
        self.requests.borrow().clone()
    }

    /// File names of injected scripts, in injection order.
    #[must_use]
    pub fn requested_files(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|t| file_name(&t.src).to_owned())
            .collect()
    }
}

#[async_trait::async_trait(?Send)]
impl ScriptHost for RecordingScriptHost {
    async fn inject(&self, tag: &ScriptTag) -> Result<(), ScriptFailure> {
        self.requests.borrow_mut().push(tag.clone());

        let file = file_name(&tag.src).to_owned();
        let outcome = match self.behaviors.borrow().get(&file) {
            None => Ok(true),
            Some(ScriptBehavior::Fail(reason)) => Err(ScriptFailure::new(&tag.src, reason)),
            Some(ScriptBehavior::Hang) => Ok(false),
            Some(ScriptBehavior::Register { globals, function }) => {
                globals.register(function);
                Ok(true)
            }
        };

        if !outcome? {
            futures::future::pending::<()>().await;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Global scope
// ---------------------------------------------------------------------------

struct GlobalFunction {
    /// Visible from this clock reading on; `None` means immediately.
    available_at: Option<(Rc<dyn Clock>, Duration)>,
    throws: Option<String>,
}

/// In-memory global namespace that records calls.
#[derive(Default)]
pub struct FakeGlobalScope {
    functions: RefCell<HashMap<String, GlobalFunction>>,
    calls: RefCell<Vec<(String, String)>>,
}

impl FakeGlobalScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str) {
        self.functions.borrow_mut().insert(
            name.to_owned(),
            GlobalFunction {
                available_at: None,
                throws: None,
            },
        );
    }

    /// Register `name` so it becomes visible once `clock` reads `at`.
    pub fn register_at(&self, name: &str, clock: Rc<dyn Clock>, at: Duration) {
        self.functions.borrow_mut().insert(
            name.to_owned(),
            GlobalFunction {
                available_at: Some((clock, at)),
                throws: None,
            },
        );
    }

    pub fn register_throwing(&self, name: &str, reason: &str) {
        self.functions.borrow_mut().insert(
            name.to_owned(),
            GlobalFunction {
                available_at: None,
                throws: Some(reason.to_owned()),
            },
        );
    }

    /// `(function, argument)` pairs in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl GlobalScope for FakeGlobalScope {
    fn has_function(&self, name: &str) -> bool {
        self.functions
            .borrow()
            .get(name)
            .is_some_and(|f| match &f.available_at {
                None => true,
                Some((clock, at)) => clock.elapsed() >= *at,
            })
    }

    fn call_function(&self, name: &str, arg: &str) -> Result<(), GlobalCallError> {
        if !self.has_function(name) {
            return Err(GlobalCallError::Missing(name.to_owned()));
        }
        self.calls
            .borrow_mut()
            .push((name.to_owned(), arg.to_owned()));

        match self.functions.borrow().get(name).and_then(|f| f.throws.clone()) {
            Some(reason) => Err(GlobalCallError::Threw {
                name: name.to_owned(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Federation
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum ImportBehavior {
    Mounts,
    MountFails(String),
    NoMountExport,
    Unreachable(String),
}

/// Module returned by [`ScriptedImporter`]; records mount ids.
pub struct StaticRemoteModule {
    exposed_as: String,
    behavior: ImportBehavior,
    mounts: Rc<RefCell<Vec<String>>>,
}

impl RemoteModule for StaticRemoteModule {
    fn exposed_as(&self) -> &str {
        &self.exposed_as
    }

    fn mount(&self, mount_id: &str) -> Option<Result<(), String>> {
        match &self.behavior {
            ImportBehavior::NoMountExport => None,
            ImportBehavior::MountFails(reason) => Some(Err(reason.clone())),
            ImportBehavior::Mounts | ImportBehavior::Unreachable(_) => {
                self.mounts.borrow_mut().push(mount_id.to_owned());
                Some(Ok(()))
            }
        }
    }
}

/// Federation importer with a scripted outcome.
pub struct ScriptedImporter {
    specifier: String,
    behavior: ImportBehavior,
    imports: Cell<usize>,
    mounts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedImporter {
    fn with_behavior(specifier: &str, behavior: ImportBehavior) -> Self {
        Self {
            specifier: specifier.to_owned(),
            behavior,
            imports: Cell::new(0),
            mounts: Rc::default(),
        }
    }

    /// Imports a module whose `mount` succeeds.
    #[must_use]
    pub fn mounting(specifier: &str) -> Self {
        Self::with_behavior(specifier, ImportBehavior::Mounts)
    }

    #[must_use]
    pub fn failing_mount(specifier: &str, reason: &str) -> Self {
        Self::with_behavior(specifier, ImportBehavior::MountFails(reason.to_owned()))
    }

    /// Imports a module with no `mount` export.
    #[must_use]
    pub fn without_mount(specifier: &str) -> Self {
        Self::with_behavior(specifier, ImportBehavior::NoMountExport)
    }

    /// The import itself fails.
    #[must_use]
    pub fn unreachable(specifier: &str, reason: &str) -> Self {
        Self::with_behavior(specifier, ImportBehavior::Unreachable(reason.to_owned()))
    }

    #[must_use]
    pub fn imports(&self) -> usize {
        self.imports.get()
    }

    #[must_use]
    pub fn mounted_ids(&self) -> Vec<String> {
        self.mounts.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl ModuleImporter for ScriptedImporter {
    fn specifier(&self) -> &str {
        &self.specifier
    }

    async fn import(&self) -> Result<Box<dyn RemoteModule>, LoadError> {
        self.imports.set(self.imports.get() + 1);
        if let ImportBehavior::Unreachable(reason) = &self.behavior {
            return Err(LoadError::Import {
                module: self.specifier.clone(),
                reason: reason.clone(),
            });
        }
        Ok(Box::new(StaticRemoteModule {
            exposed_as: self.specifier.clone(),
            behavior: self.behavior.clone(),
            mounts: Rc::clone(&self.mounts),
        }))
    }
}

// ---------------------------------------------------------------------------
// Loader stub
// ---------------------------------------------------------------------------

/// Shared call counters of a [`StubLoader`], readable after the loader has
/// been moved into a registry.
#[derive(Debug, Clone, Default)]
pub struct LoaderCalls {
    loads: Rc<Cell<usize>>,
    mounts: Rc<Cell<usize>>,
}

impl LoaderCalls {
    #[must_use]
    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    #[must_use]
    pub fn mounts(&self) -> usize {
        self.mounts.get()
    }
}

/// Loader with a fixed outcome and optional latency.
pub struct StubLoader {
    load_error: Option<LoadError>,
    mount_error: Option<LoadError>,
    delay: Option<(Rc<dyn Clock>, Duration)>,
    calls: LoaderCalls,
}

impl StubLoader {
    #[must_use]
    pub fn succeeding() -> Self {
        Self {
            load_error: None,
            mount_error: None,
            delay: None,
            calls: LoaderCalls::default(),
        }
    }

    #[must_use]
    pub fn failing_load(error: LoadError) -> Self {
        Self {
            load_error: Some(error),
            ..Self::succeeding()
        }
    }

    #[must_use]
    pub fn failing_mount(error: LoadError) -> Self {
        Self {
            mount_error: Some(error),
            ..Self::succeeding()
        }
    }

    /// `load` takes `delay` on `clock` before settling.
    #[must_use]
    pub fn with_delay(mut self, clock: Rc<dyn Clock>, delay: Duration) -> Self {
        self.delay = Some((clock, delay));
        self
    }

    #[must_use]
    pub fn calls(&self) -> LoaderCalls {
        self.calls.clone()
    }
}

#[async_trait::async_trait(?Send)]
impl MfeLoader for StubLoader {
    fn strategy(&self) -> LoaderStrategy {
        LoaderStrategy::Federated
    }

    async fn load(&self) -> Result<LoadedModule, LoadError> {
        self.calls.loads.set(self.calls.loads.get() + 1);
        if let Some((clock, delay)) = &self.delay {
            clock.sleep(*delay).await;
        }
        match &self.load_error {
            Some(err) => Err(err.clone()),
            None => Ok(LoadedModule::Placeholder),
        }
    }

    async fn mount(&self, _module: LoadedModule) -> Result<(), LoadError> {
        self.calls.mounts.set(self.calls.mounts.get() + 1);
        match &self.mount_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Counts success callbacks and captures errors passed to error callbacks.
#[derive(Debug, Clone, Default)]
pub struct CallbackLog {
    successes: Rc<Cell<usize>>,
    errors: Rc<RefCell<Vec<LoadError>>>,
}

impl CallbackLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_success(&self) -> impl Fn() + 'static {
        let successes = Rc::clone(&self.successes);
        move || successes.set(successes.get() + 1)
    }

    #[must_use]
    pub fn on_error(&self) -> impl Fn(&LoadError) + 'static {
        let errors = Rc::clone(&self.errors);
        move |err: &LoadError| errors.borrow_mut().push(err.clone())
    }

    #[must_use]
    pub fn successes(&self) -> usize {
        self.successes.get()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<LoadError> {
        self.errors.borrow().clone()
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Success(String),
    Panel(String, DiagnosticPanel),
}

/// Presentation surface with a fixed set of present regions.
#[derive(Default)]
pub struct RecordingSurface {
    regions: HashSet<String>,
    broken: HashSet<String>,
    events: RefCell<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn with_regions<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Region `container_id` exists but every update to it fails.
    #[must_use]
    pub fn broken(mut self, container_id: &str) -> Self {
        self.regions.insert(container_id.to_owned());
        self.broken.insert(container_id.to_owned());
        self
    }

    #[must_use]
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.borrow().clone()
    }

    fn check(&self, container_id: &str) -> Result<RegionState, SurfaceError> {
        if self.broken.contains(container_id) {
            return Err(SurfaceError {
                container_id: container_id.to_owned(),
                reason: "region is detached".to_owned(),
            });
        }
        if self.regions.contains(container_id) {
            Ok(RegionState::Applied)
        } else {
            Ok(RegionState::Absent)
        }
    }
}

impl PresentationSurface for RecordingSurface {
    fn apply_success(&self, container_id: &str) -> Result<RegionState, SurfaceError> {
        let state = self.check(container_id)?;
        if state == RegionState::Applied {
            self.events
                .borrow_mut()
                .push(SurfaceEvent::Success(container_id.to_owned()));
        }
        Ok(state)
    }

    fn show_panel(
        &self,
        container_id: &str,
        panel: &DiagnosticPanel,
    ) -> Result<RegionState, SurfaceError> {
        let state = self.check(container_id)?;
        if state == RegionState::Applied {
            self.events
                .borrow_mut()
                .push(SurfaceEvent::Panel(container_id.to_owned(), panel.clone()));
        }
        Ok(state)
    }
}

// ---------------------------------------------------------------------------
// Auth gate
// ---------------------------------------------------------------------------

/// Gate that replays a fixed list of states, then ends.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAuthGate {
    states: Vec<AuthState>,
}

impl ScriptedAuthGate {
    #[must_use]
    pub fn new(states: Vec<AuthState>) -> Self {
        Self { states }
    }
}

impl AuthGate for ScriptedAuthGate {
    fn subscribe(&self) -> LocalBoxStream<'static, AuthState> {
        stream::iter(self.states.clone()).boxed_local()
    }
}
