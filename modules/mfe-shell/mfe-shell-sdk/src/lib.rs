//! MFE Shell SDK
//!
//! Contracts shared by the shell core, its host bindings, and remote loaders:
//!
//! - **Loader strategy**: [`MfeLoader`] (`load` then `mount`), [`LoadedModule`],
//!   [`RemoteModule`], [`ModuleImporter`]
//! - **Host boundary**: [`ScriptHost`], [`GlobalScope`], [`Clock`],
//!   [`PresentationSurface`]
//! - **Models**: [`RemoteInfo`], [`MfeStatus`], [`LoadOutcome`], [`Summary`]
//! - **Errors**: [`LoadError`] and the per-boundary error types
//! - **Authentication gate**: [`AuthGate`], [`AuthProvider`], [`SessionStore`]

#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod host;
pub mod loader;
pub mod models;

pub use auth::{AuthGate, AuthProvider, AuthState, SessionStore, UserProfile};
pub use error::{
    AuthError, GlobalCallError, LoadError, OriginError, ScriptFailure, SurfaceError,
};
pub use host::{
    Clock, CrossOrigin, DiagnosticPanel, GlobalScope, PresentationSurface, RegionState,
    ScriptHost, ScriptTag,
};
pub use loader::{LoadedModule, LoaderStrategy, MfeLoader, ModuleImporter, RemoteModule};
pub use models::{FailureRecord, LoadOutcome, MfeStatus, RemoteInfo, Summary};
