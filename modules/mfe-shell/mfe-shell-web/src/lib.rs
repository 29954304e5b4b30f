//! Browser host for the MFE shell.
//!
//! A stub by default so the workspace builds on native targets without a
//! wasm toolchain. Enable the real app with `--features web` on a wasm32
//! target.

/// Placeholder for non-web (or non-wasm) builds.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
pub fn placeholder() {
    // No-op.
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{login, logout, start};
