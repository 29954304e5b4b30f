//! Presentation-side status reporting.

pub mod badge;
pub mod panel;
pub mod reporter;

pub use badge::EnvironmentBadge;
pub use panel::{diagnostic_panel, render_panel_html};
pub use reporter::StatusReporter;
