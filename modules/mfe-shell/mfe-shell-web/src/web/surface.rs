//! DOM presentation surface.
//!
//! A remote's region is the closest `[data-mfe-region]` ancestor of its
//! container (or the container itself). Inside it, `[data-mfe-header]` gets
//! the success class and `[data-mfe-content]` receives the diagnostic panel.

use mfe_shell::ui::{EnvironmentBadge, render_panel_html};
use mfe_shell_sdk::{AuthState, DiagnosticPanel, PresentationSurface, RegionState, SurfaceError};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

const SUCCESS_CLASS: &str = "mfe-loaded";

pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn part(&self, container_id: &str, marker: &str) -> Result<Option<Element>, SurfaceError> {
        let Some(container) = self.document.get_element_by_id(container_id) else {
            return Ok(None);
        };
        let error = |e: &JsValue| SurfaceError {
            container_id: container_id.to_owned(),
            reason: super::js_reason(e),
        };
        let region = container
            .closest("[data-mfe-region]")
            .map_err(|e| error(&e))?
            .unwrap_or(container);
        region.query_selector(marker).map_err(|e| error(&e))
    }

    /// Environment label in `#env-badge`, hidden in production.
    pub fn show_badge(&self, badge: Option<EnvironmentBadge>) {
        let Some(element) = self.document.get_element_by_id("env-badge") else {
            return;
        };
        let result = match badge {
            Some(badge) => {
                element.set_text_content(Some(badge.label));
                element.set_attribute("style", &format!("background: {}", badge.color))
            }
            None => element.set_attribute("hidden", ""),
        };
        if let Err(e) = result {
            tracing::warn!(error = %super::js_reason(&e), "failed to render environment badge");
        }
    }

    /// Reflect the auth state on `<body data-auth>` so the page can switch
    /// between the login screen and the shell layout.
    pub fn show_auth_state(&self, state: &AuthState) {
        let Some(body) = self.document.body() else {
            return;
        };
        let value = if state.is_authenticated { "signed-in" } else { "signed-out" };
        if let Err(e) = body.set_attribute("data-auth", value) {
            tracing::warn!(error = %super::js_reason(&e), "failed to update auth state marker");
        }
    }
}

impl PresentationSurface for DomSurface {
    fn apply_success(&self, container_id: &str) -> Result<RegionState, SurfaceError> {
        let Some(header) = self.part(container_id, "[data-mfe-header]")? else {
            return Ok(RegionState::Absent);
        };
        header
            .class_list()
            .add_1(SUCCESS_CLASS)
            .map_err(|e| SurfaceError {
                container_id: container_id.to_owned(),
                reason: super::js_reason(&e),
            })?;
        Ok(RegionState::Applied)
    }

    fn show_panel(
        &self,
        container_id: &str,
        panel: &DiagnosticPanel,
    ) -> Result<RegionState, SurfaceError> {
        let Some(content) = self.part(container_id, "[data-mfe-content]")? else {
            return Ok(RegionState::Absent);
        };
        content.set_inner_html(&render_panel_html(panel));
        Ok(RegionState::Applied)
    }
}
