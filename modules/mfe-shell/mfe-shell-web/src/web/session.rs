use mfe_shell_sdk::{AuthError, SessionStore};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// `window.sessionStorage`: the signed-in user lives as long as the tab.
pub struct SessionStorageStore {
    storage: Storage,
}

impl SessionStorageStore {
    pub fn new() -> Result<Self, JsValue> {
        let storage = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .session_storage()?
            .ok_or_else(|| JsValue::from_str("sessionStorage unavailable"))?;
        Ok(Self { storage })
    }
}

fn session_error(e: &JsValue) -> AuthError {
    AuthError::Session(super::js_reason(e))
}

impl SessionStore for SessionStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, AuthError> {
        self.storage.get_item(key).map_err(|e| session_error(&e))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.storage.set_item(key, value).map_err(|e| session_error(&e))
    }

    fn clear(&self, key: &str) -> Result<(), AuthError> {
        self.storage.remove_item(key).map_err(|e| session_error(&e))
    }
}
