use mfe_shell_sdk::{GlobalCallError, GlobalScope};
use wasm_bindgen::{JsCast, JsValue};

/// The page's `window` object.
pub struct WindowGlobalScope;

impl WindowGlobalScope {
    fn lookup(name: &str) -> Option<js_sys::Function> {
        let window = web_sys::window()?;
        js_sys::Reflect::get(&window, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()
    }
}

impl GlobalScope for WindowGlobalScope {
    fn has_function(&self, name: &str) -> bool {
        Self::lookup(name).is_some()
    }

    fn call_function(&self, name: &str, arg: &str) -> Result<(), GlobalCallError> {
        let function = Self::lookup(name).ok_or_else(|| GlobalCallError::Missing(name.to_owned()))?;
        function
            .call1(&JsValue::UNDEFINED, &JsValue::from_str(arg))
            .map(|_| ())
            .map_err(|e| GlobalCallError::Threw {
                name: name.to_owned(),
                reason: super::js_reason(&e),
            })
    }
}
