//! Federation imports compiled into the shell.
//!
//! Each import target is a string literal in the JS shim below, so the
//! bundler resolves it at build time; nothing here builds a target from
//! runtime data.

use std::rc::Rc;

use mfe_shell::FederationTable;
use mfe_shell_sdk::{LoadError, ModuleImporter, RemoteModule};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = "
export function importProducts() { return import('productsMFE/ProductsApp'); }
export function importCart() { return import('cartMFE/CartApp'); }
")]
extern "C" {
    #[wasm_bindgen(js_name = importProducts)]
    fn import_products() -> js_sys::Promise;

    #[wasm_bindgen(js_name = importCart)]
    fn import_cart() -> js_sys::Promise;
}

struct StaticImport {
    specifier: &'static str,
    import: fn() -> js_sys::Promise,
}

#[async_trait::async_trait(?Send)]
impl ModuleImporter for StaticImport {
    fn specifier(&self) -> &str {
        self.specifier
    }

    async fn import(&self) -> Result<Box<dyn RemoteModule>, LoadError> {
        let module = JsFuture::from((self.import)())
            .await
            .map_err(|e| LoadError::Import {
                module: self.specifier.to_owned(),
                reason: super::js_reason(&e),
            })?;
        Ok(Box::new(JsModule {
            specifier: self.specifier,
            module,
        }))
    }
}

/// An imported ES module namespace object.
struct JsModule {
    specifier: &'static str,
    module: JsValue,
}

impl JsModule {
    /// `mount` export, falling back to `default.mount`.
    fn mount_export(&self) -> Option<js_sys::Function> {
        let get = |target: &JsValue, key: &str| js_sys::Reflect::get(target, &JsValue::from_str(key)).ok();
        get(&self.module, "mount")
            .filter(JsValue::is_function)
            .or_else(|| {
                get(&self.module, "default")
                    .and_then(|d| get(&d, "mount"))
                    .filter(JsValue::is_function)
            })
            .map(JsCast::unchecked_into)
    }
}

impl RemoteModule for JsModule {
    fn exposed_as(&self) -> &str {
        self.specifier
    }

    fn mount(&self, mount_id: &str) -> Option<Result<(), String>> {
        let mount = self.mount_export()?;
        Some(
            mount
                .call1(&self.module, &JsValue::from_str(mount_id))
                .map(|_| ())
                .map_err(|e| super::js_reason(&e)),
        )
    }
}

pub fn federation_table() -> FederationTable {
    FederationTable::new()
        .with(Rc::new(StaticImport {
            specifier: "productsMFE/ProductsApp",
            import: import_products,
        }))
        .with(Rc::new(StaticImport {
            specifier: "cartMFE/CartApp",
            import: import_cart,
        }))
}
