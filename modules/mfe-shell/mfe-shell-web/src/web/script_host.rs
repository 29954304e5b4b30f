use mfe_shell_sdk::{ScriptFailure, ScriptHost, ScriptTag};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlScriptElement};

/// Appends `<script>` elements to `document.head` and waits on their
/// load/error events.
pub struct DomScriptHost {
    document: Document,
}

impl DomScriptHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn create(&self, tag: &ScriptTag) -> Result<HtmlScriptElement, JsValue> {
        let script: HtmlScriptElement = self.document.create_element("script")?.dyn_into()?;
        script.set_src(&tag.src);
        script.set_defer(tag.defer);
        script.set_cross_origin(Some(tag.cross_origin.as_attr()));
        Ok(script)
    }
}

#[async_trait::async_trait(?Send)]
impl ScriptHost for DomScriptHost {
    async fn inject(&self, tag: &ScriptTag) -> Result<(), ScriptFailure> {
        let failure = |e: &JsValue| ScriptFailure::new(&tag.src, super::js_reason(e));

        let script = self.create(tag).map_err(|e| failure(&e))?;
        let head = self
            .document
            .head()
            .ok_or_else(|| ScriptFailure::new(&tag.src, "document has no <head>"))?;

        // Handlers are attached before the element is inserted so no event is missed.
        let settled = js_sys::Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });
        head.append_child(&script).map_err(|e| failure(&e))?;

        let result = JsFuture::from(settled).await;
        script.set_onload(None);
        script.set_onerror(None);

        result
            .map(|_| ())
            .map_err(|_| ScriptFailure::new(&tag.src, "script error event"))
    }
}
