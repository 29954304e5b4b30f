use std::time::Duration;

use mfe_shell_sdk::Clock;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Performance, Window};

/// `performance.now()` for elapsed time, `setTimeout` for sleeping.
pub struct BrowserClock {
    window: Window,
    performance: Performance,
    origin_ms: f64,
}

impl BrowserClock {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let performance = window
            .performance()
            .ok_or_else(|| JsValue::from_str("performance API unavailable"))?;
        let origin_ms = performance.now();
        Ok(Self {
            window,
            performance,
            origin_ms,
        })
    }
}

#[async_trait::async_trait(?Send)]
impl Clock for BrowserClock {
    fn elapsed(&self) -> Duration {
        let ms = (self.performance.now() - self.origin_ms).max(0.0);
        Duration::from_secs_f64(ms / 1000.0)
    }

    async fn sleep(&self, duration: Duration) {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let timer = js_sys::Promise::new(&mut |resolve, reject| {
            if let Err(e) = self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                && reject.call1(&JsValue::NULL, &e).is_err()
            {
                tracing::warn!("setTimeout failed and the timer could not be rejected");
            }
        });
        if let Err(e) = JsFuture::from(timer).await {
            tracing::warn!(error = %super::js_reason(&e), "timer failed, resuming early");
        }
    }
}
