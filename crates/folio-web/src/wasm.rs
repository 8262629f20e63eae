#![forbid(unsafe_code)]

use core::time::Duration;

use folio_core::geometry::{Region, StaticLayout};
use folio_runtime::config::PageConfig;
use folio_runtime::event::PageEvent;
use folio_runtime::markup::PageMarkup;
use folio_runtime::page::Page;
use wasm_bindgen::prelude::*;

use crate::{LayoutSnapshot, StepPage, WebError};

fn to_js(err: impl Into<WebError>) -> JsValue {
    js_sys::Error::new(&err.into().to_string()).into()
}

fn ms(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value / 1000.0)
    } else {
        Duration::ZERO
    }
}

/// A Folio page driven from JavaScript.
///
/// Every payload crosses the boundary as JSON:
/// - `new(markup, config, layout)`: `PageMarkup`, optional `PageConfig`,
///   `LayoutSnapshot`.
/// - `pushEvent`: one `PageEvent`, e.g. `{"kind":"scroll","offset":120}`.
/// - `step` returns `{"mutations":[...],"notices":[...],"hash":"fnv1a64:..."}`.
///
/// Layout setters queue a `layout_changed` event, so elements they move
/// into view are reported by the next `step`.
#[wasm_bindgen]
pub struct FolioPage {
    inner: StepPage<StaticLayout>,
}

#[wasm_bindgen]
impl FolioPage {
    #[wasm_bindgen(constructor)]
    pub fn new(markup: &str, config: Option<String>, layout: &str) -> Result<FolioPage, JsValue> {
        let markup =
            PageMarkup::from_json_str(markup).map_err(|e| to_js(WebError::Page(e.into())))?;
        let config = match config {
            Some(json) => {
                PageConfig::from_json_str(&json).map_err(|e| to_js(WebError::Page(e.into())))?
            }
            None => PageConfig::default(),
        };
        let layout = LayoutSnapshot::from_json_str(layout).map_err(to_js)?.to_layout();
        let page = Page::new(markup, config, layout, Default::default()).map_err(to_js)?;
        Ok(Self {
            inner: StepPage::new(page),
        })
    }

    /// Queue a DOM event for the next `step`.
    #[wasm_bindgen(js_name = pushEvent)]
    pub fn push_event(&mut self, event: &str) -> Result<(), JsValue> {
        let event = PageEvent::from_json_str(event).map_err(to_js)?;
        self.inner.push_event(event);
        Ok(())
    }

    /// Advance the page clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time(ms(dt_ms));
    }

    /// Set the page clock to `now_ms` (`performance.now()`).
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, now_ms: f64) {
        self.inner.set_time(ms(now_ms));
    }

    /// Update the viewport height (`window.innerHeight`).
    #[wasm_bindgen(js_name = setViewportHeight)]
    pub fn set_viewport_height(&mut self, height: f64) {
        self.inner
            .update_layout(|layout| layout.set_viewport_height(height));
    }

    /// Update one element's region (`offsetTop`, `offsetHeight`).
    #[wasm_bindgen(js_name = setRegion)]
    pub fn set_region(&mut self, id: &str, top: f64, height: f64) {
        self.inner
            .update_layout(|layout| layout.set_region(id, Region::new(top, height)));
    }

    /// Apply a whole `LayoutSnapshot`.
    #[wasm_bindgen(js_name = applyLayout)]
    pub fn apply_layout(&mut self, layout: &str) -> Result<(), JsValue> {
        let snapshot = LayoutSnapshot::from_json_str(layout).map_err(to_js)?;
        self.inner.update_layout(|layout| snapshot.apply_to(layout));
        Ok(())
    }

    /// Run one step and return the produced mutations as JSON.
    pub fn step(&mut self) -> Result<String, JsValue> {
        self.inner.step();
        self.inner.take_outputs().to_json().map_err(to_js)
    }

    /// Whether nothing is scheduled; the host may stop its frame loop.
    #[wasm_bindgen(js_name = isIdle)]
    pub fn is_idle(&self) -> bool {
        self.inner.pending_events() == 0 && self.inner.page().is_idle()
    }

    /// Earliest pending timer deadline in milliseconds, if any.
    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner
            .page()
            .next_deadline()
            .map(|d| d.as_secs_f64() * 1000.0)
    }
}
