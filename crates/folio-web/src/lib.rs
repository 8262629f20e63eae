#![forbid(unsafe_code)]

//! `folio-web` runs a Folio page inside a browser host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) pushes DOM events and
//!   layout updates.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`step_page::StepPage`] is the portable core. On `wasm32` the `FolioPage`
//! type exposes it to JavaScript with a JSON-in / JSON-out API.

pub mod step_page;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioPage;

use core::time::Duration;
use std::collections::BTreeMap;

use folio_core::geometry::{Region, StaticLayout};
use folio_core::mutation::{NotificationPhase, UiMutation};
use folio_runtime::page::{PageError, PageNotice};
use serde::{Deserialize, Serialize};

pub use step_page::{StepPage, StepResult};

const BATCH_HASH_ALGO: &str = "fnv1a64";
const FNV64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x100000001b3;

/// Web bridge error type.
#[derive(Debug)]
pub enum WebError {
    /// The page could not be built.
    Page(PageError),
    /// A JSON payload from the host was malformed.
    Json(serde_json::Error),
}

impl core::fmt::Display for WebError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Page(e) => write!(f, "page: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Page(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<PageError> for WebError {
    fn from(e: PageError) -> Self {
        Self::Page(e)
    }
}

impl From<serde_json::Error> for WebError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Earlier times are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Layout snapshot as the host measures it.
///
/// ```json
/// { "viewport_height": 800, "regions": { "home": { "top": 0, "height": 900 } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSnapshot {
    pub viewport_height: f64,
    pub regions: BTreeMap<String, Region>,
}

impl LayoutSnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, WebError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the snapshot on top of an existing layout.
    pub fn apply_to(&self, layout: &mut StaticLayout) {
        layout.set_viewport_height(self.viewport_height);
        for (id, region) in &self.regions {
            layout.set_region(id.clone(), *region);
        }
    }

    /// Build a fresh layout from the snapshot.
    #[must_use]
    pub fn to_layout(&self) -> StaticLayout {
        let mut layout = StaticLayout::new(self.viewport_height);
        self.apply_to(&mut layout);
        layout
    }
}

/// Captured outputs for host consumption.
#[derive(Debug, Default, Clone)]
pub struct WebOutputs {
    /// Mutations to apply, in order.
    pub mutations: Vec<UiMutation>,
    /// Completion notices.
    pub notices: Vec<PageNotice>,
    /// Deterministic hash of `mutations`, set by the step that produced them.
    pub batch_hash: Option<String>,
}

#[derive(Serialize)]
struct OutputsPayload<'a> {
    mutations: &'a [UiMutation],
    notices: &'a [PageNotice],
    hash: Option<&'a str>,
}

impl WebOutputs {
    /// Whether there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.notices.is_empty()
    }

    /// Serialize the mutation batch, notices and hash for the JS bridge.
    pub fn to_json(&self) -> Result<String, WebError> {
        Ok(serde_json::to_string(&OutputsPayload {
            mutations: &self.mutations,
            notices: &self.notices,
            hash: self.batch_hash.as_deref(),
        })?)
    }
}

#[must_use]
fn fnv1a64_extend(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV64_PRIME);
    }
    hash
}

#[must_use]
fn hash_str(hash: u64, s: &str) -> u64 {
    let len = s.len() as u64;
    let hash = fnv1a64_extend(hash, &len.to_le_bytes());
    fnv1a64_extend(hash, s.as_bytes())
}

#[must_use]
fn hash_mutation(hash: u64, mutation: &UiMutation) -> u64 {
    match mutation {
        UiMutation::AddClass { target, class } => {
            let hash = fnv1a64_extend(hash, &[0]);
            hash_str(hash_str(hash, target), class.as_str())
        }
        UiMutation::RemoveClass { target, class } => {
            let hash = fnv1a64_extend(hash, &[1]);
            hash_str(hash_str(hash, target), class.as_str())
        }
        UiMutation::SetText { target, text } => {
            let hash = fnv1a64_extend(hash, &[2]);
            hash_str(hash_str(hash, target), text)
        }
        UiMutation::SetStyle {
            target,
            property,
            value,
        } => {
            let hash = fnv1a64_extend(hash, &[3]);
            hash_str(hash_str(hash_str(hash, target), property.as_str()), value)
        }
        UiMutation::ScrollIntoView { target, smooth } => {
            let hash = fnv1a64_extend(hash, &[4]);
            fnv1a64_extend(hash_str(hash, target), &[u8::from(*smooth)])
        }
        UiMutation::AppendRipple { target, ripple } => {
            let hash = fnv1a64_extend(hash, &[5]);
            fnv1a64_extend(hash_str(hash, target), &ripple.to_le_bytes())
        }
        UiMutation::RemoveRipple { target, ripple } => {
            let hash = fnv1a64_extend(hash, &[6]);
            fnv1a64_extend(hash_str(hash, target), &ripple.to_le_bytes())
        }
        UiMutation::RemoveElement { target } => hash_str(fnv1a64_extend(hash, &[7]), target),
        UiMutation::ShowNotification { id, kind, message } => {
            let hash = fnv1a64_extend(fnv1a64_extend(hash, &[8]), &id.to_le_bytes());
            hash_str(hash_str(hash, kind.as_str()), message)
        }
        UiMutation::SetNotificationPhase { id, phase } => {
            let phase = match phase {
                NotificationPhase::Entering => 0u8,
                NotificationPhase::Visible => 1,
                NotificationPhase::Exiting => 2,
            };
            let hash = fnv1a64_extend(fnv1a64_extend(hash, &[9]), &id.to_le_bytes());
            fnv1a64_extend(hash, &[phase])
        }
        UiMutation::RemoveNotification { id } => {
            fnv1a64_extend(fnv1a64_extend(hash, &[10]), &id.to_le_bytes())
        }
        UiMutation::ShowFieldError { field, message } => {
            let hash = fnv1a64_extend(hash, &[11]);
            hash_str(hash_str(hash, field), message)
        }
        UiMutation::ClearFieldError { field } => hash_str(fnv1a64_extend(hash, &[12]), field),
        UiMutation::ResetForm { form } => hash_str(fnv1a64_extend(hash, &[13]), form),
    }
}

/// Stable hash of a mutation batch, formatted `fnv1a64:<16 hex digits>`.
///
/// Two runs that produce the same batch produce the same hash, so replays can
/// be compared without shipping the batch.
#[must_use]
pub fn mutation_batch_hash(mutations: &[UiMutation]) -> String {
    let mut hash = FNV64_OFFSET_BASIS;
    let count = mutations.len() as u64;
    hash = fnv1a64_extend(hash, &count.to_le_bytes());
    for mutation in mutations {
        hash = hash_mutation(hash, mutation);
    }
    format!("{BATCH_HASH_ALGO}:{hash:016x}")
}
