#![forbid(unsafe_code)]

//! Geometric primitives and the on-demand layout accessor.
//!
//! Page coordinates are CSS pixels measured from the top of the document.
//! Only the vertical axis matters to scroll and viewport logic, so a region is
//! a `(top, height)` span rather than a full rectangle.

use std::collections::HashMap;

/// A vertical span of the document occupied by an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    /// Top edge (inclusive), as reported by `offsetTop`.
    pub top: f64,
    /// Height, as reported by `offsetHeight`.
    pub height: f64,
}

impl Region {
    /// Create a new region.
    #[inline]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether `y` lies in `[top, bottom)`.
    #[inline]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom()
    }

    /// Length of the overlap between this region and `[start, end)`.
    #[inline]
    pub fn overlap(&self, start: f64, end: f64) -> f64 {
        (self.bottom().min(end) - self.top.max(start)).max(0.0)
    }

    /// Fraction of this region inside `[start, end)`, in `[0.0, 1.0]`.
    ///
    /// A zero-height region counts as fully visible when its top lies inside
    /// the band, and invisible otherwise.
    pub fn visible_fraction(&self, start: f64, end: f64) -> f64 {
        if self.height <= 0.0 {
            return if self.top >= start && self.top < end {
                1.0
            } else {
                0.0
            };
        }
        (self.overlap(start, end) / self.height).clamp(0.0, 1.0)
    }
}

/// Read-only access to live layout, queried at tick time.
///
/// The DOM side answers these from `window.innerHeight` and
/// `element.offsetTop` / `offsetHeight`.
pub trait LayoutSource {
    /// Current viewport height.
    fn viewport_height(&self) -> f64;

    /// Region occupied by the element with `id`, if it exists.
    fn region(&self, id: &str) -> Option<Region>;
}

/// In-memory [`LayoutSource`] updated explicitly by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    viewport_height: f64,
    regions: HashMap<String, Region>,
}

impl StaticLayout {
    /// Create an empty layout with the given viewport height.
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            regions: HashMap::new(),
        }
    }

    /// Builder: add a region.
    #[must_use]
    pub fn with_region(mut self, id: impl Into<String>, region: Region) -> Self {
        self.regions.insert(id.into(), region);
        self
    }

    /// Set or replace the region for `id`.
    pub fn set_region(&mut self, id: impl Into<String>, region: Region) {
        self.regions.insert(id.into(), region);
    }

    /// Update the viewport height.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }
}

impl LayoutSource for StaticLayout {
    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn region(&self, id: &str) -> Option<Region> {
        self.regions.get(id).copied()
    }
}
