mod geometry;
mod recording_surface;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub use geometry::{Geometry, PathFigure};
pub use recording_surface::{LayerRecord, RecordingSurface, VisualRecord};

use crate::core::{Matrix, Point, Rect, Size};

/// Opaque identity of one host visual. The core never looks inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(u64);

impl VisualHandle {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

/// Identity of a layer (the container a component attaches its visuals to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u32);

impl LayerId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Shared handle counter; clones mint from the same sequence.
///
/// Recycler factories capture a clone so they can create visuals without
/// borrowing the surface.
#[derive(Debug, Clone, Default)]
pub struct HandleAllocator {
    next: Rc<Cell<u64>>,
}

impl HandleAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self) -> VisualHandle {
        let raw = self.next.get() + 1;
        self.next.set(raw);
        VisualHandle(raw)
    }

    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next.get()
    }
}

/// Contract implemented by the host visual tree.
///
/// Components create visuals through [`HandleAllocator`], attach them to
/// their own layer and push geometry, transforms and text; the host decides
/// how (and whether) anything reaches pixels.
pub trait VisualSurface {
    fn allocator(&self) -> HandleAllocator;

    fn create_layer(&mut self, name: &str) -> LayerId;

    fn delete_layer(&mut self, layer: LayerId);

    fn add(&mut self, layer: LayerId, visual: VisualHandle);

    fn remove(&mut self, layer: LayerId, visual: VisualHandle);

    fn set_geometry(&mut self, visual: VisualHandle, geometry: Geometry);

    fn set_transform(&mut self, visual: VisualHandle, matrix: Matrix);

    fn set_clip(&mut self, visual: VisualHandle, clip: Option<Rect>);

    fn set_text(&mut self, visual: VisualHandle, text: &str);

    fn set_position(&mut self, visual: VisualHandle, position: Point);

    /// Desired size of a (text) visual in pixels.
    fn measure(&self, visual: VisualHandle) -> Size;
}
