use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::warn;

use crate::core::{Matrix, Point, Rect, Size};
use crate::render::{Geometry, HandleAllocator, LayerId, VisualHandle, VisualSurface};

const DEFAULT_FONT_SIZE_PX: f64 = 10.0;

/// Last state pushed to one visual.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualRecord {
    pub layer: Option<LayerId>,
    pub geometry: Option<Geometry>,
    pub transform: Option<Matrix>,
    pub clip: Option<Rect>,
    pub text: Option<String>,
    pub position: Option<Point>,
}

impl VisualRecord {
    /// Geometry mapped through the current transform (identity when unset).
    #[must_use]
    pub fn rendered_geometry(&self) -> Option<Geometry> {
        let geometry = self.geometry.as_ref()?;
        Some(geometry.transformed(&self.transform.unwrap_or_default()))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerRecord {
    pub name: String,
    pub visuals: Vec<VisualHandle>,
}

/// Headless surface that remembers everything pushed to it.
///
/// Used by tests, benches and hosts without a visual tree. Text is measured
/// with a deterministic per-character width estimate.
#[derive(Debug)]
pub struct RecordingSurface {
    allocator: HandleAllocator,
    layers: IndexMap<LayerId, LayerRecord>,
    visuals: HashMap<VisualHandle, VisualRecord>,
    next_layer: u32,
    font_size_px: f64,
    pub added_count: usize,
    pub removed_count: usize,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: HandleAllocator::new(),
            layers: IndexMap::new(),
            visuals: HashMap::new(),
            next_layer: 0,
            font_size_px: DEFAULT_FONT_SIZE_PX,
            added_count: 0,
            removed_count: 0,
        }
    }

    #[must_use]
    pub fn with_font_size_px(mut self, font_size_px: f64) -> Self {
        if font_size_px.is_finite() && font_size_px > 0.0 {
            self.font_size_px = font_size_px;
        }
        self
    }

    #[must_use]
    pub fn visual(&self, visual: VisualHandle) -> Option<&VisualRecord> {
        self.visuals.get(&visual)
    }

    #[must_use]
    pub fn layer(&self, layer: LayerId) -> Option<&LayerRecord> {
        self.layers.get(&layer)
    }

    #[must_use]
    pub fn layer_by_name(&self, name: &str) -> Option<(LayerId, &LayerRecord)> {
        self.layers
            .iter()
            .find(|(_, record)| record.name == name)
            .map(|(id, record)| (*id, record))
    }

    /// Visuals attached to the layer called `name`, in attach order.
    #[must_use]
    pub fn visuals_in(&self, name: &str) -> Vec<&VisualRecord> {
        self.layer_by_name(name)
            .map(|(_, record)| {
                record
                    .visuals
                    .iter()
                    .filter_map(|handle| self.visuals.get(handle))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn attached_visual_count(&self) -> usize {
        self.layers.values().map(|layer| layer.visuals.len()).sum()
    }

    fn record_mut(&mut self, visual: VisualHandle) -> &mut VisualRecord {
        self.visuals.entry(visual).or_default()
    }
}

fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

impl VisualSurface for RecordingSurface {
    fn allocator(&self) -> HandleAllocator {
        self.allocator.clone()
    }

    fn create_layer(&mut self, name: &str) -> LayerId {
        self.next_layer += 1;
        let id = LayerId::new(self.next_layer);
        self.layers.insert(
            id,
            LayerRecord {
                name: name.to_owned(),
                visuals: Vec::new(),
            },
        );
        id
    }

    fn delete_layer(&mut self, layer: LayerId) {
        let Some(record) = self.layers.shift_remove(&layer) else {
            warn!(layer = layer.raw(), "delete of unknown layer");
            return;
        };
        for visual in record.visuals {
            self.visuals.remove(&visual);
            self.removed_count += 1;
        }
    }

    fn add(&mut self, layer: LayerId, visual: VisualHandle) {
        let Some(record) = self.layers.get_mut(&layer) else {
            warn!(layer = layer.raw(), visual = visual.raw(), "add to unknown layer");
            return;
        };
        if record.visuals.contains(&visual) {
            warn!(layer = layer.raw(), visual = visual.raw(), "visual already attached");
            return;
        }
        record.visuals.push(visual);
        self.added_count += 1;
        self.record_mut(visual).layer = Some(layer);
    }

    fn remove(&mut self, layer: LayerId, visual: VisualHandle) {
        let Some(record) = self.layers.get_mut(&layer) else {
            warn!(layer = layer.raw(), visual = visual.raw(), "remove from unknown layer");
            return;
        };
        let before = record.visuals.len();
        record.visuals.retain(|attached| *attached != visual);
        if record.visuals.len() == before {
            warn!(layer = layer.raw(), visual = visual.raw(), "visual was not attached");
            return;
        }
        self.removed_count += 1;
        self.visuals.remove(&visual);
    }

    fn set_geometry(&mut self, visual: VisualHandle, geometry: Geometry) {
        self.record_mut(visual).geometry = Some(geometry);
    }

    fn set_transform(&mut self, visual: VisualHandle, matrix: Matrix) {
        self.record_mut(visual).transform = Some(matrix);
    }

    fn set_clip(&mut self, visual: VisualHandle, clip: Option<Rect>) {
        self.record_mut(visual).clip = clip;
    }

    fn set_text(&mut self, visual: VisualHandle, text: &str) {
        self.record_mut(visual).text = Some(text.to_owned());
    }

    fn set_position(&mut self, visual: VisualHandle, position: Point) {
        self.record_mut(visual).position = Some(position);
    }

    fn measure(&self, visual: VisualHandle) -> Size {
        let text = self
            .visuals
            .get(&visual)
            .and_then(|record| record.text.as_deref())
            .unwrap_or_default();
        if text.is_empty() {
            return Size::default();
        }
        Size::new(
            estimate_text_width_px(text, self.font_size_px),
            self.font_size_px,
        )
    }
}
