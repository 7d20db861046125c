//! Selection set, corner handles, and multi-select group transforms.

use crate::error::{EngineError, EngineResult};
use crate::hierarchy;
use crate::scene::{ComponentId, MIN_SIZE, Scene};
use crate::snap::{EdgeSide, MovingEdges};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Below this a bounding-box extent counts as zero.
const DEGENERATE_EPSILON: f64 = 1e-6;

/// Ordered set of selected component ids. Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ComponentId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.ids.contains(&id)
    }

    /// The only selected id, if exactly one is selected.
    pub fn single(&self) -> Option<ComponentId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Replace the selection with one id.
    pub fn select_only(&mut self, id: ComponentId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ComponentId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Add or remove `id`. Returns true if it is now selected.
    pub fn toggle(&mut self, id: ComponentId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer exist in the scene or are hidden, directly or
    /// through an ancestor.
    pub fn retain_selectable(&mut self, scene: &Scene) {
        self.ids.retain(|&id| hierarchy::is_effectively_visible(scene, id));
    }
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// The fixed anchor corner while this one is dragged.
    pub fn opposite(self) -> Self {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Position of this corner on `rect`.
    pub fn point(self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }

    /// The two edges this corner moves.
    pub fn moving_edges(self) -> MovingEdges {
        let (x, y) = match self {
            Corner::TopLeft => (EdgeSide::Near, EdgeSide::Near),
            Corner::TopRight => (EdgeSide::Far, EdgeSide::Near),
            Corner::BottomLeft => (EdgeSide::Near, EdgeSide::Far),
            Corner::BottomRight => (EdgeSide::Far, EdgeSide::Far),
        };
        MovingEdges { x: Some(x), y: Some(y) }
    }
}

/// A resize handle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub corner: Corner,
}

impl Handle {
    pub fn new(position: Point, corner: Corner) -> Self {
        Self { position, corner }
    }

    /// Check if a canvas point lies inside the square hit box of side `size`.
    /// `size` should already be divided by the viewport scale.
    pub fn hit_test(&self, point: Point, size: f64) -> bool {
        let half = size / 2.0;
        (point.x - self.position.x).abs() <= half && (point.y - self.position.y).abs() <= half
    }
}

/// The four corner handles of `bounds`.
pub fn corner_handles(bounds: Rect) -> Vec<Handle> {
    Corner::ALL
        .iter()
        .map(|&corner| Handle::new(corner.point(bounds), corner))
        .collect()
}

/// Find the handle of `bounds` under `point`, if any.
pub fn hit_test_handles(bounds: Rect, point: Point, size: f64) -> Option<Corner> {
    corner_handles(bounds)
        .into_iter()
        .find(|handle| handle.hit_test(point, size))
        .map(|handle| handle.corner)
}

/// Axis-aligned union of the listed components. Missing ids are skipped.
pub fn bounding_box(scene: &Scene, ids: &[ComponentId]) -> Option<Rect> {
    ids.iter()
        .filter_map(|&id| scene.get(id))
        .map(|c| c.rect())
        .reduce(|acc, r| acc.union(r))
}

/// Raw (un-normalised) rectangle after dragging `corner` of `start` by `delta`.
/// The opposite corner stays where it was.
pub fn drag_corner(start: Rect, corner: Corner, delta: Vec2) -> Rect {
    match corner {
        Corner::TopLeft => Rect::new(start.x0 + delta.x, start.y0 + delta.y, start.x1, start.y1),
        Corner::TopRight => Rect::new(start.x0, start.y0 + delta.y, start.x1 + delta.x, start.y1),
        Corner::BottomLeft => Rect::new(start.x0 + delta.x, start.y0, start.x1, start.y1 + delta.y),
        Corner::BottomRight => {
            Rect::new(start.x0, start.y0, start.x1 + delta.x, start.y1 + delta.y)
        }
    }
}

/// Smallest box size a group can shrink to before its smallest member
/// would drop below [`MIN_SIZE`].
pub fn group_floor(bounds: Rect, members: &[Rect]) -> Size {
    let min_w = members.iter().map(|r| r.width()).fold(f64::INFINITY, f64::min);
    let min_h = members.iter().map(|r| r.height()).fold(f64::INFINITY, f64::min);
    if !min_w.is_finite() || !min_h.is_finite() || min_w <= 0.0 || min_h <= 0.0 {
        return Size::new(MIN_SIZE, MIN_SIZE);
    }
    Size::new(
        bounds.width() * (MIN_SIZE / min_w).min(1.0),
        bounds.height() * (MIN_SIZE / min_h).min(1.0),
    )
}

/// Push the moving edges of `raw` out so the box is at least `floor` in size,
/// keeping the anchor edges fixed.
pub fn enforce_floor(raw: Rect, moving: MovingEdges, floor: Size) -> Rect {
    let mut rect = raw;
    match moving.x {
        Some(EdgeSide::Far) if rect.x1 - rect.x0 < floor.width => rect.x1 = rect.x0 + floor.width,
        Some(EdgeSide::Near) if rect.x1 - rect.x0 < floor.width => rect.x0 = rect.x1 - floor.width,
        _ => {}
    }
    match moving.y {
        Some(EdgeSide::Far) if rect.y1 - rect.y0 < floor.height => {
            rect.y1 = rect.y0 + floor.height
        }
        Some(EdgeSide::Near) if rect.y1 - rect.y0 < floor.height => {
            rect.y0 = rect.y1 - floor.height
        }
        _ => {}
    }
    rect
}

/// Map every member from `old_box` into `new_box` with independent per-axis
/// scale factors.
///
/// Fails with [`EngineError::DegenerateBounds`] if `old_box` has no extent and
/// with [`EngineError::BelowGroupMinimum`] if any member would shrink below
/// [`MIN_SIZE`]; nothing is partially applied.
pub fn scale_group(
    members: &[(ComponentId, Rect)],
    old_box: Rect,
    new_box: Rect,
) -> EngineResult<Vec<(ComponentId, Rect)>> {
    if old_box.width() < DEGENERATE_EPSILON || old_box.height() < DEGENERATE_EPSILON {
        return Err(EngineError::DegenerateBounds);
    }
    let sx = new_box.width() / old_box.width();
    let sy = new_box.height() / old_box.height();

    let mut out = Vec::with_capacity(members.len());
    for &(id, rect) in members {
        let size = Size::new(rect.width() * sx, rect.height() * sy);
        let floor = MIN_SIZE - DEGENERATE_EPSILON;
        if size.width < floor || size.height < floor {
            return Err(EngineError::BelowGroupMinimum);
        }
        let origin = Point::new(
            new_box.x0 + (rect.x0 - old_box.x0) * sx,
            new_box.y0 + (rect.y0 - old_box.y0) * sy,
        );
        // Absorb rounding right at the floor.
        let size = Size::new(size.width.max(MIN_SIZE), size.height.max(MIN_SIZE));
        out.push((id, Rect::from_origin_size(origin, size)));
    }
    Ok(out)
}
