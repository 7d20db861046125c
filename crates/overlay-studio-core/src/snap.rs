//! Snapping of candidate rectangles to the canvas, other components, and the grid.
//!
//! Each axis is resolved on its own with a fixed priority, first match wins:
//!
//! 1. canvas midline (rectangle centre or either edge)
//! 2. other components (near-near, far-far, near-far, far-near, centre-centre)
//! 3. canvas boundary
//! 4. grid, only when nothing above fired
//!
//! Rules 1-3 emit a [`SnapGuide`] for the renderer; the grid does not.

use crate::hierarchy::HierarchyIndex;
use crate::scene::{ComponentId, MIN_SIZE, Scene};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default snap distance in canvas pixels.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;

/// Snap distances offered by the editor.
pub const SNAP_THRESHOLD_PRESETS: [f64; 7] = [5.0, 10.0, 15.0, 20.0, 25.0, 35.0, 50.0];

/// Grid spacing presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GridSpacing {
    /// 5px grid.
    Fine,
    /// 10px grid.
    #[default]
    Normal,
    /// 20px grid.
    Coarse,
}

impl GridSpacing {
    /// Spacing in canvas pixels.
    pub fn pixels(self) -> f64 {
        match self {
            GridSpacing::Fine => 5.0,
            GridSpacing::Normal => 10.0,
            GridSpacing::Coarse => 20.0,
        }
    }

    /// Cycle to the next spacing.
    pub fn next(self) -> Self {
        match self {
            GridSpacing::Fine => GridSpacing::Normal,
            GridSpacing::Normal => GridSpacing::Coarse,
            GridSpacing::Coarse => GridSpacing::Fine,
        }
    }

    /// Coarse grids also offer the canvas midpoint as a snap point.
    pub fn is_coarse(self) -> bool {
        self == GridSpacing::Coarse
    }
}

/// User-facing snapping options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Grid fallback on/off.
    pub grid_enabled: bool,
    /// Grid spacing.
    pub grid_spacing: GridSpacing,
    /// Snap distance in canvas pixels.
    pub threshold: f64,
    /// Snap to other components.
    pub element_guides: bool,
    /// Snap to the canvas midlines and boundary.
    pub canvas_guides: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            grid_enabled: false,
            grid_spacing: GridSpacing::default(),
            threshold: DEFAULT_SNAP_THRESHOLD,
            element_guides: true,
            canvas_guides: true,
        }
    }
}

/// Axis a guide belongs to. An `X` guide is a vertical line at `x = position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn extent(self, rect: &Rect) -> (f64, f64) {
        match self {
            Axis::X => (rect.x0, rect.x1),
            Axis::Y => (rect.y0, rect.y1),
        }
    }

    fn cross_extent(self, rect: &Rect) -> (f64, f64) {
        match self {
            Axis::X => (rect.y0, rect.y1),
            Axis::Y => (rect.x0, rect.x1),
        }
    }

    fn canvas_extent(self, canvas: Size) -> f64 {
        match self {
            Axis::X => canvas.width,
            Axis::Y => canvas.height,
        }
    }

    fn with_extent(self, rect: Rect, near: f64, far: f64) -> Rect {
        match self {
            Axis::X => Rect::new(near, rect.y0, far, rect.y1),
            Axis::Y => Rect::new(rect.x0, near, rect.x1, far),
        }
    }
}

/// What a guide snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuideKind {
    CanvasCenter,
    CanvasEdge,
    ElementEdge,
    ElementCenter,
}

/// Drawn extent of a guide along its own line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideSpan {
    pub start: f64,
    pub end: f64,
}

/// Transient alignment indicator produced by a snap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub kind: GuideKind,
    pub axis: Axis,
    /// Snapped coordinate on `axis`.
    pub position: f64,
    /// Bounded extent for element guides; `None` spans the whole canvas.
    pub span: Option<GuideSpan>,
}

impl SnapGuide {
    /// Line endpoints in canvas space, using `canvas` for unbounded guides.
    pub fn endpoints(&self, canvas: Size) -> (Point, Point) {
        let (start, end) = match self.span {
            Some(span) => (span.start, span.end),
            None => (0.0, self.axis_cross_length(canvas)),
        };
        match self.axis {
            Axis::X => (Point::new(self.position, start), Point::new(self.position, end)),
            Axis::Y => (Point::new(start, self.position), Point::new(end, self.position)),
        }
    }

    fn axis_cross_length(&self, canvas: Size) -> f64 {
        match self.axis {
            Axis::X => canvas.height,
            Axis::Y => canvas.width,
        }
    }
}

/// Result of snapping a rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// The snapped rectangle.
    pub rect: Rect,
    /// Guides for every rule that fired.
    pub guides: Vec<SnapGuide>,
    /// Whether the X axis was snapped (any rule, grid included).
    pub snapped_x: bool,
    /// Whether the Y axis was snapped (any rule, grid included).
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(rect: Rect) -> Self {
        Self {
            rect,
            guides: Vec::new(),
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }

    fn mark(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.snapped_x = true,
            Axis::Y => self.snapped_y = true,
        }
    }
}

/// Everything a snap needs besides the candidate rectangle.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    /// Canvas size.
    pub canvas: Size,
    /// Rectangles of visible components that may be snapped to, in scene order.
    pub targets: &'a [Rect],
    /// Active options.
    pub settings: &'a SnapSettings,
    /// Bypass modifier held: only the grid (if enabled) applies.
    pub bypass: bool,
}

/// Which edge of an axis the active handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSide {
    /// Left or top edge.
    Near,
    /// Right or bottom edge.
    Far,
}

/// Moving edges of a resize, per axis. `None` means the axis is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovingEdges {
    pub x: Option<EdgeSide>,
    pub y: Option<EdgeSide>,
}

impl MovingEdges {
    fn get(&self, axis: Axis) -> Option<EdgeSide> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// A rule that fired on one axis, before the span is known.
#[derive(Debug, Clone, Copy)]
struct PendingGuide {
    kind: GuideKind,
    axis: Axis,
    position: f64,
    partner: Option<Rect>,
}

impl PendingGuide {
    fn canvas(kind: GuideKind, axis: Axis, position: f64) -> Self {
        Self {
            kind,
            axis,
            position,
            partner: None,
        }
    }

    fn element(kind: GuideKind, axis: Axis, position: f64, partner: Rect) -> Self {
        Self {
            kind,
            axis,
            position,
            partner: Some(partner),
        }
    }

    /// Bound element guides to the two participants on the cross axis.
    fn finish(self, snapped: &Rect) -> SnapGuide {
        let span = self.partner.map(|partner| {
            let (a0, a1) = self.axis.cross_extent(snapped);
            let (b0, b1) = self.axis.cross_extent(&partner);
            GuideSpan {
                start: a0.min(b0),
                end: a1.max(b1),
            }
        });
        SnapGuide {
            kind: self.kind,
            axis: self.axis,
            position: self.position,
            span,
        }
    }
}

/// Snap a single value to the nearest grid multiple.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_point_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_to_grid(point.x, grid_size), snap_to_grid(point.y, grid_size))
}

/// Collect snap target rectangles: visible components not in `exclude`.
pub fn snap_targets(
    scene: &Scene,
    index: &HierarchyIndex,
    exclude: &HashSet<ComponentId>,
) -> Vec<Rect> {
    scene
        .components()
        .iter()
        .filter(|c| !exclude.contains(&c.id()) && index.is_effectively_visible(c.id()))
        .map(|c| c.rect())
        .collect()
}

fn within(a: f64, b: f64, threshold: f64) -> bool {
    (a - b).abs() <= threshold
}

/// Snapped coordinate plus the guide that produced it, if any.
type AxisSnap = (f64, Option<PendingGuide>);

/// Resolve one axis of a move. Returns the new near-edge coordinate.
fn snap_move_axis(axis: Axis, rect: &Rect, ctx: &SnapContext<'_>) -> Option<AxisSnap> {
    let (near, far) = axis.extent(rect);
    let size = far - near;
    let center = near + size / 2.0;
    let threshold = ctx.settings.threshold;
    let extent = axis.canvas_extent(ctx.canvas);
    let mid = extent / 2.0;
    // (probe coordinate, distance from the near edge to the probe)
    let probes = [(center, size / 2.0), (near, 0.0), (far, size)];

    if !ctx.bypass {
        if ctx.settings.canvas_guides {
            for (probe, offset) in probes {
                if within(probe, mid, threshold) {
                    let guide = PendingGuide::canvas(GuideKind::CanvasCenter, axis, mid);
                    return Some((mid - offset, Some(guide)));
                }
            }
        }

        if ctx.settings.element_guides {
            for target in ctx.targets {
                let (t_near, t_far) = axis.extent(target);
                let t_center = (t_near + t_far) / 2.0;
                let pairs = [
                    (near, t_near, 0.0, GuideKind::ElementEdge),
                    (far, t_far, size, GuideKind::ElementEdge),
                    (near, t_far, 0.0, GuideKind::ElementEdge),
                    (far, t_near, size, GuideKind::ElementEdge),
                    (center, t_center, size / 2.0, GuideKind::ElementCenter),
                ];
                for (probe, line, offset, kind) in pairs {
                    if within(probe, line, threshold) {
                        let guide = PendingGuide::element(kind, axis, line, *target);
                        return Some((line - offset, Some(guide)));
                    }
                }
            }
        }

        if ctx.settings.canvas_guides {
            if within(near, 0.0, threshold) {
                return Some((0.0, Some(PendingGuide::canvas(GuideKind::CanvasEdge, axis, 0.0))));
            }
            if within(far, extent, threshold) {
                let guide = PendingGuide::canvas(GuideKind::CanvasEdge, axis, extent);
                return Some((extent - size, Some(guide)));
            }
        }
    }

    if ctx.settings.grid_enabled {
        let mut best = snap_to_grid(near, ctx.settings.grid_spacing.pixels());
        if ctx.settings.grid_spacing.is_coarse() {
            for (_, offset) in probes {
                let candidate = mid - offset;
                if (candidate - near).abs() < (best - near).abs() {
                    best = candidate;
                }
            }
        }
        return Some((best, None));
    }

    None
}

/// Resolve one moving edge of a resize. Returns the new edge coordinate.
fn snap_edge_axis(axis: Axis, edge: f64, ctx: &SnapContext<'_>) -> Option<AxisSnap> {
    let threshold = ctx.settings.threshold;
    let extent = axis.canvas_extent(ctx.canvas);
    let mid = extent / 2.0;

    if !ctx.bypass {
        if ctx.settings.canvas_guides && within(edge, mid, threshold) {
            return Some((mid, Some(PendingGuide::canvas(GuideKind::CanvasCenter, axis, mid))));
        }

        if ctx.settings.element_guides {
            for target in ctx.targets {
                let (t_near, t_far) = axis.extent(target);
                let lines = [
                    (t_near, GuideKind::ElementEdge),
                    (t_far, GuideKind::ElementEdge),
                    ((t_near + t_far) / 2.0, GuideKind::ElementCenter),
                ];
                for (line, kind) in lines {
                    if within(edge, line, threshold) {
                        return Some((line, Some(PendingGuide::element(kind, axis, line, *target))));
                    }
                }
            }
        }

        if ctx.settings.canvas_guides {
            for line in [0.0, extent] {
                if within(edge, line, threshold) {
                    let guide = PendingGuide::canvas(GuideKind::CanvasEdge, axis, line);
                    return Some((line, Some(guide)));
                }
            }
        }
    }

    if ctx.settings.grid_enabled {
        let mut best = snap_to_grid(edge, ctx.settings.grid_spacing.pixels());
        if ctx.settings.grid_spacing.is_coarse() && (mid - edge).abs() < (best - edge).abs() {
            best = mid;
        }
        return Some((best, None));
    }

    None
}

/// Snap a rectangle being moved. Size is preserved; only the origin changes.
pub fn snap_move(raw: Rect, ctx: &SnapContext<'_>) -> SnapResult {
    let mut result = SnapResult::none(raw);
    let mut pending = Vec::new();

    for axis in [Axis::X, Axis::Y] {
        if let Some((near, guide)) = snap_move_axis(axis, &raw, ctx) {
            let (n, f) = axis.extent(&raw);
            result.rect = axis.with_extent(result.rect, near, near + (f - n));
            result.mark(axis);
            pending.extend(guide);
        }
    }

    result.guides = pending.into_iter().map(|g| g.finish(&result.rect)).collect();
    result
}

/// Snap the moving edges of a resize. Anchor edges never move.
///
/// `raw` is not normalised: for a `Far` side the anchor is the near edge and
/// vice versa. The result keeps every axis at least [`MIN_SIZE`] long without
/// crossing the anchor; a snap that would violate that is dropped.
pub fn snap_resize(raw: Rect, moving: MovingEdges, ctx: &SnapContext<'_>) -> SnapResult {
    let mut result = SnapResult::none(raw);
    let mut pending = Vec::new();

    for axis in [Axis::X, Axis::Y] {
        let Some(side) = moving.get(axis) else {
            continue;
        };
        let (near, far) = axis.extent(&raw);
        let edge = match side {
            EdgeSide::Near => near,
            EdgeSide::Far => far,
        };
        let (mut new_edge, mut guide, mut fired) = match snap_edge_axis(axis, edge, ctx) {
            Some((value, guide)) => (value, guide, true),
            None => (edge, None, false),
        };

        let (n, f) = match side {
            EdgeSide::Far => {
                if new_edge < near + MIN_SIZE {
                    new_edge = near + MIN_SIZE;
                    guide = None;
                    fired = false;
                }
                (near, new_edge)
            }
            EdgeSide::Near => {
                if new_edge > far - MIN_SIZE {
                    new_edge = far - MIN_SIZE;
                    guide = None;
                    fired = false;
                }
                (new_edge, far)
            }
        };

        result.rect = axis.with_extent(result.rect, n, f);
        if fired {
            result.mark(axis);
        }
        pending.extend(guide);
    }

    result.guides = pending.into_iter().map(|g| g.finish(&result.rect)).collect();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Size = Size::new(1920.0, 1080.0);

    fn ctx<'a>(targets: &'a [Rect], settings: &'a SnapSettings) -> SnapContext<'a> {
        SnapContext {
            canvas: CANVAS,
            targets,
            settings,
            bypass: false,
        }
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(23.0, 20.0), 20.0);
        assert_eq!(snap_to_grid(31.0, 20.0), 40.0);
        assert_eq!(snap_point_to_grid(Point::new(23.0, 47.0), 10.0), Point::new(20.0, 50.0));
    }

    #[test]
    fn test_snap_to_grid_idempotent() {
        for spacing in [GridSpacing::Fine, GridSpacing::Normal, GridSpacing::Coarse] {
            let g = spacing.pixels();
            for k in -5..50 {
                let aligned = k as f64 * g;
                assert_eq!(snap_to_grid(aligned, g), aligned);
                let once = snap_to_grid(aligned + 1.3, g);
                assert_eq!(snap_to_grid(once, g), once);
            }
        }
    }

    #[test]
    fn test_grid_spacing_cycle() {
        assert_eq!(GridSpacing::Fine.next(), GridSpacing::Normal);
        assert_eq!(GridSpacing::Normal.next(), GridSpacing::Coarse);
        assert_eq!(GridSpacing::Coarse.next(), GridSpacing::Fine);
    }

    #[test]
    fn test_canvas_center_snap() {
        let settings = SnapSettings::default();
        // 200x100 with its centre at (965, 536)
        let raw = Rect::from_origin_size(Point::new(865.0, 486.0), Size::new(200.0, 100.0));
        let result = snap_move(raw, &ctx(&[], &settings));

        assert_eq!(result.rect.center(), Point::new(960.0, 540.0));
        assert_eq!(result.rect.size(), Size::new(200.0, 100.0));
        assert_eq!(result.guides.len(), 2);
        assert!(
            result
                .guides
                .iter()
                .all(|g| g.kind == GuideKind::CanvasCenter && g.span.is_none())
        );
    }

    #[test]
    fn test_element_edge_snap() {
        let settings = SnapSettings::default();
        let a = Rect::from_origin_size(Point::new(100.0, 100.0), Size::new(200.0, 100.0));
        let raw = Rect::from_origin_size(Point::new(303.0, 400.0), Size::new(100.0, 100.0));
        let targets = [a];
        let result = snap_move(raw, &ctx(&targets, &settings));

        assert_eq!(result.rect.x0, 300.0);
        assert_eq!(result.rect.y0, 400.0);
        assert!(result.snapped_x);
        assert!(!result.snapped_y);

        let guide = result.guides[0];
        assert_eq!(guide.kind, GuideKind::ElementEdge);
        assert_eq!(guide.axis, Axis::X);
        assert_eq!(guide.position, 300.0);
        assert_eq!(guide.span, Some(GuideSpan { start: 100.0, end: 500.0 }));
    }

    #[test]
    fn test_element_center_snap() {
        let settings = SnapSettings::default();
        let a = Rect::from_origin_size(Point::new(100.0, 300.0), Size::new(200.0, 100.0));
        // Centre x = 204 against A's centre x = 200; widths differ so no edge pair qualifies
        let raw = Rect::from_origin_size(Point::new(174.0, 700.0), Size::new(60.0, 60.0));
        let targets = [a];
        let result = snap_move(raw, &ctx(&targets, &settings));

        assert_eq!(result.rect.center().x, 200.0);
        assert_eq!(result.guides[0].kind, GuideKind::ElementCenter);
    }

    #[test]
    fn test_canvas_center_beats_element() {
        let settings = SnapSettings::default();
        // Target's left edge (857) is within 5px of the candidate's left edge (862),
        // and the candidate's centre (962) is within 2px of the canvas midline.
        let target = Rect::from_origin_size(Point::new(857.0, 100.0), Size::new(100.0, 100.0));
        let raw = Rect::from_origin_size(Point::new(862.0, 300.0), Size::new(200.0, 100.0));
        let targets = [target];
        let result = snap_move(raw, &ctx(&targets, &settings));

        assert_eq!(result.rect.center().x, 960.0);
        let x_guide = result.guides.iter().find(|g| g.axis == Axis::X);
        assert_eq!(x_guide.map(|g| g.kind), Some(GuideKind::CanvasCenter));
    }

    #[test]
    fn test_first_element_wins() {
        let settings = SnapSettings::default();
        let first = Rect::from_origin_size(Point::new(500.0, 0.0), Size::new(50.0, 50.0));
        let second = Rect::from_origin_size(Point::new(498.0, 0.0), Size::new(50.0, 50.0));
        let raw = Rect::from_origin_size(Point::new(497.0, 600.0), Size::new(80.0, 80.0));
        let targets = [first, second];
        let result = snap_move(raw, &ctx(&targets, &settings));
        assert_eq!(result.rect.x0, 500.0);
    }

    #[test]
    fn test_canvas_edge_snap() {
        let settings = SnapSettings::default();
        let raw = Rect::from_origin_size(Point::new(6.0, 1000.0), Size::new(100.0, 76.0));
        let result = snap_move(raw, &ctx(&[], &settings));

        assert_eq!(result.rect.x0, 0.0);
        assert_eq!(result.rect.y1, 1080.0);
        assert!(result.guides.iter().all(|g| g.kind == GuideKind::CanvasEdge));
    }

    #[test]
    fn test_grid_fallback_only_when_nothing_fired() {
        let settings = SnapSettings {
            grid_enabled: true,
            ..SnapSettings::default()
        };
        let target = Rect::from_origin_size(Point::new(403.0, 0.0), Size::new(50.0, 50.0));
        let raw = Rect::from_origin_size(Point::new(401.0, 333.0), Size::new(50.0, 50.0));
        let targets = [target];
        let result = snap_move(raw, &ctx(&targets, &settings));

        // X locks on the element; Y falls back to the 10px grid.
        assert_eq!(result.rect.x0, 403.0);
        assert_eq!(result.rect.y0, 330.0);
        assert!(result.snapped_y);
        assert_eq!(result.guides.len(), 1);
    }

    #[test]
    fn test_coarse_grid_offers_canvas_midpoint() {
        let settings = SnapSettings {
            grid_enabled: true,
            grid_spacing: GridSpacing::Coarse,
            canvas_guides: false,
            ..SnapSettings::default()
        };
        // Canvas with an odd midline (1030 / 2 = 515), not on the 20px grid.
        let canvas = Size::new(1030.0, 600.0);
        let raw = Rect::from_origin_size(Point::new(500.0, 100.0), Size::new(30.0, 30.0));
        let context = SnapContext {
            canvas,
            targets: &[],
            settings: &settings,
            bypass: false,
        };
        let result = snap_move(raw, &context);
        assert_eq!(result.rect.x0, 500.0);

        let raw = Rect::from_origin_size(Point::new(504.0, 100.0), Size::new(30.0, 30.0));
        let result = snap_move(raw, &context);
        // Grid would move x0 to 500 (4px); centring on 515 moves it by 4px too, grid kept.
        assert_eq!(result.rect.x0, 500.0);

        let raw = Rect::from_origin_size(Point::new(508.0, 100.0), Size::new(14.0, 30.0));
        let result = snap_move(raw, &context);
        // Centre 515 sits on the midline already; grid would move 8px.
        assert_eq!(result.rect.center().x, 515.0);
    }

    #[test]
    fn test_bypass_keeps_grid_only() {
        let settings = SnapSettings {
            grid_enabled: true,
            ..SnapSettings::default()
        };
        let raw = Rect::from_origin_size(Point::new(863.0, 487.0), Size::new(200.0, 100.0));
        let context = SnapContext {
            bypass: true,
            ..ctx(&[], &settings)
        };
        let result = snap_move(raw, &context);
        assert_eq!(result.rect.origin(), Point::new(860.0, 490.0));
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_toggles_disable_rules() {
        let settings = SnapSettings {
            element_guides: false,
            canvas_guides: false,
            ..SnapSettings::default()
        };
        let a = Rect::from_origin_size(Point::new(100.0, 100.0), Size::new(200.0, 100.0));
        let raw = Rect::from_origin_size(Point::new(303.0, 400.0), Size::new(100.0, 100.0));
        let targets = [a];
        let result = snap_move(raw, &ctx(&targets, &settings));
        assert_eq!(result.rect, raw);
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_resize_only_moving_edges() {
        let settings = SnapSettings::default();
        let target = Rect::from_origin_size(Point::new(400.0, 0.0), Size::new(50.0, 50.0));
        // Anchor edges (x0 = 396, y0 = 300) are within threshold of things but must not move.
        let raw = Rect::new(396.0, 300.0, 597.0, 537.0);
        let moving = MovingEdges {
            x: Some(EdgeSide::Far),
            y: Some(EdgeSide::Far),
        };
        let targets = [target];
        let result = snap_resize(raw, moving, &ctx(&targets, &settings));

        assert_eq!(result.rect.x0, 396.0);
        assert_eq!(result.rect.y0, 300.0);
        assert_eq!(result.rect.x1, 597.0);
        assert_eq!(result.rect.y1, 540.0);
        assert_eq!(result.guides.len(), 1);
        assert_eq!(result.guides[0].kind, GuideKind::CanvasCenter);
    }

    #[test]
    fn test_resize_near_edge_snaps_to_element() {
        let settings = SnapSettings::default();
        let target = Rect::from_origin_size(Point::new(200.0, 600.0), Size::new(100.0, 100.0));
        let raw = Rect::new(294.0, 100.0, 500.0, 300.0);
        let moving = MovingEdges {
            x: Some(EdgeSide::Near),
            y: None,
        };
        let targets = [target];
        let result = snap_resize(raw, moving, &ctx(&targets, &settings));
        assert_eq!(result.rect, Rect::new(300.0, 100.0, 500.0, 300.0));
        assert_eq!(result.guides[0].span, Some(GuideSpan { start: 100.0, end: 700.0 }));
    }

    #[test]
    fn test_resize_respects_min_size() {
        let settings = SnapSettings {
            element_guides: false,
            canvas_guides: false,
            ..SnapSettings::default()
        };
        // Far edge dragged past the anchor.
        let raw = Rect::new(100.0, 100.0, 40.0, 105.0);
        let moving = MovingEdges {
            x: Some(EdgeSide::Far),
            y: Some(EdgeSide::Far),
        };
        let result = snap_resize(raw, moving, &ctx(&[], &settings));
        assert_eq!(result.rect, Rect::new(100.0, 100.0, 100.0 + MIN_SIZE, 100.0 + MIN_SIZE));
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_guide_endpoints() {
        let guide = SnapGuide {
            kind: GuideKind::CanvasCenter,
            axis: Axis::X,
            position: 960.0,
            span: None,
        };
        assert_eq!(guide.endpoints(CANVAS), (Point::new(960.0, 0.0), Point::new(960.0, 1080.0)));
    }
}
