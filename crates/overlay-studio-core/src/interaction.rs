//! Pointer-driven interaction state machine.
//!
//! [`InteractionEngine`] owns exactly one [`Gesture`] at a time. Phase changes
//! go through [`next_phase`], a fixed transition table, so every gesture
//! starts from `Idle` and returns there on pointer-up.

use crate::arrange::{self, Alignment, Distribution, StackMove};
use crate::config::EditorConfig;
use crate::error::EngineResult;
use crate::hierarchy::{self, HierarchyIndex};
use crate::input::{KeyCommand, Modifiers, PointerButton, PointerEvent};
use crate::observer::EngineObserver;
use crate::scene::{ComponentId, ComponentPatch, PlacedComponent, Scene};
use crate::selection::{self, Corner, Handle, Selection};
use crate::snap::{self, EdgeSide, MovingEdges, SnapContext, SnapGuide, SnapSettings};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Coarse state of the interaction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// Button down, movement threshold not crossed yet.
    Pending,
    Dragging,
    Resizing,
    Creating,
    Panning,
}

/// Inputs that may change the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Primary press on a component or empty canvas.
    Press,
    /// Primary press on a resize handle.
    PressHandle,
    /// Middle-button press.
    PressMiddle,
    /// Modifier click toggling selection membership.
    ToggleClick,
    /// Threshold crossed from a press on the selection.
    ThresholdMove,
    /// Threshold crossed from a press on empty canvas or an unselected component.
    ThresholdCreate,
    Release,
}

const TRANSITIONS: &[(GesturePhase, Trigger, GesturePhase)] = &[
    (GesturePhase::Idle, Trigger::Press, GesturePhase::Pending),
    (GesturePhase::Idle, Trigger::PressHandle, GesturePhase::Resizing),
    (GesturePhase::Idle, Trigger::PressMiddle, GesturePhase::Panning),
    (GesturePhase::Idle, Trigger::ToggleClick, GesturePhase::Idle),
    (GesturePhase::Pending, Trigger::ThresholdMove, GesturePhase::Dragging),
    (GesturePhase::Pending, Trigger::ThresholdCreate, GesturePhase::Creating),
    (GesturePhase::Pending, Trigger::Release, GesturePhase::Idle),
    (GesturePhase::Dragging, Trigger::Release, GesturePhase::Idle),
    (GesturePhase::Resizing, Trigger::Release, GesturePhase::Idle),
    (GesturePhase::Creating, Trigger::Release, GesturePhase::Idle),
    (GesturePhase::Panning, Trigger::Release, GesturePhase::Idle),
];

/// Look up the phase reached from `phase` on `trigger`.
pub fn next_phase(phase: GesturePhase, trigger: Trigger) -> Option<GesturePhase> {
    TRANSITIONS
        .iter()
        .find(|(from, t, _)| *from == phase && *t == trigger)
        .map(|(_, _, to)| *to)
}

/// What a pending press turns into once the pointer travels far enough.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PressIntent {
    Move,
    Create { parent: Option<ComponentId> },
}

#[derive(Debug, Clone)]
struct PendingPress {
    device_start: Point,
    canvas_start: Point,
    intent: PressIntent,
    /// Visible components under the press point, topmost first.
    candidates: Vec<ComponentId>,
}

#[derive(Debug, Clone)]
struct DragState {
    canvas_start: Point,
    /// Bounding box of the selection at gesture start.
    start_box: Rect,
    /// Selection plus unselected descendants, at gesture start.
    start_rects: Vec<(ComponentId, Rect)>,
    targets: Vec<Rect>,
}

#[derive(Debug, Clone)]
struct ResizeState {
    corner: Corner,
    canvas_start: Point,
    start_box: Rect,
    members: Vec<(ComponentId, Rect)>,
    floor: Size,
    targets: Vec<Rect>,
}

#[derive(Debug, Clone)]
struct CreateState {
    anchor: Point,
    parent: Option<ComponentId>,
    targets: Vec<Rect>,
}

#[derive(Debug, Clone, Copy)]
struct PanState {
    last_device: Point,
}

/// Current gesture and the data captured when it started.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Pending(PendingPress),
    Dragging(DragState),
    Resizing(ResizeState),
    Creating(CreateState),
    Panning(PanState),
}

impl Gesture {
    fn phase(&self) -> GesturePhase {
        match self {
            Gesture::Idle => GesturePhase::Idle,
            Gesture::Pending(_) => GesturePhase::Pending,
            Gesture::Dragging(_) => GesturePhase::Dragging,
            Gesture::Resizing(_) => GesturePhase::Resizing,
            Gesture::Creating(_) => GesturePhase::Creating,
            Gesture::Panning(_) => GesturePhase::Panning,
        }
    }
}

/// A visible component as the renderer should draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub id: ComponentId,
    pub rect: Rect,
    pub effective_layer: i64,
    pub selected: bool,
}

/// Direct-manipulation engine: selection, gestures, snapping, commands.
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    config: EditorConfig,
    gesture: Gesture,
    selection: Selection,
    guides: Vec<SnapGuide>,
    creation_rect: Option<Rect>,
    /// Latest pointer position in canvas space during a gesture.
    pointer: Point,
    modifiers: Modifiers,
    last_applied: Option<Instant>,
}

impl InteractionEngine {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replace the configuration after validating it.
    pub fn set_config(&mut self, config: EditorConfig) -> EngineResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Guides that fired on the latest processed move.
    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    /// In-progress rectangle while `Creating`.
    pub fn creation_rect(&self) -> Option<Rect> {
        self.creation_rect
    }

    /// Replace the selection from outside (e.g. a layer list), notifying the observer.
    pub fn set_selection(
        &mut self,
        scene: &Scene,
        ids: &[ComponentId],
        observer: &mut dyn EngineObserver,
    ) {
        let before = self.selection.clone();
        let index = HierarchyIndex::build(scene);
        self.selection
            .set(ids.iter().copied().filter(|&id| index.is_effectively_visible(id)));
        self.notify_selection(&before, observer);
    }

    /// Visible components back to front with their effective layers.
    pub fn render_list(&self, scene: &Scene) -> Vec<RenderItem> {
        let index = HierarchyIndex::build(scene);
        index
            .paint_order()
            .into_iter()
            .filter_map(|id| {
                let component = scene.get(id)?;
                Some(RenderItem {
                    id,
                    rect: component.rect(),
                    effective_layer: index.effective_layer(id).unwrap_or_default(),
                    selected: self.selection.contains(id),
                })
            })
            .collect()
    }

    /// Bounding box of the visible selected components.
    pub fn selection_bounds(&self, scene: &Scene) -> Option<Rect> {
        let index = HierarchyIndex::build(scene);
        self.visible_bounds(scene, &index)
    }

    /// Corner handles in canvas space: one set for a single component or the
    /// group box, none for an empty selection.
    pub fn handles(&self, scene: &Scene) -> Vec<Handle> {
        self.selection_bounds(scene)
            .map(selection::corner_handles)
            .unwrap_or_default()
    }

    /// Handle hit-box side in canvas units at the current zoom.
    pub fn handle_size(&self, viewport: &Viewport) -> f64 {
        viewport.device_to_canvas_distance(self.config.handle_hit_size)
    }

    fn visible_bounds(&self, scene: &Scene, index: &HierarchyIndex) -> Option<Rect> {
        let visible: Vec<ComponentId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|&id| index.is_effectively_visible(id))
            .collect();
        selection::bounding_box(scene, &visible)
    }

    /// Drop deleted and hidden ids from the selection, notifying on change.
    fn prune_selection(&mut self, scene: &Scene, observer: &mut dyn EngineObserver) {
        let before = self.selection.clone();
        self.selection.retain_selectable(scene);
        self.notify_selection(&before, observer);
    }

    fn notify_selection(&self, before: &Selection, observer: &mut dyn EngineObserver) {
        if &self.selection != before {
            observer.on_selection_changed(self.selection.ids());
        }
    }

    /// Switch gesture via the transition table. Returns the previous gesture,
    /// or `None` (and leaves everything untouched) if the table forbids it.
    fn enter(&mut self, trigger: Trigger, next: Gesture) -> Option<Gesture> {
        let from = self.gesture.phase();
        match next_phase(from, trigger) {
            Some(to) if to == next.phase() => {
                log::debug!("gesture {from:?} -> {to:?} on {trigger:?}");
                Some(std::mem::replace(&mut self.gesture, next))
            }
            _ => {
                log::warn!("no transition from {from:?} on {trigger:?}");
                None
            }
        }
    }

    /// Dispatch a pointer event.
    pub fn handle_event(
        &mut self,
        scene: &mut Scene,
        viewport: &mut Viewport,
        observer: &mut dyn EngineObserver,
        event: PointerEvent,
    ) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(scene, viewport, observer, position, button, modifiers),
            PointerEvent::Move { position, modifiers } => {
                self.pointer_move(scene, viewport, observer, position, modifiers)
            }
            PointerEvent::Up { position, modifiers } => {
                self.pointer_up(scene, viewport, observer, position, modifiers)
            }
            PointerEvent::Wheel {
                position,
                delta,
                modifiers,
            } => self.wheel(viewport, position, delta, modifiers),
        }
    }

    /// Handle a button press at `device`.
    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        viewport: &mut Viewport,
        observer: &mut dyn EngineObserver,
        device: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) {
        if self.phase() != GesturePhase::Idle {
            log::trace!("press ignored during {:?}", self.phase());
            return;
        }
        let before = self.selection.clone();
        self.selection.retain_selectable(scene);
        self.modifiers = modifiers;

        match button {
            PointerButton::Middle => {
                if self
                    .enter(Trigger::PressMiddle, Gesture::Panning(PanState { last_device: device }))
                    .is_some()
                {
                    observer.on_gesture_start(GesturePhase::Panning);
                }
            }
            PointerButton::Primary => {
                self.press_primary(scene, viewport, observer, device, modifiers)
            }
            PointerButton::Secondary => {}
        }

        self.notify_selection(&before, observer);
    }

    fn press_primary(
        &mut self,
        scene: &Scene,
        viewport: &Viewport,
        observer: &mut dyn EngineObserver,
        device: Point,
        modifiers: Modifiers,
    ) {
        let point = viewport.device_to_canvas(device);
        self.pointer = point;
        let index = HierarchyIndex::build(scene);

        if let Some(bounds) = self.visible_bounds(scene, &index) {
            let size = self.handle_size(viewport);
            if let Some(corner) = selection::hit_test_handles(bounds, point, size) {
                self.begin_resize(scene, &index, observer, corner, bounds, point);
                return;
            }
        }

        let candidates = hit_candidates(scene, &index, point);

        if modifiers.toggles_selection() {
            if let Some(&top) = candidates.first() {
                if self.enter(Trigger::ToggleClick, Gesture::Idle).is_some() {
                    self.selection.toggle(top);
                }
                return;
            }
        }

        let intent = if candidates.iter().any(|&id| self.selection.contains(id)) {
            PressIntent::Move
        } else if let Some(&top) = candidates.first() {
            PressIntent::Create { parent: Some(top) }
        } else {
            self.selection.clear();
            PressIntent::Create { parent: None }
        };

        let press = PendingPress {
            device_start: device,
            canvas_start: point,
            intent,
            candidates,
        };
        self.enter(Trigger::Press, Gesture::Pending(press));
    }

    fn begin_resize(
        &mut self,
        scene: &Scene,
        index: &HierarchyIndex,
        observer: &mut dyn EngineObserver,
        corner: Corner,
        bounds: Rect,
        point: Point,
    ) {
        let members: Vec<(ComponentId, Rect)> = self
            .selection
            .ids()
            .iter()
            .filter(|&&id| index.is_effectively_visible(id))
            .filter_map(|&id| scene.get(id).map(|c| (id, c.rect())))
            .collect();
        let rects: Vec<Rect> = members.iter().map(|(_, r)| *r).collect();
        let floor = selection::group_floor(bounds, &rects);
        let exclude = exclusion_set(index, self.selection.ids());
        let state = ResizeState {
            corner,
            canvas_start: point,
            start_box: bounds,
            members,
            floor,
            targets: snap::snap_targets(scene, index, &exclude),
        };
        if self.enter(Trigger::PressHandle, Gesture::Resizing(state)).is_some() {
            observer.on_gesture_start(GesturePhase::Resizing);
            observer.begin_operation("Resize");
        }
    }

    /// Handle pointer motion.
    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        viewport: &mut Viewport,
        observer: &mut dyn EngineObserver,
        device: Point,
        modifiers: Modifiers,
    ) {
        let before = self.selection.clone();
        self.modifiers = modifiers;

        match &mut self.gesture {
            Gesture::Idle => return,
            Gesture::Panning(pan) => {
                let delta = device - pan.last_device;
                pan.last_device = device;
                viewport.pan_by(delta);
                return;
            }
            Gesture::Pending(press) => {
                if (device - press.device_start).hypot() < self.config.drag_threshold {
                    return;
                }
                let press = press.clone();
                self.pointer = viewport.device_to_canvas(device);
                self.promote(scene, observer, press);
                self.last_applied = None;
            }
            Gesture::Dragging(_) | Gesture::Resizing(_) | Gesture::Creating(_) => {
                self.pointer = viewport.device_to_canvas(device);
            }
        }

        if self.throttle_ready() {
            self.apply_active(scene);
        }
        self.notify_selection(&before, observer);
    }

    /// Leave `Pending` for `Dragging` or `Creating`.
    fn promote(&mut self, scene: &Scene, observer: &mut dyn EngineObserver, press: PendingPress) {
        let index = HierarchyIndex::build(scene);
        match press.intent {
            PressIntent::Move => {
                let members: Vec<ComponentId> = self
                    .selection
                    .ids()
                    .iter()
                    .copied()
                    .filter(|&id| index.is_effectively_visible(id))
                    .collect();
                let Some(start_box) = selection::bounding_box(scene, &members) else {
                    self.enter(Trigger::Release, Gesture::Idle);
                    return;
                };
                let exclude = exclusion_set(&index, &members);
                let mut start_rects: Vec<(ComponentId, Rect)> = Vec::new();
                // Members first, then descendants breadth-first per member.
                let mut seen = HashSet::new();
                let descendants = members.iter().flat_map(|&id| index.descendants(id));
                for id in members.iter().copied().chain(descendants) {
                    if seen.insert(id) {
                        if let Some(component) = scene.get(id) {
                            start_rects.push((id, component.rect()));
                        }
                    }
                }
                let state = DragState {
                    canvas_start: press.canvas_start,
                    start_box,
                    start_rects,
                    targets: snap::snap_targets(scene, &index, &exclude),
                };
                if self.enter(Trigger::ThresholdMove, Gesture::Dragging(state)).is_some() {
                    observer.on_gesture_start(GesturePhase::Dragging);
                    observer.begin_operation("Move");
                }
            }
            PressIntent::Create { parent } => {
                let state = CreateState {
                    anchor: press.canvas_start,
                    parent,
                    targets: snap::snap_targets(scene, &index, &HashSet::new()),
                };
                if self.enter(Trigger::ThresholdCreate, Gesture::Creating(state)).is_some() {
                    observer.on_gesture_start(GesturePhase::Creating);
                    observer.begin_operation("Create component");
                }
            }
        }
    }

    fn throttle_ready(&mut self) -> bool {
        if self.config.move_throttle_ms == 0 {
            return true;
        }
        let now = Instant::now();
        let interval = Duration::from_millis(self.config.move_throttle_ms);
        match self.last_applied {
            Some(last) if now.duration_since(last) < interval => false,
            _ => {
                self.last_applied = Some(now);
                true
            }
        }
    }

    /// Recompute the active gesture for the latest pointer position.
    fn apply_active(&mut self, scene: &mut Scene) {
        let point = self.pointer;
        let bypass = self.modifiers.bypasses_snap();
        let settings = &self.config.snap;
        match &self.gesture {
            Gesture::Dragging(state) => {
                self.guides = apply_drag(state, scene, point, settings, bypass);
            }
            Gesture::Resizing(state) => {
                self.guides = apply_resize(state, scene, point, settings, bypass);
            }
            Gesture::Creating(state) => {
                let ctx = SnapContext {
                    canvas: scene.canvas(),
                    targets: &state.targets,
                    settings,
                    bypass,
                };
                let result = creation_rect(state.anchor, point, &ctx);
                self.creation_rect = Some(result.rect);
                self.guides = result.guides;
            }
            Gesture::Idle | Gesture::Pending(_) | Gesture::Panning(_) => {}
        }
    }

    /// Handle a button release. Always ends back in `Idle` with transient
    /// state cleared.
    pub fn pointer_up(
        &mut self,
        scene: &mut Scene,
        viewport: &mut Viewport,
        observer: &mut dyn EngineObserver,
        device: Point,
        modifiers: Modifiers,
    ) {
        let before = self.selection.clone();
        self.selection.retain_selectable(scene);
        self.modifiers = modifiers;
        let phase = self.phase();

        match phase {
            GesturePhase::Idle => {}
            GesturePhase::Pending => {
                if let Some(Gesture::Pending(press)) = self.enter(Trigger::Release, Gesture::Idle) {
                    self.click(&press);
                }
            }
            GesturePhase::Dragging | GesturePhase::Resizing | GesturePhase::Creating => {
                self.pointer = viewport.device_to_canvas(device);
                self.apply_active(scene);
                let ended = self.enter(Trigger::Release, Gesture::Idle);
                if let Some(Gesture::Creating(state)) = ended {
                    self.commit_creation(scene, &state);
                }
                observer.end_operation();
                observer.on_gesture_end(phase);
            }
            GesturePhase::Panning => {
                self.enter(Trigger::Release, Gesture::Idle);
                observer.on_gesture_end(phase);
            }
        }

        // Whatever happened, nothing transient survives the release.
        self.gesture = Gesture::Idle;
        self.guides.clear();
        self.creation_rect = None;
        self.last_applied = None;
        self.notify_selection(&before, observer);
    }

    /// A press released without crossing the threshold.
    fn click(&mut self, press: &PendingPress) {
        match press.candidates.as_slice() {
            [] => {}
            [only] => self.selection.select_only(*only),
            candidates => {
                let next = candidates
                    .iter()
                    .position(|&id| self.selection.contains(id))
                    .map_or(0, |i| (i + 1) % candidates.len());
                self.selection.select_only(candidates[next]);
            }
        }
    }

    fn commit_creation(&mut self, scene: &mut Scene, state: &CreateState) {
        let Some(rect) = self.creation_rect else {
            return;
        };
        let parent = state.parent.filter(|&p| scene.contains(p));
        let component = PlacedComponent::new(self.config.creation_kind, rect.origin(), rect.size())
            .with_layer(scene.next_layer(parent));
        let id = scene.insert(component);
        if let Some(parent) = parent {
            if let Err(err) = hierarchy::set_parent(scene, id, Some(parent)) {
                log::warn!("created component left top-level: {err}");
            }
        }
        log::debug!("created component {id} at {rect:?}");
        self.selection.select_only(id);
    }

    /// Wheel: zoom around the pointer with Ctrl/Cmd, pan otherwise.
    pub fn wheel(
        &mut self,
        viewport: &mut Viewport,
        device: Point,
        delta: Vec2,
        modifiers: Modifiers,
    ) {
        if modifiers.zooms_wheel() {
            if delta.y != 0.0 {
                viewport.zoom_at(device, -delta.y.signum());
            }
        } else {
            viewport.pan_by(-delta);
        }
    }

    /// Run a keyboard command. Mutating commands are ignored mid-gesture.
    pub fn handle_command(
        &mut self,
        scene: &mut Scene,
        observer: &mut dyn EngineObserver,
        command: KeyCommand,
    ) -> EngineResult<()> {
        let before = self.selection.clone();
        self.selection.retain_selectable(scene);

        match command {
            KeyCommand::Undo => observer.on_undo_requested(),
            KeyCommand::Redo => observer.on_redo_requested(),
            KeyCommand::ToggleGrid => {
                self.config.snap.grid_enabled = !self.config.snap.grid_enabled;
            }
            KeyCommand::ToggleCenterLines => {
                self.config.snap.canvas_guides = !self.config.snap.canvas_guides;
            }
            _ if self.phase() != GesturePhase::Idle => {
                log::debug!("{command:?} ignored during {:?}", self.phase());
            }
            KeyCommand::SelectAll => {
                let index = HierarchyIndex::build(scene);
                self.selection.set(index.paint_order());
            }
            _ if self.selection.is_empty() => {}
            KeyCommand::Delete => {
                arrange::delete(scene, self.selection.ids(), observer);
                self.selection.clear();
            }
            KeyCommand::Duplicate => {
                let offset = self.config.duplicate_offset;
                let copies = arrange::duplicate(scene, self.selection.ids(), offset, observer);
                self.selection.set(copies);
            }
            KeyCommand::Nudge { dx, dy, large } => {
                let step = if large {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                let delta = Vec2::new(dx * step, dy * step);
                arrange::nudge(scene, self.selection.ids(), delta, observer);
            }
            KeyCommand::BringForward => self.restack(scene, observer, StackMove::BringForward)?,
            KeyCommand::SendBackward => self.restack(scene, observer, StackMove::SendBackward)?,
            KeyCommand::BringToFront => self.restack(scene, observer, StackMove::BringToFront)?,
            KeyCommand::SendToBack => self.restack(scene, observer, StackMove::SendToBack)?,
        }

        self.notify_selection(&before, observer);
        Ok(())
    }

    fn restack(
        &mut self,
        scene: &mut Scene,
        observer: &mut dyn EngineObserver,
        action: StackMove,
    ) -> EngineResult<()> {
        arrange::restack(scene, self.selection.ids(), action, observer).map(|_| ())
    }

    /// Align the current selection.
    pub fn align_selection(
        &mut self,
        scene: &mut Scene,
        alignment: Alignment,
        observer: &mut dyn EngineObserver,
    ) -> EngineResult<usize> {
        self.prune_selection(scene, observer);
        arrange::align(scene, self.selection.ids(), alignment, observer)
    }

    /// Distribute the current selection.
    pub fn distribute_selection(
        &mut self,
        scene: &mut Scene,
        distribution: Distribution,
        observer: &mut dyn EngineObserver,
    ) -> EngineResult<usize> {
        self.prune_selection(scene, observer);
        arrange::distribute(scene, self.selection.ids(), distribution, observer)
    }

    /// Centre the current selection on the canvas.
    pub fn center_selection(
        &mut self,
        scene: &mut Scene,
        observer: &mut dyn EngineObserver,
    ) -> EngineResult<usize> {
        self.prune_selection(scene, observer);
        arrange::center_on_canvas(scene, self.selection.ids(), observer)
    }
}

/// Visible components containing `point`, topmost first.
fn hit_candidates(scene: &Scene, index: &HierarchyIndex, point: Point) -> Vec<ComponentId> {
    let mut order = index.paint_order();
    order.retain(|&id| scene.get(id).is_some_and(|c| c.rect().contains(point)));
    order.reverse();
    order
}

/// The given ids plus all their descendants.
fn exclusion_set(index: &HierarchyIndex, ids: &[ComponentId]) -> HashSet<ComponentId> {
    let mut out: HashSet<ComponentId> = ids.iter().copied().collect();
    for &id in ids {
        out.extend(index.descendants(id));
    }
    out
}

fn apply_drag(
    state: &DragState,
    scene: &mut Scene,
    point: Point,
    settings: &SnapSettings,
    bypass: bool,
) -> Vec<SnapGuide> {
    let raw = state.start_box + (point - state.canvas_start);
    let ctx = SnapContext {
        canvas: scene.canvas(),
        targets: &state.targets,
        settings,
        bypass,
    };
    let snapped = snap::snap_move(raw, &ctx);
    let offset = snapped.rect.origin() - state.start_box.origin();
    log::trace!("drag offset {offset:?}, {} guides", snapped.guides.len());

    for &(id, rect) in &state.start_rects {
        scene.update_component(id, &ComponentPatch::position(rect.origin() + offset));
    }
    snapped.guides
}

fn apply_resize(
    state: &ResizeState,
    scene: &mut Scene,
    point: Point,
    settings: &SnapSettings,
    bypass: bool,
) -> Vec<SnapGuide> {
    let raw = selection::drag_corner(state.start_box, state.corner, point - state.canvas_start);
    let moving = state.corner.moving_edges();
    let ctx = SnapContext {
        canvas: scene.canvas(),
        targets: &state.targets,
        settings,
        bypass,
    };
    let snapped = snap::snap_resize(raw, moving, &ctx);

    if let [(id, _)] = state.members.as_slice() {
        scene.update_component(*id, &ComponentPatch::rect(snapped.rect));
        return snapped.guides;
    }

    let target = selection::enforce_floor(snapped.rect, moving, state.floor);
    let guides = if target == snapped.rect {
        snapped.guides
    } else {
        Vec::new()
    };
    match selection::scale_group(&state.members, state.start_box, target) {
        Ok(rects) => {
            for (id, rect) in rects {
                scene.update_component(id, &ComponentPatch::rect(rect));
            }
        }
        Err(err) => log::trace!("group resize frame skipped: {err}"),
    }
    guides
}

/// Rectangle spanned from `anchor` to `point`, with the moving corner snapped.
fn creation_rect(anchor: Point, point: Point, ctx: &SnapContext<'_>) -> snap::SnapResult {
    let (x0, x1, side_x) = if point.x >= anchor.x {
        (anchor.x, point.x, EdgeSide::Far)
    } else {
        (point.x, anchor.x, EdgeSide::Near)
    };
    let (y0, y1, side_y) = if point.y >= anchor.y {
        (anchor.y, point.y, EdgeSide::Far)
    } else {
        (point.y, anchor.y, EdgeSide::Near)
    };
    let moving = MovingEdges {
        x: Some(side_x),
        y: Some(side_y),
    };
    snap::snap_resize(Rect::new(x0, y0, x1, y1), moving, ctx)
}
