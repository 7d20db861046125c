//! Scene model: placed overlay components on a fixed-size canvas.
//!
//! The scene is pure data. All geometry is stored in canvas pixel space;
//! zoom and pan live in [`crate::viewport::Viewport`] and never touch it.

use crate::hierarchy;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for placed components.
pub type ComponentId = Uuid;

/// Minimum width and height of a committed component, in canvas pixels.
pub const MIN_SIZE: f64 = 20.0;

/// Default canvas dimensions (1080p broadcast frame).
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(1920.0, 1080.0);

/// Kind of overlay component.
///
/// The engine never branches on the kind; it is carried through for the
/// renderer and the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComponentKind {
    #[default]
    Shape,
    Container,
    Text,
    Image,
    Webcam,
    Chat,
    Alert,
    Ticker,
    Timer,
}

/// A component placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedComponent {
    pub(crate) id: ComponentId,
    /// Component kind.
    pub kind: ComponentKind,
    /// Top-left corner in canvas pixels.
    pub position: Point,
    /// Width and height in canvas pixels.
    pub size: Size,
    /// Stacking order among siblings sharing the same parent.
    #[serde(default)]
    pub layer: i32,
    /// Optional parent (weak reference, no ownership).
    #[serde(default)]
    pub(crate) parent_id: Option<ComponentId>,
    /// Own visibility flag. Effective visibility also depends on ancestors.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Styling and content. Never read or written by the engine.
    #[serde(default)]
    pub props: serde_json::Value,
}

fn default_visible() -> bool {
    true
}

impl PlacedComponent {
    /// Create a new top-level component with a fresh id.
    pub fn new(kind: ComponentKind, position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            size: clamp_size(size),
            layer: 0,
            parent_id: None,
            visible: true,
            props: serde_json::Value::Null,
        }
    }

    /// Builder-style layer setter.
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Get the unique identifier.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Get the parent id, if any.
    pub fn parent_id(&self) -> Option<ComponentId> {
        self.parent_id
    }

    /// Rectangle covered by this component in canvas space.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Set position and size from a rectangle, enforcing the minimum size.
    pub fn set_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        self.position = rect.origin();
        self.size = clamp_size(rect.size());
    }

    /// Assign a new id (used when duplicating).
    pub(crate) fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}

/// Clamp a size so neither side is below [`MIN_SIZE`].
pub fn clamp_size(size: Size) -> Size {
    Size::new(size.width.max(MIN_SIZE), size.height.max(MIN_SIZE))
}

/// Partial update applied through [`Scene::update_component`].
///
/// Parent changes are not part of a patch; they go through
/// [`hierarchy::set_parent`] so cycles can be rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub layer: Option<i32>,
    pub visible: Option<bool>,
}

impl ComponentPatch {
    /// Patch that only moves the component.
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// Patch that sets both position and size from a rectangle.
    pub fn rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            position: Some(rect.origin()),
            size: Some(rect.size()),
            ..Default::default()
        }
    }

    /// Patch that only changes the sibling layer.
    pub fn layer(layer: i32) -> Self {
        Self {
            layer: Some(layer),
            ..Default::default()
        }
    }

    /// Patch that only toggles visibility.
    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Default::default()
        }
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.size.is_none()
            && self.layer.is_none()
            && self.visible.is_none()
    }
}

/// The list of placed components plus canvas dimensions.
///
/// Components are kept in insertion order; that order breaks ties between
/// components with equal stacking keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Canvas size in pixels.
    canvas: Size,
    /// All components, in insertion order.
    components: Vec<PlacedComponent>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

impl Scene {
    /// Create an empty scene with the given canvas size.
    pub fn new(canvas: Size) -> Self {
        Self {
            canvas,
            components: Vec::new(),
        }
    }

    /// Canvas size in pixels.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Canvas as a rectangle anchored at the origin.
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.canvas)
    }

    /// Canvas midpoint.
    pub fn canvas_center(&self) -> Point {
        self.canvas_rect().center()
    }

    /// All components in insertion order.
    pub fn components(&self) -> &[PlacedComponent] {
        &self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the scene has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get a component by id.
    pub fn get(&self, id: ComponentId) -> Option<&PlacedComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ComponentId) -> Option<&mut PlacedComponent> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Check whether a component exists.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    /// Create a new top-level component on top of its siblings.
    pub fn add_component(
        &mut self,
        kind: ComponentKind,
        position: Point,
        size: Size,
    ) -> ComponentId {
        let layer = self.next_layer(None);
        let component = PlacedComponent::new(kind, position, size).with_layer(layer);
        self.insert(component)
    }

    /// Insert a fully built component. Its size is clamped to [`MIN_SIZE`].
    pub fn insert(&mut self, mut component: PlacedComponent) -> ComponentId {
        component.size = clamp_size(component.size);
        let id = component.id;
        self.components.push(component);
        id
    }

    /// Apply a partial update. Returns false if the id is unknown.
    ///
    /// Sizes are clamped to [`MIN_SIZE`] before being written.
    pub fn update_component(&mut self, id: ComponentId, patch: &ComponentPatch) -> bool {
        let Some(component) = self.get_mut(id) else {
            log::trace!("update for missing component {id} ignored");
            return false;
        };
        if let Some(position) = patch.position {
            component.position = position;
        }
        if let Some(size) = patch.size {
            component.size = clamp_size(Size::new(size.width.abs(), size.height.abs()));
        }
        if let Some(layer) = patch.layer {
            component.layer = layer;
        }
        if let Some(visible) = patch.visible {
            component.visible = visible;
        }
        true
    }

    /// Remove a component. Its children are detached and become top-level,
    /// keeping their canvas geometry.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<PlacedComponent> {
        let index = self.components.iter().position(|c| c.id == id)?;
        let removed = self.components.remove(index);
        for component in &mut self.components {
            if component.parent_id == Some(id) {
                component.parent_id = None;
            }
        }
        Some(removed)
    }

    /// Layer value that places a new child of `parent` above its siblings.
    pub fn next_layer(&self, parent: Option<ComponentId>) -> i32 {
        self.components
            .iter()
            .filter(|c| c.parent_id == parent)
            .map(|c| c.layer + 1)
            .max()
            .unwrap_or(0)
    }

    /// Get the bounding box of all components.
    pub fn bounds(&self) -> Option<Rect> {
        self.components
            .iter()
            .map(PlacedComponent::rect)
            .reduce(|acc, r| acc.union(r))
    }

    /// Serialize the scene to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a scene from JSON.
    ///
    /// Dangling or cyclic parent links in the input are cleared.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scene: Scene = serde_json::from_str(json)?;
        for component in &mut scene.components {
            component.size = clamp_size(component.size);
        }
        let repaired = hierarchy::repair(&mut scene);
        if repaired > 0 {
            log::warn!("cleared {repaired} invalid parent links while loading scene");
        }
        Ok(scene)
    }

    pub(crate) fn set_parent_unchecked(
        &mut self,
        id: ComponentId,
        parent: Option<ComponentId>,
    ) -> bool {
        match self.get_mut(id) {
            Some(component) => {
                component.parent_id = parent;
                true
            }
            None => false,
        }
    }
}
