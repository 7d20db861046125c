//! Overlay Studio Core Library
//!
//! Direct-manipulation geometry engine for the Overlay Studio layout editor:
//! selection, drag/resize/create gestures, snapping guides, hierarchy-aware
//! stacking, and alignment operators over a fixed-size canvas.

pub mod arrange;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod input;
pub mod interaction;
pub mod observer;
pub mod scene;
pub mod selection;
pub mod snap;
pub mod viewport;

pub use arrange::{Alignment, Distribution, StackMove};
pub use config::EditorConfig;
pub use error::{EngineError, EngineResult};
pub use hierarchy::{HierarchyIndex, StackKey, set_parent};
pub use input::{KeyCommand, Modifiers, PointerButton, PointerEvent};
pub use interaction::{GesturePhase, InteractionEngine, RenderItem};
pub use observer::{EngineObserver, NoopObserver, RecordingObserver};
pub use scene::{ComponentId, ComponentKind, ComponentPatch, MIN_SIZE, PlacedComponent, Scene};
pub use selection::{Corner, Handle, Selection};
pub use snap::{
    GridSpacing, GuideKind, SnapGuide, SnapSettings, snap_move, snap_resize, snap_to_grid,
};
pub use viewport::Viewport;
