//! Outward hooks: gesture lifecycle, selection changes, undo boundaries.

use crate::interaction::GesturePhase;
use crate::scene::ComponentId;

/// Receiver for engine notifications. Every method defaults to a no-op.
///
/// `begin_operation`/`end_operation` bracket each undoable change; the undo
/// log itself lives with the implementor.
pub trait EngineObserver {
    /// A drag, resize, create or pan gesture started.
    fn on_gesture_start(&mut self, _phase: GesturePhase) {}

    /// The gesture started with `phase` ended (pointer-up).
    fn on_gesture_end(&mut self, _phase: GesturePhase) {}

    fn on_selection_changed(&mut self, _selection: &[ComponentId]) {}

    fn begin_operation(&mut self, _description: &str) {}

    fn end_operation(&mut self) {}

    fn on_undo_requested(&mut self) {}

    fn on_redo_requested(&mut self) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}

/// Observer that records every notification, for tests and debugging.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingObserver {
    pub events: Vec<ObserverEvent>,
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent {
    GestureStart(GesturePhase),
    GestureEnd(GesturePhase),
    SelectionChanged(Vec<ComponentId>),
    Begin(String),
    End,
    Undo,
    Redo,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptions of every operation started so far.
    pub fn operations(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObserverEvent::Begin(desc) => Some(desc.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EngineObserver for RecordingObserver {
    fn on_gesture_start(&mut self, phase: GesturePhase) {
        self.events.push(ObserverEvent::GestureStart(phase));
    }

    fn on_gesture_end(&mut self, phase: GesturePhase) {
        self.events.push(ObserverEvent::GestureEnd(phase));
    }

    fn on_selection_changed(&mut self, selection: &[ComponentId]) {
        self.events.push(ObserverEvent::SelectionChanged(selection.to_vec()));
    }

    fn begin_operation(&mut self, description: &str) {
        self.events.push(ObserverEvent::Begin(description.to_string()));
    }

    fn end_operation(&mut self) {
        self.events.push(ObserverEvent::End);
    }

    fn on_undo_requested(&mut self) {
        self.events.push(ObserverEvent::Undo);
    }

    fn on_redo_requested(&mut self) {
        self.events.push(ObserverEvent::Redo);
    }
}
