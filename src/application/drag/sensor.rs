//! Pointer sensor: separates drags from clicks and emits drag events.

use tracing::trace;

/// Pointer travel (px) required before a press turns into a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f32 = 8.0;

/// Pointer position in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Discrete drag events carrying the dragged item and the hovered target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start { active: String },
    Over { active: String, over: Option<String> },
    End { active: String, over: Option<String> },
    Cancel { active: String },
}

/// What a pointer release amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    /// Released before the activation distance was exceeded
    Click { item: String },
    /// Released while dragging
    Drop(DragEvent),
    /// Nothing was pressed
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
enum SensorState {
    Idle,
    Pending { item: String, origin: Point },
    Dragging { item: String },
}

/// Turns press / move / release into [`DragEvent`]s.
#[derive(Debug, Clone)]
pub struct DragSensor {
    activation_distance: f32,
    state: SensorState,
}

impl Default for DragSensor {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl DragSensor {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            state: SensorState::Idle,
        }
    }

    pub fn activation_distance(&self) -> f32 {
        self.activation_distance
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SensorState::Dragging { .. })
    }

    /// Item currently being dragged, if any.
    pub fn active(&self) -> Option<&str> {
        match &self.state {
            SensorState::Dragging { item } => Some(item),
            _ => None,
        }
    }

    /// Pointer down on `item_id`. Ignored while a drag is in progress.
    pub fn press(&mut self, item_id: impl Into<String>, at: Point) {
        if self.is_dragging() {
            return;
        }
        self.state = SensorState::Pending {
            item: item_id.into(),
            origin: at,
        };
    }

    /// Pointer moved to `at`, hovering `over`.
    ///
    /// Emits `Start` once the travel exceeds the activation distance, then
    /// `Over` on every following move.
    pub fn moved(&mut self, at: Point, over: Option<&str>) -> Option<DragEvent> {
        match &self.state {
            SensorState::Idle => None,
            SensorState::Pending { item, origin } => {
                let travelled = origin.distance_to(at);
                if travelled <= self.activation_distance {
                    return None;
                }
                trace!("drag activated: item={}, travelled={:.1}", item, travelled);
                let item = item.clone();
                self.state = SensorState::Dragging { item: item.clone() };
                Some(DragEvent::Start { active: item })
            }
            SensorState::Dragging { item } => Some(DragEvent::Over {
                active: item.clone(),
                over: over.map(str::to_string),
            }),
        }
    }

    /// Pointer up over `over`.
    pub fn release(&mut self, over: Option<&str>) -> Release {
        match std::mem::replace(&mut self.state, SensorState::Idle) {
            SensorState::Idle => Release::Ignored,
            SensorState::Pending { item, .. } => Release::Click { item },
            SensorState::Dragging { item } => Release::Drop(DragEvent::End {
                active: item,
                over: over.map(str::to_string),
            }),
        }
    }

    /// Abort the gesture (e.g. Escape).
    pub fn cancel(&mut self) -> Option<DragEvent> {
        match std::mem::replace(&mut self.state, SensorState::Idle) {
            SensorState::Dragging { item } => Some(DragEvent::Cancel { active: item }),
            _ => None,
        }
    }
}
