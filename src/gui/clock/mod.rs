use std::time::Duration;

pub mod angle;
pub mod animation;
pub mod component;
pub mod model;
pub mod view;

pub use animation::{Frame, HandAnimation, OnComplete, TransitionListeners};
pub use component::{ClockMsg, ClockOutput, ClockSelector};
pub use model::{
    Bounds, Debounce, FaceGeometry, InstanceId, NumberEntry, Point, PointerEvent, PointerHit,
    PointerKind, PointerOutcome, RotationPlan, Selected, SelectionChange, SelectorState,
    TrackPhase,
};
pub use view::draw;

pub const MAX_VISIBLE: u32 = 12;
pub const ANIMATION_DURATION: Duration = Duration::from_millis(150);
pub const BOUNDS_SETTLE_DELAY: Duration = Duration::from_millis(150);
pub const PULSE_DEBOUNCE: Duration = Duration::from_millis(16);
pub const PULSE_DURATION: Duration = Duration::from_millis(10);
/// Radius of the disc at the tip of the hand.
pub const SELECTOR_SIZE: f64 = 20.0;
/// Radius of the dot shown when the hand sits between labels.
pub const SELECTOR_DOT_SIZE: f64 = 3.0;
pub const PADDING: f64 = 2.0;
pub const CENTER_DOT_SIZE: f64 = 4.0;
pub const HAND_WIDTH: f64 = 2.0;
pub const LABEL_FONT_SIZE: f64 = 16.0;
