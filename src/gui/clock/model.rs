use super::angle::{self, RADIANS_PER_DEGREE};
use super::animation::{Frame, HandAnimation};
use super::{MAX_VISIBLE, PADDING, SELECTOR_SIZE};
use crate::config::ClockConfig;
use derive_more::{AsRef, Deref, Display, From, Into};
use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Per-widget identifier, used to name the drawing area for styling and logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn random() -> Self {
        Self(glib::uuid_string_random().to_string())
    }

    pub fn widget_name(&self) -> String {
        format!("clock-selector-{}", self.0)
    }
}

/// Measured face, in face-local coordinates (the face square starts at `origin`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    pub origin: Point,
    pub radius: f64,
    pub outer: f64,
    pub inner: f64,
    pub center: f64,
}

impl FaceGeometry {
    /// Fits the largest circle into a `width` x `height` area. `None` when
    /// there is nothing to draw into.
    pub fn fit(width: f64, height: f64) -> Option<Self> {
        let radius = width.min(height) / 2.0;
        if radius <= 0.0 {
            return None;
        }
        let outer = radius - PADDING * 2.0;
        Some(Self {
            origin: Point::new((width - radius * 2.0) / 2.0, (height - radius * 2.0) / 2.0),
            radius,
            outer,
            inner: outer - SELECTOR_SIZE * 2.0,
            center: outer - SELECTOR_SIZE,
        })
    }

    /// Point on the selector ring at `degrees` clockwise from 12 o'clock.
    pub fn ring_point(&self, degrees: f64) -> Point {
        let radians = degrees * RADIANS_PER_DEGREE;
        Point::new(
            self.radius + radians.sin() * self.center,
            self.radius - radians.cos() * self.center,
        )
    }
}

/// Snapshot of where the face sat inside the widget once layout settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberEntry {
    pub index: u32,
    pub value: u32,
    pub display: bool,
    pub position: Point,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackPhase {
    Move,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Tap,
    Track(TrackPhase),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerHit {
    pub index: i64,
    pub animated: bool,
    /// Only taps and the end of a drag announce a selection.
    pub fire_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionChange {
    Ignored,
    Accepted { value: i64, angle: f64 },
}

/// Announcement for a completed tap or drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selected {
    pub value: i64,
    pub animated: bool,
}

/// What a pointer event did to the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOutcome {
    pub change: SelectionChange,
    pub selected: Option<Selected>,
}

/// How a requested hand rotation should be carried out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationPlan {
    /// The hand already points there. No transition end is awaited.
    Immediate { angle: f64, animate: bool },
    /// Apply on the next main loop turn. A completion callback is only kept
    /// when `register_listener` is set.
    Deferred {
        angle: f64,
        animate: bool,
        register_listener: bool,
    },
}

/// Trailing-edge debounce keyed by generation: only the most recent
/// schedule settles, and only once.
#[derive(Debug, Default)]
pub struct Debounce {
    generation: u64,
    settled: bool,
}

impl Debounce {
    /// Starts a new wait and returns the token the timer should hand back.
    pub fn schedule(&mut self) -> u64 {
        self.generation += 1;
        self.settled = false;
        self.generation
    }

    /// True when `token` belongs to the latest schedule and has not fired yet.
    pub fn settle(&mut self, token: u64) -> bool {
        if token != self.generation || self.settled {
            return false;
        }
        self.settled = true;
        true
    }
}

pub struct SelectorState {
    pub id: InstanceId,
    pub config: ClockConfig,
    pub selected: i64,
    /// Default for unspecified rotations; drags switch it off while moving.
    pub animated: bool,
    pub step: u32,
    pub numbers: Vec<NumberEntry>,
    pub current_angle: f64,
    pub hand: Option<Point>,
    pub hand_on_label: bool,
    pub geometry: Option<FaceGeometry>,
    pub bounds: Option<Bounds>,
    pub animation: Option<HandAnimation>,
    generation: u64,
}

impl SelectorState {
    pub fn new(config: ClockConfig, selected: i64) -> Self {
        let mut state = Self {
            id: InstanceId::random(),
            config,
            selected,
            animated: config.animated,
            step: config.step,
            numbers: Vec::new(),
            current_angle: 0.0,
            hand: None,
            hand_on_label: false,
            geometry: None,
            bounds: None,
            animation: None,
            generation: 0,
        };
        state.populate();
        state
    }

    fn count(&self) -> i64 {
        self.config.count as i64
    }

    /// Applies a new configuration. Rebuilds number entries when the layout
    /// changed, relabels them when only padding changed, and returns the
    /// reaction of the current selection to the new layout.
    pub fn configure(&mut self, config: ClockConfig) -> SelectionChange {
        let previous = std::mem::replace(&mut self.config, config);
        if previous.animated != config.animated {
            self.animated = config.animated;
        }

        if previous.layout_differs(&config) {
            log::debug!(
                "{}: rebuilding {} entries (step {}, use_zero {})",
                self.id,
                config.count,
                config.step,
                config.use_zero
            );
            self.populate();
            return self.refresh_selection();
        }
        if previous.zero_pad != config.zero_pad {
            self.relabel();
        }
        SelectionChange::Ignored
    }

    /// Smallest step that keeps at most `MAX_VISIBLE` labels on the face.
    pub fn effective_step(&self) -> u32 {
        if self.config.count == 0 {
            return self.step;
        }
        self.config
            .step
            .max(self.config.count.div_ceil(MAX_VISIBLE))
    }

    fn populate(&mut self) {
        self.step = self.effective_step();
        let (count, step, zero_pad) = (self.config.count, self.step, self.config.zero_pad);

        self.numbers = (0..count)
            .map(|index| {
                let value = if index == 0 && !self.config.use_zero {
                    count
                } else {
                    index
                };
                NumberEntry {
                    index,
                    value,
                    display: value % step == 0,
                    position: Point::default(),
                    label: format_label(value, zero_pad),
                }
            })
            .collect();

        self.position_numbers();
        self.update_hand_position();
    }

    fn relabel(&mut self) {
        let zero_pad = self.config.zero_pad;
        for number in &mut self.numbers {
            number.label = format_label(number.value, zero_pad);
        }
    }

    fn position_numbers(&mut self) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let interval = 360.0 / self.config.count as f64;
        for number in &mut self.numbers {
            number.position = geometry.ring_point(interval * number.index as f64);
        }
        self.relabel();
    }

    fn update_hand_position(&mut self) {
        self.hand = self
            .geometry
            .map(|geometry| geometry.ring_point(self.current_angle));
    }

    /// Lays the face out in a `width` x `height` drawing area.
    pub fn measure(&mut self, width: f64, height: f64) {
        self.geometry = FaceGeometry::fit(width, height);
        self.position_numbers();
        self.update_hand_position();
    }

    /// Records where the face sits once the allocation has settled.
    pub fn capture_bounds(&mut self, width: f64, height: f64) {
        self.bounds = FaceGeometry::fit(width, height).map(|g| Bounds {
            left: g.origin.x,
            top: g.origin.y,
            width: g.radius * 2.0,
        });
    }

    /// Maps a raw selection into `[0, count)` or `[1, count]` depending on
    /// `use_zero`.
    pub fn normalize_selection(&self, value: i64) -> i64 {
        let count = self.count();
        let value = value.rem_euclid(count);
        if value == 0 && !self.config.use_zero {
            count
        } else {
            value
        }
    }

    pub fn select(&mut self, value: i64) -> SelectionChange {
        if value == self.selected {
            return SelectionChange::Ignored;
        }
        self.selected = value;
        self.refresh_selection()
    }

    /// Re-validates the stored selection against the current layout.
    pub fn refresh_selection(&mut self) -> SelectionChange {
        if self.config.count == 0 {
            return SelectionChange::Ignored;
        }
        let normalized = self.normalize_selection(self.selected);
        if normalized != self.selected {
            self.selected = normalized;
            return self.refresh_selection();
        }
        SelectionChange::Accepted {
            value: self.selected,
            angle: self.angle_for(self.selected),
        }
    }

    pub fn angle_for(&self, value: i64) -> f64 {
        360.0 / self.config.count as f64 * value as f64
    }

    /// Whether the hand at `degrees` rests on a labelled position.
    pub fn has_label_at(&self, degrees: f64) -> bool {
        if self.config.count == 0 {
            return false;
        }
        let position = angle::normalize(degrees) / 360.0 * self.config.count as f64;
        let rem = position.rem_euclid(self.step as f64);
        rem < 1e-9 || self.step as f64 - rem < 1e-9
    }

    pub fn plan_rotation(&self, degrees: f64, animate: Option<bool>) -> RotationPlan {
        let degrees = angle::normalize(degrees);
        let animate = animate.unwrap_or(self.animated) && self.geometry.is_some();

        let current = self.current_angle;
        let rotate = angle::shortest_angle(current, degrees);
        if angle::normalize(rotate) == angle::normalize(current) {
            RotationPlan::Immediate {
                angle: current,
                animate,
            }
        } else {
            RotationPlan::Deferred {
                angle: rotate,
                animate,
                register_listener: animate,
            }
        }
    }

    /// Moves the hand to `angle`. Returns the generation of the animation to
    /// drive when `animate` is set; a snap cancels whatever was running.
    pub fn apply_rotation(&mut self, angle: f64, animate: bool) -> Option<u64> {
        self.hand_on_label = self.has_label_at(angle);
        self.generation += 1;

        if animate {
            self.animation = Some(HandAnimation::new(
                self.generation,
                self.current_angle,
                angle,
            ));
            return Some(self.generation);
        }

        self.animation = None;
        self.current_angle = angle;
        self.update_hand_position();
        None
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Steps the animation owned by `generation` to the frame at `now`.
    pub fn advance_animation(&mut self, generation: u64, now: i64) -> Frame {
        let Some(animation) = self
            .animation
            .as_mut()
            .filter(|a| a.generation == generation)
        else {
            return Frame::Cancelled;
        };

        let (angle, finished) = animation.sample(now);
        self.current_angle = angle;
        self.update_hand_position();

        if finished {
            self.animation = None;
            Frame::Finished
        } else {
            Frame::Running
        }
    }

    /// Resolves a pointer position (widget coordinates) to an index on the
    /// dial. Positions outside the selector ring are ignored.
    pub fn hit_test(&mut self, event: PointerEvent) -> Option<PointerHit> {
        let geometry = self.geometry?;
        let bounds = self.bounds?;
        if self.config.count == 0 {
            return None;
        }

        let x = event.position.x - bounds.left - geometry.radius;
        let y = event.position.y - bounds.top - geometry.radius;

        let distance = x.hypot(y);
        if distance < geometry.inner || distance > geometry.outer {
            log::trace!("{}: pointer outside ring ({:.1})", self.id, distance);
            return None;
        }

        let moving = event.kind == PointerKind::Track(TrackPhase::Move);
        self.animated = !moving;

        // clockwise from 12 o'clock
        let theta = (y.atan2(x) + FRAC_PI_2).rem_euclid(TAU);
        let interval = TAU / self.config.count as f64;

        Some(PointerHit {
            index: (theta / interval).round() as i64,
            animated: self.animated,
            fire_selected: !moving,
        })
    }

    /// Applies a pointer event to the selection. Taps and drag ends announce
    /// the resulting value even when it did not change.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<PointerOutcome> {
        let hit = self.hit_test(event)?;
        let change = self.select(hit.index);
        let selected = hit.fire_selected.then_some(Selected {
            value: self.selected,
            animated: hit.animated,
        });
        Some(PointerOutcome { change, selected })
    }
}

pub fn format_label(value: u32, zero_pad: bool) -> String {
    if zero_pad {
        format!("{:02}", value)
    } else {
        value.to_string()
    }
}
