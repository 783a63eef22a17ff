use super::animation::{Frame, OnComplete, TransitionListeners};
use super::model::{
    Debounce, PointerEvent, PointerKind, RotationPlan, SelectionChange, SelectorState, TrackPhase,
};
use super::{BOUNDS_SETTLE_DELAY, PULSE_DEBOUNCE, PULSE_DURATION};
use crate::config::ClockConfig;
use crate::gui::clock;
use crate::gui::theme::ThemeColors;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub struct ClockSelector {
    state: Rc<RefCell<SelectorState>>,
    listeners: TransitionListeners,
    drawing_area: gtk::DrawingArea,
    pulse: Debounce,
}

#[derive(Debug)]
pub enum ClockMsg {
    Configure(ClockConfig),
    Select(i64),
    SetHand {
        degrees: f64,
        animate: Option<bool>,
        on_complete: Option<OnComplete>,
    },
    Resize(i32, i32),
    SettleBounds,
    Pointer(PointerEvent),
    ApplyRotation {
        angle: f64,
        animate: bool,
    },
    TransitionEnd,
    Pulse(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClockOutput {
    /// `selected` changed, from any source.
    SelectedChanged(i64),
    /// The user picked a value with a tap or by letting go of a drag.
    Selected { value: i64, animated: bool },
    TransitionEnd,
    /// Short haptic feedback request, already debounced.
    Pulse { duration: Duration },
}

#[relm4::component(pub)]
impl SimpleComponent for ClockSelector {
    type Init = (ClockConfig, i64);
    type Input = ClockMsg;
    type Output = ClockOutput;

    view! {
        #[root]
        #[name = "drawing_area"]
        gtk::DrawingArea {
            set_hexpand: true,
            set_vexpand: true,
            set_widget_name: &widget_name,
            add_css_class: "clock-selector",

            connect_resize[sender] => move |_, width, height| {
                sender.input(ClockMsg::Resize(width, height));
            },

            add_controller = gtk::GestureDrag {
                connect_drag_update[sender] => move |gesture, dx, dy| {
                    if let Some((x, y)) = gesture.start_point() {
                        let kind = PointerKind::Track(TrackPhase::Move);
                        sender.input(ClockMsg::Pointer(PointerEvent::new(kind, x + dx, y + dy)));
                    }
                },
                connect_drag_end[sender] => move |gesture, dx, dy| {
                    if let Some((x, y)) = gesture.start_point() {
                        // a press that never moved is a tap
                        let kind = if dx == 0.0 && dy == 0.0 {
                            PointerKind::Tap
                        } else {
                            PointerKind::Track(TrackPhase::End)
                        };
                        sender.input(ClockMsg::Pointer(PointerEvent::new(kind, x + dx, y + dy)));
                    }
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, selected) = init;

        let state = Rc::new(RefCell::new(SelectorState::new(config, selected)));
        let widget_name = state.borrow().id.widget_name();

        let mut model = ClockSelector {
            state: state.clone(),
            listeners: TransitionListeners::default(),
            drawing_area: root.clone(),
            pulse: Debounce::default(),
        };

        let widgets = view_output!();

        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = clock::draw(cr, &state.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let change = model.state.borrow_mut().refresh_selection();
        model.react(change, &sender);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            ClockMsg::Configure(config) => {
                let change = self.state.borrow_mut().configure(config);
                self.react(change, &sender);
                self.drawing_area.queue_draw();
            }
            ClockMsg::Select(value) => {
                let change = self.state.borrow_mut().select(value);
                self.react(change, &sender);
            }
            ClockMsg::SetHand {
                degrees,
                animate,
                on_complete,
            } => self.set_clock_hand(degrees, animate, on_complete, &sender),
            ClockMsg::Resize(width, height) => {
                self.state
                    .borrow_mut()
                    .measure(width as f64, height as f64);
                self.drawing_area.queue_draw();

                // the allocation can still move for a moment after a resize
                let sender = sender.clone();
                glib::timeout_add_local_once(BOUNDS_SETTLE_DELAY, move || {
                    sender.input(ClockMsg::SettleBounds);
                });
            }
            ClockMsg::SettleBounds => {
                let (width, height) = (
                    self.drawing_area.width() as f64,
                    self.drawing_area.height() as f64,
                );
                self.state.borrow_mut().capture_bounds(width, height);
            }
            ClockMsg::Pointer(event) => self.handle_pointer(event, &sender),
            ClockMsg::ApplyRotation { angle, animate } => {
                self.apply_rotation(angle, animate, &sender)
            }
            ClockMsg::TransitionEnd => {
                let fired = self.listeners.fire();
                log::trace!("Transition end, {} listener(s) notified", fired);
                Self::emit(&sender, ClockOutput::TransitionEnd);
            }
            ClockMsg::Pulse(generation) => {
                if self.pulse.settle(generation) {
                    Self::emit(
                        &sender,
                        ClockOutput::Pulse {
                            duration: PULSE_DURATION,
                        },
                    );
                }
            }
        }
    }
}

impl ClockSelector {
    fn emit(sender: &ComponentSender<Self>, output: ClockOutput) {
        if sender.output(output).is_err() {
            log::debug!("Clock output dropped, no receiver");
        }
    }

    fn react(&mut self, change: SelectionChange, sender: &ComponentSender<Self>) {
        let SelectionChange::Accepted { value, angle } = change else {
            return;
        };
        self.schedule_pulse(sender);
        Self::emit(sender, ClockOutput::SelectedChanged(value));
        self.set_clock_hand(angle, None, None, sender);
    }

    /// Collapses bursts of selection changes into a single pulse.
    fn schedule_pulse(&mut self, sender: &ComponentSender<Self>) {
        let generation = self.pulse.schedule();
        let sender = sender.clone();
        glib::timeout_add_local_once(PULSE_DEBOUNCE, move || {
            sender.input(ClockMsg::Pulse(generation));
        });
    }

    fn set_clock_hand(
        &mut self,
        degrees: f64,
        animate: Option<bool>,
        on_complete: Option<OnComplete>,
        sender: &ComponentSender<Self>,
    ) {
        let plan = self.state.borrow().plan_rotation(degrees, animate);
        match plan {
            RotationPlan::Immediate { angle, animate } => {
                self.apply_rotation(angle, animate, sender)
            }
            RotationPlan::Deferred {
                angle,
                animate,
                register_listener,
            } => {
                if register_listener && let Some(callback) = on_complete {
                    self.listeners.register(callback);
                }
                // let the rest of this batch of updates land first
                sender.input(ClockMsg::ApplyRotation { angle, animate });
            }
        }
    }

    fn apply_rotation(&mut self, angle: f64, animate: bool, sender: &ComponentSender<Self>) {
        let generation = self.state.borrow_mut().apply_rotation(angle, animate);
        self.drawing_area.queue_draw();

        let Some(generation) = generation else {
            return;
        };

        let state = self.state.clone();
        let sender = sender.clone();
        self.drawing_area.add_tick_callback(move |area, frame_clock| {
            let frame = state
                .borrow_mut()
                .advance_animation(generation, frame_clock.frame_time());
            match frame {
                Frame::Cancelled => glib::ControlFlow::Break,
                Frame::Running => {
                    area.queue_draw();
                    glib::ControlFlow::Continue
                }
                Frame::Finished => {
                    area.queue_draw();
                    sender.input(ClockMsg::TransitionEnd);
                    glib::ControlFlow::Break
                }
            }
        });
    }

    fn handle_pointer(&mut self, event: PointerEvent, sender: &ComponentSender<Self>) {
        let Some(outcome) = self.state.borrow_mut().pointer(event) else {
            return;
        };

        self.react(outcome.change, sender);

        if let Some(selected) = outcome.selected {
            Self::emit(
                sender,
                ClockOutput::Selected {
                    value: selected.value,
                    animated: selected.animated,
                },
            );
        }
    }
}
