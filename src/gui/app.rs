use crate::config::{self, Overrides};
use crate::events::AppEvent;
use crate::gui::clock::{ClockMsg, ClockOutput, ClockSelector};
use crate::gui::theme;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::RelmWidgetExt;
use relm4::prelude::*;

pub struct AppModel {
    pub clock: Controller<ClockSelector>,
    pub value: String,
    pub overrides: Overrides,
}

#[derive(Debug)]
pub enum AppMsg {
    ConfigReload,
    Clock(ClockOutput),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        config::Config,
        Overrides,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Clock Selector"),
            set_default_size: (360, 440),

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 12,
                set_margin_all: 16,

                gtk::Label {
                    add_css_class: "title-1",
                    #[watch]
                    set_label: &model.value,
                },

                append: model.clock.widget(),
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, overrides, rx) = init;

        theme::load_css();

        let clock = ClockSelector::builder()
            .launch((config.clock(), config.selected.unwrap_or_default()))
            .forward(sender.input_sender(), AppMsg::Clock);

        let model = AppModel {
            clock,
            value: String::new(),
            overrides,
        };

        let widgets = view_output!();

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Clock(ClockOutput::SelectedChanged(value)) => {
                self.value = value.to_string();
            }
            AppMsg::Clock(ClockOutput::Selected { value, animated }) => {
                log::info!("Selected {} (animated: {})", value, animated);
            }
            AppMsg::Clock(ClockOutput::TransitionEnd) => {
                log::trace!("Hand settled");
            }
            AppMsg::Clock(ClockOutput::Pulse { duration }) => {
                log::debug!("Haptic pulse requested ({:?})", duration);
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    let new_config = self.overrides.apply(new_config);
                    self.clock.emit(ClockMsg::Configure(new_config.clock()));
                    if let Some(selected) = new_config.selected {
                        self.clock.emit(ClockMsg::Select(selected));
                    }
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
