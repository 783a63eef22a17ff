use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub face: Srgba<f64>,
    pub label: Srgba<f64>,
    pub hand: Srgba<f64>,
    /// Labels as seen through the hand's selector disc.
    pub label_on_hand: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            face: Srgba::new(0.93, 0.93, 0.93, 1.0),
            label: Srgba::new(0.13, 0.13, 0.13, 0.87),
            hand: Srgba::new(0.25, 0.32, 0.71, 1.0),
            label_on_hand: Srgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        Self {
            face: Self::lookup_color(context, "theme_unfocused_bg_color", fallback.face, None),
            label: Self::lookup_color(context, "theme_fg_color", fallback.label, Some(0.87)),
            hand: Self::lookup_color(context, "theme_selected_bg_color", fallback.hand, None),
            label_on_hand: Self::lookup_color(
                context,
                "theme_selected_fg_color",
                fallback.label_on_hand,
                None,
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.clock-selector {
    min-width: 160px;
    min-height: 160px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
