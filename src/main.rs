use clap::Parser;
use clock_selector::config::{self, ClockPreset, Overrides};
use clock_selector::gui::app::AppModel;
use clock_selector::sys::runtime;
use relm4::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "clock-selector", version, about, long_about = None)]
struct Cli {
    /// Dial layout: hours, hours24 or minutes
    #[arg(short = 'p', long)]
    preset: Option<ClockPreset>,

    /// Number of positions around the dial (overrides the preset)
    #[arg(short = 'c', long)]
    count: Option<u32>,

    /// Label every n-th position
    #[arg(long)]
    step: Option<u32>,

    /// Show 0 instead of the full count at the top
    #[arg(long)]
    use_zero: bool,

    /// Format labels with two digits
    #[arg(long)]
    zero_pad: bool,

    /// Snap the hand instead of animating it
    #[arg(long)]
    no_animation: bool,

    /// Initial selection
    #[arg(short = 's', long, allow_negative_numbers = true)]
    selected: Option<i64>,

    /// Write the default config file and print its path
    #[arg(long)]
    init_config: bool,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            preset: cli.preset,
            count: cli.count,
            step: cli.step,
            use_zero: cli.use_zero,
            zero_pad: cli.zero_pad,
            no_animation: cli.no_animation,
            selected: cli.selected,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.init_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let overrides = Overrides::from(&cli);
    let config = overrides.apply(config::load_or_default());

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    // arguments belong to clap, not GTK
    let app = RelmApp::new("org.troia.clock-selector").with_args(Vec::new());

    app.run::<AppModel>((config, overrides, rx));
    Ok(())
}
