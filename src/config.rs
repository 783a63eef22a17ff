use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Largest accepted number of dial positions.
pub const MAX_COUNT: u32 = 360;

/// Everything the clock widget needs to lay itself out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockConfig {
    pub count: u32,
    pub step: u32,
    pub use_zero: bool,
    pub zero_pad: bool,
    pub animated: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            count: 0,
            step: 1,
            use_zero: false,
            zero_pad: false,
            animated: false,
        }
    }
}

impl ClockConfig {
    /// True when switching from `self` to `other` requires new number entries.
    pub fn layout_differs(&self, other: &Self) -> bool {
        self.count != other.count || self.step != other.step || self.use_zero != other.use_zero
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ClockPreset {
    #[default]
    #[strum(serialize = "hours", serialize = "h", serialize = "12")]
    Hours,
    #[strum(serialize = "hours24", serialize = "h24", serialize = "24")]
    Hours24,
    #[strum(serialize = "minutes", serialize = "m", serialize = "60")]
    Minutes,
}

impl ClockPreset {
    pub fn clock(&self) -> ClockConfig {
        match self {
            Self::Hours => ClockConfig {
                count: 12,
                step: 1,
                use_zero: false,
                zero_pad: false,
                animated: true,
            },
            Self::Hours24 => ClockConfig {
                count: 24,
                step: 1,
                use_zero: true,
                zero_pad: true,
                animated: true,
            },
            Self::Minutes => ClockConfig {
                count: 60,
                step: 5,
                use_zero: true,
                zero_pad: true,
                animated: true,
            },
        }
    }
}

/// On-disk configuration: a preset plus optional per-field overrides.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub preset: ClockPreset,
    pub count: Option<u32>,
    pub step: Option<u32>,
    pub use_zero: Option<bool>,
    pub zero_pad: Option<bool>,
    pub animated: Option<bool>,
    pub selected: Option<i64>,
}

impl Config {
    pub fn clock(&self) -> ClockConfig {
        let base = self.preset.clock();
        let mut count = self.count.unwrap_or(base.count);
        if count > MAX_COUNT {
            log::warn!("count {} is above {}, clamping", count, MAX_COUNT);
            count = MAX_COUNT;
        }
        ClockConfig {
            count,
            step: self.step.unwrap_or(base.step),
            use_zero: self.use_zero.unwrap_or(base.use_zero),
            zero_pad: self.zero_pad.unwrap_or(base.zero_pad),
            animated: self.animated.unwrap_or(base.animated),
        }
    }
}

/// Command-line values that win over the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub preset: Option<ClockPreset>,
    pub count: Option<u32>,
    pub step: Option<u32>,
    pub use_zero: bool,
    pub zero_pad: bool,
    pub no_animation: bool,
    pub selected: Option<i64>,
}

impl Overrides {
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(preset) = self.preset {
            config.preset = preset;
        }
        config.count = self.count.or(config.count);
        config.step = self.step.or(config.step);
        config.selected = self.selected.or(config.selected);
        if self.use_zero {
            config.use_zero = Some(true);
        }
        if self.zero_pad {
            config.zero_pad = Some(true);
        }
        if self.no_animation {
            config.animated = Some(false);
        }
        config
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "troia", "clock-selector")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("CLOCK_SELECTOR").try_parsing(true))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_deserialization() {
        let cases = vec![
            ("\"hours\"", ClockPreset::Hours),
            ("\"Hours\"", ClockPreset::Hours),
            ("\"h\"", ClockPreset::Hours),
            ("\"12\"", ClockPreset::Hours),
            ("\"H24\"", ClockPreset::Hours24),
            ("\"MINUTES\"", ClockPreset::Minutes),
            ("\"60\"", ClockPreset::Minutes),
        ];

        for (json, expected) in cases {
            let deserialized: ClockPreset = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_presets_are_laid_out() {
        use strum::IntoEnumIterator;

        for preset in ClockPreset::iter() {
            let clock = preset.clock();
            assert!(clock.count > 0, "{preset}");
            assert_eq!(clock.count % clock.step, 0, "{preset}");
        }
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        assert!(serde_json::from_str::<ClockPreset>("\"seconds\"").is_err());
    }

    #[test]
    fn test_overrides_apply_on_top_of_preset() {
        let config: Config =
            serde_json::from_str(r#"{ "preset": "minutes", "step": 10, "animated": false }"#)
                .unwrap();
        let clock = config.clock();

        assert_eq!(clock.count, 60);
        assert_eq!(clock.step, 10);
        assert!(clock.use_zero);
        assert!(clock.zero_pad);
        assert!(!clock.animated);
    }

    #[test]
    fn test_empty_config_is_hours() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.clock(), ClockPreset::Hours.clock());
        assert_eq!(config.selected, None);
    }

    #[test]
    fn test_clock_config_defaults_missing_fields() {
        let clock: ClockConfig = serde_json::from_str(r#"{ "count": 24 }"#).unwrap();
        assert_eq!(clock.count, 24);
        assert_eq!(clock.step, 1);
        assert!(!clock.use_zero);
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.preset, ClockPreset::Hours);
    }

    #[test]
    fn test_overrides_win() {
        let file: Config =
            serde_json::from_str(r#"{ "preset": "hours", "count": 24, "selected": 5 }"#).unwrap();
        let overrides = Overrides {
            preset: Some(ClockPreset::Minutes),
            count: None,
            step: Some(15),
            zero_pad: true,
            no_animation: true,
            ..Default::default()
        };
        let merged = overrides.apply(file);

        assert_eq!(merged.preset, ClockPreset::Minutes);
        assert_eq!(merged.count, Some(24));
        assert_eq!(merged.selected, Some(5));

        let clock = merged.clock();
        assert_eq!(clock.step, 15);
        assert!(clock.zero_pad);
        assert!(!clock.animated);
    }

    #[test]
    fn test_absurd_count_is_clamped() {
        let config = Overrides {
            count: Some(4_000_000_000),
            ..Default::default()
        }
        .apply(Config::default());
        assert_eq!(config.clock().count, MAX_COUNT);

        let config: Config = serde_json::from_str(r#"{ "count": 360 }"#).unwrap();
        assert_eq!(config.clock().count, 360);
    }

    #[test]
    fn test_layout_differs() {
        let hours = ClockPreset::Hours.clock();
        let padded = ClockConfig {
            zero_pad: true,
            ..hours
        };
        assert!(!hours.layout_differs(&padded));
        assert!(hours.layout_differs(&ClockPreset::Minutes.clock()));
    }
}
