use anyhow::{bail, Context, Result};

pub const DEFAULT_UNKNOWN_EVENT_CAP: usize = 500;
pub const DEFAULT_TASK_LIST_MAX: usize = 10;
pub const DEFAULT_EDIT_PREVIEW_CHARS: usize = 200;

const UNKNOWN_EVENT_CAP_ENV: &str = "TRACELENS_UNKNOWN_EVENT_CAP";
const TASK_LIST_MAX_ENV: &str = "TRACELENS_TASK_LIST_MAX";
const EDIT_PREVIEW_CHARS_ENV: &str = "TRACELENS_EDIT_PREVIEW_CHARS";
const COLOR_ENV: &str = "TRACELENS_COLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Rendering limits and output mode. The truncation bounds are configuration,
/// not invariants: operators tune them per loop.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unknown lines at or above this many chars are suppressed entirely.
    pub unknown_event_cap: usize,
    /// Task list items shown before the overflow line.
    pub task_list_max_items: usize,
    /// Single-line preview width for replaced text in edit invocations.
    pub edit_preview_max_chars: usize,
    pub color: ColorMode,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            unknown_event_cap: env_usize(UNKNOWN_EVENT_CAP_ENV, DEFAULT_UNKNOWN_EVENT_CAP)?,
            task_list_max_items: env_usize(TASK_LIST_MAX_ENV, DEFAULT_TASK_LIST_MAX)?,
            edit_preview_max_chars: env_usize(EDIT_PREVIEW_CHARS_ENV, DEFAULT_EDIT_PREVIEW_CHARS)?,
            color: color_mode_from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.unknown_event_cap == 0 {
            bail!("{UNKNOWN_EVENT_CAP_ENV} must be greater than zero");
        }
        if self.task_list_max_items == 0 {
            bail!("{TASK_LIST_MAX_ENV} must be greater than zero");
        }
        if self.edit_preview_max_chars == 0 {
            bail!("{EDIT_PREVIEW_CHARS_ENV} must be greater than zero");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unknown_event_cap: DEFAULT_UNKNOWN_EVENT_CAP,
            task_list_max_items: DEFAULT_TASK_LIST_MAX,
            edit_preview_max_chars: DEFAULT_EDIT_PREVIEW_CHARS,
            color: ColorMode::Auto,
        }
    }
}

fn env_usize(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid {key} value '{raw}': expected an unsigned integer")),
        Err(_) => Ok(default),
    }
}

fn color_mode_from_env() -> Result<ColorMode> {
    let Ok(raw) = std::env::var(COLOR_ENV) else {
        return Ok(ColorMode::Auto);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "auto" => Ok(ColorMode::Auto),
        "always" => Ok(ColorMode::Always),
        "never" => Ok(ColorMode::Never),
        _ => bail!("Invalid {COLOR_ENV} value '{raw}': expected auto, always, or never"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_uses_defaults_without_env() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        std::env::remove_var(UNKNOWN_EVENT_CAP_ENV);
        std::env::remove_var(TASK_LIST_MAX_ENV);
        std::env::remove_var(EDIT_PREVIEW_CHARS_ENV);
        std::env::remove_var(COLOR_ENV);

        let config = Config::load().expect("load config");
        assert_eq!(config.unknown_event_cap, DEFAULT_UNKNOWN_EVENT_CAP);
        assert_eq!(config.task_list_max_items, DEFAULT_TASK_LIST_MAX);
        assert_eq!(config.edit_preview_max_chars, DEFAULT_EDIT_PREVIEW_CHARS);
        assert_eq!(config.color, ColorMode::Auto);
        config.validate().expect("default config is valid");
    }

    #[test]
    fn test_load_reads_overrides_and_rejects_garbage() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        std::env::set_var(UNKNOWN_EVENT_CAP_ENV, "120");
        std::env::set_var(COLOR_ENV, "never");
        let config = Config::load().expect("load config with overrides");
        assert_eq!(config.unknown_event_cap, 120);
        assert_eq!(config.color, ColorMode::Never);

        std::env::set_var(UNKNOWN_EVENT_CAP_ENV, "lots");
        assert!(Config::load().is_err());
        std::env::remove_var(UNKNOWN_EVENT_CAP_ENV);

        std::env::set_var(COLOR_ENV, "rainbow");
        assert!(Config::load().is_err());
        std::env::remove_var(COLOR_ENV);
    }

    #[test]
    fn test_validate_rejects_zero_caps() {
        let config = Config {
            unknown_event_cap: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            task_list_max_items: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
