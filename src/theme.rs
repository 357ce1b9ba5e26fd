//! Theme resolution.
//!
//! The display theme is resolved through a chain:
//!
//! 1. the `theme` preference saved by a previous toggle
//! 2. the terminal's background hint (`COLORFGBG`)
//! 3. light
//!
//! Every toggle writes the new value back, so the stored preference wins
//! from then on.

use std::env;

use crate::model::Theme;
use crate::storage::{self, Storage};

/// Preference key the theme is stored under.
pub const THEME_KEY: &str = "theme";

/// Resolve the theme from storage, then the system hint, then the default.
pub fn resolve(storage: &Storage) -> storage::Result<Theme> {
    if let Some(stored) = storage.get(THEME_KEY)? {
        match stored.parse() {
            Ok(theme) => return Ok(theme),
            Err(e) => tracing::warn!("ignoring stored theme: {e}"),
        }
    }

    let hint = env::var("COLORFGBG").ok();
    Ok(system_theme(hint.as_deref()).unwrap_or_default())
}

/// Flip the current theme and persist the result.
pub fn toggle(storage: &Storage) -> storage::Result<Theme> {
    let next = resolve(storage)?.toggled();
    set(storage, next)?;
    Ok(next)
}

pub fn set(storage: &Storage, theme: Theme) -> storage::Result<()> {
    storage.set(THEME_KEY, theme.as_str())
}

/// Interpret a `COLORFGBG` value (`"fg;bg"` or `"fg;default;bg"`).
///
/// Background colors 0–6 and 8 are the dark half of the 16-color palette.
fn system_theme(colorfgbg: Option<&str>) -> Option<Theme> {
    let background: u8 = colorfgbg?.rsplit(';').next()?.trim().parse().ok()?;
    Some(if matches!(background, 0..=6 | 8) {
        Theme::Dark
    } else {
        Theme::Light
    })
}
