// Light/dark theme preference, persisted through a `KeyValueStore`.

use std::fmt;
use std::str::FromStr;

use crate::storage::KeyValueStore;

/// Storage key of the theme preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the toggle control: names the theme it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark Mode",
            Theme::Dark => "Light Mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

/// Guess the terminal's color scheme from `COLORFGBG` ("fg;bg"). Background
/// colors 0-6 and 8 are the dark ANSI colors.
pub fn system_preference_from(colorfgbg: Option<&str>) -> Theme {
    let bg = colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match bg {
        Some(0..=6) | Some(8) => Theme::Dark,
        _ => Theme::Light,
    }
}

pub fn system_preference() -> Theme {
    system_preference_from(std::env::var("COLORFGBG").ok().as_deref())
}

/// The current theme plus the store it is persisted to.
pub struct ThemeSetting<S> {
    store: S,
    theme: Theme,
}

impl<S: KeyValueStore> ThemeSetting<S> {
    /// Read the stored preference. The system preference is consulted only
    /// when nothing valid is stored.
    pub fn load(store: S, system: impl FnOnce() -> Theme) -> Self {
        let saved = match store.get(THEME_KEY) {
            Ok(value) => value.and_then(|v| v.parse::<Theme>().ok()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read theme preference");
                None
            }
        };
        let theme = saved.unwrap_or_else(system);
        ThemeSetting { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme and persist it. A failed write is logged; the switch
    /// still takes effect for this session.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
            tracing::warn!(error = %e, "could not persist theme preference");
        }
    }

    #[cfg(test)]
    pub(crate) fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    #[test]
    fn persisted_dark_survives_reload_without_system_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut setting = ThemeSetting::load(FileStore::new(&path), || Theme::Light);
        assert_eq!(setting.toggle(), Theme::Dark);

        let reloaded = ThemeSetting::load(FileStore::new(&path), || {
            panic!("system preference must not be consulted")
        });
        assert_eq!(reloaded.theme(), Theme::Dark);
    }

    #[test]
    fn falls_back_to_system_when_nothing_stored() {
        let setting = ThemeSetting::load(MemoryStore::new(), || Theme::Dark);
        assert_eq!(setting.theme(), Theme::Dark);
    }

    #[test]
    fn invalid_stored_value_falls_back_to_system() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        let setting = ThemeSetting::load(store, || Theme::Light);
        assert_eq!(setting.theme(), Theme::Light);
    }

    #[test]
    fn every_toggle_is_written() {
        let mut setting = ThemeSetting::load(MemoryStore::new(), || Theme::Light);
        setting.toggle();
        setting.toggle();
        let store = setting.into_store();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn colorfgbg_detection() {
        assert_eq!(system_preference_from(Some("15;0")), Theme::Dark);
        assert_eq!(system_preference_from(Some("0;default;15")), Theme::Light);
        assert_eq!(system_preference_from(Some("garbage")), Theme::Light);
        assert_eq!(system_preference_from(None), Theme::Light);
    }

    #[test]
    fn toggle_label_names_the_other_theme() {
        assert_eq!(Theme::Light.toggle_label(), "Dark Mode");
        assert_eq!(Theme::Dark.toggle_label(), "Light Mode");
    }
}
