//! Theme preference stored under its own key, independent of the sections blob.

use crate::repo::kv_store::KeyValueStore;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Key holding the theme preference string.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unsupported theme `{other}`; expected light|dark")),
        }
    }
}

/// Reads and writes the theme preference.
#[derive(Debug, Clone)]
pub struct ThemeRepository<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> ThemeRepository<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Returns the stored theme, or `Light` when absent, unreadable or invalid.
    pub fn load(&self) -> Theme {
        match self.kv.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
                warn!("event=theme_load module=repo status=error error={err}");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!("event=theme_load module=repo status=error error={err}");
                Theme::default()
            }
        }
    }

    /// Persists `theme`; returns whether the write succeeded.
    pub fn save(&self, theme: Theme) -> bool {
        match self.kv.set(THEME_KEY, theme.as_str()) {
            Ok(()) => {
                info!("event=theme_save module=repo status=ok theme={theme}");
                true
            }
            Err(err) => {
                warn!("event=theme_save module=repo status=error error={err}");
                false
            }
        }
    }

    /// Flips the stored theme and returns the new value.
    pub fn toggle(&self) -> Theme {
        let next = self.load().toggled();
        self.save(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::{Theme, ThemeRepository, THEME_KEY};
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn defaults_to_light_and_toggles() {
        let kv = MemoryKeyValueStore::new();
        let repo = ThemeRepository::new(kv.clone());
        assert_eq!(repo.load(), Theme::Light);
        assert_eq!(repo.toggle(), Theme::Dark);
        assert_eq!(kv.raw(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(repo.toggle(), Theme::Light);
    }

    #[test]
    fn invalid_value_falls_back_to_light() {
        let kv = MemoryKeyValueStore::new();
        kv.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemeRepository::new(kv).load(), Theme::Light);
    }
}
