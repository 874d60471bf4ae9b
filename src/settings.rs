//! User settings and the resolved configuration passed to every command.
//!
//! Settings are read once, merged with the editor-wide preferences and any
//! command-line overrides, and then frozen into a [`Config`].

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    breakpoint::Style,
    error::{Error, Result},
};

/// Tab width as written in a settings file: a number or `"auto"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTabSize")]
pub enum TabSize {
    Width(usize),
    #[default]
    Auto,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTabSize {
    Width(usize),
    Word(String),
}

impl TryFrom<RawTabSize> for TabSize {
    type Error = String;

    fn try_from(raw: RawTabSize) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawTabSize::Width(n) => Ok(Self::Width(n)),
            RawTabSize::Word(w) if w == "auto" => Ok(Self::Auto),
            RawTabSize::Word(w) => Err(format!("expected a number or \"auto\", got {w:?}")),
        }
    }
}

/// Plugin settings; every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tab_size: TabSize,
    pub debugger: String,
    pub highlight: String,
    pub gutter_icon: String,
    pub save_on_toggle: bool,
    pub style: Style,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tab_size: TabSize::Auto,
            debugger: "pdb".into(),
            highlight: "invalid".into(),
            gutter_icon: "circle".into(),
            save_on_toggle: false,
            style: Style::Classic,
        }
    }
}

/// Editor-wide preferences that settings may inherit from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub tab_size: usize,
}

impl Default for Preferences {
    fn default() -> Self { Self { tab_size: 4 } }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| Error::SettingsRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| Error::SettingsFormat {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// Read settings from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid settings.
    pub fn load(path: &Path) -> Result<Self> { load_json(path) }

    /// Freeze these settings into a [`Config`].
    #[must_use]
    pub fn resolve(&self, prefs: &Preferences) -> Config {
        let tab_size = match self.tab_size {
            TabSize::Width(n) if n > 0 => n,
            TabSize::Width(_) | TabSize::Auto => prefs.tab_size,
        };
        Config {
            tab_size,
            debugger: self.debugger.clone(),
            highlight: self.highlight.clone(),
            gutter_icon: (!self.gutter_icon.is_empty()).then(|| self.gutter_icon.clone()),
            save_on_toggle: self.save_on_toggle,
            style: self.style,
        }
    }
}

impl Preferences {
    /// Read editor preferences from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> { load_json(path) }
}

/// Immutable configuration for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tab_size: usize,
    pub debugger: String,
    pub highlight: String,
    pub gutter_icon: Option<String>,
    pub save_on_toggle: bool,
    pub style: Style,
}

impl Default for Config {
    fn default() -> Self { Settings::default().resolve(&Preferences::default()) }
}
