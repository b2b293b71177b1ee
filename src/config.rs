use std::path::Path;

use crate::error::Error;

/// Marker characters that delimit a reference inside message text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Closing bracket.
    pub end: String,
    /// Token separator.
    pub separator: String,
    /// Opening bracket, written right after `symbol`.
    pub start: String,
    /// Leading symbol.
    pub symbol: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            end: ")".to_owned(),
            separator: ".".to_owned(),
            start: "(".to_owned(),
            symbol: "&".to_owned(),
        }
    }
}

impl Markers {
    /// The full opening marker, symbol followed by the start bracket.
    pub fn opener(&self) -> String {
        format!("{}{}", self.symbol, self.start)
    }

    /// Reject marker sets the tokenizer cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMarkers` if any marker is empty.
    pub fn validate(&self) -> Result<(), Error> {
        let empty = [
            ("symbol", &self.symbol),
            ("start", &self.start),
            ("end", &self.end),
            ("separator", &self.separator),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty());

        if let Some((name, _)) = empty {
            return Err(Error::InvalidMarkers { reason: format!("`{name}` must not be empty") });
        }
        Ok(())
    }
}

/// Where hyperlinks point.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Channel name used by side-panel links.
    pub channel: String,
    /// Plugin route segment for object pages.
    pub plugin_path: String,
    /// Base URL of the chat site, without a trailing slash.
    pub site_url: String,
    /// Team name used by side-panel links.
    pub team: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            channel: String::new(),
            plugin_path: "all-data".to_owned(),
            site_url: String::new(),
            team: String::new(),
        }
    }
}

/// Project configuration loaded from `.hyperref.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Hyperlink targets.
    pub links: LinkConfig,
    /// Reference markers.
    pub markers: Markers,
}

/// Raw TOML structure for `.hyperref.toml`.
#[derive(serde::Deserialize)]
struct HyperrefTomlConfig {
    /// `[links]` table.
    #[serde(default)]
    links: LinkConfig,
    /// `[markers]` table.
    #[serde(default)]
    markers: Markers,
}

impl Config {
    /// Load config from `.hyperref.toml` in the given root directory.
    /// A missing file yields the default markers. A file that exists but is
    /// malformed is an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed,
    /// or `Error::InvalidMarkers` if a marker is empty.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".hyperref.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: HyperrefTomlConfig = toml::from_str(&content)?;
        raw.markers.validate()?;
        Ok(Self {
            links: raw.links,
            markers: raw.markers,
        })
    }
}
