//! Layered loading of questionnaire answers.
//!
//! Lowest to highest priority: questionnaire defaults, the profile file in
//! the platform config directory, the `--input` document, then `LIFEGRID_*`
//! environment variables.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::Figment;

use life_grid::RawLifeInput;

/// Prefix for environment overrides, e.g. `LIFEGRID_SLEEP_HOURS=7`
pub const ENV_PREFIX: &str = "LIFEGRID_";

/// File name of the per-user profile
pub const PROFILE_FILE: &str = "profile.toml";

/// Where the `--input` answers come from
#[derive(Debug, Clone, PartialEq)]
pub enum InputDocument {
    Toml(PathBuf),
    Json(PathBuf),
    /// JSON read from stdin
    JsonText(String),
}

impl InputDocument {
    /// Resolve an `--input` argument; `-` reads stdin as JSON.
    ///
    /// Files ending in `.toml` are read as TOML, anything else as JSON.
    pub fn from_arg(path: &Path) -> io::Result<Self> {
        if path.as_os_str() == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            return Ok(InputDocument::JsonText(buffer));
        }

        // missing files are otherwise skipped silently by figment
        fs::metadata(path)?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Ok(InputDocument::Toml(path.to_path_buf()))
        } else {
            Ok(InputDocument::Json(path.to_path_buf()))
        }
    }

    /// Raw text of the document
    pub fn read_text(&self) -> io::Result<String> {
        match self {
            InputDocument::Toml(path) | InputDocument::Json(path) => fs::read_to_string(path),
            InputDocument::JsonText(text) => Ok(text.clone()),
        }
    }
}

/// Loads answers from the default profile location.
#[expect(
    clippy::result_large_err,
    reason = "figment::Error is large but only returned at startup"
)]
pub fn load(input: Option<&InputDocument>) -> Result<RawLifeInput, figment::Error> {
    load_from(profile_path().as_deref(), input)
}

/// Loads answers with an explicit profile path.
#[expect(
    clippy::result_large_err,
    reason = "figment::Error is large but only returned at startup"
)]
pub fn load_from(
    profile: Option<&Path>,
    input: Option<&InputDocument>,
) -> Result<RawLifeInput, figment::Error> {
    let mut figment = Figment::from(Serialized::defaults(RawLifeInput::questionnaire_defaults()));

    if let Some(path) = profile {
        figment = figment.merge(Toml::file(path));
    }

    match input {
        Some(InputDocument::Toml(path)) => figment = figment.merge(Toml::file(path)),
        Some(InputDocument::Json(path)) => figment = figment.merge(Json::file(path)),
        Some(InputDocument::JsonText(text)) => figment = figment.merge(Json::string(text)),
        None => {}
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX));

    figment.extract()
}

/// Returns the platform-specific config directory for lifegrid.
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lifegrid"))
}

/// Returns the profile file path, whether or not it exists
pub fn profile_path() -> Option<PathBuf> {
    dirs_config_path().map(|p| p.join(PROFILE_FILE))
}

/// Names of the environment overrides currently set
pub fn env_overrides() -> Vec<String> {
    let mut keys: Vec<String> = std::env::vars()
        .filter_map(|(key, _)| key.strip_prefix(ENV_PREFIX).map(str::to_ascii_lowercase))
        .collect();
    keys.sort();
    keys
}
