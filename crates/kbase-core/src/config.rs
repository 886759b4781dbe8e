//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`APP_SEARCH__FUZZY=0.3` sets `search.fuzzy`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

/// Where the corpus lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self { path: "data/corpus.json".to_string() }
    }
}

/// Ranking knobs. Boosts are relative weights, not absolute scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerSettings {
    pub title_boost: f32,
    pub summary_boost: f32,
    pub category_boost: f32,
    pub content_boost: f32,
    /// Allowed edit distance as a fraction of term length.
    pub fuzzy: f32,
    pub prefix: bool,
    pub max_highlights: usize,
}

impl Default for RankerSettings {
    fn default() -> Self {
        Self {
            title_boost: 3.0,
            summary_boost: 2.0,
            category_boost: 1.5,
            content_boost: 1.0,
            fuzzy: 0.2,
            prefix: true,
            max_highlights: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub default_k: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self { default_k: 4 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub search: RankerSettings,
    pub assistant: AssistantSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let s = &self.search;
        for (name, boost) in [
            ("title_boost", s.title_boost),
            ("summary_boost", s.summary_boost),
            ("category_boost", s.category_boost),
            ("content_boost", s.content_boost),
        ] {
            if boost.is_nan() || boost <= 0.0 {
                return Err(Error::InvalidConfig(format!("search.{name} must be positive, got {boost}")));
            }
        }
        if !(0.0..=1.0).contains(&s.fuzzy) {
            return Err(Error::InvalidConfig(format!("search.fuzzy must be within [0, 1], got {}", s.fuzzy)));
        }
        if self.assistant.default_k == 0 {
            return Err(Error::InvalidConfig("assistant.default_k must be at least 1".to_string()));
        }
        if self.corpus.path.trim().is_empty() {
            return Err(Error::InvalidConfig("corpus.path is empty".to_string()));
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| Error::InvalidConfig(format!("no working directory: {e}")))?;
        Self::load_from(&cwd)
    }

    /// Load with config files resolved against `base_dir`.
    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.settings()?;
        Ok(config)
    }

    /// Build from an explicit figment, mostly for tests.
    pub fn from_figment(figment: Figment, base_dir: &Path) -> Self {
        Self {
            figment: Figment::new().merge(Serialized::defaults(Settings::default())).merge(figment),
            base_dir: base_dir.to_path_buf(),
        }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Typed, validated view of the whole configuration.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Corpus path after `~`/env expansion, relative paths taken from the config directory.
    pub fn corpus_path(&self) -> Result<PathBuf> {
        let settings = self.settings()?;
        Ok(resolve_with_base(&self.base_dir, &settings.corpus.path))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().expect("defaults validate");
        assert_eq!(settings.assistant.default_k, 4);
        assert!(settings.search.title_boost > settings.search.summary_boost);
        assert!(settings.search.summary_boost > settings.search.category_boost);
        assert!(settings.search.category_boost > settings.search.content_boost);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut s = Settings::default();
        s.search.fuzzy = 1.5;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.search.content_boost = 0.0;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.assistant.default_k = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn figment_overrides_merge_over_defaults() {
        let figment = Figment::new().merge(Toml::string("[search]\nfuzzy = 0.3\n[assistant]\ndefault_k = 6\n"));
        let config = Config::from_figment(figment, Path::new("/srv/kbase"));
        let settings = config.settings().expect("settings");
        assert!((settings.search.fuzzy - 0.3).abs() < f32::EPSILON);
        assert_eq!(settings.assistant.default_k, 6);
        assert!(settings.search.prefix, "untouched keys keep defaults");
        assert_eq!(config.get::<usize>("assistant.default_k").expect("key"), 6);
        assert_eq!(config.corpus_path().expect("path"), PathBuf::from("/srv/kbase/data/corpus.json"));
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let base = Path::new("/base");
        assert_eq!(resolve_with_base(base, "/abs/corpus.json"), PathBuf::from("/abs/corpus.json"));
        assert_eq!(resolve_with_base(base, "rel.json"), PathBuf::from("/base/rel.json"));
    }
}
