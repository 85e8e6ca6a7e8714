//! JSON settings for the thread's context and value cache.
//!
//! ```json
//! {
//!   "context": { "precision": 113, "round": "down", "traps": { "divzero": true } },
//!   "cache": { "max_objects": 0, "max_object_words": 128 }
//! }
//! ```
//!
//! Every field is optional. A missing field keeps the thread's current value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mpnum_core::{
    current_context, get_cache, set_cache, set_context, Conditions, Context, ContextError,
    ContextOverrides, Round,
};
use mpnum_memory::{CacheLimits, PoolError};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Cache(#[from] PoolError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub context: ContextSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<Round>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emin: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emax: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnormalize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traps: Option<Conditions>,
}

impl ContextSettings {
    #[must_use]
    pub fn overrides(&self) -> ContextOverrides {
        ContextOverrides {
            precision: self.precision,
            round: self.round,
            emin: self.emin,
            emax: self.emax,
            subnormalize: self.subnormalize,
            traps: self.traps,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_objects: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_object_words: Option<i64>,
}

impl Settings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }

    /// Install these settings as the thread's current context and cache
    /// limits. Both are validated before either is changed.
    pub fn apply(&self) -> Result<Context, SettingsError> {
        let ctx = self.context.overrides().apply_to(&current_context())?;
        let (objects, words) = get_cache();
        let limits = CacheLimits::new(
            self.cache.max_objects.unwrap_or(as_i64(objects)),
            self.cache.max_object_words.unwrap_or(as_i64(words)),
        )?;

        let (objects, words) = limits.as_pair();
        set_cache(as_i64(objects), as_i64(words))?;
        set_context(ctx.clone());
        Ok(ctx)
    }
}

fn as_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_settings(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        let settings: Settings = serde_json::from_str(r#"{"context": {"round": "up"}}"#).unwrap();
        assert_eq!(settings.context.round, Some(Round::Up));
        assert_eq!(settings.context.precision, None);
    }

    #[test]
    fn load_and_apply() {
        let file = write_settings(
            r#"{
                "context": {"precision": 113, "round": "down", "traps": {"divzero": true}},
                "cache": {"max_objects": 7, "max_object_words": 32}
            }"#,
        );
        let settings = Settings::load(file.path()).unwrap();
        let ctx = settings.apply().unwrap();
        assert_eq!(ctx.precision(), 113);
        assert_eq!(ctx.round(), Round::Down);
        assert!(ctx.traps().divzero);
        assert!(!ctx.traps().inexact);
        assert_eq!(current_context(), ctx);
        assert_eq!(get_cache(), (7, 32));
    }

    #[test]
    fn invalid_settings_change_nothing() {
        set_cache(5, 64).unwrap();
        let before = current_context();

        let bad_precision: Settings =
            serde_json::from_str(r#"{"context": {"precision": 0}, "cache": {"max_objects": 9}}"#)
                .unwrap();
        assert!(matches!(
            bad_precision.apply(),
            Err(SettingsError::Context(ContextError::PrecisionRange(0)))
        ));

        let bad_cache: Settings =
            serde_json::from_str(r#"{"context": {"precision": 80}, "cache": {"max_objects": -1}}"#)
                .unwrap();
        assert!(matches!(
            bad_cache.apply(),
            Err(SettingsError::Cache(PoolError::InvalidCacheSize(-1)))
        ));

        assert_eq!(current_context(), before);
        assert_eq!(get_cache(), (5, 64));
    }

    #[test]
    fn load_errors() {
        let file = write_settings(r#"{"context": {"precison": 80}}"#);
        assert!(matches!(
            Settings::load(file.path()),
            Err(SettingsError::Parse { .. })
        ));
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Settings::load(&dir.path().join("missing.json")),
            Err(SettingsError::Io { .. })
        ));
    }

    #[test]
    fn serializes_only_present_fields() {
        let settings = Settings {
            context: ContextSettings {
                precision: Some(64),
                ..ContextSettings::default()
            },
            cache: CacheSettings::default(),
        };
        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"context":{"precision":64},"cache":{}}"#
        );
    }
}
