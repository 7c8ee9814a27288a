// Mixer configuration (pure data crate; no Bevy dependency).
// Provides: data structures, layered loading, validation producing warnings (non-fatal), and tests.

use std::time::Duration;
use std::{fs, path::Path};

use mix_core::{Palette, PaletteError, UndefinedPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Switches that distinguish the widget's behavioural variants.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameRules {
    /// Count correct answers in game mode.
    pub scoring: bool,
    /// After a correct check, move to a new target on its own.
    pub auto_advance: bool,
    pub advance_delay_ms: u64,
    /// After a wrong check, clear the selection on its own.
    pub auto_reset_on_wrong: bool,
    pub reset_delay_ms: u64,
    /// Whether a color stays enabled as its own partner in the availability filter.
    pub allow_self_mix: bool,
    /// Apply the availability filter in game mode too (normally practice only).
    pub restrict_in_game: bool,
    pub hints: bool,
    /// Reject a mix of the exact selection that was just mixed.
    pub suppress_repeat_mix: bool,
    pub undefined: UndefinedPolicy,
    /// Fixed seed for target selection; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}
impl Default for GameRules {
    fn default() -> Self {
        Self {
            scoring: true,
            auto_advance: true,
            advance_delay_ms: 2000,
            auto_reset_on_wrong: false,
            reset_delay_ms: 1500,
            allow_self_mix: false,
            restrict_in_game: false,
            hints: true,
            suppress_repeat_mix: false,
            undefined: UndefinedPolicy::Reject,
            rng_seed: None,
        }
    }
}

impl GameRules {
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MixerConfig {
    /// Palette RON path; `None` uses the built-in classic palette.
    pub palette: Option<String>,
    pub rules: GameRules,
    pub journal_capacity: usize,
}
impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            palette: None,
            rules: GameRules::default(),
            journal_capacity: 512,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl MixerConfig {
    /// Load from a single RON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(ron::from_str(&data)?)
    }

    /// Load file; on failure returns default config plus the error.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load multiple layers; later overrides earlier (deep merge).
    /// Skips unreadable files; returns (config, used_paths, errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        if let Some((_, existing)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                            merge_value(existing, v);
                            continue;
                        }
                        bm.insert(k, v);
                    }
                }
                (b, o) => *b = o,
            }
        }

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        match merged {
            Some(val) => match val.into_rust::<MixerConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!("failed to deserialize merged config; using defaults: {e}"));
                    (MixerConfig::default(), used, errors)
                }
            },
            None => (MixerConfig::default(), used, errors),
        }
    }

    /// Resolve the configured palette (file or built-in).
    pub fn load_palette(&self) -> Result<Palette, PaletteError> {
        match &self.palette {
            Some(path) => Palette::load_from_file(path),
            None => Ok(Palette::classic()),
        }
    }

    /// Produce validation warnings (non-fatal) for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let r = &self.rules;
        if r.auto_advance && r.advance_delay_ms == 0 {
            w.push("rules.advance_delay_ms is 0; correct feedback is replaced immediately".into());
        }
        if r.auto_reset_on_wrong && r.reset_delay_ms == 0 {
            w.push("rules.reset_delay_ms is 0; wrong answers clear before they can be seen".into());
        }
        for (label, ms) in [
            ("rules.advance_delay_ms", r.advance_delay_ms),
            ("rules.reset_delay_ms", r.reset_delay_ms),
        ] {
            if ms > 60_000 {
                w.push(format!("{label} {ms} very long (> 60s)"));
            }
        }
        if !r.auto_advance && r.advance_delay_ms != GameRules::default().advance_delay_ms {
            w.push("rules.advance_delay_ms set but auto_advance is disabled".into());
        }
        if !r.auto_reset_on_wrong && r.reset_delay_ms != GameRules::default().reset_delay_ms {
            w.push("rules.reset_delay_ms set but auto_reset_on_wrong is disabled".into());
        }
        if self.journal_capacity == 0 {
            w.push("journal_capacity is 0; no action history is kept".into());
        }
        if let Some(p) = &self.palette {
            if p.trim().is_empty() {
                w.push("palette path is empty; set to None for the built-in palette".into());
            }
        }
        w
    }
}
