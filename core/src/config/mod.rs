//! Configuration store (`framelock.toml`)
//!
//! Settings are read from a TOML file and flattened into dotted keys, so
//! nested tables act as namespaces:
//!
//! ```toml
//! [keyboard]
//! up = "ArrowUp"
//!
//! [joystick."USB Gamepad"]
//! player = 1
//! deadzone = 0.25
//! ```
//!
//! is looked up as `keyboard.up`, `joystick.USB Gamepad.player` and
//! `joystick.USB Gamepad.deadzone`. Every lookup takes a default that is
//! returned when the key is missing or its value cannot be converted; a bad
//! value never surfaces as an error.

mod keycode;

pub use keycode::{key_from_name, key_name};

use hashbrown::HashMap;
use std::path::{Path, PathBuf};
use winit::keyboard::KeyCode;

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Typed lookup service with default-on-miss semantics.
///
/// Implementors only provide [`ConfigSource::raw`]; the typed accessors are
/// shared.
pub trait ConfigSource {
    /// Raw string value stored under `key`, if any.
    fn raw(&self, key: &str) -> Option<&str>;

    fn value_str(&self, default: &str, key: &str) -> String {
        self.raw(key).unwrap_or(default).to_string()
    }

    /// Integer lookup. Accepts decimal, `0x` hexadecimal and leading-zero octal.
    fn value_int(&self, default: i32, key: &str) -> i32 {
        self.raw(key)
            .and_then(parse_int)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(default)
    }

    fn value_float(&self, default: f32, key: &str) -> f32 {
        self.raw(key)
            .and_then(|s| s.trim().parse::<f32>().ok())
            .unwrap_or(default)
    }

    /// Boolean lookup. A present key is true only for `true` or `True`.
    fn value_bool(&self, default: bool, key: &str) -> bool {
        match self.raw(key) {
            Some(s) => s == "true" || s == "True",
            None => default,
        }
    }

    /// Keyboard key lookup by platform-neutral key name (see [`key_from_name`]).
    fn value_key(&self, default: KeyCode, key: &str) -> KeyCode {
        self.raw(key)
            .and_then(|s| key_from_name(s.trim()))
            .unwrap_or(default)
    }
}

/// Flattened dotted-key configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// Create an empty configuration (every lookup yields its default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(text)?;
        let mut values = HashMap::new();
        flatten("", &table, &mut values);
        Ok(Self { values })
    }

    /// Load configuration from a file.
    ///
    /// A missing file is not an error and yields an empty configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}, using defaults", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml_str(&text)
    }

    /// Load configuration, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("{}. Using default settings.", e);
            Self::new()
        })
    }

    /// Set or replace a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for Config {
    fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        let text = match value {
            toml::Value::Table(inner) => {
                flatten(&path, inner, out);
                continue;
            }
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) => {
                tracing::debug!("Ignoring array value for config key {}", path);
                continue;
            }
        };
        out.insert(path, text);
    }
}

/// Parse an integer the way C `strtol` does with base 0.
///
/// The longest valid prefix is used, so `"08"` and `"0x"` read as 0 and
/// `"12px"` as 12. Text with no leading digits at all is a failed conversion.
fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let hex = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .filter(|hex| hex.starts_with(|c: char| c.is_ascii_hexdigit()));
    let (radix, digits) = match hex {
        Some(hex) => (16, hex),
        None if rest.starts_with('0') => (8, rest),
        None => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = i64::from_str_radix(&digits[..end], radix).ok()?;

    Some(if negative { -magnitude } else { magnitude })
}
