//! Declarative attribute sets.
//!
//! An [`AttributeSet`] is the read side of a host's declarative widget
//! configuration (a layout file, a style, a TOML document). The progress bar
//! reads it once through
//! [`CircularProgressBarArgs::from_attributes`](crate::CircularProgressBarArgs::from_attributes),
//! which takes the set by value so whatever it holds is released as soon as
//! reading finishes.
//!
//! [`AttributeMap`] is the bundled implementation, loadable from TOML:
//!
//! ```
//! use circular_progress::{AttributeMap, AttributeSet, Dp, attributes::keys};
//!
//! let attrs = AttributeMap::from_toml_str(
//!     r##"
//!     [circular_progress_bar]
//!     progress = 65
//!     progressbar_width = "10dp"
//!     progressbar_color = "#3F51B5"
//!     "##,
//! )
//! .unwrap();
//! assert_eq!(attrs.float(keys::PROGRESS).unwrap(), Some(65.0));
//! assert_eq!(attrs.dimension(keys::PROGRESSBAR_WIDTH).unwrap(), Some(Dp(10.0)));
//! ```
use std::{collections::HashMap, fmt, path::Path};

use serde::Deserialize;

use crate::{
    Color, Dp,
    color::ColorParseError,
    paint::GradientDirection,
    state::ProgressDirection,
};

/// Attribute keys understood by the progress bar.
pub mod keys {
    /// Initial progress value.
    pub const PROGRESS: &str = "progress";
    /// Maximum progress value.
    pub const PROGRESS_MAX: &str = "progress_max";
    /// Whether to start in indeterminate mode.
    pub const INDETERMINATE_MODE: &str = "indeterminate_mode";
    /// Foreground stroke width.
    pub const PROGRESSBAR_WIDTH: &str = "progressbar_width";
    /// Background stroke width.
    pub const BACKGROUND_PROGRESSBAR_WIDTH: &str = "background_progressbar_width";
    /// Foreground color.
    pub const PROGRESSBAR_COLOR: &str = "progressbar_color";
    /// Foreground gradient start color.
    pub const PROGRESSBAR_COLOR_START: &str = "progressbar_color_start";
    /// Foreground gradient end color.
    pub const PROGRESSBAR_COLOR_END: &str = "progressbar_color_end";
    /// Foreground gradient direction.
    pub const PROGRESSBAR_COLOR_DIRECTION: &str = "progressbar_color_direction";
    /// Background color.
    pub const BACKGROUND_PROGRESSBAR_COLOR: &str = "background_progressbar_color";
    /// Background gradient start color.
    pub const BACKGROUND_PROGRESSBAR_COLOR_START: &str = "background_progressbar_color_start";
    /// Background gradient end color.
    pub const BACKGROUND_PROGRESSBAR_COLOR_END: &str = "background_progressbar_color_end";
    /// Background gradient direction.
    pub const BACKGROUND_PROGRESSBAR_COLOR_DIRECTION: &str =
        "background_progressbar_color_direction";
    /// Sweep direction.
    pub const PROGRESS_DIRECTION: &str = "progress_direction";
    /// Rounded foreground stroke ends.
    pub const ROUND_BORDER: &str = "round_border";
    /// Start angle offset from the top of the circle.
    pub const START_ANGLE: &str = "start_angle";
}

/// Name of the table [`AttributeMap::from_toml_str`] reads when present.
pub const TOML_TABLE: &str = "circular_progress_bar";

/// A raw attribute value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
}

impl AttributeValue {
    fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "boolean",
            AttributeValue::Int(_) => "integer",
            AttributeValue::Float(_) => "float",
            AttributeValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(value) => write!(f, "{value}"),
            AttributeValue::Int(value) => write!(f, "{value}"),
            AttributeValue::Float(value) => write!(f, "{value}"),
            AttributeValue::Str(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

/// Errors from typed attribute lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttributeError {
    /// The value has a different type than the lookup expects.
    #[error("attribute `{key}` expected {expected}, found {found}")]
    WrongType {
        /// Attribute key.
        key: String,
        /// Expected type.
        expected: &'static str,
        /// Actual type.
        found: &'static str,
    },
    /// A dimension literal could not be parsed.
    #[error("malformed dimension `{0}`")]
    MalformedDimension(String),
    /// A color literal could not be parsed.
    #[error("malformed color for attribute `{key}`")]
    MalformedColor {
        /// Attribute key.
        key: String,
        /// Parse failure.
        #[source]
        source: ColorParseError,
    },
    /// An integer color is outside the 32-bit ARGB range.
    #[error("color for attribute `{key}` is out of range: {value}")]
    ColorOutOfRange {
        /// Attribute key.
        key: String,
        /// Offending value.
        value: i64,
    },
    /// An enumerated attribute has an unknown value.
    #[error("attribute `{key}` has unsupported value {value}")]
    UnsupportedValue {
        /// Attribute key.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// Errors from loading an attribute document.
#[derive(Debug, thiserror::Error)]
pub enum AttributeLoadError {
    /// The file could not be read.
    #[error("failed to read attributes from {path}")]
    Io {
        /// File path.
        path: String,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML.
    #[error("failed to parse attribute document")]
    Parse(#[from] toml::de::Error),
    /// The `circular_progress_bar` entry exists but is not a table.
    #[error("`{0}` must be a table")]
    NotATable(String),
}

/// Read access to a declarative attribute set.
///
/// Implementors provide [`get`](AttributeSet::get); the typed lookups return
/// `Ok(None)` for absent keys and an [`AttributeError`] for values that are
/// present but unusable.
pub trait AttributeSet {
    /// Raw value stored under `key`.
    fn get(&self, key: &str) -> Option<AttributeValue>;

    /// Reads a number. Integers are accepted.
    fn float(&self, key: &str) -> Result<Option<f32>, AttributeError> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Float(value)) => Ok(Some(value as f32)),
            Some(AttributeValue::Int(value)) => Ok(Some(value as f32)),
            Some(other) => Err(wrong_type(key, "number", &other)),
        }
    }

    /// Reads a boolean.
    fn boolean(&self, key: &str) -> Result<Option<bool>, AttributeError> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Bool(value)) => Ok(Some(value)),
            Some(other) => Err(wrong_type(key, "boolean", &other)),
        }
    }

    /// Reads a dimension: a `"6dp"`/`"12px"` literal or a number of dp.
    fn dimension(&self, key: &str) -> Result<Option<Dp>, AttributeError> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Float(value)) => Ok(Some(Dp(value))),
            Some(AttributeValue::Int(value)) => Ok(Some(Dp(value as f64))),
            Some(AttributeValue::Str(literal)) => literal.parse::<Dp>().map(Some),
            Some(other) => Err(wrong_type(key, "dimension", &other)),
        }
    }

    /// Reads a color: a `"#RRGGBB"`/`"#AARRGGBB"` literal or an ARGB integer.
    fn color(&self, key: &str) -> Result<Option<Color>, AttributeError> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Str(literal)) => literal
                .parse::<Color>()
                .map(Some)
                .map_err(|source| AttributeError::MalformedColor {
                    key: key.to_string(),
                    source,
                }),
            Some(AttributeValue::Int(value)) => u32::try_from(value)
                .map(|argb| Some(Color::from_argb_u32(argb)))
                .map_err(|_| AttributeError::ColorOutOfRange {
                    key: key.to_string(),
                    value,
                }),
            Some(other) => Err(wrong_type(key, "color", &other)),
        }
    }

    /// Reads a sweep direction: `"left_to_right"` or `"right_to_left"`.
    fn progress_direction(&self, key: &str) -> Result<Option<ProgressDirection>, AttributeError> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Str(value)) => match value.as_str() {
                "left_to_right" => Ok(Some(ProgressDirection::LeftToRight)),
                "right_to_left" => Ok(Some(ProgressDirection::RightToLeft)),
                _ => Err(unsupported(key, &AttributeValue::Str(value))),
            },
            Some(other) => Err(wrong_type(key, "direction", &other)),
        }
    }

    /// Reads a gradient direction by name or by its index `1..=4`
    /// (left-to-right, right-to-left, top-to-bottom, bottom-to-top).
    fn gradient_direction(&self, key: &str) -> Result<Option<GradientDirection>, AttributeError> {
        let direction = match self.get(key) {
            None => return Ok(None),
            Some(AttributeValue::Str(value)) => match value.as_str() {
                "left_to_right" => GradientDirection::LeftToRight,
                "right_to_left" => GradientDirection::RightToLeft,
                "top_to_bottom" => GradientDirection::TopToBottom,
                "bottom_to_top" => GradientDirection::BottomToTop,
                _ => return Err(unsupported(key, &AttributeValue::Str(value))),
            },
            Some(AttributeValue::Int(value)) => match value {
                1 => GradientDirection::LeftToRight,
                2 => GradientDirection::RightToLeft,
                3 => GradientDirection::TopToBottom,
                4 => GradientDirection::BottomToTop,
                _ => return Err(unsupported(key, &AttributeValue::Int(value))),
            },
            Some(other) => return Err(wrong_type(key, "gradient direction", &other)),
        };
        Ok(Some(direction))
    }
}

fn wrong_type(key: &str, expected: &'static str, found: &AttributeValue) -> AttributeError {
    AttributeError::WrongType {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

fn unsupported(key: &str, value: &AttributeValue) -> AttributeError {
    AttributeError::UnsupportedValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Reads `key` with `read`, falling back to `default` when the attribute is
/// absent or malformed.
pub(crate) fn read_or<T>(
    key: &str,
    default: T,
    read: impl FnOnce(&str) -> Result<Option<T>, AttributeError>,
) -> T {
    match read(key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(error) => {
            tracing::debug!(%error, key, "malformed attribute, using default");
            default
        }
    }
}

/// Like [`read_or`] for attributes without a default.
pub(crate) fn read_optional<T>(
    key: &str,
    read: impl FnOnce(&str) -> Result<Option<T>, AttributeError>,
) -> Option<T> {
    match read(key) {
        Ok(value) => value,
        Err(error) => {
            tracing::debug!(%error, key, "malformed attribute, ignoring");
            None
        }
    }
}

/// An in-memory [`AttributeSet`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    values: HashMap<String, AttributeValue>,
}

impl AttributeMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of stored attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses a TOML document.
    ///
    /// Attributes are read from the `[circular_progress_bar]` table when it
    /// exists, otherwise from the top level. Values that are not booleans,
    /// numbers or strings are skipped.
    pub fn from_toml_str(document: &str) -> Result<Self, AttributeLoadError> {
        let mut table: toml::Table = toml::from_str(document)?;
        let table = match table.remove(TOML_TABLE) {
            Some(toml::Value::Table(inner)) => inner,
            Some(_) => return Err(AttributeLoadError::NotATable(TOML_TABLE.to_string())),
            None => table,
        };

        let mut map = Self::new();
        for (key, value) in table {
            match AttributeValue::deserialize(value) {
                Ok(value) => map.insert(key, value),
                Err(error) => tracing::debug!(%error, key, "skipping unsupported attribute value"),
            }
        }
        Ok(map)
    }

    /// Reads and parses a TOML attribute file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AttributeLoadError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| AttributeLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&document)
    }
}

impl AttributeSet for AttributeMap {
    fn get(&self, key: &str) -> Option<AttributeValue> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_lookups() {
        let attrs = AttributeMap::new()
            .with(keys::PROGRESS, 40_i64)
            .with(keys::PROGRESS_MAX, 50.5)
            .with(keys::INDETERMINATE_MODE, true)
            .with(keys::PROGRESSBAR_WIDTH, "6dp")
            .with(keys::PROGRESSBAR_COLOR, "#FF3F51B5")
            .with(keys::BACKGROUND_PROGRESSBAR_COLOR, 0x4D3F51B5_i64)
            .with(keys::PROGRESS_DIRECTION, "right_to_left")
            .with(keys::PROGRESSBAR_COLOR_DIRECTION, 3_i64);

        assert_eq!(attrs.float(keys::PROGRESS), Ok(Some(40.0)));
        assert_eq!(attrs.float(keys::PROGRESS_MAX), Ok(Some(50.5)));
        assert_eq!(attrs.boolean(keys::INDETERMINATE_MODE), Ok(Some(true)));
        assert_eq!(attrs.dimension(keys::PROGRESSBAR_WIDTH), Ok(Some(Dp(6.0))));
        assert_eq!(
            attrs.color(keys::PROGRESSBAR_COLOR).map(|c| c.map(Color::to_argb_u32)),
            Ok(Some(0xFF3F51B5))
        );
        assert_eq!(
            attrs
                .color(keys::BACKGROUND_PROGRESSBAR_COLOR)
                .map(|c| c.map(Color::to_argb_u32)),
            Ok(Some(0x4D3F51B5))
        );
        assert_eq!(
            attrs.progress_direction(keys::PROGRESS_DIRECTION),
            Ok(Some(ProgressDirection::RightToLeft))
        );
        assert_eq!(
            attrs.gradient_direction(keys::PROGRESSBAR_COLOR_DIRECTION),
            Ok(Some(GradientDirection::TopToBottom))
        );
        assert_eq!(attrs.float(keys::START_ANGLE), Ok(None));
    }

    #[test]
    fn test_lookup_errors() {
        let attrs = AttributeMap::new()
            .with(keys::PROGRESS, "lots")
            .with(keys::PROGRESSBAR_WIDTH, "thick")
            .with(keys::PROGRESSBAR_COLOR, "blue")
            .with(keys::BACKGROUND_PROGRESSBAR_COLOR, -1_i64)
            .with(keys::PROGRESS_DIRECTION, "sideways")
            .with(keys::PROGRESSBAR_COLOR_DIRECTION, 9_i64);

        assert!(matches!(
            attrs.float(keys::PROGRESS),
            Err(AttributeError::WrongType { found: "string", .. })
        ));
        assert!(matches!(
            attrs.dimension(keys::PROGRESSBAR_WIDTH),
            Err(AttributeError::MalformedDimension(_))
        ));
        assert!(matches!(
            attrs.color(keys::PROGRESSBAR_COLOR),
            Err(AttributeError::MalformedColor { .. })
        ));
        assert!(matches!(
            attrs.color(keys::BACKGROUND_PROGRESSBAR_COLOR),
            Err(AttributeError::ColorOutOfRange { value: -1, .. })
        ));
        assert!(matches!(
            attrs.progress_direction(keys::PROGRESS_DIRECTION),
            Err(AttributeError::UnsupportedValue { .. })
        ));
        assert!(matches!(
            attrs.gradient_direction(keys::PROGRESSBAR_COLOR_DIRECTION),
            Err(AttributeError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_read_or_falls_back() {
        let attrs = AttributeMap::new().with(keys::PROGRESS, "lots");
        assert_eq!(read_or(keys::PROGRESS, 7.0, |key| attrs.float(key)), 7.0);
        assert_eq!(read_or(keys::PROGRESS_MAX, 100.0, |key| attrs.float(key)), 100.0);
        assert_eq!(read_optional(keys::PROGRESS, |key| attrs.float(key)), None);
    }

    #[test]
    fn test_from_toml_reads_named_table() {
        let attrs = AttributeMap::from_toml_str(
            r##"
            title = "ignored"

            [circular_progress_bar]
            progress = 12.5
            round_border = true
            background_progressbar_width = "3px"
            nested = { a = 1 }
            "##,
        )
        .expect("valid document");

        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.float(keys::PROGRESS), Ok(Some(12.5)));
        assert_eq!(attrs.boolean(keys::ROUND_BORDER), Ok(Some(true)));
        assert!(attrs.get("title").is_none());
    }

    #[test]
    fn test_from_toml_top_level() {
        let attrs = AttributeMap::from_toml_str("progress_max = 50\nindeterminate_mode = false")
            .expect("valid document");
        assert_eq!(attrs.float(keys::PROGRESS_MAX), Ok(Some(50.0)));
        assert_eq!(attrs.boolean(keys::INDETERMINATE_MODE), Ok(Some(false)));
    }

    #[test]
    fn test_from_toml_errors() {
        assert!(matches!(
            AttributeMap::from_toml_str("progress = "),
            Err(AttributeLoadError::Parse(_))
        ));
        assert!(matches!(
            AttributeMap::from_toml_str("circular_progress_bar = 3"),
            Err(AttributeLoadError::NotATable(_))
        ));
        assert!(matches!(
            AttributeMap::from_path("/definitely/not/here.toml"),
            Err(AttributeLoadError::Io { .. })
        ));
    }

    #[test]
    fn test_collect_from_pairs() {
        let attrs: AttributeMap = [(keys::PROGRESS, 1.0), (keys::PROGRESS_MAX, 2.0)]
            .into_iter()
            .collect();
        assert_eq!(attrs.len(), 2);
    }
}
