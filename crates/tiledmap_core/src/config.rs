//! Codec configuration.

use serde::{Deserialize, Serialize};

/// Default ceiling for a single layer's decompressed payload (64 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;

/// Configuration shared by the document reader and writer.
///
/// Implements serde so a host can keep it inside its own settings file.
///
/// # Example
///
/// ```rust
/// use tiledmap_core::config::{CodecConfig, OpacityScale};
///
/// let mut config = CodecConfig::default();
/// config.opacity.percent_versions.push("0.8".into());
///
/// assert_eq!(config.opacity.scale_for("0.8"), OpacityScale::Percent);
/// assert_eq!(config.opacity.scale_for("1.0"), OpacityScale::Unit);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Upper bound for a decompressed layer payload, `None` for unbounded.
    pub max_decompressed_bytes: Option<usize>,

    /// How `opacity` attributes are scaled, per document version.
    pub opacity: OpacityConfig,

    /// Pretty-print written documents.
    pub indent: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_decompressed_bytes: Some(DEFAULT_MAX_DECOMPRESSED_BYTES),
            opacity: OpacityConfig::default(),
            indent: true,
        }
    }
}

impl CodecConfig {
    /// Configuration without a decompression ceiling.
    pub fn unbounded() -> Self {
        Self {
            max_decompressed_bytes: None,
            ..Self::default()
        }
    }
}

/// Range used by a document's `opacity` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpacityScale {
    /// `0.0..=1.0`
    #[default]
    Unit,
    /// `0..=100`
    Percent,
}

impl OpacityScale {
    /// Convert an attribute value into the normalized `0.0..=1.0` range.
    pub fn normalize(self, raw: f64) -> f32 {
        match self {
            OpacityScale::Unit => raw as f32,
            OpacityScale::Percent => (raw / 100.0) as f32,
        }
    }

    /// Attribute text for a normalized opacity.
    ///
    /// The result is the shortest fixed-point decimal that [`normalize`](Self::normalize)
    /// maps back to exactly `opacity`, so a save and reload keeps the stored value.
    pub fn format(self, opacity: f32) -> String {
        // Exact: an f32 mantissa times 100 fits in an f64 mantissa
        let scaled = match self {
            OpacityScale::Unit => f64::from(opacity),
            OpacityScale::Percent => f64::from(opacity) * 100.0,
        };
        for precision in 0..=9 {
            let text = format!("{scaled:.precision$}");
            if text
                .parse::<f64>()
                .is_ok_and(|raw| self.normalize(raw) == opacity)
            {
                return text;
            }
        }
        scaled.to_string()
    }
}

/// Per-version opacity scale selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpacityConfig {
    /// Scale used for versions not listed in `percent_versions`.
    pub default_scale: OpacityScale,

    /// Document versions whose opacity attributes are written as `0..=100`.
    pub percent_versions: Vec<String>,
}

impl OpacityConfig {
    pub fn scale_for(&self, version: &str) -> OpacityScale {
        if self.percent_versions.iter().any(|v| v == version) {
            OpacityScale::Percent
        } else {
            self.default_scale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_payloads() {
        let config = CodecConfig::default();
        assert_eq!(
            config.max_decompressed_bytes,
            Some(DEFAULT_MAX_DECOMPRESSED_BYTES)
        );
        assert!(CodecConfig::unbounded().max_decompressed_bytes.is_none());
    }

    #[test]
    fn test_formatted_opacity_reads_back_exactly() {
        for scale in [OpacityScale::Unit, OpacityScale::Percent] {
            for i in 0..=1000 {
                let opacity = i as f32 / 1000.0;
                let text = scale.format(opacity);
                let raw: f64 = text.parse().unwrap();
                assert_eq!(scale.normalize(raw), opacity, "{scale:?} {i} as {text}");
            }
        }
        assert_eq!(
            OpacityScale::Percent.normalize(OpacityScale::Percent.format(1e-7).parse().unwrap()),
            1e-7
        );
    }

    #[test]
    fn test_percent_scale_round_trip() {
        let scale = OpacityScale::Percent;
        assert_eq!(scale.normalize(50.0), 0.5);
        assert_eq!(scale.format(0.25), "25");
        assert_eq!(scale.format(0.1), "10");
        assert_eq!(OpacityScale::Unit.normalize(0.75), 0.75);
        assert_eq!(OpacityScale::Unit.format(0.75), "0.75");
    }

    #[test]
    fn test_config_from_settings_json() {
        let json = r#"{
            "max_decompressed_bytes": 1024,
            "opacity": { "percent_versions": ["0.9"] }
        }"#;
        let config: CodecConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.max_decompressed_bytes, Some(1024));
        assert!(config.indent);
        assert_eq!(config.opacity.scale_for("0.9"), OpacityScale::Percent);
        assert_eq!(config.opacity.scale_for("1.2"), OpacityScale::Unit);
    }
}
