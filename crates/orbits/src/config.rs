//! Diagram configuration
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides:
//!
//! ```json
//! { "anchors_count": 8, "layers": { "background": "Sky" } }
//! ```

use geometry::MILLIMETERS_TO_POINTS;
use serde::{Deserialize, Serialize};

use crate::DiagramError;

/// Tunables for diagram assembly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Anchors per orbit; the first one uses the primary glyph
    pub anchors_count: usize,
    /// Segment glyphs between two neighbouring anchors
    pub segments_per_anchor: usize,
    /// Document units per millimeter
    pub units_per_mm: f64,
    pub layers: LayerNames,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            anchors_count: 6,
            segments_per_anchor: 2,
            units_per_mm: MILLIMETERS_TO_POINTS,
            layers: LayerNames::default(),
        }
    }
}

impl DiagramConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(input: &str) -> Result<Self, DiagramError> {
        let config: Self =
            serde_json::from_str(input).map_err(|err| DiagramError::InvalidConfig {
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values assembly cannot work with.
    pub fn validate(&self) -> Result<(), DiagramError> {
        if self.anchors_count == 0 {
            return Err(invalid("anchors_count must be at least 1"));
        }
        if !self.units_per_mm.is_finite() || self.units_per_mm <= 0.0 {
            return Err(invalid(format!(
                "units_per_mm must be a positive number, got {}",
                self.units_per_mm
            )));
        }
        self.layers.validate()
    }
}

fn invalid(message: impl Into<String>) -> DiagramError {
    DiagramError::InvalidConfig {
        message: message.into(),
    }
}

/// Names of the layers the diagram reads from and writes to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerNames {
    /// Top-level layer whose center every orbit is placed around
    pub background: String,
    /// Top-level layer holding the prototype subtrees
    pub prototype: String,
    /// Top-level layer created to hold the generated orbits
    pub orbits: String,
    pub curve: String,
    pub primary_anchor: String,
    pub secondary_anchor: String,
    pub segment: String,
    pub title: String,
    /// Per-orbit layer grouping anchor clones
    pub anchors: String,
    /// Per-orbit layer grouping segment clones
    pub segments: String,
}

impl Default for LayerNames {
    fn default() -> Self {
        Self {
            background: "Background".into(),
            prototype: "OrbitsPrototype".into(),
            orbits: "Orbits".into(),
            curve: "Curve".into(),
            primary_anchor: "PrimaryAnchor".into(),
            secondary_anchor: "SecondaryAnchor".into(),
            segment: "Segment".into(),
            title: "Title".into(),
            anchors: "Anchors".into(),
            segments: "Segments".into(),
        }
    }
}

impl LayerNames {
    fn validate(&self) -> Result<(), DiagramError> {
        let names = [
            ("background", &self.background),
            ("prototype", &self.prototype),
            ("orbits", &self.orbits),
            ("curve", &self.curve),
            ("primary_anchor", &self.primary_anchor),
            ("secondary_anchor", &self.secondary_anchor),
            ("segment", &self.segment),
            ("title", &self.title),
            ("anchors", &self.anchors),
            ("segments", &self.segments),
        ];
        match names.iter().find(|(_, name)| name.trim().is_empty()) {
            Some((field, _)) => Err(invalid(format!("layer name `{field}` must not be empty"))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiagramConfig::default();
        assert_eq!(config.anchors_count, 6);
        assert_eq!(config.segments_per_anchor, 2);
        assert_eq!(config.units_per_mm, 2.83465);
        assert_eq!(config.layers.prototype, "OrbitsPrototype");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config =
            DiagramConfig::from_json(r#"{ "anchors_count": 8, "layers": { "background": "Sky" } }"#)
                .unwrap();
        assert_eq!(config.anchors_count, 8);
        assert_eq!(config.segments_per_anchor, 2);
        assert_eq!(config.layers.background, "Sky");
        assert_eq!(config.layers.curve, "Curve");
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DiagramConfig {
            segments_per_anchor: 0,
            ..DiagramConfig::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(DiagramConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        for input in [
            r#"{ "anchors_count": 0 }"#,
            r#"{ "units_per_mm": -1.0 }"#,
            r#"{ "layers": { "title": " " } }"#,
            r#"{ "anchors_count": "six" }"#,
        ] {
            assert!(
                matches!(
                    DiagramConfig::from_json(input),
                    Err(DiagramError::InvalidConfig { .. })
                ),
                "{input} should be rejected"
            );
        }
    }
}
