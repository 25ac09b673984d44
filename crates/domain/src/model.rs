//! Model and model-family registry.
//!
//! A model belongs to a base family (a lineage such as `Qwen2-VL`) and has a
//! parameter count in billions. Families carry the marker and color used
//! when the model is drawn on a score-vs-parameters plot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plot marker shape, serialized with its matplotlib-style symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// `o`
    #[serde(rename = "o")]
    Circle,
    /// `s`
    #[serde(rename = "s")]
    Square,
    /// `^`
    #[serde(rename = "^")]
    TriangleUp,
    /// `v`
    #[serde(rename = "v")]
    TriangleDown,
    /// `>`
    #[serde(rename = ">")]
    TriangleRight,
    /// `<`
    #[serde(rename = "<")]
    TriangleLeft,
    /// `p`
    #[serde(rename = "p")]
    Pentagon,
    /// `h`
    #[serde(rename = "h")]
    Hexagon,
    /// `*`
    #[serde(rename = "*")]
    Star,
    /// `D`
    #[serde(rename = "D")]
    Diamond,
}

impl Marker {
    /// The single-character symbol for this marker
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Circle => "o",
            Self::Square => "s",
            Self::TriangleUp => "^",
            Self::TriangleDown => "v",
            Self::TriangleRight => ">",
            Self::TriangleLeft => "<",
            Self::Pentagon => "p",
            Self::Hexagon => "h",
            Self::Star => "*",
            Self::Diamond => "D",
        }
    }
}

impl FromStr for Marker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "o" => Ok(Self::Circle),
            "s" => Ok(Self::Square),
            "^" => Ok(Self::TriangleUp),
            "v" => Ok(Self::TriangleDown),
            ">" => Ok(Self::TriangleRight),
            "<" => Ok(Self::TriangleLeft),
            "p" => Ok(Self::Pentagon),
            "h" => Ok(Self::Hexagon),
            "*" => Ok(Self::Star),
            "D" => Ok(Self::Diamond),
            other => Err(format!("Unknown marker: {}", other)),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Named plot color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Blue,
    Green,
    Red,
    Purple,
    Orange,
    Cyan,
    Magenta,
    Pink,
    Brown,
    Black,
    Gray,
    Olive,
}

impl NamedColor {
    /// RGB value, matching the CSS color of the same name
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Blue => [0, 0, 255],
            Self::Green => [0, 128, 0],
            Self::Red => [255, 0, 0],
            Self::Purple => [128, 0, 128],
            Self::Orange => [255, 165, 0],
            Self::Cyan => [0, 255, 255],
            Self::Magenta => [255, 0, 255],
            Self::Pink => [255, 192, 203],
            Self::Brown => [165, 42, 42],
            Self::Black => [0, 0, 0],
            Self::Gray => [128, 128, 128],
            Self::Olive => [128, 128, 0],
        }
    }

    /// Lowercase color name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Cyan => "cyan",
            Self::Magenta => "magenta",
            Self::Pink => "pink",
            Self::Brown => "brown",
            Self::Black => "black",
            Self::Gray => "gray",
            Self::Olive => "olive",
        }
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A benchmarked model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name, also the name of its output directory
    pub name: String,
    /// Base family the model belongs to
    pub base_name: String,
    /// Parameter count in billions
    pub num_params: f64,
}

/// Plot style shared by all models of a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyStyle {
    pub marker: Marker,
    pub color: NamedColor,
}

/// Static lookup of models and family styles.
///
/// Both maps keep insertion order so that listings and report rows follow
/// the order in which models were registered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelConfig>,
    families: IndexMap<String, FamilyStyle>,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in registry of evaluated models
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        for (name, family, params) in [
            ("InternVL2_5-1B", "InternVL2_5", 0.9),
            ("InternVL2_5-2B", "InternVL2_5", 2.1),
            ("InternVL2_5-4B", "InternVL2_5", 3.5),
            ("InternVL2_5-8B", "InternVL2_5", 7.5),
            ("MiniCPM-V-2_6", "MiniCPM-V-2_6", 7.9),
            ("Llama-3-VILA1.5-8b", "Llama-3-VILA1.5-8b", 8.4),
            ("llava_next_llama3", "llava_next_llama3", 1.5),
            ("Phi-3.5-Vision", "Phi-3.5-Vision", 3.9),
            ("Qwen2-VL-2B-Instruct", "Qwen2-VL", 2.1),
            ("Qwen2-VL-7B-Instruct", "Qwen2-VL", 7.7),
            ("Qwen2.5-VL-3B", "Qwen2.5-VL", 3.5),
            ("Qwen2.5-VL-7B", "Qwen2.5-VL", 7.7),
            ("Janus-Pro-7B", "Janus-Pro", 7.5),
            ("VideoLLaMA3-2B-Image", "VideoLLaMA3", 1.8),
            ("VideoLLaMA3-7B-Image", "VideoLLaMA3", 7.5),
            ("VideoLLaMA3-2B", "VideoLLaMA3", 2.0),
            ("VideoLLaMA3-7B", "VideoLLaMA3", 7.5),
        ] {
            registry.insert_model(name, family, params);
        }

        for (family, marker, color) in [
            ("InternVL2_5", Marker::Circle, NamedColor::Blue),
            ("MiniCPM-V-2_6", Marker::Square, NamedColor::Green),
            ("Llama-3-VILA1.5-8b", Marker::TriangleUp, NamedColor::Red),
            ("llava_next_llama3", Marker::TriangleDown, NamedColor::Purple),
            ("Phi-3.5-Vision", Marker::TriangleRight, NamedColor::Orange),
            ("Qwen2-VL", Marker::TriangleLeft, NamedColor::Cyan),
            ("Qwen2.5-VL", Marker::Pentagon, NamedColor::Magenta),
            ("Janus-Pro", Marker::Star, NamedColor::Pink),
            ("VideoLLaMA3", Marker::Hexagon, NamedColor::Brown),
        ] {
            registry.insert_family(family, marker, color);
        }

        registry
    }

    /// Register a model
    pub fn insert_model(&mut self, name: &str, base_name: &str, num_params: f64) {
        self.models.insert(
            name.to_string(),
            ModelConfig {
                name: name.to_string(),
                base_name: base_name.to_string(),
                num_params,
            },
        );
    }

    /// Register a family style
    pub fn insert_family(&mut self, name: &str, marker: Marker, color: NamedColor) {
        self.families
            .insert(name.to_string(), FamilyStyle { marker, color });
    }

    /// Look up a model by name
    pub fn model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }

    /// Look up a family style by family name
    pub fn family(&self, name: &str) -> Option<&FamilyStyle> {
        self.families.get(name)
    }

    /// Model config and family style for a model, if both are registered
    pub fn style_for(&self, model: &str) -> Option<(&ModelConfig, &FamilyStyle)> {
        let config = self.models.get(model)?;
        let style = self.families.get(&config.base_name)?;
        Some((config, style))
    }

    /// Names of all models whose family is one of `families`, in registry order
    pub fn models_in_families<S: AsRef<str>>(&self, families: &[S]) -> Vec<String> {
        self.models
            .values()
            .filter(|m| families.iter().any(|f| f.as_ref() == m.base_name))
            .map(|m| m.name.clone())
            .collect()
    }

    /// All registered models in order
    pub fn models(&self) -> impl Iterator<Item = &ModelConfig> {
        self.models.values()
    }

    /// All registered families in order
    pub fn families(&self) -> impl Iterator<Item = (&str, &FamilyStyle)> {
        self.families.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no models are registered
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_families_resolve() {
        let registry = ModelRegistry::builtin();
        for model in registry.models() {
            assert!(
                registry.family(&model.base_name).is_some(),
                "family missing for {}",
                model.name
            );
        }
    }

    #[test]
    fn test_models_in_families_preserves_order() {
        let registry = ModelRegistry::builtin();
        let models = registry.models_in_families(&["Qwen2-VL", "InternVL2_5"]);
        assert_eq!(
            models,
            vec![
                "InternVL2_5-1B",
                "InternVL2_5-2B",
                "InternVL2_5-4B",
                "InternVL2_5-8B",
                "Qwen2-VL-2B-Instruct",
                "Qwen2-VL-7B-Instruct",
            ]
        );
    }

    #[test]
    fn test_style_for_unknown_model() {
        let registry = ModelRegistry::builtin();
        assert!(registry.style_for("GPT-4o").is_none());

        let (config, style) = registry.style_for("Janus-Pro-7B").unwrap();
        assert_eq!(config.num_params, 7.5);
        assert_eq!(style.marker, Marker::Star);
        assert_eq!(style.color, NamedColor::Pink);
    }

    #[test]
    fn test_marker_symbol_roundtrip() {
        for symbol in ["o", "s", "^", "v", ">", "<", "p", "h", "*", "D"] {
            let marker: Marker = symbol.parse().unwrap();
            assert_eq!(marker.symbol(), symbol);
        }
        assert!("x".parse::<Marker>().is_err());
    }

    #[test]
    fn test_family_style_serialization() {
        let style = FamilyStyle {
            marker: Marker::Hexagon,
            color: NamedColor::Brown,
        };
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r#"{"marker":"h","color":"brown"}"#);
    }
}
