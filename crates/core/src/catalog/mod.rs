//! Static, ordered list of flavors offered by the carousel.

mod color;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CarouselError, Result};

pub use color::Rgb;

/// Canonical flavor identifier. It also selects the can skin of the 3D model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlavorKey {
    BlackCherry,
    Grape,
    LemonLime,
    StrawberryLemonade,
    Watermelon,
}

impl FlavorKey {
    pub const ALL: [FlavorKey; 5] = [
        FlavorKey::BlackCherry,
        FlavorKey::Grape,
        FlavorKey::LemonLime,
        FlavorKey::StrawberryLemonade,
        FlavorKey::Watermelon,
    ];

    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            FlavorKey::BlackCherry => "blackCherry",
            FlavorKey::Grape => "grape",
            FlavorKey::LemonLime => "lemonLime",
            FlavorKey::StrawberryLemonade => "strawberryLemonade",
            FlavorKey::Watermelon => "watermelon",
        }
    }

    /// Like [`normalize`], falling back to the default can skin.
    pub fn normalize_or_default(label: Option<&str>) -> FlavorKey {
        normalize(label).unwrap_or_default()
    }
}

impl Default for FlavorKey {
    fn default() -> Self {
        FlavorKey::BlackCherry
    }
}

impl fmt::Display for FlavorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a free-text label to a canonical key.
///
/// Matching ignores case, whitespace, `-` and `_`, so `"LemonLime"`,
/// `"lemon lime"` and `"lemon-lime"` all resolve to [`FlavorKey::LemonLime`].
/// Absent or unknown labels yield `None`.
pub fn normalize(label: Option<&str>) -> Option<FlavorKey> {
    let label = label?;
    let folded: String = label
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();

    match folded.as_str() {
        "blackcherry" => Some(FlavorKey::BlackCherry),
        "grape" => Some(FlavorKey::Grape),
        "lemonlime" => Some(FlavorKey::LemonLime),
        "strawberrylemonade" => Some(FlavorKey::StrawberryLemonade),
        "watermelon" => Some(FlavorKey::Watermelon),
        _ => None,
    }
}

/// One selectable product configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorVariant {
    #[serde(rename = "flavor")]
    pub key: FlavorKey,
    pub color: Rgb,
    pub name: String,
}

impl FlavorVariant {
    pub fn new(key: FlavorKey, color: Rgb, name: impl Into<String>) -> Self {
        Self {
            key,
            color,
            name: name.into(),
        }
    }

    /// Skin the 3D can is rendered with.
    pub fn model_variant(&self) -> FlavorKey {
        self.key
    }
}

/// Non-empty, ordered flavor list. Order defines neighbour relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlavorCatalog {
    flavors: Vec<FlavorVariant>,
}

impl FlavorCatalog {
    pub fn new(flavors: Vec<FlavorVariant>) -> Result<Self> {
        if flavors.is_empty() {
            return Err(CarouselError::EmptyCatalog);
        }
        Ok(Self { flavors })
    }

    /// The five flavors shipped with the product page.
    pub fn standard() -> Self {
        let entries = [
            (FlavorKey::BlackCherry, Rgb::new(0x71, 0x05, 0x23), "Black Cherry"),
            (FlavorKey::Grape, Rgb::new(0x57, 0x29, 0x81), "Grape Goodness"),
            (FlavorKey::LemonLime, Rgb::new(0x16, 0x44, 0x05), "Lemon Lime"),
            (
                FlavorKey::StrawberryLemonade,
                Rgb::new(0x69, 0x0b, 0x3d),
                "Strawberry Lemonade",
            ),
            (FlavorKey::Watermelon, Rgb::new(0x4b, 0x70, 0x02), "Watermelon Crush"),
        ];

        Self {
            flavors: entries
                .into_iter()
                .map(|(key, color, name)| FlavorVariant::new(key, color, name))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.flavors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flavors.is_empty()
    }

    /// Looks up a flavor by an index already wrapped into `[0, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Callers go through
    /// [`CarouselState`](crate::CarouselState), which never produces one.
    pub fn get(&self, index: usize) -> &FlavorVariant {
        &self.flavors[index]
    }

    pub fn position(&self, key: FlavorKey) -> Option<usize> {
        self.flavors.iter().position(|flavor| flavor.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlavorVariant> {
        self.flavors.iter()
    }
}

impl Default for FlavorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for FlavorCatalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let flavors = Vec::<FlavorVariant>::deserialize(deserializer)?;
        FlavorCatalog::new(flavors).map_err(serde::de::Error::custom)
    }
}
