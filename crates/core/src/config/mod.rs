use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{catalog::FlavorCatalog, scene::SceneLayout, timeline::Ease, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub choreography: ChoreographyConfig,
    pub layout: SceneLayout,
    /// Frames per second of the driving frame loop.
    pub frame_rate: u32,
    /// Replaces the built-in flavor list when present.
    pub catalog: Option<FlavorCatalog>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            choreography: ChoreographyConfig::default(),
            layout: SceneLayout::default(),
            frame_rate: 60,
            catalog: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn catalog(&self) -> FlavorCatalog {
        self.catalog.clone().unwrap_or_default()
    }

    /// Seconds per frame, never zero.
    pub fn frame_step(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}

/// Which transition choreography runs on navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ChoreographyConfig {
    /// Decorative spin plus a jump of every can; selection commits at once.
    Jump(JumpConfig),
    /// Multi-revolution spin with colour morph; selection commits mid-way.
    Morph(MorphConfig),
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        ChoreographyConfig::Jump(JumpConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub spin_duration: f32,
    pub spin_ease: Ease,
    /// Upward displacement of each neighbour preview.
    pub preview_lift: f32,
    pub preview_duration: f32,
    /// Upward displacement of the focal container.
    pub focal_lift: f32,
    pub focal_duration: f32,
    pub jump_ease: Ease,
    /// Duration of the backdrop and footer colour fade.
    pub backdrop_fade: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            spin_duration: 1.0,
            spin_ease: Ease::InOutCubic,
            preview_lift: 30.0,
            preview_duration: 0.2,
            focal_lift: 40.0,
            focal_duration: 0.3,
            jump_ease: Ease::OutQuad,
            backdrop_fade: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub duration: f32,
    /// Full revolutions per transition.
    pub spin_count: u32,
    pub ease: Ease,
    /// Offset at which the selection commits.
    pub commit_at: f32,
    pub text_fade_out: f32,
    pub text_fade_in_at: f32,
    pub text_fade_in: f32,
    /// Upward displacement of the caption while it is hidden.
    pub text_lift: f32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            spin_count: 8,
            ease: Ease::InOutCubic,
            commit_at: 0.5,
            text_fade_out: 0.2,
            text_fade_in_at: 0.7,
            text_fade_in: 0.2,
            text_lift: 10.0,
        }
    }
}
