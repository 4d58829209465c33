use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{FlavorVariant, Rgb};

/// Visual elements the choreography can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetId {
    /// The focal can's model group.
    FocalModel,
    /// Container wrapping the focal view, its controls and its caption.
    FocalContainer,
    PreviousPreview,
    NextPreview,
    Backdrop,
    Footer,
    WavesOuter,
    WavesInner,
    /// Flavor name and price caption block.
    TextContent,
}

impl TargetId {
    pub const ALL: [TargetId; 9] = [
        TargetId::FocalModel,
        TargetId::FocalContainer,
        TargetId::PreviousPreview,
        TargetId::NextPreview,
        TargetId::Backdrop,
        TargetId::Footer,
        TargetId::WavesOuter,
        TargetId::WavesInner,
        TargetId::TextContent,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Rotation around the vertical axis, radians.
    RotationY,
    /// Vertical displacement; negative values move up.
    OffsetY,
    Opacity,
    /// Background or fill colour.
    Fill,
}

impl Property {
    pub fn initial(self) -> PropertyValue {
        match self {
            Property::RotationY | Property::OffsetY => PropertyValue::Scalar(0.0),
            Property::Opacity => PropertyValue::Scalar(1.0),
            Property::Fill => PropertyValue::Color(Rgb::WHITE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(f32),
    Color(Rgb),
}

impl PropertyValue {
    pub fn as_scalar(self) -> Option<f32> {
        match self {
            PropertyValue::Scalar(v) => Some(v),
            PropertyValue::Color(_) => None,
        }
    }

    pub fn as_color(self) -> Option<Rgb> {
        match self {
            PropertyValue::Color(c) => Some(c),
            PropertyValue::Scalar(_) => None,
        }
    }

    /// Interpolates between two values of the same kind. Mismatched kinds
    /// snap to `to`.
    pub fn lerp(from: PropertyValue, to: PropertyValue, t: f32) -> PropertyValue {
        match (from, to) {
            (PropertyValue::Scalar(a), PropertyValue::Scalar(b)) => {
                PropertyValue::Scalar(a + (b - a) * t)
            }
            (PropertyValue::Color(a), PropertyValue::Color(b)) => PropertyValue::Color(a.lerp(b, t)),
            (_, to) => to,
        }
    }
}

/// Mutation seam between the timeline and whatever renders the section.
///
/// `read` and `write` report an unavailable (unmounted) target by returning
/// `None` / `false`; callers treat that as "skip this effect".
pub trait SceneTargets {
    fn read(&self, target: TargetId, property: Property) -> Option<PropertyValue>;

    fn write(&mut self, target: TargetId, property: Property, value: PropertyValue) -> bool;

    fn is_mounted(&self, target: TargetId) -> bool;

    /// Releases every target. No further write may land after this.
    fn dispose(&mut self);
}

/// In-memory target store used by the default carousel.
#[derive(Debug, Default, Clone)]
pub struct Stage {
    targets: HashMap<TargetId, HashMap<Property, PropertyValue>>,
    disposed: bool,
}

impl Stage {
    /// A stage with every target mounted at its initial values.
    pub fn mounted() -> Self {
        let mut stage = Self::default();
        for target in TargetId::ALL {
            stage.mount(target);
        }
        stage
    }

    pub fn mount(&mut self, target: TargetId) {
        if self.disposed {
            return;
        }
        self.targets.entry(target).or_default();
    }

    pub fn unmount(&mut self, target: TargetId) {
        self.targets.remove(&target);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Convenience reader for scalar properties, falling back to the
    /// property's initial value.
    pub fn scalar(&self, target: TargetId, property: Property) -> f32 {
        self.read(target, property)
            .and_then(PropertyValue::as_scalar)
            .or_else(|| property.initial().as_scalar())
            .unwrap_or_default()
    }

    pub fn color(&self, target: TargetId) -> Option<Rgb> {
        self.read(target, Property::Fill)
            .and_then(PropertyValue::as_color)
    }
}

impl SceneTargets for Stage {
    fn read(&self, target: TargetId, property: Property) -> Option<PropertyValue> {
        let props = self.targets.get(&target)?;
        Some(props.get(&property).copied().unwrap_or_else(|| property.initial()))
    }

    fn write(&mut self, target: TargetId, property: Property, value: PropertyValue) -> bool {
        match self.targets.get_mut(&target) {
            Some(props) => {
                props.insert(property, value);
                true
            }
            None => false,
        }
    }

    fn is_mounted(&self, target: TargetId) -> bool {
        self.targets.contains_key(&target)
    }

    fn dispose(&mut self) {
        self.targets.clear();
        self.disposed = true;
    }
}

/// Which views the section renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneLayout {
    /// Focal can flanked by previous/next previews.
    #[default]
    Triptych,
    /// Focal can only.
    SingleCan,
}

/// Everything a presenter needs to draw one frame of the section.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame<'a> {
    pub focal: &'a FlavorVariant,
    pub previous: Option<&'a FlavorVariant>,
    pub next: Option<&'a FlavorVariant>,
    pub backdrop: Rgb,
    pub focal_rotation: f32,
    pub text_opacity: f32,
}

/// Idle float motion of a can, applied by the presenter on top of the
/// choreography.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatParams {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
    pub range: [f32; 2],
}

impl FloatParams {
    pub fn focal() -> Self {
        Self {
            rotation_intensity: 1.0,
            float_intensity: 0.3,
            ..Self::default()
        }
    }

    pub fn preview() -> Self {
        Self {
            rotation_intensity: 0.5,
            float_intensity: 0.2,
            ..Self::default()
        }
    }
}

impl Default for FloatParams {
    fn default() -> Self {
        Self {
            speed: 1.5,
            rotation_intensity: 1.0,
            float_intensity: 1.0,
            range: [-0.1, 0.1],
        }
    }
}

/// Lighting and environment of one 3D view. Asset loading belongs to the
/// presenter; a missing environment is its failure to handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRig {
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
    pub environment: String,
    pub environment_intensity: f32,
    pub model_offset: [f32; 3],
    pub float: FloatParams,
}

impl ViewRig {
    pub fn focal() -> Self {
        Self {
            directional_intensity: 6.0,
            float: FloatParams::focal(),
            ..Self::preview()
        }
    }

    pub fn preview() -> Self {
        Self {
            ambient_intensity: 1.2,
            directional_intensity: 3.0,
            directional_position: [0.0, 2.0, 3.0],
            environment: "/hdr/lobby.hdr".to_string(),
            environment_intensity: 0.7,
            model_offset: [0.0, 0.0, 1.5],
            float: FloatParams::preview(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmounted_targets_reject_reads_and_writes() {
        let mut stage = Stage::mounted();
        stage.unmount(TargetId::PreviousPreview);

        assert!(stage.read(TargetId::PreviousPreview, Property::OffsetY).is_none());
        assert!(!stage.write(
            TargetId::PreviousPreview,
            Property::OffsetY,
            PropertyValue::Scalar(-30.0)
        ));
        assert!(stage.write(
            TargetId::NextPreview,
            Property::OffsetY,
            PropertyValue::Scalar(-30.0)
        ));
        assert_eq!(stage.scalar(TargetId::NextPreview, Property::OffsetY), -30.0);
    }

    #[test]
    fn disposed_stage_refuses_remounts() {
        let mut stage = Stage::mounted();
        stage.dispose();
        stage.mount(TargetId::FocalModel);

        assert!(stage.is_disposed());
        assert!(!stage.is_mounted(TargetId::FocalModel));
    }

    #[test]
    fn mounted_targets_start_at_initial_values() {
        let stage = Stage::mounted();
        assert_eq!(stage.scalar(TargetId::TextContent, Property::Opacity), 1.0);
        assert_eq!(stage.color(TargetId::Backdrop), Some(Rgb::WHITE));
    }

    #[test]
    fn mismatched_lerp_snaps_to_target() {
        let to = PropertyValue::Color(Rgb::new(1, 2, 3));
        assert_eq!(PropertyValue::lerp(PropertyValue::Scalar(0.0), to, 0.1), to);
        assert_eq!(
            PropertyValue::lerp(PropertyValue::Scalar(0.0), PropertyValue::Scalar(10.0), 0.25),
            PropertyValue::Scalar(2.5)
        );
    }

    #[test]
    fn focal_rig_is_brighter_than_previews() {
        let focal = ViewRig::focal();
        let preview = ViewRig::preview();
        assert!(focal.directional_intensity > preview.directional_intensity);
        assert_eq!(focal.environment, preview.environment);
        assert!(focal.float.float_intensity > preview.float.float_intensity);
    }
}
