//! Core library for the flavor carousel.
//!
//! A visitor cycles through product flavors; each change plays a timed
//! choreography of rotations, jumps, colour morphs and text fades. Each
//! module owns one piece: the flavor catalog, the carousel selection state,
//! the animation director and its timelines, the scene mutation seam, the
//! navigation controls and the presenter fan-out.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod content;
pub mod controls;
pub mod director;
pub mod error;
pub mod render;
pub mod scene;
pub mod timeline;

pub use carousel::{Carousel, CarouselState, Direction};
pub use catalog::{normalize, FlavorCatalog, FlavorKey, FlavorVariant, Rgb};
pub use config::{AppConfig, ChoreographyConfig, JumpConfig, MorphConfig};
pub use content::{CopyrightNotice, RichText, SliceContent};
pub use controls::{NavControl, NavigationControls};
pub use director::{
    AnimationDirector, Choreography, CommitPoint, ContinuousMorph, DiscreteJump, TransitionContext,
    TransitionPlan,
};
pub use error::{CarouselError, Result};
pub use render::{RenderGraph, ScenePresenter};
pub use scene::{
    FloatParams, Property, PropertyValue, SceneFrame, SceneLayout, SceneTargets, Stage, TargetId,
    ViewRig,
};
pub use timeline::{
    Cue, Ease, Endpoint, PlaybackClock, ScheduledEvent, Scheduler, Timeline, Tween,
};
