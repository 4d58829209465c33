//! Turns a requested index change into a timeline of visual mutations.
//!
//! Two choreographies are available behind the [`Choreography`] trait:
//! [`DiscreteJump`] commits the selection immediately and plays a decorative
//! spin and jump, while [`ContinuousMorph`] spins the focal can several times,
//! morphs the section colours and commits the selection half-way through.

use std::f32::consts::TAU;
use std::fmt;

use crate::{
    catalog::FlavorCatalog,
    config::{ChoreographyConfig, JumpConfig, MorphConfig},
    scene::{Property, PropertyValue, TargetId},
    timeline::{Cue, Ease, Endpoint, Timeline, Tween},
};

/// Inputs to one transition.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub catalog: &'a FlavorCatalog,
    /// Committed index when the request was made.
    pub current: usize,
    /// Requested index before wrapping; may be negative or `>= len`.
    pub requested: i64,
    /// `requested` wrapped into `[0, len)`.
    pub target: usize,
}

/// When the logical selection changes relative to the visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPoint {
    /// Before the timeline starts playing.
    Immediate,
    /// When the timeline's [`Cue::Commit`] fires.
    OnTimeline,
}

#[derive(Debug, Clone)]
pub struct TransitionPlan {
    pub timeline: Timeline,
    pub commit: CommitPoint,
}

/// A transition strategy.
pub trait Choreography: fmt::Debug {
    fn name(&self) -> &'static str;

    fn run_transition(&self, ctx: &TransitionContext<'_>) -> TransitionPlan;
}

/// Spin the focal can once and bounce every can; the rotation is decorative.
#[derive(Debug, Clone, Default)]
pub struct DiscreteJump {
    pub config: JumpConfig,
}

impl DiscreteJump {
    pub fn new(config: JumpConfig) -> Self {
        Self { config }
    }
}

impl Choreography for DiscreteJump {
    fn name(&self) -> &'static str {
        "jump"
    }

    fn run_transition(&self, ctx: &TransitionContext<'_>) -> TransitionPlan {
        let cfg = &self.config;
        let color = ctx.catalog.get(ctx.target).color;
        let mut timeline = Timeline::new();

        timeline.tween(
            0.0,
            Tween::to(
                TargetId::FocalModel,
                Property::RotationY,
                Endpoint::Relative(TAU),
                cfg.spin_duration,
            )
            .ease(cfg.spin_ease),
        );

        let jumps = [
            (TargetId::PreviousPreview, cfg.preview_lift, cfg.preview_duration),
            (TargetId::NextPreview, cfg.preview_lift, cfg.preview_duration),
            (TargetId::FocalContainer, cfg.focal_lift, cfg.focal_duration),
        ];
        for (target, lift, duration) in jumps {
            timeline.tween(
                0.0,
                Tween::to(
                    target,
                    Property::OffsetY,
                    Endpoint::Absolute(PropertyValue::Scalar(-lift)),
                    duration,
                )
                .from(PropertyValue::Scalar(0.0))
                .ease(cfg.jump_ease)
                .yoyo(1),
            );
        }

        for target in [TargetId::Backdrop, TargetId::Footer] {
            timeline.tween(
                0.0,
                Tween::to(
                    target,
                    Property::Fill,
                    Endpoint::Absolute(PropertyValue::Color(color)),
                    cfg.backdrop_fade,
                )
                .ease(Ease::InOutQuad),
            );
        }

        TransitionPlan {
            timeline,
            commit: CommitPoint::Immediate,
        }
    }
}

/// Spin several revolutions while the colours morph; commit mid-way.
#[derive(Debug, Clone, Default)]
pub struct ContinuousMorph {
    pub config: MorphConfig,
}

impl ContinuousMorph {
    pub fn new(config: MorphConfig) -> Self {
        Self { config }
    }

    /// Signed spin for a request. Compares the raw request against the
    /// committed index, so wrapping from the first flavor to the last spins
    /// the long way round.
    pub fn spin_for(&self, current: usize, requested: i64) -> f32 {
        let revolutions = TAU * self.config.spin_count as f32;
        if requested > current as i64 {
            -revolutions
        } else {
            revolutions
        }
    }
}

impl Choreography for ContinuousMorph {
    fn name(&self) -> &'static str {
        "morph"
    }

    fn run_transition(&self, ctx: &TransitionContext<'_>) -> TransitionPlan {
        let cfg = &self.config;
        let color = ctx.catalog.get(ctx.target).color;
        let mut timeline = Timeline::new();

        timeline.tween(
            0.0,
            Tween::to(
                TargetId::FocalModel,
                Property::RotationY,
                Endpoint::Relative(self.spin_for(ctx.current, ctx.requested)),
                cfg.duration,
            )
            .ease(cfg.ease),
        );

        for target in [
            TargetId::Backdrop,
            TargetId::Footer,
            TargetId::WavesOuter,
            TargetId::WavesInner,
        ] {
            timeline.tween(
                0.0,
                Tween::to(
                    target,
                    Property::Fill,
                    Endpoint::Absolute(PropertyValue::Color(color)),
                    cfg.duration,
                )
                .ease(cfg.ease),
            );
        }

        for (property, value) in [(Property::Opacity, 0.0), (Property::OffsetY, -cfg.text_lift)] {
            timeline.tween(
                0.0,
                Tween::to(
                    TargetId::TextContent,
                    property,
                    Endpoint::Absolute(PropertyValue::Scalar(value)),
                    cfg.text_fade_out,
                ),
            );
        }

        timeline.cue(cfg.commit_at, Cue::Commit(ctx.target));

        for (property, value) in [(Property::Opacity, 1.0), (Property::OffsetY, 0.0)] {
            timeline.tween(
                cfg.text_fade_in_at,
                Tween::to(
                    TargetId::TextContent,
                    property,
                    Endpoint::Absolute(PropertyValue::Scalar(value)),
                    cfg.text_fade_in,
                ),
            );
        }

        TransitionPlan {
            timeline,
            commit: CommitPoint::OnTimeline,
        }
    }
}

/// Owns the active choreography and produces one plan per request.
#[derive(Debug)]
pub struct AnimationDirector {
    choreography: Box<dyn Choreography>,
}

impl AnimationDirector {
    pub fn new(choreography: Box<dyn Choreography>) -> Self {
        Self { choreography }
    }

    pub fn from_config(config: &ChoreographyConfig) -> Self {
        match config {
            ChoreographyConfig::Jump(cfg) => Self::new(Box::new(DiscreteJump::new(cfg.clone()))),
            ChoreographyConfig::Morph(cfg) => {
                Self::new(Box::new(ContinuousMorph::new(cfg.clone())))
            }
        }
    }

    pub fn policy(&self) -> &'static str {
        self.choreography.name()
    }

    pub fn plan(&self, ctx: &TransitionContext<'_>) -> TransitionPlan {
        let plan = self.choreography.run_transition(ctx);
        tracing::debug!(
            policy = self.policy(),
            current = ctx.current,
            requested = ctx.requested,
            target = ctx.target,
            steps = plan.timeline.len(),
            duration = plan.timeline.duration(),
            "transition planned"
        );
        plan
    }
}

impl Default for AnimationDirector {
    fn default() -> Self {
        Self::from_config(&ChoreographyConfig::default())
    }
}
