//! Timed property mutations sharing one master clock.

mod ease;

use serde::{Deserialize, Serialize};

use crate::scene::{Property, PropertyValue, SceneTargets, TargetId};

pub use ease::Ease;

#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    pub time_seconds: f32,
}

impl PlaybackClock {
    pub fn advance(&mut self, delta: f32) {
        self.time_seconds = (self.time_seconds + delta).max(0.0);
    }
}

/// Where a tween ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Endpoint {
    Absolute(PropertyValue),
    /// Delta added to the scalar start value (`+=` / `-=`).
    Relative(f32),
}

/// Interpolation of one property of one target.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: TargetId,
    pub property: Property,
    /// Explicit start value; `None` reads the target when the tween starts.
    pub from: Option<PropertyValue>,
    pub to: Endpoint,
    pub duration: f32,
    pub ease: Ease,
    /// Extra iterations after the first.
    pub repeat: u32,
    /// Alternate iterations play backwards.
    pub yoyo: bool,
}

impl Tween {
    pub fn to(target: TargetId, property: Property, to: Endpoint, duration: f32) -> Self {
        Self {
            target,
            property,
            from: None,
            to,
            duration: duration.max(0.0),
            ease: Ease::Linear,
            repeat: 0,
            yoyo: false,
        }
    }

    pub fn from(mut self, value: PropertyValue) -> Self {
        self.from = Some(value);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Go to the endpoint and come back, `repeat` extra times.
    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.yoyo = true;
        self.repeat = repeat;
        self
    }

    /// Time from start until the last iteration ends.
    pub fn total_duration(&self) -> f32 {
        self.duration * (self.repeat + 1) as f32
    }

    /// Eased progress toward the endpoint at `local` seconds after start.
    fn progress_at(&self, local: f32) -> f32 {
        let ends_reversed = self.yoyo && self.repeat % 2 == 1;
        if self.duration <= 0.0 || local >= self.total_duration() {
            return if ends_reversed { 0.0 } else { 1.0 };
        }

        let iteration = (local / self.duration).floor();
        let t = (local - iteration * self.duration) / self.duration;
        if self.yoyo && iteration as u32 % 2 == 1 {
            self.ease.apply(1.0 - t)
        } else {
            self.ease.apply(t)
        }
    }
}

/// Zero-duration callback marker. The timeline owner acts on fired cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Commit the logical selection to this (wrapped) index.
    Commit(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum StepKind {
    Tween(Tween),
    Cue(Cue),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Pending,
    Running {
        from: PropertyValue,
        to: PropertyValue,
    },
    Done,
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
struct Step {
    at: f32,
    kind: StepKind,
    phase: Phase,
}

impl Step {
    fn end(&self) -> f32 {
        match &self.kind {
            StepKind::Tween(tween) => self.at + tween.total_duration(),
            StepKind::Cue(_) => self.at,
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done | Phase::Skipped)
    }
}

/// An ordered set of tweens and cues placed at absolute offsets from the
/// timeline start. Created per transition and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    clock: PlaybackClock,
    steps: Vec<Step>,
    killed: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `tween` at `at` seconds. Steps sharing an offset keep insertion
    /// order.
    pub fn tween(&mut self, at: f32, tween: Tween) -> &mut Self {
        self.insert(at, StepKind::Tween(tween));
        self
    }

    pub fn cue(&mut self, at: f32, cue: Cue) -> &mut Self {
        self.insert(at, StepKind::Cue(cue));
        self
    }

    fn insert(&mut self, at: f32, kind: StepKind) {
        let at = at.max(0.0);
        let index = self.steps.partition_point(|step| step.at <= at);
        self.steps.insert(
            index,
            Step {
                at,
                kind,
                phase: Phase::Pending,
            },
        );
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.time_seconds
    }

    pub fn duration(&self) -> f32 {
        self.steps.iter().map(Step::end).fold(0.0, f32::max)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    pub fn is_complete(&self) -> bool {
        self.killed || self.steps.iter().all(Step::is_finished)
    }

    /// Tweens placed on the timeline, in start order.
    pub fn tweens(&self) -> impl Iterator<Item = (f32, &Tween)> {
        self.steps.iter().filter_map(|step| match &step.kind {
            StepKind::Tween(tween) => Some((step.at, tween)),
            StepKind::Cue(_) => None,
        })
    }

    /// Cues placed on the timeline with their offsets.
    pub fn cues(&self) -> impl Iterator<Item = (f32, Cue)> + '_ {
        self.steps.iter().filter_map(|step| match step.kind {
            StepKind::Cue(cue) => Some((step.at, cue)),
            StepKind::Tween(_) => None,
        })
    }

    /// Advances the master clock by `delta` seconds, writing every due tween
    /// value into `targets`. Returns the cues that fired, in offset order.
    pub fn tick<T: SceneTargets + ?Sized>(&mut self, delta: f32, targets: &mut T) -> Vec<Cue> {
        if self.killed {
            return Vec::new();
        }

        self.clock.advance(delta.max(0.0));
        let now = self.clock.time_seconds;
        let mut fired = Vec::new();

        for step in &mut self.steps {
            if step.at > now {
                break;
            }

            match &step.kind {
                StepKind::Cue(cue) => {
                    if step.phase == Phase::Pending {
                        tracing::debug!(?cue, at = step.at, "timeline cue fired");
                        fired.push(*cue);
                        step.phase = Phase::Done;
                    }
                }
                StepKind::Tween(tween) => {
                    if step.phase == Phase::Pending {
                        step.phase = start_tween(tween, &*targets);
                    }

                    if let Phase::Running { from, to } = step.phase {
                        let local = now - step.at;
                        let value = PropertyValue::lerp(from, to, tween.progress_at(local));
                        if !targets.write(tween.target, tween.property, value) {
                            tracing::debug!(target_id = ?tween.target, "target went away, tween skipped");
                            step.phase = Phase::Skipped;
                        } else if local >= tween.total_duration() {
                            step.phase = Phase::Done;
                        }
                    }
                }
            }
        }

        fired
    }

    /// Stops the timeline. No further mutation is written after this.
    pub fn kill(&mut self) {
        self.killed = true;
    }

    /// Removes and returns cues that have not fired yet, in offset order.
    pub fn drain_pending_cues(&mut self) -> Vec<Cue> {
        self.steps
            .iter_mut()
            .filter_map(|step| match step.kind {
                StepKind::Cue(cue) if step.phase == Phase::Pending => {
                    step.phase = Phase::Done;
                    Some(cue)
                }
                _ => None,
            })
            .collect()
    }
}

fn start_tween<T: SceneTargets + ?Sized>(tween: &Tween, targets: &T) -> Phase {
    let Some(from) = tween.from.or_else(|| targets.read(tween.target, tween.property)) else {
        tracing::debug!(target_id = ?tween.target, property = ?tween.property, "target unavailable, tween skipped");
        return Phase::Skipped;
    };
    if !targets.is_mounted(tween.target) {
        tracing::debug!(target_id = ?tween.target, "target unmounted, tween skipped");
        return Phase::Skipped;
    }

    let to = match tween.to {
        Endpoint::Absolute(value) => value,
        Endpoint::Relative(delta) => match from.as_scalar() {
            Some(start) => PropertyValue::Scalar(start + delta),
            None => {
                tracing::debug!(property = ?tween.property, "relative endpoint on a colour, tween skipped");
                return Phase::Skipped;
            }
        },
    };

    Phase::Running { from, to }
}

/// Event placed on an external schedule, e.g. a scripted button press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent<E> {
    pub time_seconds: f32,
    pub event: E,
}

impl<E> ScheduledEvent<E> {
    pub fn new(time_seconds: f32, event: E) -> Self {
        Self {
            time_seconds,
            event,
        }
    }
}

/// Releases scheduled events once the playback clock passes them.
#[derive(Debug)]
pub struct Scheduler<E> {
    events: Vec<ScheduledEvent<E>>,
    next_event: usize,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            next_event: 0,
        }
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_events(&mut self, events: Vec<ScheduledEvent<E>>) {
        self.events = events;
        self.events
            .sort_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds));
        self.next_event = 0;
    }

    /// Events whose time is at or before the clock, each returned once.
    pub fn due(&mut self, clock: &PlaybackClock) -> Vec<E> {
        let mut due = Vec::new();
        while let Some(scheduled) = self.events.get(self.next_event) {
            if clock.time_seconds < scheduled.time_seconds {
                break;
            }
            due.push(scheduled.event.clone());
            self.next_event += 1;
        }
        due
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_event >= self.events.len()
    }

    pub fn last_time(&self) -> f32 {
        self.events.last().map(|e| e.time_seconds).unwrap_or(0.0)
    }
}
