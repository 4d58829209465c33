use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{FlavorCatalog, FlavorVariant},
    director::{AnimationDirector, CommitPoint, TransitionContext},
    scene::{Property, PropertyValue, SceneFrame, SceneLayout, SceneTargets, Stage, TargetId},
    timeline::{Cue, Timeline},
};

/// Navigation direction requested by a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn offset(self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// Selected index into a catalog of `len` flavors. Always in `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    current_index: usize,
    len: usize,
}

impl CarouselState {
    /// Starts at the first flavor. `len` is clamped to at least one.
    pub fn new(len: usize) -> Self {
        Self {
            current_index: 0,
            len: len.max(1),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Euclidean wrap of any raw index into `[0, len)`.
    pub fn wrap(&self, raw: i64) -> usize {
        raw.rem_euclid(self.len as i64) as usize
    }

    pub fn neighbor_index(&self, offset: i64) -> usize {
        (self.current_index + self.wrap(offset)) % self.len
    }

    pub fn previous_index(&self) -> usize {
        self.neighbor_index(-1)
    }

    pub fn next_index(&self) -> usize {
        self.neighbor_index(1)
    }

    /// State after `steps` single-step moves (negative moves backwards).
    pub fn advanced(&self, steps: i64) -> Self {
        Self {
            current_index: self.neighbor_index(steps),
            len: self.len,
        }
    }

    /// Sets the selection; out-of-range input is wrapped.
    pub fn commit(&mut self, index: usize) {
        self.current_index = index % self.len;
    }
}

/// One carousel mount: selection state, the in-flight transition and the
/// targets it animates.
#[derive(Debug)]
pub struct Carousel<T: SceneTargets = Stage> {
    catalog: Arc<FlavorCatalog>,
    state: CarouselState,
    director: AnimationDirector,
    targets: T,
    in_flight: Option<Timeline>,
    mounted: bool,
}

impl Carousel<Stage> {
    /// A carousel over a fully mounted in-memory stage.
    pub fn with_stage(catalog: Arc<FlavorCatalog>, director: AnimationDirector) -> Self {
        Self::new(catalog, director, Stage::mounted())
    }
}

impl<T: SceneTargets> Carousel<T> {
    pub fn new(catalog: Arc<FlavorCatalog>, director: AnimationDirector, mut targets: T) -> Self {
        let state = CarouselState::new(catalog.len());
        let color = catalog.get(state.current_index()).color;
        for target in [TargetId::Backdrop, TargetId::Footer, TargetId::WavesOuter, TargetId::WavesInner] {
            targets.write(target, Property::Fill, PropertyValue::Color(color));
        }

        Self {
            catalog,
            state,
            director,
            targets,
            in_flight: None,
            mounted: true,
        }
    }

    pub fn catalog(&self) -> &FlavorCatalog {
        &self.catalog
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    pub fn targets(&self) -> &T {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut T {
        &mut self.targets
    }

    pub fn current(&self) -> &FlavorVariant {
        self.catalog.get(self.state.current_index())
    }

    /// Flavor `offset` steps away from the current one, wrapping.
    pub fn neighbor(&self, offset: i64) -> &FlavorVariant {
        self.catalog.get(self.state.neighbor_index(offset))
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_animating(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|timeline| !timeline.is_complete())
    }

    /// Whether the frame loop should keep calling [`Carousel::tick`].
    pub fn wants_frame(&self) -> bool {
        self.mounted && self.in_flight.is_some()
    }

    /// Moves one step from the settled selection. A transition still in
    /// flight is settled first, so each call moves exactly one step.
    pub fn advance(&mut self, direction: Direction) {
        self.settle_in_flight();
        self.request_index(self.state.current_index() as i64 + direction.offset());
    }

    /// Starts a transition toward `raw`, wrapped into the catalog.
    ///
    /// A transition still in flight is superseded: its timeline is killed,
    /// any commit it had not reached yet is applied without visuals, and the
    /// new request is planned from that settled index. Requesting the
    /// current index still plays the full animation.
    pub fn request_index(&mut self, raw: i64) {
        if !self.mounted {
            tracing::debug!(raw, "request ignored after unmount");
            return;
        }

        self.settle_in_flight();

        let current = self.state.current_index();
        let ctx = TransitionContext {
            catalog: &self.catalog,
            current,
            requested: raw,
            target: self.state.wrap(raw),
        };
        let plan = self.director.plan(&ctx);
        let target = ctx.target;

        if plan.commit == CommitPoint::Immediate {
            self.commit(target);
        }
        self.in_flight = Some(plan.timeline);
    }

    /// Advances the in-flight timeline by `delta` seconds. Returns `true`
    /// when the selection changed during this frame.
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.mounted {
            return false;
        }
        let Some(timeline) = self.in_flight.as_mut() else {
            return false;
        };

        let cues = timeline.tick(delta, &mut self.targets);
        if timeline.is_complete() {
            self.in_flight = None;
        }

        let before = self.state.current_index();
        for cue in cues {
            self.apply_cue(cue);
        }
        before != self.state.current_index()
    }

    /// Tears the mount down: stops the in-flight timeline, releases the frame
    /// registration and disposes every target. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        if let Some(mut timeline) = self.in_flight.take() {
            timeline.kill();
        }
        self.targets.dispose();
        self.mounted = false;
        tracing::info!(index = self.state.current_index(), "carousel unmounted");
    }

    /// Triple handed to presenters. Neighbours are omitted in the single-can
    /// layout.
    pub fn scene_frame(&self, layout: SceneLayout) -> SceneFrame<'_> {
        let focal = self.current();
        let (previous, next) = match layout {
            SceneLayout::Triptych => (Some(self.neighbor(-1)), Some(self.neighbor(1))),
            SceneLayout::SingleCan => (None, None),
        };
        let read_scalar = |target, property: Property, fallback: f32| {
            self.targets
                .read(target, property)
                .and_then(|value| value.as_scalar())
                .unwrap_or(fallback)
        };

        SceneFrame {
            focal,
            previous,
            next,
            backdrop: self
                .targets
                .read(TargetId::Backdrop, Property::Fill)
                .and_then(|value| value.as_color())
                .unwrap_or(focal.color),
            focal_rotation: read_scalar(TargetId::FocalModel, Property::RotationY, 0.0),
            text_opacity: read_scalar(TargetId::TextContent, Property::Opacity, 1.0),
        }
    }

    /// Kills the in-flight timeline and applies the commits it had not
    /// reached yet, without visuals.
    fn settle_in_flight(&mut self) {
        let Some(mut previous) = self.in_flight.take() else {
            return;
        };
        if previous.is_complete() {
            return;
        }

        previous.kill();
        let pending = previous.drain_pending_cues();
        tracing::info!(pending = pending.len(), "superseding in-flight transition");
        for cue in pending {
            self.apply_cue(cue);
        }
    }

    fn apply_cue(&mut self, cue: Cue) {
        match cue {
            Cue::Commit(index) => self.commit(index),
        }
    }

    fn commit(&mut self, index: usize) {
        self.state.commit(index);
        tracing::info!(
            index = self.state.current_index(),
            flavor = %self.current().key,
            "selection committed"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use proptest::prelude::*;

    use super::*;
    use crate::catalog::{FlavorKey, Rgb};
    use crate::config::{ChoreographyConfig, MorphConfig};

    fn jump_carousel() -> Carousel {
        Carousel::with_stage(Arc::new(FlavorCatalog::standard()), AnimationDirector::default())
    }

    fn morph_carousel() -> Carousel {
        Carousel::with_stage(
            Arc::new(FlavorCatalog::standard()),
            AnimationDirector::from_config(&ChoreographyConfig::Morph(MorphConfig::default())),
        )
    }

    fn run_to_end<T: SceneTargets>(carousel: &mut Carousel<T>) {
        for _ in 0..64 {
            carousel.tick(0.125);
        }
        assert!(!carousel.is_animating());
    }

    /// Counts writes that reach the wrapped stage.
    #[derive(Debug, Default)]
    struct SpyTargets {
        stage: Stage,
        writes: usize,
    }

    impl SceneTargets for SpyTargets {
        fn read(&self, target: TargetId, property: Property) -> Option<PropertyValue> {
            self.stage.read(target, property)
        }

        fn write(&mut self, target: TargetId, property: Property, value: PropertyValue) -> bool {
            self.writes += 1;
            self.stage.write(target, property, value)
        }

        fn is_mounted(&self, target: TargetId) -> bool {
            self.stage.is_mounted(target)
        }

        fn dispose(&mut self) {
            self.stage.dispose();
        }
    }

    fn numbered_catalog(len: usize) -> Arc<FlavorCatalog> {
        let flavors = (0..len)
            .map(|i| {
                let key = FlavorKey::ALL[i % FlavorKey::ALL.len()];
                FlavorVariant::new(key, Rgb::new(i as u8, 0, 0), format!("Flavor {i}"))
            })
            .collect();
        Arc::new(FlavorCatalog::new(flavors).expect("non-empty catalog"))
    }

    proptest! {
        #[test]
        fn advancing_k_times_lands_on_wrapped_index(
            len in 1usize..64,
            start in 0usize..64,
            k in -300i64..300,
        ) {
            let mut state = CarouselState::new(len);
            state.commit(start);
            let start = state.current_index();

            let step = k.signum();
            let mut stepped = state;
            for _ in 0..k.abs() {
                stepped = stepped.advanced(step);
            }

            let expected = (start as i64 + k).rem_euclid(len as i64) as usize;
            prop_assert_eq!(stepped.current_index(), expected);
            prop_assert!(stepped.current_index() < len);
            prop_assert_eq!(state.advanced(k).current_index(), expected);
        }

        #[test]
        fn arbitrary_offsets_stay_in_range(
            len in 1usize..64,
            start in 0usize..64,
            k in any::<i32>(),
        ) {
            let mut state = CarouselState::new(len);
            state.commit(start);

            let expected = (state.current_index() as i64 + i64::from(k)).rem_euclid(len as i64) as usize;
            let moved = state.advanced(i64::from(k));
            prop_assert_eq!(moved.current_index(), expected);
            prop_assert!(moved.current_index() < len);
            prop_assert!(state.wrap(i64::from(k)) < len);
        }

        #[test]
        fn rapid_morph_presses_each_move_one_step(
            len in 1usize..16,
            presses in proptest::collection::vec(any::<bool>(), 0..24),
        ) {
            let mut carousel = Carousel::with_stage(
                numbered_catalog(len),
                AnimationDirector::from_config(&ChoreographyConfig::Morph(MorphConfig::default())),
            );
            let mut net = 0i64;
            for forward in presses {
                let direction = if forward { Direction::Next } else { Direction::Previous };
                net += direction.offset();
                carousel.advance(direction);
            }
            run_to_end(&mut carousel);

            prop_assert_eq!(
                carousel.state().current_index(),
                net.rem_euclid(len as i64) as usize
            );
        }

        #[test]
        fn neighbours_are_valid_and_distinct(len in 1usize..64, start in 0usize..64) {
            let mut carousel = Carousel::with_stage(numbered_catalog(len), AnimationDirector::default());
            carousel.request_index(start as i64);
            let current = carousel.current().clone();

            for offset in [-1, 1] {
                let neighbour = carousel.neighbor(offset);
                prop_assert!(carousel.catalog().iter().any(|f| f == neighbour));
                if len > 1 {
                    prop_assert_ne!(neighbour, &current);
                } else {
                    prop_assert_eq!(neighbour, &current);
                }
            }
        }
    }

    #[test]
    fn wrap_uses_euclidean_modulo() {
        let state = CarouselState::new(5);
        assert_eq!(state.wrap(-1), 4);
        assert_eq!(state.wrap(-6), 4);
        assert_eq!(state.wrap(5), 0);
        assert_eq!(state.wrap(i64::MIN), i64::MIN.rem_euclid(5) as usize);
        assert_eq!(CarouselState::new(0).len(), 1);
    }

    #[test]
    fn neighbours_are_distinct_unless_single_flavor() {
        let carousel = jump_carousel();
        assert_ne!(carousel.neighbor(-1), carousel.current());
        assert_ne!(carousel.neighbor(1), carousel.current());
        assert_eq!(carousel.neighbor(-1).key, FlavorKey::Watermelon);
        assert_eq!(carousel.neighbor(1).key, FlavorKey::Grape);

        let single = FlavorCatalog::new(vec![FlavorCatalog::standard().get(2).clone()]).unwrap();
        let carousel = Carousel::with_stage(Arc::new(single), AnimationDirector::default());
        assert_eq!(carousel.neighbor(-1), carousel.current());
        assert_eq!(carousel.neighbor(1), carousel.current());
    }

    #[test]
    fn jump_commits_immediately() {
        let mut carousel = jump_carousel();
        carousel.advance(Direction::Previous);

        assert_eq!(carousel.state().current_index(), 4);
        assert!(carousel.is_animating());
        assert!(carousel.wants_frame());
        run_to_end(&mut carousel);
        assert!(!carousel.wants_frame());
        assert_eq!(carousel.state().current_index(), 4);
    }

    #[test]
    fn morph_commits_at_the_midpoint() {
        let mut carousel = morph_carousel();
        carousel.advance(Direction::Next);

        assert!(!carousel.tick(0.25));
        assert_eq!(carousel.state().current_index(), 0);
        assert!(carousel.tick(0.25));
        assert_eq!(carousel.state().current_index(), 1);
        run_to_end(&mut carousel);
        assert_eq!(
            carousel.targets().color(TargetId::Backdrop),
            Some(carousel.current().color)
        );
    }

    #[test]
    fn same_index_request_still_animates() {
        for mut carousel in [jump_carousel(), morph_carousel()] {
            carousel.request_index(0);
            assert!(carousel.is_animating());
            run_to_end(&mut carousel);

            assert_eq!(carousel.state().current_index(), 0);
            let rotation = carousel.targets().scalar(TargetId::FocalModel, Property::RotationY);
            assert!(rotation.abs() >= TAU - 1e-3, "rotation {rotation}");
        }
    }

    #[test]
    fn superseding_request_settles_on_latest_target() {
        let mut carousel = morph_carousel();
        carousel.advance(Direction::Next);
        carousel.tick(0.25);
        carousel.advance(Direction::Next);

        // The first request's pending commit is applied before re-planning.
        assert_eq!(carousel.state().current_index(), 1);
        run_to_end(&mut carousel);
        assert_eq!(carousel.state().current_index(), 2);
        assert_eq!(carousel.targets().color(TargetId::Backdrop), Some(carousel.current().color));
    }

    #[test]
    fn double_next_mid_morph_moves_two_steps_spinning_forward() {
        let mut carousel = morph_carousel();
        carousel.advance(Direction::Next);
        carousel.tick(0.25);
        let first_leg = carousel.targets().scalar(TargetId::FocalModel, Property::RotationY);
        assert!(first_leg < 0.0, "first leg {first_leg}");

        carousel.advance(Direction::Next);
        run_to_end(&mut carousel);

        assert_eq!(carousel.current().key, FlavorKey::LemonLime);
        let rotation = carousel.targets().scalar(TargetId::FocalModel, Property::RotationY);
        assert!(
            (rotation - (first_leg - 8.0 * TAU)).abs() < 1e-3,
            "rotation {rotation}"
        );
    }

    #[test]
    fn double_previous_mid_morph_crosses_the_wrap_spinning_backward() {
        let mut carousel = morph_carousel();
        carousel.advance(Direction::Previous);
        carousel.tick(0.25);
        let first_leg = carousel.targets().scalar(TargetId::FocalModel, Property::RotationY);
        assert!(first_leg > 0.0, "first leg {first_leg}");

        carousel.advance(Direction::Previous);
        assert_eq!(carousel.state().current_index(), 4);
        run_to_end(&mut carousel);

        assert_eq!(carousel.state().current_index(), 3);
        assert_eq!(carousel.current().key, FlavorKey::StrawberryLemonade);
        let rotation = carousel.targets().scalar(TargetId::FocalModel, Property::RotationY);
        assert!(
            (rotation - (first_leg + 8.0 * TAU)).abs() < 1e-3,
            "rotation {rotation}"
        );
    }

    #[test]
    fn superseding_jump_requests_never_overlap_rotations() {
        let mut carousel = jump_carousel();
        carousel.advance(Direction::Next);
        carousel.tick(0.5);
        carousel.advance(Direction::Previous);
        assert_eq!(carousel.state().current_index(), 0);

        run_to_end(&mut carousel);
        let rotation = carousel.targets().scalar(TargetId::FocalModel, Property::RotationY);
        // Second spin starts wherever the first one was cut off.
        assert!(rotation > TAU && rotation < 2.0 * TAU, "rotation {rotation}");
        for target in [TargetId::PreviousPreview, TargetId::NextPreview, TargetId::FocalContainer] {
            assert_eq!(carousel.targets().scalar(target, Property::OffsetY), 0.0);
        }
    }

    #[test]
    fn missing_targets_do_not_block_the_commit() {
        let mut stage = Stage::mounted();
        stage.unmount(TargetId::PreviousPreview);
        stage.unmount(TargetId::NextPreview);
        stage.unmount(TargetId::TextContent);
        let mut carousel = Carousel::new(
            Arc::new(FlavorCatalog::standard()),
            AnimationDirector::from_config(&ChoreographyConfig::Morph(MorphConfig::default())),
            stage,
        );

        carousel.advance(Direction::Previous);
        run_to_end(&mut carousel);
        assert_eq!(carousel.current().key, FlavorKey::Watermelon);
    }

    #[test]
    fn unmount_mid_animation_stops_all_mutation() {
        let mut carousel = Carousel::new(
            Arc::new(FlavorCatalog::standard()),
            AnimationDirector::from_config(&ChoreographyConfig::Morph(MorphConfig::default())),
            SpyTargets {
                stage: Stage::mounted(),
                writes: 0,
            },
        );
        carousel.advance(Direction::Next);
        carousel.tick(0.125);
        assert!(carousel.targets().writes > 0);

        carousel.unmount();
        let writes = carousel.targets().writes;
        assert!(!carousel.wants_frame());

        assert!(!carousel.tick(1.0));
        carousel.advance(Direction::Next);
        carousel.tick(1.0);
        carousel.unmount();

        assert_eq!(carousel.targets().writes, writes);
        assert_eq!(carousel.state().current_index(), 0);
        assert!(!carousel.is_mounted());
    }

    #[test]
    fn scene_frame_reflects_layout_and_animated_values() {
        let mut carousel = morph_carousel();
        let frame = carousel.scene_frame(SceneLayout::Triptych);
        assert_eq!(frame.previous.map(|f| f.key), Some(FlavorKey::Watermelon));
        assert_eq!(frame.next.map(|f| f.key), Some(FlavorKey::Grape));
        assert_eq!(frame.backdrop, Rgb::new(0x71, 0x05, 0x23));
        assert_eq!(frame.text_opacity, 1.0);

        carousel.advance(Direction::Next);
        carousel.tick(0.25);
        let frame = carousel.scene_frame(SceneLayout::SingleCan);
        assert!(frame.previous.is_none() && frame.next.is_none());
        assert_eq!(frame.text_opacity, 0.0);
        assert!(frame.focal_rotation < 0.0);
        assert_ne!(frame.backdrop, frame.focal.color);
    }
}
