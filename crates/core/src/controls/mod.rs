use serde::Serialize;

use crate::{carousel::Carousel, scene::SceneTargets, Direction};

/// Arrow glyph. The right arrow is the left arrow mirrored horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArrowIcon {
    pub mirrored: bool,
}

/// One navigation button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavControl {
    pub direction: Direction,
    /// Screen-reader text; the icon alone carries no meaning.
    pub label: String,
    pub icon: ArrowIcon,
}

impl NavControl {
    pub fn new(direction: Direction, label: impl Into<String>) -> Self {
        Self {
            direction,
            label: label.into(),
            icon: ArrowIcon {
                mirrored: direction == Direction::Next,
            },
        }
    }

    pub fn view(&self) -> ControlView<'_> {
        ControlView {
            icon: self.icon,
            sr_only_label: &self.label,
        }
    }
}

/// What a control renders: the decorative icon plus a visually hidden label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlView<'a> {
    pub icon: ArrowIcon,
    pub sr_only_label: &'a str,
}

/// Previous/next pair. Activation only forwards the direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationControls {
    pub previous: NavControl,
    pub next: NavControl,
}

impl Default for NavigationControls {
    fn default() -> Self {
        Self {
            previous: NavControl::new(Direction::Previous, "Previous"),
            next: NavControl::new(Direction::Next, "Next"),
        }
    }
}

impl NavigationControls {
    pub fn control(&self, direction: Direction) -> &NavControl {
        match direction {
            Direction::Previous => &self.previous,
            Direction::Next => &self.next,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &NavControl> {
        [&self.previous, &self.next].into_iter()
    }

    pub fn activate<T: SceneTargets>(&self, direction: Direction, carousel: &mut Carousel<T>) {
        let control = self.control(direction);
        tracing::debug!(label = %control.label, "navigation control activated");
        carousel.advance(control.direction);
    }
}
