use crate::{content::SliceContent, scene::SceneFrame};

/// Draws the 3D views and section chrome for one frame. Lighting, camera and
/// asset loading live behind this trait.
pub trait ScenePresenter {
    fn present(&mut self, frame: &SceneFrame<'_>, content: &SliceContent);
}

/// Fans each frame out to every registered presenter.
#[derive(Default)]
pub struct RenderGraph {
    presenters: Vec<Box<dyn ScenePresenter>>,
    frames_drawn: u64,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_presenter(&mut self, presenter: Box<dyn ScenePresenter>) {
        self.presenters.push(presenter);
    }

    pub fn presenter_count(&self) -> usize {
        self.presenters.len()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn draw(&mut self, frame: &SceneFrame<'_>, content: &SliceContent) {
        for presenter in &mut self.presenters {
            presenter.present(frame, content);
        }
        self.frames_drawn += 1;
    }
}

impl std::fmt::Debug for RenderGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderGraph")
            .field("presenters", &self.presenters.len())
            .field("frames_drawn", &self.frames_drawn)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::{AnimationDirector, Carousel, Direction, FlavorCatalog, FlavorKey, SceneLayout};

    #[derive(Default)]
    struct Recorder {
        seen: Rc<RefCell<Vec<(FlavorKey, Option<FlavorKey>, Option<FlavorKey>)>>>,
    }

    impl ScenePresenter for Recorder {
        fn present(&mut self, frame: &SceneFrame<'_>, _content: &SliceContent) {
            self.seen.borrow_mut().push((
                frame.focal.key,
                frame.previous.map(|f| f.key),
                frame.next.map(|f| f.key),
            ));
        }
    }

    #[test]
    fn forwards_frames_to_every_presenter() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut graph = RenderGraph::new();
        graph.register_presenter(Box::new(Recorder { seen: seen.clone() }));
        graph.register_presenter(Box::new(Recorder { seen: seen.clone() }));

        let mut carousel =
            Carousel::with_stage(Arc::new(FlavorCatalog::standard()), AnimationDirector::default());
        let content = SliceContent::default();
        graph.draw(&carousel.scene_frame(SceneLayout::Triptych), &content);
        carousel.advance(Direction::Next);
        graph.draw(&carousel.scene_frame(SceneLayout::SingleCan), &content);

        assert_eq!(graph.presenter_count(), 2);
        assert_eq!(graph.frames_drawn(), 2);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(
            seen[0],
            (FlavorKey::BlackCherry, Some(FlavorKey::Watermelon), Some(FlavorKey::Grape))
        );
        assert_eq!(seen[3], (FlavorKey::Grape, None, None));
    }
}
