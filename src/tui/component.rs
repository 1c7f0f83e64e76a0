use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// A piece of the screen that knows how to draw itself.
///
/// Props live in struct fields and are rebuilt every frame from `App` and
/// `TuiState`. `render` takes `&mut self` so stateful components (the grid)
/// can record what they measured or saw during the pass.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that interprets raw terminal input.
pub trait EventHandler {
    /// What the component reports to its parent.
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
