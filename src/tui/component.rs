use ratatui::layout::Rect;
use ratatui::Frame;

/// A reusable UI component.
///
/// Components receive their data as struct fields ("props"), may borrow
/// persistent state from `TuiState`, and render into a `Rect`. `render`
/// takes `&mut self` so a component can update layout caches or scroll
/// state during the render pass, matching Ratatui's `StatefulWidget`
/// pattern.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally emit a high-level event
    /// for the parent to act on.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
