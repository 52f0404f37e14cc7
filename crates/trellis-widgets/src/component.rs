use ratatui::{layout::Rect, Frame};

/// A widget that receives messages and renders into a given [`Rect`].
///
/// Messages flow both ways through the same enum. The parent forwards input
/// variants (key presses, mouse events, external values) to
/// [`update`](Component::update); the widget answers with an outward variant
/// (`Changed`, `Selected`, `Dismissed`, ...) when something the parent
/// should know about happened.
///
/// # Composition
///
/// ```rust,ignore
/// use trellis_widgets::{Component, slider::{self, Slider}};
///
/// enum AppMsg { Volume(slider::Message) }
///
/// fn update(app: &mut App, msg: AppMsg) {
///     match msg {
///         AppMsg::Volume(m) => {
///             if let Some(slider::Message::Changed(v)) = app.volume.update(m) {
///                 app.set_volume(v);
///             }
///         }
///     }
/// }
/// ```
pub trait Component {
    /// The widget's message type.
    type Message;

    /// Process a message, mutate state, and return an outward message, if
    /// any.
    fn update(&mut self, msg: Self::Message) -> Option<Self::Message>;

    /// Render into `area`. Implementations confine all drawing to it and
    /// may record the geometry they used for later hit testing.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this widget currently has keyboard focus. Parents use it to
    /// route key events.
    fn focused(&self) -> bool {
        false
    }
}
