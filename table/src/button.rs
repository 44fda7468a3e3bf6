//! Clickable spin button.

use tracing::debug;

use crate::geometry::{Point, Rect};
use crate::input::InputSnapshot;

pub const BUTTON_FONT_HEIGHT: f64 = 18.0;
pub const BUTTON_PADDING_X: f64 = 30.0;
pub const BUTTON_PADDING_Y: f64 = 15.0;

/// A press target that fires on a released-to-pressed edge, at most once per
/// cooldown window.
///
/// Any new press outside the window opens a new one, whether or not it lands
/// on the button. Holding the pointer down never fires again. Time is table
/// time: the sum of frame deltas.
#[derive(Clone, Debug)]
pub struct SpinButton {
    label: String,
    bounds: Option<Rect>,
    cooldown: f64,
    cooldown_until: f64,
    was_pressed: bool,
}

impl SpinButton {
    pub fn new(label: impl Into<String>, cooldown: f64) -> Self {
        Self {
            label: label.into(),
            bounds: None,
            cooldown,
            cooldown_until: 0.0,
            was_pressed: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bounds as of the last draw; `None` until the button has been drawn.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Size the button around a label of `label_width` whose baseline starts
    /// at `anchor`.
    pub fn place(&mut self, anchor: Point, label_width: f64) {
        self.bounds = Some(Rect::new(
            anchor.x,
            anchor.y - BUTTON_FONT_HEIGHT,
            label_width + 2.0 * BUTTON_PADDING_X,
            BUTTON_FONT_HEIGHT + 2.0 * BUTTON_PADDING_Y,
        ));
    }

    pub fn is_cooling(&self, now: f64) -> bool {
        now < self.cooldown_until
    }

    /// Record the press state of a frame the button did not get to sense.
    pub fn observe(&mut self, input: &InputSnapshot) {
        self.was_pressed = input.pressed;
    }

    /// Returns true when this frame's input activates the button.
    pub fn sense(&mut self, input: &InputSnapshot, now: f64) -> bool {
        let was_pressed = std::mem::replace(&mut self.was_pressed, input.pressed);
        if !input.pressed || was_pressed || self.is_cooling(now) {
            return false;
        }
        self.cooldown_until = now + self.cooldown;
        let fired = self
            .bounds
            .is_some_and(|bounds| bounds.contains(input.pointer));
        if fired {
            debug!(label = %self.label, "button pressed");
        }
        fired
    }

    /// Open a cooldown window without firing, e.g. for a press that was
    /// consumed elsewhere.
    pub fn suppress(&mut self, now: f64) {
        self.cooldown_until = self.cooldown_until.max(now + self.cooldown);
    }
}
