use glam::Vec2;

/// A high-level camera gesture, independent of the windowing system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Orbit around the target by a pointer delta in pixels.
    Rotate(Vec2),
    /// Slide the target in the view plane by a pointer delta in pixels.
    Pan(Vec2),
    /// Dolly towards (positive) or away from (negative) the target, in wheel steps.
    Zoom(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Raw pointer input, as forwarded by a host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),
    Button { button: PointerButton, pressed: bool },
    Wheel(f32),
    Shift(bool),
}

/// Turns a stream of pointer events into gestures.
///
/// Primary drag rotates, secondary drag (or shift + primary drag) pans,
/// wheel zooms.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last_pos: Option<Vec2>,
    primary: bool,
    secondary: bool,
    shift: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.primary || self.secondary
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event {
            PointerEvent::Button { button, pressed } => {
                match button {
                    PointerButton::Primary => self.primary = pressed,
                    PointerButton::Secondary => self.secondary = pressed,
                    PointerButton::Middle => {}
                }
                None
            }
            PointerEvent::Shift(held) => {
                self.shift = held;
                None
            }
            PointerEvent::Moved(pos) => {
                let delta = self.last_pos.map(|last| pos - last);
                self.last_pos = Some(pos);
                let delta = delta.filter(|d| *d != Vec2::ZERO)?;

                if self.secondary || (self.primary && self.shift) {
                    Some(Gesture::Pan(delta))
                } else if self.primary {
                    Some(Gesture::Rotate(delta))
                } else {
                    None
                }
            }
            PointerEvent::Wheel(steps) if steps != 0.0 => Some(Gesture::Zoom(steps)),
            PointerEvent::Wheel(_) => None,
        }
    }
}
