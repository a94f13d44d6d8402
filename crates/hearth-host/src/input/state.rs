use serde::Serialize;

/// One active touch in backing-surface pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

/// Pointer and touch state shared by the input handlers and the frame driver.
///
/// Touches keep insertion order; an identifier appears at most once.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in backing-surface pixels.
    pub pointer: (f64, f64),

    touches: Vec<TouchPoint>,
}

impl InputState {
    pub fn touches(&self) -> &[TouchPoint] {
        &self.touches
    }

    pub fn has_touches(&self) -> bool {
        !self.touches.is_empty()
    }

    /// Inserts the touch, or updates it in place if the identifier is known.
    pub fn upsert_touch(&mut self, touch: TouchPoint) {
        match self.touches.iter_mut().find(|t| t.id == touch.id) {
            Some(existing) => *existing = touch,
            None => self.touches.push(touch),
        }
    }

    /// Updates a known touch; unknown identifiers are ignored.
    pub fn move_touch(&mut self, touch: TouchPoint) -> bool {
        match self.touches.iter_mut().find(|t| t.id == touch.id) {
            Some(existing) => {
                *existing = touch;
                true
            }
            None => false,
        }
    }

    pub fn remove_touch(&mut self, id: u64) -> bool {
        let before = self.touches.len();
        self.touches.retain(|t| t.id != id);
        self.touches.len() != before
    }

    /// JSON array of `{ "id", "x", "y" }` objects, the payload the module parses.
    pub fn touches_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self.touches)?)
    }
}
