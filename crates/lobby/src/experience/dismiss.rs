//! Dismiss trigger: a keyboard key or a controller button press

use std::collections::HashMap;

use crate::input::InputEvent;
use crate::state::settings::InputSettings;

/// Turns input events into "tear the experience down now".
///
/// Only one binding exists at a time: arming an armed listener keeps the
/// single binding. Button state is tracked even while disarmed so that a
/// button already held when the listener is armed does not fire.
pub struct DismissListener {
    key: String,
    button: usize,
    armed: bool,
    /// Last seen state of the dismiss button, per controller
    button_down: HashMap<String, bool>,
}

impl DismissListener {
    pub fn new(key: impl Into<String>, button: usize) -> Self {
        Self {
            key: key.into(),
            button,
            armed: false,
            button_down: HashMap::new(),
        }
    }

    pub fn from_settings(settings: &InputSettings) -> Self {
        Self::new(settings.dismiss_key.clone(), settings.dismiss_button)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn button(&self) -> usize {
        self.button
    }

    pub fn arm(&mut self) {
        if self.armed {
            tracing::debug!("Dismiss listener already armed");
        }
        self.armed = true;
        tracing::debug!("Dismiss listener armed (key {}, button {})", self.key, self.button);
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feed one input event. Returns true when teardown should run.
    pub fn observe(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyDown { key } => self.armed && *key == self.key,
            InputEvent::Button {
                controller,
                index,
                pressed,
            } if *index == self.button => {
                let was_down = self
                    .button_down
                    .insert(controller.clone(), *pressed)
                    .unwrap_or(false);
                self.armed && *pressed && !was_down
            }
            InputEvent::Button { .. } => false,
        }
    }
}
