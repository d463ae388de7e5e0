//! Input event channel.
//!
//! Key presses and controller button transitions travel as `InputEvent`s over
//! an unbounded mpsc channel. Each motion controller gets its own polling task
//! that samples the gamepad at a fixed period and publishes only the buttons
//! whose state changed since the previous tick.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::xr::{MotionController, XrHelper};

/// Default gamepad polling period
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Keyboard key-down, `key` uses DOM-style names ("Delete", "Escape", ...)
    KeyDown { key: String },
    /// Button `index` on `controller` changed to `pressed`
    Button {
        controller: String,
        index: usize,
        pressed: bool,
    },
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }
}

pub type InputSender = mpsc::UnboundedSender<InputEvent>;
pub type InputReceiver = mpsc::UnboundedReceiver<InputEvent>;

pub fn input_channel() -> (InputSender, InputReceiver) {
    mpsc::unbounded_channel()
}

/// Per-controller button state. Overwritten on every tick, never appended to.
pub struct ButtonPoller {
    controller: String,
    states: Vec<bool>,
}

impl ButtonPoller {
    pub fn new(controller: impl Into<String>, button_count: usize) -> Self {
        Self {
            controller: controller.into(),
            states: vec![false; button_count],
        }
    }

    pub fn states(&self) -> &[bool] {
        &self.states
    }

    /// Store a fresh sample and return one event per changed button
    pub fn tick(&mut self, sample: &[bool]) -> Vec<InputEvent> {
        if sample.len() > self.states.len() {
            self.states.resize(sample.len(), false);
        }
        let mut events = Vec::new();
        for (index, &pressed) in sample.iter().enumerate() {
            if self.states[index] != pressed {
                self.states[index] = pressed;
                events.push(InputEvent::Button {
                    controller: self.controller.clone(),
                    index,
                    pressed,
                });
            }
        }
        events
    }
}

/// Start polling a motion controller's buttons.
///
/// Returns None (and logs a warning) when the gamepad exposes no buttons.
/// The task ends when either the device or the event receiver goes away.
/// Must be called inside a tokio runtime.
pub fn track_controller(
    motion_controller: &MotionController,
    period: Duration,
    tx: InputSender,
) -> Option<JoinHandle<()>> {
    let button_count = motion_controller.button_count();
    if button_count == 0 {
        tracing::warn!("Gamepad or buttons not available on {}", motion_controller.id);
        return None;
    }

    let mut device = motion_controller.subscribe();
    let mut poller = ButtonPoller::new(motion_controller.id.clone(), button_count);
    tracing::info!(
        "Tracking {button_count} buttons on {} every {}ms",
        motion_controller.id,
        period.as_millis()
    );

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if device.has_changed().is_err() {
                tracing::debug!("Gamepad closed, stopping button polling");
                break;
            }
            let sample = device.borrow_and_update().clone();
            for event in poller.tick(&sample) {
                if tx.send(event).is_err() {
                    return;
                }
            }
        }
    }))
}

/// Polling tasks by motion controller id, at most one per controller
#[derive(Default)]
pub struct ControllerTracker {
    pollers: HashMap<String, JoinHandle<()>>,
}

impl ControllerTracker {
    /// Start polling every motion controller that has no live task yet.
    /// Returns how many tasks were started. Must be called inside a tokio runtime.
    pub fn track_all(&mut self, xr: &XrHelper, period: Duration, tx: &InputSender) -> usize {
        self.pollers.retain(|_, handle| !handle.is_finished());
        let mut started = 0;
        for mc in xr.controllers().iter().filter_map(|c| c.motion_controller.as_ref()) {
            if self.pollers.contains_key(&mc.id) {
                continue;
            }
            if let Some(handle) = track_controller(mc, period, tx.clone()) {
                self.pollers.insert(mc.id.clone(), handle);
                started += 1;
            }
        }
        started
    }

    /// Abort every polling task
    pub fn stop_all(&mut self) {
        for (id, handle) in self.pollers.drain() {
            tracing::debug!("Stopping button polling on {id}");
            handle.abort();
        }
    }

    pub fn tracked(&self) -> usize {
        self.pollers.len()
    }
}

impl Drop for ControllerTracker {
    fn drop(&mut self) {
        self.stop_all();
    }
}
