//! Keyboard forwarding

use eframe::egui;

use crate::input::{InputEvent, InputSender};

/// Publish every fresh key-down of this frame on the input channel
pub fn forward_keys(ctx: &egui::Context, tx: &InputSender) {
    // Don't forward keys when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let keys: Vec<egui::Key> = ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|e| match e {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    ..
                } => Some(*key),
                _ => None,
            })
            .collect()
    });

    for key in keys {
        if tx.send(InputEvent::key_down(key.name())).is_err() {
            tracing::warn!("Input channel closed");
            return;
        }
    }
}
