// Library crate: exposes testable modules for integration tests and the headless harness.
// GUI-specific modules (app, ui) remain in the binary crate.

pub mod experience;
pub mod fixtures;
pub mod harness;
pub mod i18n;
pub mod input;
pub mod lobby;
pub mod state;
pub mod xr;
