//! Persisted render-surface settings for blueview.
//!
//! One flat record controls surface sizing: `{minHeight, maxHeight,
//! defaultHeight}`, invariant `0 < min <= default <= max`. The record is
//! loaded once at startup, merged field-by-field over hard defaults, and
//! written back wholesale on every mutation.
//!
//! [`SettingsStore`] owns the in-memory record and enforces the invariant on
//! every single-field update; [`SettingsBackend`] abstracts where the JSON
//! record lives ([`FileBackend`] on disk, [`MemoryBackend`] for headless
//! hosts and tests).

mod backend;
mod settings;
mod store;

pub use backend::{FileBackend, MemoryBackend, SettingsBackend};
pub use settings::{DEFAULT_HEIGHT, DEFAULT_MAX_HEIGHT, DEFAULT_MIN_HEIGHT, RenderSettings};
pub use store::{SettingsError, SettingsStore};
