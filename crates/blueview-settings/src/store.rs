//! The settings store: invariant-checked mutation plus persistence.

use crate::backend::SettingsBackend;
use crate::settings::{RenderSettings, SettingsDoc};

/// Error from persisting the settings record.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The backend rejected the write.
    #[error("settings write failed: {0}")]
    Io(#[from] std::io::Error),
    /// The record could not be serialized.
    #[error("settings serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owns the in-memory settings record for the session.
///
/// Loaded once at startup; mutated only through the checked single-field
/// setters, which reject any update that would break the sizing invariant.
/// Every mutation is expected to be followed by a persist; the commit helpers
/// do both.
pub struct SettingsStore {
    backend: Box<dyn SettingsBackend>,
    current: RenderSettings,
}

impl SettingsStore {
    /// Load the persisted record, merging it field-by-field over defaults.
    ///
    /// A missing or unreadable record falls back to defaults; an unparseable
    /// one is logged and replaced with defaults on the next write.
    #[must_use]
    pub fn load(backend: Box<dyn SettingsBackend>) -> Self {
        let current = match backend.read() {
            Ok(Some(raw)) => match serde_json::from_str::<SettingsDoc>(&raw) {
                Ok(doc) => RenderSettings::from_doc(doc),
                Err(e) => {
                    tracing::warn!("unparseable settings record, using defaults: {e}");
                    RenderSettings::default()
                }
            },
            Ok(None) => RenderSettings::default(),
            Err(e) => {
                tracing::warn!("settings read failed, using defaults: {e}");
                RenderSettings::default()
            }
        };
        Self { backend, current }
    }

    /// The current settings record.
    #[must_use]
    pub fn settings(&self) -> RenderSettings {
        self.current
    }

    /// Update the minimum height. Returns `false` (value unchanged) if the
    /// update would break the sizing invariant.
    pub fn set_min_height(&mut self, px: u32) -> bool {
        self.apply(RenderSettings {
            min_height: px,
            ..self.current
        })
    }

    /// Update the maximum height. Returns `false` (value unchanged) if the
    /// update would break the sizing invariant.
    pub fn set_max_height(&mut self, px: u32) -> bool {
        self.apply(RenderSettings {
            max_height: px,
            ..self.current
        })
    }

    /// Update the default height. Returns `false` (value unchanged) if the
    /// update would break the sizing invariant.
    pub fn set_default_height(&mut self, px: u32) -> bool {
        self.apply(RenderSettings {
            default_height: px,
            ..self.current
        })
    }

    fn apply(&mut self, candidate: RenderSettings) -> bool {
        if !candidate.is_valid() {
            return false;
        }
        self.current = candidate;
        true
    }

    /// Serialize the current record and write it wholesale to the backend.
    pub fn persist(&mut self) -> Result<(), SettingsError> {
        let record = serde_json::to_string(&self.current)?;
        self.backend.write(&record)?;
        Ok(())
    }

    /// Commit a new default height: checked set plus persist.
    ///
    /// Returns `false` if the invariant check rejected the height. A persist
    /// failure is logged and the in-memory value retained, so the current
    /// session keeps behaving correctly.
    pub fn commit_default_height(&mut self, px: u32) -> bool {
        if !self.set_default_height(px) {
            return false;
        }
        if let Err(e) = self.persist() {
            tracing::warn!("keeping in-memory settings after failed write: {e}");
        }
        true
    }
}
