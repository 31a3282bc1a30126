//! The settings record and its merge-over-defaults rules.

use serde::{Deserialize, Serialize};

/// Hard default for the smallest allowed surface height, in pixels.
pub const DEFAULT_MIN_HEIGHT: u32 = 200;
/// Hard default for the largest allowed surface height, in pixels.
pub const DEFAULT_MAX_HEIGHT: u32 = 800;
/// Hard default for the initial surface height, in pixels.
pub const DEFAULT_HEIGHT: u32 = 400;

/// Surface-sizing settings.
///
/// Invariant: `0 < min_height <= default_height <= max_height`. Every value
/// produced by this crate upholds it; callers mutate only through
/// [`SettingsStore`](crate::SettingsStore), which rejects violating updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    /// Smallest height a drag may set.
    pub min_height: u32,
    /// Largest height a drag may set.
    pub max_height: u32,
    /// Height given to every newly created surface.
    pub default_height: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            min_height: DEFAULT_MIN_HEIGHT,
            max_height: DEFAULT_MAX_HEIGHT,
            default_height: DEFAULT_HEIGHT,
        }
    }
}

impl RenderSettings {
    /// Whether the sizing invariant holds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_height > 0
            && self.min_height <= self.default_height
            && self.default_height <= self.max_height
    }

    /// Whether `height` falls inside the allowed band.
    #[must_use]
    pub fn contains(&self, height: u32) -> bool {
        (self.min_height..=self.max_height).contains(&height)
    }

    /// Merge a persisted record over the defaults and repair invalid fields.
    pub(crate) fn from_doc(doc: SettingsDoc) -> Self {
        Self {
            min_height: doc.min_height.unwrap_or(DEFAULT_MIN_HEIGHT),
            max_height: doc.max_height.unwrap_or(DEFAULT_MAX_HEIGHT),
            default_height: doc.default_height.unwrap_or(DEFAULT_HEIGHT),
        }
        .sanitized()
    }

    /// Coerce invalid fields back to defaults, clamping the default height
    /// into the band when a custom band excludes it.
    fn sanitized(mut self) -> Self {
        if self.min_height == 0 {
            self.min_height = DEFAULT_MIN_HEIGHT;
        }
        if self.min_height > self.max_height {
            self.min_height = DEFAULT_MIN_HEIGHT;
            self.max_height = DEFAULT_MAX_HEIGHT;
        }
        self.default_height = self.default_height.clamp(self.min_height, self.max_height);
        self
    }
}

/// Raw persisted record: every field optional so missing keys merge over
/// defaults rather than failing the whole load.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SettingsDoc {
    pub min_height: Option<u32>,
    pub max_height: Option<u32>,
    pub default_height: Option<u32>,
}
