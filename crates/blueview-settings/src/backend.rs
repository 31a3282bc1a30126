//! Settings persistence backends.
//!
//! A [`SettingsBackend`] holds one serialized settings record. Reads happen
//! once at startup; writes replace the record wholesale and are synchronous,
//! so two writes can never overlap.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

/// Storage for the serialized settings record.
pub trait SettingsBackend {
    /// Read the stored record, or `None` if nothing has been persisted yet.
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the stored record.
    fn write(&self, record: &str) -> io::Result<()>;
}

/// File-backed [`SettingsBackend`] storing the record at a fixed path.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsBackend for FileBackend {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, record: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, record)
    }
}

/// In-memory [`SettingsBackend`].
///
/// Clones share one slot, so a caller can keep a handle for inspection after
/// handing a clone to the [`SettingsStore`](crate::SettingsStore).
#[derive(Clone, Default)]
pub struct MemoryBackend {
    slot: Rc<RefCell<Option<String>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend pre-populated with a persisted record.
    #[must_use]
    pub fn with_record(record: &str) -> Self {
        let backend = Self::default();
        *backend.slot.borrow_mut() = Some(record.to_owned());
        backend
    }

    /// The currently stored record.
    #[must_use]
    pub fn record(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// How many writes have been issued.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl SettingsBackend for MemoryBackend {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&self, record: &str) -> io::Result<()> {
        *self.slot.borrow_mut() = Some(record.to_owned());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
