use crate::error::StoreError;
use crate::kanban_board::KanbanBoard;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_DATA_FILE: &str = "kanban_data.json";

/// Where a board is loaded from and written back to.
pub trait BoardStore {
    /// Reads the stored board, or the starter board when nothing is stored.
    fn load(&self) -> Result<KanbanBoard, StoreError>;

    /// Replaces the stored board with `board`.
    fn save(&mut self, board: &KanbanBoard) -> Result<(), StoreError>;
}

/// Pretty-printed JSON document on local disk, rewritten whole on each save.
///
/// There is no locking: two sessions on the same file overwrite each other,
/// the last save wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the starter board if the file does not exist yet.
    /// Returns whether a file was created.
    pub fn init(&mut self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.save(&KanbanBoard::default())?;
        Ok(true)
    }
}

impl BoardStore for JsonFileStore {
    fn load(&self) -> Result<KanbanBoard, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no board file, using starter board");
                return Ok(KanbanBoard::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let board: KanbanBoard =
            serde_json::from_str(&data).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), tasks = board.total(), "board loaded");
        Ok(board)
    }

    fn save(&mut self, board: &KanbanBoard) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(board).map_err(StoreError::Encode)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), tasks = board.total(), "board saved");
        Ok(())
    }
}

/// Keeps the last saved board in memory.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<KanbanBoard>,
    saves: usize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

#[cfg(test)]
impl BoardStore for MemoryStore {
    fn load(&self) -> Result<KanbanBoard, StoreError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, board: &KanbanBoard) -> Result<(), StoreError> {
        self.saved = Some(board.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Loads the starter board and refuses every save.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyStore;

#[cfg(test)]
impl BoardStore for ReadOnlyStore {
    fn load(&self) -> Result<KanbanBoard, StoreError> {
        Ok(KanbanBoard::default())
    }

    fn save(&mut self, _board: &KanbanBoard) -> Result<(), StoreError> {
        Err(StoreError::Write {
            path: PathBuf::from(DEFAULT_DATA_FILE),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}
