//! Kanban board kept in a JSON file, with a terminal UI and a small CLI.
//!
//! [`kanban_board::KanbanBoard`] holds the columns and tasks and knows the
//! mutation rules. [`session::Session`] pairs a board with a
//! [`storage::BoardStore`] and saves after every change. `app` and `ui`
//! drive the terminal board; `cli` runs one-shot subcommands.

pub mod app;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod kanban_board;
pub mod logging;
pub mod session;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{BoardError, SessionError, StoreError};
pub use kanban_board::{Direction, KanbanBoard};
pub use session::Session;
pub use storage::{BoardStore, JsonFileStore};
pub use task::{NewTask, Priority, Task};
