use crate::defaults;
use crate::error::BoardError;
use crate::task::{NewTask, Priority, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Name of the column that counts as finished work.
pub const DONE_COLUMN: &str = "Done";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Columns and tasks of one board.
///
/// Every task sits in one of `columns`, and ids are unique. Tasks that share
/// a column keep their relative order, which is also the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardDocument")]
pub struct KanbanBoard {
    columns: Vec<String>,
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct BoardDocument {
    columns: Vec<String>,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TryFrom<BoardDocument> for KanbanBoard {
    type Error = BoardError;

    fn try_from(doc: BoardDocument) -> Result<Self, Self::Error> {
        KanbanBoard::from_parts(doc.columns, doc.tasks)
    }
}

impl Default for KanbanBoard {
    fn default() -> Self {
        Self {
            columns: defaults::columns(),
            tasks: defaults::tasks(),
        }
    }
}

impl KanbanBoard {
    pub fn from_parts(columns: Vec<String>, tasks: Vec<Task>) -> Result<Self, BoardError> {
        if columns.is_empty() {
            return Err(BoardError::NoColumns);
        }
        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.as_str()) {
                return Err(BoardError::DuplicateColumn(column.clone()));
            }
        }
        let mut ids = HashSet::new();
        for task in &tasks {
            if !names.contains(task.column.as_str()) {
                return Err(BoardError::OrphanTask {
                    id: task.id,
                    column: task.column.clone(),
                });
            }
            if !ids.insert(task.id) {
                return Err(BoardError::DuplicateTaskId(task.id));
            }
        }
        Ok(Self { columns, tasks })
    }

    #[cfg(test)]
    pub(crate) fn empty(columns: Vec<String>) -> Result<Self, BoardError> {
        Self::from_parts(columns, Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn get_tasks_by_column(&self, column: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.column == column).collect()
    }

    pub fn next_id(&self) -> Result<u32, BoardError> {
        match self.tasks.iter().map(|t| t.id).max() {
            Some(max) => max.checked_add(1).ok_or(BoardError::IdsExhausted),
            None => Ok(1),
        }
    }

    /// Appends a new task to the end of its column and returns it.
    pub fn add_task(&mut self, new_task: NewTask, created: NaiveDate) -> Result<&Task, BoardError> {
        let title = new_task.title.trim();
        if title.is_empty() {
            return Err(BoardError::EmptyTitle);
        }
        if self.column_index(&new_task.column).is_none() {
            return Err(BoardError::UnknownColumn(new_task.column));
        }
        let task = Task {
            id: self.next_id()?,
            title: title.to_string(),
            description: new_task.description.trim().to_string(),
            column: new_task.column,
            priority: new_task.priority,
            created,
        };
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Column a task would land in, or `None` when the move is not allowed.
    pub fn move_target(&self, id: u32, direction: Direction) -> Option<&str> {
        let task = self.task(id)?;
        let current = self.column_index(&task.column)?;
        let target = match direction {
            Direction::Left => current.checked_sub(1)?,
            Direction::Right => current + 1,
        };
        self.columns.get(target).map(String::as_str)
    }

    pub fn can_move(&self, id: u32, direction: Direction) -> bool {
        self.move_target(id, direction).is_some()
    }

    /// Moves a task one column over; it lands at the end of that column.
    /// Returns `false` for unknown ids and moves past either edge.
    pub fn move_task(&mut self, id: u32, direction: Direction) -> bool {
        let Some(target) = self.move_target(id, direction).map(str::to_string) else {
            return false;
        };
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let mut task = self.tasks.remove(pos);
        task.column = target;
        self.tasks.push(task);
        true
    }

    pub fn delete_task(&mut self, id: u32) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn column_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.as_str(), self.tasks.iter().filter(|t| &t.column == c).count()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    /// `Done` when the board has one, otherwise the last column.
    pub fn done_column(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.as_str() == DONE_COLUMN)
            .or_else(|| self.columns.last())
            .map_or(DONE_COLUMN, String::as_str)
    }

    pub fn completed(&self) -> usize {
        let done = self.done_column();
        self.tasks.iter().filter(|t| t.column == done).count()
    }

    /// Share of tasks in the done column; `0.0` for an empty board.
    pub fn completion_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.completed() as f64 / total as f64,
        }
    }

    pub fn priority_counts(&self) -> BTreeMap<Option<Priority>, usize> {
        let mut counts = BTreeMap::new();
        for task in &self.tasks {
            *counts.entry(task.priority).or_insert(0) += 1;
        }
        counts
    }
}
