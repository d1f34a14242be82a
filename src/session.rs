use crate::error::{SessionError, StoreError};
use crate::kanban_board::{Direction, KanbanBoard};
use crate::storage::BoardStore;
use crate::task::{NewTask, Task};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

/// One interactive run against one stored board.
///
/// Every mutating call changes the board in memory first and then saves the
/// whole board. Calls that change nothing do not save.
#[derive(Debug)]
pub struct Session<S: BoardStore> {
    board: KanbanBoard,
    store: S,
}

impl<S: BoardStore> Session<S> {
    pub fn open(store: S) -> Result<Self, StoreError> {
        let board = store.load()?;
        info!(
            columns = board.columns().len(),
            tasks = board.total(),
            "session opened"
        );
        Ok(Self { board, store })
    }

    pub fn board(&self) -> &KanbanBoard {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Adds a task dated today and returns its id.
    pub fn add_task(&mut self, new_task: NewTask) -> Result<u32, SessionError> {
        self.add_task_on(new_task, Local::now().date_naive())
    }

    pub fn add_task_on(&mut self, new_task: NewTask, created: NaiveDate) -> Result<u32, SessionError> {
        let task = self.board.add_task(new_task, created)?;
        let id = task.id;
        info!(id, column = %task.column, "task added");
        self.persist()?;
        Ok(id)
    }

    /// Returns `false` when nothing moved.
    pub fn move_task(&mut self, id: u32, direction: Direction) -> Result<bool, SessionError> {
        if !self.board.move_task(id, direction) {
            return Ok(false);
        }
        info!(id, ?direction, "task moved");
        self.persist()?;
        Ok(true)
    }

    pub fn delete_task(&mut self, id: u32) -> Result<Option<Task>, SessionError> {
        let Some(task) = self.board.delete_task(id) else {
            return Ok(None);
        };
        info!(id, "task deleted");
        self.persist()?;
        Ok(Some(task))
    }

    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.board.reset();
        info!("board reset to starter tasks");
        self.persist()
    }

    fn persist(&mut self) -> Result<(), SessionError> {
        self.store.save(&self.board).map_err(|err| {
            warn!(error = %err, "board change not saved");
            SessionError::Persist(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::storage::{MemoryStore, ReadOnlyStore};
    use rstest::{fixture, rstest};

    #[fixture]
    fn session() -> Session<MemoryStore> {
        Session::open(MemoryStore::new()).unwrap()
    }

    #[rstest]
    fn add_persists_and_reloads(mut session: Session<MemoryStore>) {
        let id = session.add_task(NewTask::new("Call roofer", "To Do")).unwrap();
        assert_eq!(id, 7);
        assert_eq!(session.store().saves(), 1);

        let reloaded = session.store().load().unwrap();
        let task = reloaded.task(7).unwrap();
        assert_eq!(task.title, "Call roofer");
        assert_eq!(task.column, "To Do");
        assert_eq!(task.created, Local::now().date_naive());
    }

    #[rstest]
    fn rejected_add_does_not_save(mut session: Session<MemoryStore>) {
        let err = session.add_task(NewTask::new("  ", "Backlog")).unwrap_err();
        assert!(matches!(err, SessionError::Board(BoardError::EmptyTitle)));
        assert_eq!(session.store().saves(), 0);
        assert_eq!(session.board(), &KanbanBoard::default());
    }

    #[rstest]
    fn noop_moves_and_deletes_do_not_save(mut session: Session<MemoryStore>) {
        assert!(!session.move_task(1, Direction::Left).unwrap());
        assert!(!session.move_task(99, Direction::Right).unwrap());
        assert!(session.delete_task(99).unwrap().is_none());
        assert_eq!(session.store().saves(), 0);
    }

    #[rstest]
    fn delete_is_permanent_after_reload(mut session: Session<MemoryStore>) {
        let removed = session.delete_task(2).unwrap().unwrap();
        assert_eq!(removed.title, "AI Agent Development");

        let reloaded = Session::open(session.store().clone()).unwrap();
        assert!(reloaded.board().task(2).is_none());
        assert_eq!(reloaded.board().total(), 5);
    }

    #[rstest]
    fn reset_discards_changes(mut session: Session<MemoryStore>) {
        session.move_task(1, Direction::Right).unwrap();
        session.delete_task(3).unwrap();
        session.reset().unwrap();

        assert_eq!(session.board(), &KanbanBoard::default());
        assert_eq!(session.store().load().unwrap(), KanbanBoard::default());
    }

    #[test]
    fn failed_save_keeps_change_in_memory() {
        let mut session = Session::open(ReadOnlyStore).unwrap();
        let err = session.move_task(1, Direction::Right).unwrap_err();
        assert!(matches!(err, SessionError::Persist(StoreError::Write { .. })));
        assert_eq!(session.board().task(1).unwrap().column, "To Do");
    }
}
