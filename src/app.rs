use crate::error::SessionError;
use crate::kanban_board::{Direction, KanbanBoard};
use crate::session::Session;
use crate::storage::BoardStore;
use crate::task::{NewTask, Priority, Task};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
    Column,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Priority,
            FormField::Priority => FormField::Column,
            FormField::Column => FormField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Column,
            FormField::Description => FormField::Title,
            FormField::Priority => FormField::Description,
            FormField::Column => FormField::Priority,
        }
    }
}

/// New-task form as the user is filling it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub column: usize,
    pub field: FormField,
}

impl TaskForm {
    fn new(column: usize) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Some(Priority::Medium),
            column,
            field: FormField::Title,
        }
    }

    fn to_new_task(&self, board: &KanbanBoard) -> NewTask {
        let column = board.columns().get(self.column).cloned().unwrap_or_default();
        NewTask::new(self.title.clone(), column)
            .with_description(self.description.clone())
            .with_priority(self.priority)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding(TaskForm),
    ConfirmReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// Selection, input mode and the last status line. The board itself lives
/// in the session.
#[derive(Debug)]
pub struct App {
    pub selected_column: usize,
    pub selected_task: usize,
    pub input_mode: InputMode,
    pub status: Option<Status>,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            selected_column: 0,
            selected_task: 0,
            input_mode: InputMode::Normal,
            status: None,
            should_quit: false,
        }
    }

    pub fn selected<'a>(&self, board: &'a KanbanBoard) -> Option<&'a Task> {
        let column = board.columns().get(self.selected_column)?;
        board
            .get_tasks_by_column(column)
            .get(self.selected_task)
            .copied()
    }

    pub fn handle_key<S: BoardStore>(&mut self, key: KeyEvent, session: &mut Session<S>) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match std::mem::replace(&mut self.input_mode, InputMode::Normal) {
            InputMode::Normal => self.handle_normal(key, session),
            InputMode::Adding(form) => self.handle_form(key, form, session),
            InputMode::ConfirmReset => {
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    let result = session.reset();
                    self.report(result, "Board reset to starter tasks".to_string());
                    self.selected_column = 0;
                    self.selected_task = 0;
                } else {
                    self.status = Some(Status::Info("Reset cancelled".to_string()));
                }
            }
        }
        self.clamp_selection(session.board());
    }

    fn handle_normal<S: BoardStore>(&mut self, key: KeyEvent, session: &mut Session<S>) {
        // A status line lasts until the next key.
        self.status = None;
        let columns = session.board().columns().len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.selected_task = 0;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_column + 1 < columns {
                    self.selected_column += 1;
                    self.selected_task = 0;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => self.selected_task += 1,
            KeyCode::Char('<') | KeyCode::Char('H') => self.move_selected(Direction::Left, session),
            KeyCode::Char('>') | KeyCode::Char('L') => self.move_selected(Direction::Right, session),
            KeyCode::Char('a') => {
                self.input_mode = InputMode::Adding(TaskForm::new(self.selected_column));
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected(session.board()).map(|t| t.id) {
                    let result = session.delete_task(id);
                    self.report(result, format!("Deleted task #{id}"));
                }
            }
            KeyCode::Char('R') => {
                self.status = Some(Status::Info(
                    "Reset board to starter tasks? This cannot be undone (y/n)".to_string(),
                ));
                self.input_mode = InputMode::ConfirmReset;
            }
            _ => {}
        }
    }

    fn move_selected<S: BoardStore>(&mut self, direction: Direction, session: &mut Session<S>) {
        let Some(id) = self.selected(session.board()).map(|t| t.id) else {
            return;
        };
        if !session.board().can_move(id, direction) {
            return;
        }
        let result = session.move_task(id, direction);
        let moved = matches!(result, Ok(true) | Err(SessionError::Persist(_)));
        self.report(result, format!("Moved task #{id}"));
        if moved {
            // Follow the task to the end of its new column.
            match direction {
                Direction::Left => self.selected_column -= 1,
                Direction::Right => self.selected_column += 1,
            }
            let board = session.board();
            self.selected_task = board
                .columns()
                .get(self.selected_column)
                .map_or(0, |c| board.get_tasks_by_column(c).len().saturating_sub(1));
        }
    }

    fn handle_form<S: BoardStore>(&mut self, key: KeyEvent, mut form: TaskForm, session: &mut Session<S>) {
        let columns = session.board().columns().len();
        match key.code {
            KeyCode::Esc => {
                self.status = Some(Status::Info("Add cancelled".to_string()));
                return;
            }
            KeyCode::Enter => {
                let new_task = form.to_new_task(session.board());
                match session.add_task(new_task) {
                    Err(SessionError::Board(err)) => {
                        self.status = Some(Status::Error(err.to_string()));
                    }
                    result => {
                        self.report(result, "Task added!".to_string());
                        self.selected_column = form.column;
                        self.selected_task = session
                            .board()
                            .columns()
                            .get(form.column)
                            .map_or(0, |c| session.board().get_tasks_by_column(c).len().saturating_sub(1));
                        return;
                    }
                }
            }
            KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
            KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
            KeyCode::Left | KeyCode::Right if form.field == FormField::Priority => {
                form.priority = Priority::cycle(form.priority);
            }
            KeyCode::Left if form.field == FormField::Column => {
                form.column = (form.column + columns - 1) % columns;
            }
            KeyCode::Right if form.field == FormField::Column => {
                form.column = (form.column + 1) % columns;
            }
            KeyCode::Backspace => match form.field {
                FormField::Title => {
                    form.title.pop();
                }
                FormField::Description => {
                    form.description.pop();
                }
                _ => {}
            },
            KeyCode::Char(c) => match form.field {
                FormField::Title => form.title.push(c),
                FormField::Description => form.description.push(c),
                _ => {}
            },
            _ => {}
        }
        self.input_mode = InputMode::Adding(form);
    }

    fn report<T>(&mut self, result: Result<T, SessionError>, success: String) {
        self.status = Some(match result {
            Ok(_) => Status::Info(success),
            Err(err) => Status::Error(err.to_string()),
        });
    }

    fn clamp_selection(&mut self, board: &KanbanBoard) {
        let columns = board.columns();
        self.selected_column = self.selected_column.min(columns.len().saturating_sub(1));
        let len = columns
            .get(self.selected_column)
            .map_or(0, |c| board.get_tasks_by_column(c).len());
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, ReadOnlyStore};
    use rstest::{fixture, rstest};

    #[fixture]
    fn session() -> Session<MemoryStore> {
        Session::open(MemoryStore::new()).unwrap()
    }

    fn press(app: &mut App, session: &mut Session<MemoryStore>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), session);
    }

    fn type_text(app: &mut App, session: &mut Session<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, session, KeyCode::Char(c));
        }
    }

    #[rstest]
    fn selection_stays_within_the_board(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        press(&mut app, &mut session, KeyCode::Left);
        assert_eq!(app.selected_column, 0);
        for _ in 0..10 {
            press(&mut app, &mut session, KeyCode::Down);
        }
        assert_eq!(app.selected_task, 5);
        press(&mut app, &mut session, KeyCode::Right);
        assert_eq!((app.selected_column, app.selected_task), (1, 0));
        for _ in 0..10 {
            press(&mut app, &mut session, KeyCode::Right);
        }
        assert_eq!(app.selected_column, 4);
    }

    #[rstest]
    fn move_keys_carry_the_selected_task(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        press(&mut app, &mut session, KeyCode::Down);
        press(&mut app, &mut session, KeyCode::Char('>'));

        assert_eq!(session.board().task(2).unwrap().column, "To Do");
        assert_eq!(app.selected_column, 1);
        assert_eq!(app.selected(session.board()).unwrap().id, 2);
        assert_eq!(app.status, Some(Status::Info("Moved task #2".to_string())));
    }

    #[rstest]
    fn left_move_is_not_offered_in_first_column(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        press(&mut app, &mut session, KeyCode::Char('<'));
        assert_eq!(session.board(), &crate::kanban_board::KanbanBoard::default());
        assert_eq!(session.store().saves(), 0);
        assert_eq!(app.status, None);
    }

    #[rstest]
    fn form_adds_task_to_chosen_column(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        press(&mut app, &mut session, KeyCode::Char('a'));
        type_text(&mut app, &mut session, "Buy paint");
        press(&mut app, &mut session, KeyCode::Tab);
        type_text(&mut app, &mut session, "Ops");
        press(&mut app, &mut session, KeyCode::Tab);
        press(&mut app, &mut session, KeyCode::Right);
        press(&mut app, &mut session, KeyCode::Tab);
        press(&mut app, &mut session, KeyCode::Right);
        press(&mut app, &mut session, KeyCode::Right);
        press(&mut app, &mut session, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        let task = session.board().task(7).unwrap();
        assert_eq!(task.title, "Buy paint");
        assert_eq!(task.description, "Ops");
        assert_eq!(task.priority, Some(Priority::Low));
        assert_eq!(task.column, "In Progress");
        assert_eq!(app.selected(session.board()).unwrap().id, 7);
    }

    #[rstest]
    fn empty_title_keeps_the_form_open(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        press(&mut app, &mut session, KeyCode::Char('a'));
        press(&mut app, &mut session, KeyCode::Enter);

        assert!(matches!(app.input_mode, InputMode::Adding(_)));
        assert_eq!(app.status, Some(Status::Error("Please enter a title".to_string())));
        assert_eq!(session.board().total(), 6);
        assert_eq!(session.store().saves(), 0);
    }

    #[rstest]
    fn typing_q_in_the_form_does_not_quit(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        press(&mut app, &mut session, KeyCode::Char('a'));
        type_text(&mut app, &mut session, "quit");
        assert!(!app.should_quit);
        press(&mut app, &mut session, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(session.board().total(), 6);
    }

    #[rstest]
    fn delete_removes_selected_task(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        for _ in 0..5 {
            press(&mut app, &mut session, KeyCode::Down);
        }
        press(&mut app, &mut session, KeyCode::Char('d'));
        assert!(session.board().task(6).is_none());
        assert_eq!(app.selected_task, 4);
    }

    #[rstest]
    fn reset_needs_confirmation(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        press(&mut app, &mut session, KeyCode::Char('d'));
        press(&mut app, &mut session, KeyCode::Char('R'));
        press(&mut app, &mut session, KeyCode::Char('n'));
        assert_eq!(session.board().total(), 5);

        press(&mut app, &mut session, KeyCode::Char('R'));
        press(&mut app, &mut session, KeyCode::Char('y'));
        assert_eq!(session.board(), &KanbanBoard::default());
    }

    #[test]
    fn failed_save_is_shown_and_selection_follows_the_task() {
        let mut session = Session::open(ReadOnlyStore).unwrap();
        let mut app = App::new();
        app.handle_key(
            KeyEvent::new(KeyCode::Char('>'), KeyModifiers::NONE),
            &mut session,
        );

        match &app.status {
            Some(Status::Error(msg)) => assert!(msg.contains("not saved"), "{msg}"),
            other => panic!("expected an error status, got {other:?}"),
        }
        assert_eq!(session.board().task(1).unwrap().column, "To Do");
        assert_eq!(app.selected_column, 1);
        assert_eq!(app.selected(session.board()).unwrap().id, 1);

        app.handle_key(
            KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE),
            &mut session,
        );
        assert!(matches!(&app.status, Some(Status::Error(msg)) if msg.contains("not saved")));
        assert!(session.board().task(1).is_none());
    }

    #[rstest]
    fn status_clears_on_the_next_key(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        press(&mut app, &mut session, KeyCode::Char('>'));
        assert!(app.status.is_some());
        press(&mut app, &mut session, KeyCode::Left);
        assert_eq!(app.status, None);
    }

    #[rstest]
    fn quit_keys(mut session: Session<MemoryStore>) {
        let mut app = App::new();
        app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut session,
        );
        assert!(app.should_quit);
    }
}
