use crate::app::{App, FormField, InputMode, Status, TaskForm};
use crate::kanban_board::{Direction as Move, KanbanBoard};
use crate::session::Session;
use crate::storage::BoardStore;
use crate::task::{Priority, Task};
use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

const DESCRIPTION_PREVIEW: usize = 100;

pub fn run_app<B: Backend, S: BoardStore>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    session: &mut Session<S>,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| draw(f, app, session.board()))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key, session);
        }
    }
    Ok(())
}

pub fn draw(f: &mut Frame, app: &App, board: &KanbanBoard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_header(f, rows[0], board);
    draw_columns(f, rows[1], app, board);
    draw_footer(f, rows[2], app, board);

    if let InputMode::Adding(form) = &app.input_mode {
        draw_form(f, form, board);
    }
}

fn draw_header(f: &mut Frame, area: Rect, board: &KanbanBoard) {
    let gauge = Gauge::default()
        .block(Block::default().title(" Kanban Board ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(board.completion_ratio().clamp(0.0, 1.0))
        .label(format!(
            "{}/{} done ({:.0}%)",
            board.completed(),
            board.total(),
            board.completion_ratio() * 100.0
        ));
    f.render_widget(gauge, area);
}

fn draw_columns(f: &mut Frame, area: Rect, app: &App, board: &KanbanBoard) {
    let count = board.columns().len() as u32;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (i, column) in board.columns().iter().enumerate() {
        let tasks = board.get_tasks_by_column(column);
        let selected = app.selected_column == i;
        let items: Vec<ListItem> = tasks.iter().map(|t| card(t)).collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {} ({}) ", column, tasks.len()))
                    .borders(Borders::ALL)
                    .border_style(if selected {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

        let mut state = ListState::default();
        if selected && !tasks.is_empty() {
            state.select(Some(app.selected_task));
        }
        f.render_stateful_widget(list, chunks[i], &mut state);
    }
}

fn card(task: &Task) -> ListItem<'_> {
    let color = Priority::color(task.priority);
    let mut header = vec![Span::raw(format!("#{} ", task.id)), Span::raw(task.title.as_str())];
    if let Some(priority) = task.priority {
        header.push(Span::raw(" "));
        header.push(Span::styled(
            format!("[{priority}]"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let mut lines = vec![Line::from(header)];
    let preview = preview(&task.description);
    if !preview.is_empty() {
        lines.push(Line::from(Span::styled(
            preview,
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("created {}", task.created.format("%Y-%m-%d")),
        Style::default().fg(Color::DarkGray),
    )));
    ListItem::new(lines)
}

/// First line of a description, cut at 100 characters.
fn preview(description: &str) -> String {
    let first = description.lines().next().unwrap_or_default();
    if first.chars().count() > DESCRIPTION_PREVIEW || description.lines().nth(1).is_some() {
        let cut: String = first.chars().take(DESCRIPTION_PREVIEW).collect();
        format!("{cut}...")
    } else {
        first.to_string()
    }
}

/// Key help in the body, the last status message in the border title.
fn draw_footer(f: &mut Frame, area: Rect, app: &App, board: &KanbanBoard) {
    let mut block = Block::default().borders(Borders::ALL);
    match &app.status {
        Some(Status::Error(msg)) => {
            block = block.title(Span::styled(
                format!(" {msg} "),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        Some(Status::Info(msg)) => {
            block = block.title(Span::styled(
                format!(" {msg} "),
                Style::default().fg(Color::Green),
            ));
        }
        None => {}
    }
    f.render_widget(Paragraph::new(Line::from(help(app, board))).block(block), area);
}

/// Key help; move hints only appear when that move is legal.
fn help(app: &App, board: &KanbanBoard) -> String {
    let mut keys = vec!["←/→ column", "↑/↓ task", "a add"];
    if let Some(task) = app.selected(board) {
        if board.can_move(task.id, Move::Left) {
            keys.push("< move left");
        }
        if board.can_move(task.id, Move::Right) {
            keys.push("> move right");
        }
        keys.push("d delete");
    }
    keys.extend(["R reset", "q quit"]);
    keys.join("  ")
}

fn draw_form(f: &mut Frame, form: &TaskForm, board: &KanbanBoard) {
    let area = centered(f.area(), 60, 12);
    f.render_widget(Clear, area);

    let field = |name: &str, value: String, which: FormField| {
        let style = if form.field == which {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{name:<12}"), style),
            Span::raw(value),
        ])
    };
    let column = board.columns().get(form.column).cloned().unwrap_or_default();
    let priority = form.priority.map_or("none", Priority::as_str).to_string();

    let lines = vec![
        field("Title", form.title.clone(), FormField::Title),
        field("Description", form.description.clone(), FormField::Description),
        field("Priority", format!("< {priority} >"), FormField::Priority),
        field("Column", format!("< {column} >"), FormField::Column),
        Line::from(""),
        Line::from(Span::styled(
            "Tab next field  ←/→ change  Enter add  Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(" Add New Task ").borders(Borders::ALL)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
