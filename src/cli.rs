use crate::config::{Config, DEFAULT_LOG_LEVEL};
use crate::kanban_board::Direction;
use crate::session::Session;
use crate::storage::{BoardStore, JsonFileStore, DEFAULT_DATA_FILE};
use crate::task::{NewTask, Priority};
use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use std::{ffi::OsString, io::Write, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Board,
    Init,
    List,
    Stats,
    Add {
        title: String,
        column: Option<String>,
        priority: Option<Priority>,
        description: String,
    },
    Move {
        id: u32,
        direction: Direction,
    },
    Delete {
        id: u32,
    },
    Reset,
}

pub fn command() -> Command {
    let id_arg = || {
        Arg::new("id")
            .required(true)
            .value_parser(value_parser!(u32))
            .help("Task id")
    };

    Command::new("taskboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Kanban board in the terminal, stored as a JSON file")
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .env("TASKBOARD_DATA")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_DATA_FILE)
                .help("Board file"),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .global(true)
                .env("TASKBOARD_LOG_DIR")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Directory for taskboard.log (default: user cache dir)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .value_name("FILTER")
                .default_value(DEFAULT_LOG_LEVEL)
                .help("Log filter, overridden by RUST_LOG"),
        )
        .subcommand(Command::new("init").about("Create the board file with the starter tasks"))
        .subcommand(Command::new("list").about("List all tasks by column"))
        .subcommand(Command::new("stats").about("Show task counts and completion"))
        .subcommand(
            Command::new("add")
                .about("Add a new task")
                .arg(Arg::new("title").required(true).help("Task title"))
                .arg(
                    Arg::new("column")
                        .long("column")
                        .short('c')
                        .help("Target column (default: first column)"),
                )
                .arg(
                    Arg::new("priority")
                        .long("priority")
                        .short('p')
                        .value_parser(["high", "medium", "low"])
                        .ignore_case(true),
                )
                .arg(Arg::new("description").long("description").short('d')),
        )
        .subcommand(
            Command::new("move")
                .about("Move a task one column left or right")
                .arg(id_arg())
                .arg(
                    Arg::new("direction")
                        .required(true)
                        .value_parser(["left", "right"]),
                ),
        )
        .subcommand(Command::new("delete").about("Delete a task").arg(id_arg()))
        .subcommand(Command::new("reset").about("Replace the board with the starter tasks"))
}

pub fn parse_from<I, T>(args: I) -> Result<(Config, CliCommand), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    Ok((Config::from_matches(&matches), to_command(&matches)))
}

fn to_command(matches: &ArgMatches) -> CliCommand {
    let id = |sub: &ArgMatches| sub.get_one::<u32>("id").copied().unwrap_or_default();
    match matches.subcommand() {
        Some(("init", _)) => CliCommand::Init,
        Some(("list", _)) => CliCommand::List,
        Some(("stats", _)) => CliCommand::Stats,
        Some(("add", sub)) => CliCommand::Add {
            title: sub.get_one::<String>("title").cloned().unwrap_or_default(),
            column: sub.get_one::<String>("column").cloned(),
            priority: sub
                .get_one::<String>("priority")
                .and_then(|p| Priority::parse(p)),
            description: sub
                .get_one::<String>("description")
                .cloned()
                .unwrap_or_default(),
        },
        Some(("move", sub)) => CliCommand::Move {
            id: id(sub),
            direction: match sub.get_one::<String>("direction").map(String::as_str) {
                Some("left") => Direction::Left,
                _ => Direction::Right,
            },
        },
        Some(("delete", sub)) => CliCommand::Delete { id: id(sub) },
        Some(("reset", _)) => CliCommand::Reset,
        _ => CliCommand::Board,
    }
}

pub fn init(store: &mut JsonFileStore, out: &mut impl Write) -> Result<()> {
    if store.init()? {
        writeln!(out, "Board initialized in {}", store.path().display())?;
    } else {
        writeln!(out, "Board already exists at {}", store.path().display())?;
    }
    Ok(())
}

/// Runs one non-interactive subcommand against the session.
pub fn run<S: BoardStore>(
    command: CliCommand,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        CliCommand::List => list(session, out)?,
        CliCommand::Stats => stats(session, out)?,
        CliCommand::Add {
            title,
            column,
            priority,
            description,
        } => {
            let column = match column {
                Some(column) => column,
                None => session.board().columns()[0].clone(),
            };
            let new_task = NewTask::new(title, column.clone())
                .with_description(description)
                .with_priority(priority);
            let id = session.add_task(new_task).context("task not added")?;
            writeln!(out, "Added task #{id} to {column}")?;
        }
        CliCommand::Move { id, direction } => {
            if session.move_task(id, direction)? {
                let column = session
                    .board()
                    .task(id)
                    .map(|t| t.column.clone())
                    .unwrap_or_default();
                writeln!(out, "Moved task #{id} to {column}")?;
            } else {
                let way = match direction {
                    Direction::Left => "left",
                    Direction::Right => "right",
                };
                writeln!(out, "Task #{id} cannot move {way}")?;
            }
        }
        CliCommand::Delete { id } => match session.delete_task(id)? {
            Some(task) => writeln!(out, "Deleted task #{id} ({})", task.title)?,
            None => writeln!(out, "No task #{id}")?,
        },
        CliCommand::Reset => {
            session.reset()?;
            writeln!(out, "Board reset to starter tasks")?;
        }
        CliCommand::Board | CliCommand::Init => {}
    }
    Ok(())
}

fn list<S: BoardStore>(session: &Session<S>, out: &mut impl Write) -> Result<()> {
    let board = session.board();
    for column in board.columns() {
        let tasks = board.get_tasks_by_column(column);
        writeln!(out, "{} ({}):", column, tasks.len())?;
        for task in tasks {
            match task.priority {
                Some(priority) => writeln!(out, "- [#{}] {} ({})", task.id, task.title, priority)?,
                None => writeln!(out, "- [#{}] {}", task.id, task.title)?,
            }
        }
    }
    Ok(())
}

fn stats<S: BoardStore>(session: &Session<S>, out: &mut impl Write) -> Result<()> {
    let board = session.board();
    for (column, count) in board.column_counts() {
        writeln!(out, "{column}: {count}")?;
    }
    writeln!(out, "Total: {}", board.total())?;
    writeln!(
        out,
        "Completed: {} ({:.0}%)",
        board.completed(),
        board.completion_ratio() * 100.0
    )?;
    for (priority, count) in board.priority_counts() {
        let label = priority.map_or("No priority", Priority::as_str);
        writeln!(out, "{label}: {count}")?;
    }
    Ok(())
}
