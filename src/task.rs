use chrono::NaiveDate;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub created: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Parses a priority label, ignoring case.
    pub fn parse(value: &str) -> Option<Priority> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Badge colour; tasks without a priority are drawn in gray.
    pub fn color(priority: Option<Priority>) -> Color {
        match priority {
            Some(Priority::High) => Color::Rgb(0xff, 0x4b, 0x4b),
            Some(Priority::Medium) => Color::Rgb(0xff, 0xa6, 0x00),
            Some(Priority::Low) => Color::Rgb(0x00, 0xcc, 0x66),
            None => Color::Rgb(0x80, 0x80, 0x80),
        }
    }

    /// Next value in the form's cycle: High, Medium, Low, none.
    pub fn cycle(priority: Option<Priority>) -> Option<Priority> {
        match priority {
            Some(Priority::High) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::Low),
            Some(Priority::Low) => None,
            None => Some(Priority::High),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields collected from the user for a task that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub column: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            column: column.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }
}
