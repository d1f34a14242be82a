//! Starter dataset shipped with the board. Used when no board file exists
//! and by `reset`.

use crate::task::{Priority, Task};
use chrono::NaiveDate;

pub const COLUMNS: [&str; 5] = ["Backlog", "To Do", "In Progress", "Review", "Done"];

const SEEDED_ON: (i32, u32, u32) = (2024, 1, 15);

const TASKS: [(&str, &str, Priority); 6] = [
    (
        "Expand Contractor Network",
        "- Research potential contractors in the Chicago area.\n- Develop a contractor onboarding process.\n- Reach out to and sign up 5 new contractors.",
        Priority::High,
    ),
    (
        "AI Agent Development",
        "- Define AI agent's initial tasks and responsibilities.\n- Research suitable AI platforms and tools.\n- Create an outline for AI agent training and implementation.",
        Priority::High,
    ),
    (
        "White-Label SaaS Creation",
        "- Identify core features and functionalities required.\n- Develop a basic prototype of the platform.\n- Test the prototype with a small group of users.",
        Priority::Medium,
    ),
    (
        "AI Integration with Business Operations",
        "- Map out current business operations.\n- Identify areas where AI can be integrated for efficiency.\n- Develop an integration plan and timeline.",
        Priority::Medium,
    ),
    (
        "Marketing Campaign for Expansion",
        "- Define target audience for expansion.\n- Develop marketing materials (e.g., brochures, social media posts).\n- Plan and schedule a series of promotional activities.",
        Priority::Medium,
    ),
    (
        "Customer Feedback System",
        "- Design a customer feedback form or survey.\n- Implement the feedback system on the website and email communications.\n- Analyze initial feedback to identify areas for improvement.",
        Priority::Low,
    ),
];

pub fn columns() -> Vec<String> {
    COLUMNS.iter().map(|c| c.to_string()).collect()
}

pub fn tasks() -> Vec<Task> {
    let (year, month, day) = SEEDED_ON;
    let created = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    TASKS
        .iter()
        .zip(1..)
        .map(|((title, description, priority), id)| Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            column: COLUMNS[0].to_string(),
            priority: Some(*priority),
            created,
        })
        .collect()
}
