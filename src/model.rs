use serde::{Deserialize, Serialize};

/// A project on the board, top level of the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub boards: Vec<Board>,
}

/// A board within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub lists: Vec<CardList>,
}

/// A list (column) on a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardList {
    pub id: String,
    pub name: String,
    pub cards: Vec<Card>,
}

/// A card. `due_date` is the raw ISO-8601 instant as the board API serializes
/// it; cards without a deadline carry `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub due_date: Option<String>,
    pub url: String,
}

/// One due-soon match, derived per run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub task_name: String,
    /// `MM/DD/YYYY at hh:mm AM/PM`, UTC.
    pub due_date: String,
    pub card_url: String,
    pub days_until_due: i64,
    pub due_status: String,
}
