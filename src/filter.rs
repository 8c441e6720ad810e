//! Due-date evaluation: walks the board tree and emits one notification
//! record per card due inside the horizon window.
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::model::{NotificationRecord, Project};

/// Walk every card in the tree and collect a record for each one whose due
/// date falls inside `[today, today + horizon_days]`, both bounds inclusive.
///
/// Due dates are parsed as ISO-8601 instants, normalized to UTC, and
/// truncated to a calendar date for the window test; the instant itself is
/// kept for display. Cards without a due date are skipped. A due date that
/// does not parse aborts the run.
///
/// Output order is traversal order: projects, boards, lists, cards, each in
/// the order the board client yielded them.
pub fn collect_due(
    projects: &[Project],
    today: NaiveDate,
    horizon_days: u32,
) -> Result<Vec<NotificationRecord>> {
    let end = today + Duration::days(i64::from(horizon_days));
    let mut records = Vec::new();

    for project in projects {
        for board in &project.boards {
            for list in &board.lists {
                for card in &list.cards {
                    let Some(raw) = card.due_date.as_deref() else {
                        debug!(card = %card.name, "no due date, skipping");
                        continue;
                    };
                    let instant = DateTime::parse_from_rfc3339(raw)
                        .with_context(|| {
                            format!(
                                "malformed due date '{}' on card '{}' ({})",
                                raw, card.name, card.id
                            )
                        })?
                        .with_timezone(&Utc);
                    let due_day = instant.date_naive();
                    if due_day < today || due_day > end {
                        continue;
                    }
                    let days_until_due = due_day.signed_duration_since(today).num_days();
                    records.push(NotificationRecord {
                        task_name: card.name.clone(),
                        due_date: format_due(&instant),
                        card_url: card.url.clone(),
                        days_until_due,
                        due_status: due_status(days_until_due),
                    });
                }
            }
        }
    }

    Ok(records)
}

/// Human status label for a days-until-due count.
pub fn due_status(days_until_due: i64) -> String {
    match days_until_due {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {} days", n),
    }
}

/// `MM/DD/YYYY at hh:mm AM/PM`, UTC.
pub fn format_due(instant: &DateTime<Utc>) -> String {
    instant.format("%m/%d/%Y at %I:%M %p").to_string()
}
