use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved reminder for an upcoming spray window. Created from the advisory's
/// window bounds; an advisory without a window cannot produce a reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprayReminder {
    pub id: Option<i64>,
    pub field_id: Option<i64>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SprayReminder {
    pub fn for_window(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self {
            id: None,
            field_id: None,
            window_start,
            window_end,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_field(mut self, field_id: i64) -> Self {
        self.field_id = Some(field_id);
        self
    }
}
