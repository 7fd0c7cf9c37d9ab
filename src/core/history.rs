//! Action history tracking.
//!
//! Every executed action leaves an [`ActionHistory`] record on its instance.
//! The [`History`] container is append-only: records can be added and read,
//! never edited or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single executed action.
///
/// # Example
///
/// ```rust
/// use waymark::core::ActionHistory;
/// use chrono::Utc;
///
/// let record = ActionHistory {
///     action_id: "submit".to_string(),
///     from_state_id: "draft".to_string(),
///     to_state_id: "review".to_string(),
///     executed_at: Utc::now(),
/// };
/// assert_eq!(record.to_state_id, "review");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionHistory {
    /// The action that fired
    pub action_id: String,
    /// The state the instance was in before the action
    pub from_state_id: String,
    /// The state the instance moved to
    pub to_state_id: String,
    /// When the action was executed
    pub executed_at: DateTime<Utc>,
}

/// Ordered, append-only history of executed actions.
///
/// Serialized as a plain list of records.
///
/// # Example
///
/// ```rust
/// use waymark::core::{ActionHistory, History};
/// use chrono::Utc;
///
/// let mut history = History::new();
/// history.record(ActionHistory {
///     action_id: "submit".to_string(),
///     from_state_id: "draft".to_string(),
///     to_state_id: "review".to_string(),
///     executed_at: Utc::now(),
/// });
/// history.record(ActionHistory {
///     action_id: "approve".to_string(),
///     from_state_id: "review".to_string(),
///     to_state_id: "approved".to_string(),
///     executed_at: Utc::now(),
/// });
///
/// assert_eq!(history.path(), vec!["draft", "review", "approved"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<ActionHistory>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record at the end of the history.
    pub fn record(&mut self, record: ActionHistory) {
        self.records.push(record);
    }

    /// All records in execution order.
    pub fn records(&self) -> &[ActionHistory] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record, if any.
    pub fn last(&self) -> Option<&ActionHistory> {
        self.records.last()
    }

    /// Get the path of state ids traversed.
    ///
    /// Returns the first record's source state, then the target state of
    /// each record. Empty when nothing has been executed.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(first.from_state_id.as_str());
        }
        for record in &self.records {
            path.push(record.to_state_id.as_str());
        }
        path
    }

    /// Elapsed time between the first and the last record.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.executed_at
            .signed_duration_since(first.executed_at)
            .to_std()
            .ok()
    }
}
