use std::fmt;

use serde::{Deserialize, Serialize};

const SEPARATOR: char = '|';
const ESCAPE: char = '\\';

/// Identity of an assignment inside a plan.
///
/// `task|member` for day-less assignments, `task|member|day` once a day is
/// known and `task|member|day|start` when the slot also has a start time.
/// A start time without a day does not take part in the key.
///
/// Separators inside task names or member ids are escaped so distinct tuples
/// never render to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentKey(String);

impl AssignmentKey {
    pub fn new(
        task_name: &str,
        member_id: &str,
        day_of_week: Option<u8>,
        start_time: Option<&str>,
    ) -> Self {
        let mut key = String::with_capacity(task_name.len() + member_id.len() + 10);
        push_escaped(&mut key, task_name);
        key.push(SEPARATOR);
        push_escaped(&mut key, member_id);

        if let Some(day) = day_of_week {
            key.push(SEPARATOR);
            key.push_str(&day.to_string());

            if let Some(start) = start_time {
                key.push(SEPARATOR);
                push_escaped(&mut key, start);
            }
        }

        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn push_escaped(key: &mut String, value: &str) {
    for c in value.chars() {
        if c == SEPARATOR || c == ESCAPE {
            key.push(ESCAPE);
        }
        key.push(c);
    }
}

impl fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssignmentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
