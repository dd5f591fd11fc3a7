use habita_shared::Error;
use strum::{AsRefStr, Display};

#[derive(Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// User-facing outcome of a session operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Converts a failed `action` ("apply the plan", ...) into a notice.
    pub fn failed(action: &str, err: &Error) -> Self {
        match err {
            Error::ServiceUnavailable => {
                Notice::info("Plan generation is not available right now. Try again later.")
            }
            Error::NoEligibleTasks(message) if !message.is_empty() => Notice::info(message),
            Error::NoEligibleTasks(_) => {
                Notice::info("There are no tasks to distribute. Add household tasks first.")
            }
            Error::Validate(_) | Error::User(_) | Error::NotFound(_) => {
                Notice::error(err.to_string())
            }
            Error::Remote { .. } | Error::Network(_) | Error::Unknown(_) => {
                Notice::error(format!("Could not {action}. Please try again."))
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
