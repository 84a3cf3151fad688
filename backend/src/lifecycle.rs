use std::fmt;

use serde::Serialize;

pub const UNKNOWN_ERROR: &str = "Unknown Error";

#[derive(Hash, Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Pending => "pending",
            Status::Succeeded => "succeeded",
            Status::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load status of one resource.
///
/// `Pending` is only entered from `Idle`, so a resource never has two loads in
/// flight. A settled resource stays settled until [`Lifecycle::reset`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lifecycle {
    status: Status,
    error: Option<String>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Only set while `Failed`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Idle -> Pending. Returns false, changing nothing, from any other state.
    pub fn begin(&mut self) -> bool {
        if self.status != Status::Idle {
            return false;
        }
        self.status = Status::Pending;
        self.error = None;
        true
    }

    /// Pending -> Succeeded.
    pub fn succeed(&mut self) -> bool {
        if self.status != Status::Pending {
            return false;
        }
        self.status = Status::Succeeded;
        self.error = None;
        true
    }

    /// Pending -> Failed, keeping `message` or [`UNKNOWN_ERROR`].
    pub fn fail(&mut self, message: Option<String>) -> bool {
        if self.status != Status::Pending {
            return false;
        }
        self.status = Status::Failed;
        self.error = Some(message.unwrap_or_else(|| UNKNOWN_ERROR.to_owned()));
        true
    }

    /// Succeeded/Failed -> Idle. A pending load is left alone.
    pub fn reset(&mut self) -> bool {
        if self.status == Status::Pending {
            return false;
        }
        *self = Lifecycle::default();
        true
    }
}
