use crate::models::Code;

/// What happened to a single code during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    Triggered(Code),
    NotTriggered(Code),
    FetchFailed(Code),
    /// The code's watch-list row could not be used.
    DataInvalid(Code),
}

impl AlertOutcome {
    pub fn code(&self) -> Code {
        match self {
            AlertOutcome::Triggered(c)
            | AlertOutcome::NotTriggered(c)
            | AlertOutcome::FetchFailed(c)
            | AlertOutcome::DataInvalid(c) => *c,
        }
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self, AlertOutcome::Triggered(_))
    }
}

/// Terminal state of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every group was processed and the completion message went out.
    Completed { outcomes: Vec<AlertOutcome> },
    /// The watch list could not supply its codes; nothing else was attempted.
    Aborted,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}
