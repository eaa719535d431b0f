use std::time::{Duration, Instant};

/// Expansions between two wall-clock checks
const CLOCK_CHECK_INTERVAL: usize = 256;

/// Marker returned when a search runs out of budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Exhausted;

/// Request-local limit on search work
#[derive(Debug)]
pub(crate) struct SearchBudget {
    deadline: Option<Instant>,
    max_expansions: Option<usize>,
    expansions: usize,
}

impl SearchBudget {
    pub(crate) fn new(time_limit: Option<Duration>, max_expansions: Option<usize>) -> Self {
        Self {
            deadline: time_limit.map(|limit| Instant::now() + limit),
            max_expansions,
            expansions: 0,
        }
    }

    /// Accounts for one settled node
    pub(crate) fn expand(&mut self) -> Result<(), Exhausted> {
        self.expansions += 1;
        if self
            .max_expansions
            .is_some_and(|max| self.expansions > max)
        {
            return Err(Exhausted);
        }
        if self.expansions % CLOCK_CHECK_INTERVAL == 0 {
            self.check_deadline()?;
        }
        Ok(())
    }

    pub(crate) fn check_deadline(&self) -> Result<(), Exhausted> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Exhausted),
            _ => Ok(()),
        }
    }

    pub(crate) fn expansions(&self) -> usize {
        self.expansions
    }
}
