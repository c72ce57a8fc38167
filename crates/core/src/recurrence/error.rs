use thiserror::Error;

/// Errors produced while expanding a recurring event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    /// Every candidate fell before now, or the window was already exhausted.
    #[error("No events to insert")]
    EmptyExpansion,
    #[error("Recurrence count {count} exceeds the maximum of {max}")]
    CountTooLarge { count: u32, max: u32 },
}
