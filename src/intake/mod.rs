//! Form intake policies for the attendee populations.

/// Policy trait and form/error types.
pub mod traits;
/// Student, general-admission, and walk-up guest policies.
pub mod variants;
