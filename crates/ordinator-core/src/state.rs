//! Routine lifecycle state

/// State of a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineState {
    /// Created, never resumed; no stack allocated yet
    Created,

    /// Executing, or waiting inside a nested `resume` it issued
    Running,

    /// Parked at a `yield`, waiting for the next `resume`
    Suspended,

    /// Body returned (or panicked); can never run again
    Finished,
}

impl RoutineState {
    /// Check if `resume` may transfer control into this routine
    #[inline]
    pub const fn is_resumable(&self) -> bool {
        matches!(self, RoutineState::Created | RoutineState::Suspended)
    }

    /// Check if the completion flag is set
    #[inline]
    pub const fn is_finished(&self) -> bool {
        matches!(self, RoutineState::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resumable() {
        assert!(RoutineState::Created.is_resumable());
        assert!(RoutineState::Suspended.is_resumable());
        assert!(!RoutineState::Running.is_resumable());
        assert!(!RoutineState::Finished.is_resumable());
    }

    #[test]
    fn test_only_finished_is_finished() {
        assert!(RoutineState::Finished.is_finished());
        assert!(!RoutineState::Created.is_finished());
        assert!(!RoutineState::Running.is_finished());
        assert!(!RoutineState::Suspended.is_finished());
    }
}
