//! Routine identifier type

use core::fmt;

/// Handle to a routine owned by an `Ordinator`
///
/// Identifiers are 1-based indexes into the routine table. The value 0
/// is reserved: it names the host context, i.e. "no routine is running".
/// Identifiers are recycled after `destroy`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RoutineId(u32);

impl RoutineId {
    /// The host context (no routine)
    pub const NONE: RoutineId = RoutineId(0);

    /// Create a new RoutineId from a raw value
    #[inline]
    pub const fn new(id: u32) -> Self {
        RoutineId(id)
    }

    /// Get the raw u32 value
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Index into the routine table (`id - 1`)
    ///
    /// Must not be called on `NONE`.
    #[inline]
    pub const fn slot(self) -> usize {
        debug_assert!(self.0 != 0);
        (self.0 - 1) as usize
    }

    /// Build the identifier that owns table index `slot`
    #[inline]
    pub const fn from_slot(slot: usize) -> Self {
        RoutineId(slot as u32 + 1)
    }

    /// Check if this is the host sentinel
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Check if this names a routine
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "RoutineId(host)")
        } else {
            write!(f, "RoutineId({})", self.0)
        }
    }
}

impl fmt::Display for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "host")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Default for RoutineId {
    fn default() -> Self {
        RoutineId::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_id_basics() {
        let id = RoutineId::new(42);
        assert_eq!(id.as_u32(), 42);
        assert_eq!(id.slot(), 41);
        assert!(id.is_some());
        assert_eq!(RoutineId::from_slot(41), id);
    }

    #[test]
    fn test_routine_id_none() {
        let none = RoutineId::NONE;
        assert!(none.is_none());
        assert_eq!(none.as_u32(), 0);
        assert_eq!(RoutineId::default(), none);
    }

    #[test]
    fn test_routine_id_display() {
        assert_eq!(format!("{}", RoutineId::new(7)), "7");
        assert_eq!(format!("{}", RoutineId::NONE), "host");
        assert_eq!(format!("{:?}", RoutineId::new(7)), "RoutineId(7)");
    }
}
