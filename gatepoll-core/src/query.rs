//! Query kinds a gate can be asked

use std::fmt;

/// Request sent to a gate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum QueryKind {
    /// Read the in/out patron counters
    #[default]
    CustomerCounts,

    /// Zero the patron counters (no model implements it yet)
    ResetCounts,
}

impl QueryKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::CustomerCounts => "CUSTOMER_COUNTS",
            Self::ResetCounts => "RESET_COUNTS",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
