//! Normalized count result

use std::fmt;

/// Patron counts reported by a gate
///
/// `Unavailable` is the sentinel used for every failure (no data, malformed
/// reply, network error). It renders as `-1|-1|` whatever the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CountResult {
    /// Counts read from the device
    Counts {
        in_count: u64,
        out_count: u64,
    },

    /// No usable count was obtained
    #[default]
    Unavailable,
}

impl CountResult {
    /// Text rendering of the sentinel
    pub const SENTINEL: &'static str = "-1|-1|";

    pub fn new(in_count: u64, out_count: u64) -> Self {
        Self::Counts { in_count, out_count }
    }

    pub fn unavailable() -> Self {
        Self::Unavailable
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    pub fn in_count(&self) -> Option<u64> {
        match self {
            Self::Counts { in_count, .. } => Some(*in_count),
            Self::Unavailable => None,
        }
    }

    pub fn out_count(&self) -> Option<u64> {
        match self {
            Self::Counts { out_count, .. } => Some(*out_count),
            Self::Unavailable => None,
        }
    }

    /// Element-wise sum of two readings
    ///
    /// The sum is unavailable if either side is.
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (
                Self::Counts { in_count: a_in, out_count: a_out },
                Self::Counts { in_count: b_in, out_count: b_out },
            ) => Self::Counts {
                in_count: a_in.saturating_add(b_in),
                out_count: a_out.saturating_add(b_out),
            },
            _ => Self::Unavailable,
        }
    }
}

impl fmt::Display for CountResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counts { in_count, out_count } => write!(f, "{}|{}|", in_count, out_count),
            Self::Unavailable => f.write_str(Self::SENTINEL),
        }
    }
}
