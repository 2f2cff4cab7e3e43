//! Protocol constants

use std::time::Duration;

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

/// 3M 9100 defaults
pub mod three_m {
    use std::time::Duration;

    /// TCP port of the gate's serial bridge
    pub const PORT: u16 = 2101;

    /// The 3M controller needs a few seconds before its answer is ready
    pub const DWELL: Duration = Duration::from_secs(3);

    /// Customer count request
    pub const CUSTOMER_COUNTS: &str = "63000406000D59";
}

/// FEIG ID ISC.LR2500-B defaults
pub mod feig {
    use std::time::Duration;

    pub const PORT: u16 = 10001;

    pub const DWELL: Duration = Duration::from_secs(1);

    /// Customer count request (read of the counter data block)
    pub const CUSTOMER_COUNTS: &str = "020012ff9f000d02020008017700ee024431";
}

/// Response field windows, in hex characters
pub mod layout {
    use std::ops::Range;

    /// 3M: out count precedes in count, 7 digits each
    pub const THREE_M_OUT: Range<usize> = 11..18;
    pub const THREE_M_IN: Range<usize> = 19..26;

    /// FEIG: 8 digits per field, detector 1 then detector 2
    pub const FEIG_IN_1: Range<usize> = 24..32;
    pub const FEIG_OUT_1: Range<usize> = 32..40;
    pub const FEIG_IN_2: Range<usize> = 40..48;
    pub const FEIG_OUT_2: Range<usize> = 48..56;
}
