//! Fixed-offset response decoders
//!
//! Each gate family answers with a reply whose counters sit at fixed
//! positions. Decoders work on the lowercase hex text of that reply and
//! never panic: a reply too short for the layout, or with non-hex
//! characters inside a counter window, is reported as a malformed response.
//!
//! # Layouts (hex character offsets)
//!
//! ```text
//! 3M 9100            [11..18) out   [19..26) in          (7 digits each)
//! FEIG single aisle  [24..32) in    [32..40) out         (8 digits each)
//! FEIG dual aisle    [24..32) in-1  [32..40) out-1
//!                    [40..48) in-2  [48..56) out-2       totals = 1 + 2
//! ```

use std::ops::Range;

use gatepoll_types::CountResult;

use crate::constants::layout;
use crate::error::{Error, Result};

/// Response decoder bound to a gate family
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Decoder {
    /// 3M 9100 single detector
    ThreeM,

    /// FEIG LR2500-B, one aisle
    FeigSingleAisle,

    /// FEIG LR2500-B, two aisles summed into one total
    FeigDualAisle,
}

impl Decoder {
    /// Number of hex characters the layout needs
    pub fn required_len(self) -> usize {
        match self {
            Self::ThreeM => layout::THREE_M_IN.end,
            Self::FeigSingleAisle => layout::FEIG_OUT_1.end,
            Self::FeigDualAisle => layout::FEIG_OUT_2.end,
        }
    }

    /// Decode a hex-encoded reply
    ///
    /// Empty input means the gate sent nothing and decodes to the sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use gatepoll_core::Decoder;
    ///
    /// let reply = format!("{}{}{}", "0".repeat(24), "00000010", "00000020");
    /// let counts = Decoder::FeigSingleAisle.decode(&reply).unwrap();
    /// assert_eq!(counts.to_string(), "16|32|");
    ///
    /// assert!(Decoder::FeigSingleAisle.decode("").unwrap().is_unavailable());
    /// ```
    pub fn decode(self, message: &str) -> Result<CountResult> {
        if message.is_empty() {
            return Ok(CountResult::Unavailable);
        }

        let required = self.required_len();
        if message.len() < required {
            return Err(Error::ResponseTooShort {
                expected: required,
                actual: message.len(),
            });
        }

        let counts = match self {
            Self::ThreeM => {
                let out_count = field(message, layout::THREE_M_OUT)?;
                let in_count = field(message, layout::THREE_M_IN)?;
                CountResult::new(in_count, out_count)
            }
            Self::FeigSingleAisle => feig_aisle(message, layout::FEIG_IN_1, layout::FEIG_OUT_1)?,
            Self::FeigDualAisle => {
                let first = feig_aisle(message, layout::FEIG_IN_1, layout::FEIG_OUT_1)?;
                let second = feig_aisle(message, layout::FEIG_IN_2, layout::FEIG_OUT_2)?;
                first.combine(second)
            }
        };

        Ok(counts)
    }
}

fn feig_aisle(message: &str, in_range: Range<usize>, out_range: Range<usize>) -> Result<CountResult> {
    let in_count = field(message, in_range)?;
    let out_count = field(message, out_range)?;
    Ok(CountResult::new(in_count, out_count))
}

/// Parse one unsigned base-16 counter window
fn field(message: &str, range: Range<usize>) -> Result<u64> {
    let offset = range.start;
    let text = match message.get(range.clone()) {
        Some(text) => text,
        None if message.len() < range.end => {
            return Err(Error::ResponseTooShort {
                expected: range.end,
                actual: message.len(),
            });
        }
        // window cuts through a multi-byte character
        None => {
            return Err(Error::InvalidField {
                offset,
                field: String::from_utf8_lossy(&message.as_bytes()[range]).into_owned(),
            });
        }
    };

    // from_str_radix would also accept a leading '+'
    if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidField {
            offset,
            field: text.to_string(),
        });
    }

    u64::from_str_radix(text, 16).map_err(|_| Error::InvalidField {
        offset,
        field: text.to_string(),
    })
}
