//! Conversion cost model
//!
//! Every strategy scores how well a value fits its native target on one
//! ordinal scale, low is better. The contract is the band ordering
//! EXACT < NATURAL < COERCIBLE < LOSSY < FORCED < REJECT; the literal
//! numbers are internal and leave room for fine tiers inside a band.

use std::fmt;

/// Ordinal marshaling cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cost(u32);

impl Cost {
    /// The value's concrete representation already is the native target
    pub const EXACT: Cost = Cost(0);
    /// The value's kind maps directly and losslessly onto the target
    pub const NATURAL: Cost = Cost(100);
    /// Lossless representation change, but not the target's home form
    pub const COERCIBLE: Cost = Cost(200);
    /// Representation change that can drop information
    pub const LOSSY: Cost = Cost(300);
    /// Stringified/boxed/defaulted into shape; legal but always worst
    pub const FORCED: Cost = Cost(400);
    /// Not attemptable at all. Reserved maximum; summation saturates here.
    pub const REJECT: Cost = Cost(u32::MAX / 32);

    /// Fine tier inside a band
    pub const fn plus(self, offset: u32) -> Cost {
        if self.0 >= Self::REJECT.0 {
            Self::REJECT
        } else {
            Cost(self.0 + offset)
        }
    }

    pub const fn is_reject(self) -> bool {
        self.0 >= Self::REJECT.0
    }

    /// Sum two costs; any REJECT poisons the total and nothing overflows
    /// past the reserved maximum
    pub fn saturating_add(self, other: Cost) -> Cost {
        if self.is_reject() || other.is_reject() {
            Self::REJECT
        } else {
            // Both operands are below REJECT, so the sum cannot wrap
            Cost((self.0 + other.0).min(Self::REJECT.0 - 1))
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reject() {
            return write!(f, "REJECT");
        }
        let (band, base) = match self.0 {
            0..=99 => ("EXACT", 0),
            100..=199 => ("NATURAL", 100),
            200..=299 => ("COERCIBLE", 200),
            300..=399 => ("LOSSY", 300),
            _ => ("FORCED", 400),
        };
        let offset = self.0 - base;
        if offset == 0 {
            write!(f, "{band}")
        } else {
            write!(f, "{band}+{offset}")
        }
    }
}
