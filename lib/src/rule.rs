//! Outer-totalistic rule specifications.
//!
//! A rule string such as `b3s23` lists the neighbour counts that cause a
//! dead cell to be born and a living cell to survive. Only rules without
//! `B0`, `B1` and `B2` are supported, since the generated kernels assume a
//! stable dead background.

use crate::error::Error;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An outer-totalistic birth/survival rule.
///
/// Immutable once parsed. The birth and survival sets are stored as 9-bit
/// masks; bit `k` means "neighbour count `k`".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleSpec {
    births: u16,
    survivals: u16,
}

/// Whether a neighbour count of 8 behaves differently from the pattern
/// that the 4-bit counting network sees.
///
/// The counting network only keeps the low bits of the neighbour count, so
/// a count of 8 aliases a count of 0 (for births) or looks like a count
/// off by one (for survivals). When either set treats the top count
/// differently, the kernel needs an extra working register and a final
/// correction XOR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TopBitCorrection {
    /// `B8` differs from `B0` in the rule.
    pub birth_differs: bool,
    /// `S8` differs from `S0` in the rule.
    pub survival_differs: bool,
}

impl TopBitCorrection {
    /// Whether the correction pass (and its extra register) is needed at all.
    pub fn needed(self) -> bool {
        self.birth_differs || self.survival_differs
    }
}

impl RuleSpec {
    /// The birth set as a 9-bit mask.
    pub fn birth_mask(self) -> u16 {
        self.births
    }

    /// The survival set as a 9-bit mask.
    pub fn survival_mask(self) -> u16 {
        self.survivals
    }

    fn has_birth(self, count: u8) -> bool {
        self.births >> count & 1 != 0
    }

    fn has_survival(self, count: u8) -> bool {
        self.survivals >> count & 1 != 0
    }

    /// The 16-bit integer that keys the circuit catalog.
    ///
    /// Bit `i` is the birth decision for neighbour count `i`; bit `i + 8`
    /// is the survival decision for neighbour count `i`. A count of 8
    /// never enters the integer; it aliases count 0 in the truncated
    /// count encoding and is handled by [`TopBitCorrection`].
    pub fn rule_integer(self) -> u16 {
        self.births & 0xff | (self.survivals & 0xff) << 8
    }

    /// How the rule treats a neighbour count of 8.
    pub fn top_bit_correction(self) -> TopBitCorrection {
        TopBitCorrection {
            birth_differs: self.has_birth(0) != self.has_birth(8),
            survival_differs: self.has_survival(0) != self.has_survival(8),
        }
    }

    /// Whether this is Conway's Game of Life, `b3s23`.
    pub fn is_standard_life(self) -> bool {
        self.births == 1 << 3 && self.survivals == 1 << 2 | 1 << 3
    }

    /// Whether gliders are known to exist in this rule.
    ///
    /// True exactly for the rules matching `b36?7?8?s0?235?6?7?8?`: the
    /// standard glider works in all of them.
    pub fn gliders_exist(self) -> bool {
        const B_REQUIRED: u16 = 1 << 3;
        const B_OPTIONAL: u16 = 1 << 6 | 1 << 7 | 1 << 8;
        const S_REQUIRED: u16 = 1 << 2 | 1 << 3;
        const S_OPTIONAL: u16 = 1 << 0 | 1 << 5 | 1 << 6 | 1 << 7 | 1 << 8;
        self.births & B_REQUIRED == B_REQUIRED
            && self.births & !(B_REQUIRED | B_OPTIONAL) == 0
            && self.survivals & S_REQUIRED == S_REQUIRED
            && self.survivals & !(S_REQUIRED | S_OPTIONAL) == 0
    }

    /// The rule string in the slashed `B3/S23` notation.
    pub fn slashed(self) -> String {
        let mut s = String::from("B");
        push_digits(&mut s, self.births);
        s.push_str("/S");
        push_digits(&mut s, self.survivals);
        s
    }
}

fn push_digits(s: &mut String, mask: u16) {
    for count in 0..=8 {
        if mask >> count & 1 != 0 {
            s.push((b'0' + count) as char);
        }
    }
}

impl FromStr for RuleSpec {
    type Err = Error;

    /// Parses the grammar `b<digits>s<digits>`, where the birth digits are
    /// a strictly increasing subsequence of `3..=8` and the survival
    /// digits a strictly increasing subsequence of `0..=8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedRule(s.to_string());
        let rest = s.strip_prefix('b').ok_or_else(malformed)?;
        let (b_digits, s_digits) = rest.split_once('s').ok_or_else(malformed)?;
        let births = parse_digits(b_digits, 3).ok_or_else(malformed)?;
        let survivals = parse_digits(s_digits, 0).ok_or_else(malformed)?;
        Ok(RuleSpec { births, survivals })
    }
}

/// Parses a strictly increasing, duplicate-free digit sequence into a
/// 9-bit mask. Returns `None` on any digit below `min`, above 8, or out
/// of order.
fn parse_digits(digits: &str, min: u8) -> Option<u16> {
    let mut mask = 0u16;
    let mut next = min;
    for c in digits.chars() {
        let d = c.to_digit(10)? as u8;
        if d < next || d > 8 {
            return None;
        }
        mask |= 1 << d;
        next = d + 1;
    }
    Some(mask)
}

impl Display for RuleSpec {
    /// The canonical `b<digits>s<digits>` form.
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        let mut s = String::from("b");
        push_digits(&mut s, self.births);
        s.push('s');
        push_digits(&mut s, self.survivals);
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_standard_life() {
        let rule: RuleSpec = "b3s23".parse().unwrap();
        assert_eq!(rule.birth_mask(), 0b1000);
        assert_eq!(rule.survival_mask(), 0b1100);
        assert!(rule.is_standard_life());
        assert_eq!(rule.rule_integer(), 3080);
    }

    #[test]
    fn reject_malformed() {
        for bad in [
            "b9s2", "b2s23", "b3s32", "b33s23", "B3/S23", "3s23", "b3", "b3x23", "b3s23 ",
        ] {
            assert_eq!(
                bad.parse::<RuleSpec>(),
                Err(Error::MalformedRule(bad.to_string())),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn empty_digit_runs_are_valid() {
        assert!("bs23".parse::<RuleSpec>().is_ok());
        assert!("b3s".parse::<RuleSpec>().is_ok());
        assert!("bs".parse::<RuleSpec>().is_ok());
    }

    #[test]
    fn top_bit_correction() {
        let plain: RuleSpec = "b3s23".parse().unwrap();
        assert!(!plain.top_bit_correction().needed());

        let b8: RuleSpec = "b38s23".parse().unwrap();
        assert!(b8.top_bit_correction().birth_differs);
        assert!(!b8.top_bit_correction().survival_differs);

        let s8: RuleSpec = "b3s238".parse().unwrap();
        assert!(!s8.top_bit_correction().birth_differs);
        assert!(s8.top_bit_correction().survival_differs);
    }

    #[test]
    fn rule_integer_ignores_count_eight() {
        // B8 and S8 never enter the integer; rules differing only in
        // count 8 share a circuit and differ in the correction pass.
        let plain: RuleSpec = "b3s23".parse().unwrap();
        let b8: RuleSpec = "b38s23".parse().unwrap();
        let s8: RuleSpec = "b3s238".parse().unwrap();
        assert_eq!(b8.rule_integer(), plain.rule_integer());
        assert_eq!(s8.rule_integer(), plain.rule_integer());
        let s7: RuleSpec = "b3s237".parse().unwrap();
        assert_eq!(s7.rule_integer(), 8 | (0b1000_1100 << 8));
    }

    #[test]
    fn gliders() {
        for good in ["b3s23", "b38s23", "b368s0235678", "b3s235"] {
            assert!(good.parse::<RuleSpec>().unwrap().gliders_exist(), "{}", good);
        }
        for bad in ["b34s23", "b3s234", "b3s2", "b3s123"] {
            assert!(!bad.parse::<RuleSpec>().unwrap().gliders_exist(), "{}", bad);
        }
    }

    #[test]
    fn slashed_form() {
        let rule: RuleSpec = "b36s125".parse().unwrap();
        assert_eq!(rule.slashed(), "B36/S125");
        assert_eq!(rule.to_string(), "b36s125");
    }
}
