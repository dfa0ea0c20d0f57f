//! The parameter block consumed by the downstream build.
//!
//! A block of macro definitions describing the generated kernels: the
//! rule in both notations, the tile geometry constants, the raw
//! birth/survival masks and the rule's feature flags.

use crate::{rule::RuleSpec, symmetry::Symmetry};
use bitflags::bitflags;
use std::fmt::Write;

bitflags! {
    /// Boolean feature flags exposed to the downstream build.
    #[derive(Default)]
    pub struct RuleFlags: u8 {
        /// The rule is Conway's Game of Life.
        const STANDARD_LIFE = 0b0000_0001;
        /// Gliders are known to exist in the rule.
        const GLIDERS_EXIST = 0b0000_0010;
    }
}

/// The feature flags of a rule.
pub fn rule_flags(rule: RuleSpec) -> RuleFlags {
    let mut flags = RuleFlags::empty();
    if rule.is_standard_life() {
        flags |= RuleFlags::STANDARD_LIFE;
    }
    if rule.gliders_exist() {
        flags |= RuleFlags::GLIDERS_EXIST;
    }
    flags
}

/// Renders the parameter block for one (rule, symmetry) pair.
pub fn parameter_block(rule: RuleSpec, symmetry: Symmetry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#define SYMMETRY \"{}\"", symmetry);
    let _ = writeln!(out, "#define RULESTRING \"{}\"", rule);
    let _ = writeln!(out, "#define RULESTRING_SLASHED \"{}\"", rule.slashed());
    out.push_str("#define BITTAGE 32\n");
    let _ = writeln!(out, "#define ROWS {}", symmetry.cell_rows());
    out.push_str("#define THSPACE 28\n");
    out.push_str("#define MIDDLE28 0x3ffffffcu\n");
    let _ = writeln!(out, "#define BIRTHS {}", rule.birth_mask());
    let _ = writeln!(out, "#define SURVIVALS {}", rule.survival_mask());
    out.push_str("typedef uint32_t urow_t;\n");
    if symmetry == Symmetry::C1 {
        out.push_str("#define C1_SYMMETRY 1\n");
    }
    let flags = rule_flags(rule);
    if flags.contains(RuleFlags::STANDARD_LIFE) {
        out.push_str("#define STANDARD_LIFE 1\n");
    }
    if flags.contains(RuleFlags::GLIDERS_EXIST) {
        out.push_str("#define GLIDERS_EXIST 1\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_life_block() {
        let rule: RuleSpec = "b3s23".parse().unwrap();
        let block = parameter_block(rule, Symmetry::C1);
        assert!(block.contains("#define SYMMETRY \"C1\""));
        assert!(block.contains("#define RULESTRING \"b3s23\""));
        assert!(block.contains("#define RULESTRING_SLASHED \"B3/S23\""));
        assert!(block.contains("#define ROWS 32"));
        assert!(block.contains("#define BIRTHS 8"));
        assert!(block.contains("#define SURVIVALS 12"));
        assert!(block.contains("#define STANDARD_LIFE 1"));
        assert!(block.contains("#define GLIDERS_EXIST 1"));
        assert!(block.contains("#define C1_SYMMETRY 1"));
    }

    #[test]
    fn highlife_block_has_no_flags() {
        let rule: RuleSpec = "b36s23".parse().unwrap();
        let block = parameter_block(rule, Symmetry::D8One);
        assert!(block.contains("#define ROWS 40"));
        assert!(!block.contains("STANDARD_LIFE"));
        assert!(!block.contains("C1_SYMMETRY"));
        assert!(block.contains("#define GLIDERS_EXIST 1"));
        assert_eq!(rule_flags(rule), RuleFlags::GLIDERS_EXIST);
    }
}
