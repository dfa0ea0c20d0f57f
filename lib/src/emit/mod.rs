//! Instruction emission for the per-tile update kernels.

pub mod diff;
pub mod logic;
mod tile;

use crate::{
    asm::{render, InstructionSequence},
    rule::RuleSpec,
    target::TileGeometry,
};
use std::fmt::Write;

pub use logic::state_update;

/// Emits the full source of one `updateTile` function.
///
/// The function advances the tile by two generations (the even and odd
/// passes) and ends with the diff fold and neighbour invalidation. In
/// history mode the "ever alive" plane is ORed with the current state
/// before each pass, and the passes run as separate inline-asm blocks so
/// the bookkeeping loops can run in between.
pub fn update_function(
    rule: RuleSpec,
    geom: TileGeometry,
    state_update: &InstructionSequence,
    history: bool,
) -> String {
    let target = geom.target;
    let mut out = String::new();

    out.push_str("\n\n    // Code generated by ruleasm\n\n");
    let _ = writeln!(out, "    // Tile size: 32 * {}", geom.rows);
    let _ = writeln!(out, "    // Rule: {}\n", rule);
    let _ = writeln!(
        out,
        "    void updateTile_{}_{}(VersaTile* sqt) {{\n",
        target.name(),
        if history { "history" } else { "nohistory" }
    );
    out.push_str("        uint32_t e[ROWS];\n\n");

    if history {
        out.push_str("        for (int i = 2; i < ROWS - 2; i++) {sqt->hist[i] |= sqt->d[i]; }\n");
    }
    let mut even = InstructionSequence::new();
    tile::update_pass(&mut even, geom, state_update, false, history);
    out.push_str(&render(&even, target));

    if history {
        out.push_str("        for (int i = 2; i < ROWS - 2; i++) {sqt->hist[i] |= e[i-1]; }\n");
    }
    let mut odd = InstructionSequence::new();
    tile::update_pass(&mut odd, geom, state_update, true, history);
    out.push_str(&render(&odd, target));

    out.push_str(&diff::invalidation(target));
    out.push_str("    }\n\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{alloc::allocate, catalog::Catalog, symmetry::Symmetry, target::Target};

    fn kernel(target: Target, history: bool) -> String {
        let rule: RuleSpec = "b3s23".parse().unwrap();
        let circuit = allocate(&Catalog::default().circuit(0).unwrap()).unwrap();
        let logic = state_update(rule, &circuit);
        update_function(rule, TileGeometry::new(target, Symmetry::C1), &logic, history)
    }

    #[test]
    fn function_names_carry_backend_and_mode() {
        assert!(kernel(Target::Avx2, false).contains("void updateTile_avx2_nohistory(VersaTile* sqt) {"));
        assert!(kernel(Target::Sse2, true).contains("void updateTile_sse2_history(VersaTile* sqt) {"));
    }

    #[test]
    fn history_mode_maintains_the_ever_alive_plane() {
        let text = kernel(Target::Avx1, true);
        assert!(text.contains("sqt->hist[i] |= sqt->d[i];"));
        assert!(text.contains("sqt->hist[i] |= e[i-1];"));
        assert_eq!(text.matches("asm (").count(), 2);
        let text = kernel(Target::Avx1, false);
        assert!(!text.contains("sqt->hist"));
        assert_eq!(text.matches("asm (").count(), 1);
    }

    #[test]
    fn clobber_lists_cover_the_register_bank() {
        let text = kernel(Target::Sse2, false);
        assert!(text.contains("\"ebx\", \"xmm0\", "));
        assert!(text.contains("\"xmm15\", \"memory\");"));
        let text = kernel(Target::Avx2, false);
        assert!(!text.contains("\"ebx\""));
        assert!(text.contains("\"r\" (globarray)"));
    }

    #[test]
    fn circuit_logic_is_emitted_once_per_row_block_pair() {
        // C1 on AVX2: each pass runs the vertical step four times, and
        // every vertical step is followed by the state-update logic.
        let text = kernel(Target::Avx2, false);
        assert_eq!(
            text.matches("compute appropriate quaternary Boolean function:").count(),
            8
        );
    }
}
