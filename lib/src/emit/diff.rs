//! Diff combination and neighbour invalidation.
//!
//! The odd pass leaves three vector-register-sized change masks in the
//! scratch array: the first row block's diff, the accumulated interior
//! diff, and the last row block's diff. This module emits the C logic
//! that folds them into the three diff words and decides which of the six
//! neighbouring tiles must be re-examined.

use crate::target::Target;
use std::fmt::Write;
use std::ops::RangeInclusive;

/// Which diff word a neighbour test reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffWord {
    /// The OR of the two rows adjoining the top edge.
    Top,
    /// The OR of all interior rows.
    Big,
    /// The OR of the two rows adjoining the bottom edge.
    Bot,
}

/// The six neighbour tests: diff word, column mask, direction index.
///
/// Two masks per word, one per half: a tile's horizontal neighbours see
/// one 14-column half of the boundary each, and the vertical neighbours
/// see the two interior columns at either end of the interior diff.
pub const NEIGHBOUR_TESTS: [(DiffWord, u32, u8); 6] = [
    (DiffWord::Big, 0x3000_0000, 5),
    (DiffWord::Big, 0x0000_000c, 2),
    (DiffWord::Top, 0x3fff_c000, 0),
    (DiffWord::Top, 0x0003_fffc, 1),
    (DiffWord::Bot, 0x3fff_c000, 4),
    (DiffWord::Bot, 0x0003_fffc, 3),
];

/// The scratch-array rows folded into each diff word.
///
/// Only the layout depends on the vector width: the three saved diff
/// registers land at different row indices.
pub fn diff_rows(target: Target) -> [(DiffWord, RangeInclusive<usize>); 3] {
    match target {
        Target::Avx2 => [
            (DiffWord::Top, 0..=1),
            (DiffWord::Big, 8..=15),
            (DiffWord::Bot, 18..=19),
        ],
        _ => [
            (DiffWord::Top, 0..=1),
            (DiffWord::Big, 4..=7),
            (DiffWord::Bot, 10..=11),
        ],
    }
}

fn word_name(word: DiffWord) -> &'static str {
    match word {
        DiffWord::Top => "topdiff",
        DiffWord::Big => "bigdiff",
        DiffWord::Bot => "botdiff",
    }
}

/// Emits the diff fold and the invalidation logic.
///
/// If any interior row changed, the tile's cached population and hash are
/// marked stale and the tile is enqueued on the modified worklist; the
/// enqueue is guarded by the tile-local update flag so repeated
/// invalidations do not enqueue twice. The six neighbour tests then fire
/// independently of each other.
pub fn invalidation(target: Target) -> String {
    let mut out = String::new();
    out.push_str("        // The diffs we're interested in:\n");
    for (word, rows) in diff_rows(target) {
        let terms: Vec<String> = rows.map(|r| format!("e[{}]", r)).collect();
        let _ = writeln!(
            out,
            "        uint32_t {} = {};",
            word_name(word),
            terms.join(" | ")
        );
    }
    out.push_str("        if (bigdiff) {\n");
    out.push_str("            sqt->populationCurrent = false;\n");
    out.push_str("            sqt->hashCurrent = false;\n");
    out.push_str("            if (sqt->updateflags == 0) { modified.push_back(sqt); }\n");
    out.push_str("            sqt->updateflags |= 64;\n");
    for (word, mask, direction) in NEIGHBOUR_TESTS {
        let _ = writeln!(
            out,
            "            if ({} & 0x{:08x}u) {{ updateNeighbour(sqt, {}); }}",
            word_name(word),
            mask,
            direction
        );
    }
    out.push_str("        }\n\n");
    out
}
