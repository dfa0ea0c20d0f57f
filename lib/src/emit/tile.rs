//! The per-tile update pipeline.
//!
//! One shared algorithm, parameterised by the backend: load each row
//! block, count horizontal neighbours with a half-adder network, combine
//! three vertically adjacent rows with the backend's lane-rotation
//! primitive and a full-adder network, then apply the rule circuit. The
//! whole tile is unrolled twice, phase-shifted by one row block, so each
//! call advances the tile by two generations; the odd pass also derives
//! the per-row-block change masks that drive invalidation.

use crate::{
    asm::{Base, Instr, InstructionSequence, MemRef},
    circuit::Op,
    target::{Target, TileGeometry},
};

/// The interior-column mask: bits 2..30 of each 32-bit row.
const MIDDLE28: u32 = 0x3fff_fffc;

/// Emits one unrolled pass over the tile.
///
/// The even pass reads the tile rows through `%0` and writes the
/// intermediate generation to the scratch array `%1`; the odd pass reads
/// the scratch array and merges the result back into the tile two rows
/// up, leaving the three diff rows behind in the scratch array.
///
/// A pass opens its own inline-asm block unless it continues the even
/// pass's block, which happens exactly when nothing (i.e. no history
/// bookkeeping) has to run between the two passes.
pub(crate) fn update_pass(
    seq: &mut InstructionSequence,
    geom: TileGeometry,
    state_update: &InstructionSequence,
    odd: bool,
    history: bool,
) {
    let target = geom.target;
    let quadrows = geom.quadrows();
    let regbytes = target.reg_bytes();

    if history || !odd {
        seq.push(Instr::AsmOpen);
    }

    // Row-mask and lane-rotation constants: register 13 selects lanes for
    // the vertical rotation, register 14 masks the interior columns.
    if target == Target::Avx2 {
        if odd {
            seq.load(MemRef::new(Base::Consts, 0), 14);
        }
        if history || !odd {
            seq.load(MemRef::new(Base::Consts, 32), 13);
        }
    } else if history || !odd {
        seq.push(Instr::MovImm32 { value: 0xffff_ffff });
        seq.push(Instr::MovdToVec { dst: 13 });
        seq.push(Instr::MovImm32 { value: MIDDLE28 });
        seq.push(Instr::MovdToVec { dst: 14 });
        seq.push(Instr::ShuffleWords {
            imm: 1,
            src: 13,
            dst: 13,
        });
        seq.push(Instr::ShuffleWords {
            imm: 0,
            src: 14,
            dst: 14,
        });
    }

    // The narrower backends fold the trailing half-block into the last
    // full iteration of the odd pass; AVX2 needs one extra iteration.
    let blocks = quadrows + u32::from(!(odd && regbytes == 16));

    for i in 0..blocks {
        if i < quadrows {
            let src = MemRef::new(
                if odd { Base::Temp } else { Base::Tile },
                regbytes * i,
            );
            seq.comment("calculate row-wise parity and carry:");
            // Row blocks alternate between two register triples so that
            // the vertical step always sees the previous block intact.
            let (state, parity, carry) = if i % 2 == 0 { (5, 6, 7) } else { (2, 3, 4) };
            seq.load(src, state);
            if target.vex() {
                seq.push(Instr::ShiftRight1 { src: state, dst: 0 });
                seq.push(Instr::ShiftLeft1 { src: state, dst: 1 });
            } else {
                seq.push(Instr::Move { src: state, dst: 0 });
                seq.push(Instr::Move { src: state, dst: 1 });
                seq.push(Instr::ShiftRight1 { src: 0, dst: 0 });
                seq.push(Instr::ShiftLeft1 { src: 1, dst: 1 });
            }
            seq.logic(Op::Xor, 0, 1, parity);
            seq.logic(Op::And, 0, 1, carry);
            seq.logic(Op::And, state, parity, 1);
            seq.acc(Op::Xor, state, parity);
            seq.acc(Op::Or, 1, carry);
        }

        if i > 0 {
            let dst = if odd {
                MemRef::new(Base::Tile, regbytes * (i - 1) + 8)
            } else {
                MemRef::new(Base::Temp, regbytes * (i - 1))
            };

            seq.comment("apply vertical bitshifts:");
            vertical_shift(seq, target, i);

            let m = (i % 2) as u8;
            let (lo, hi) = (3 + 3 * m, 4 + 3 * m);
            seq.comment("apply vertical full-adders:");
            seq.acc(Op::Xor, lo, 8);
            seq.acc(Op::Xor, hi, 9);
            seq.acc(Op::Xor, 8, 10);
            seq.acc(Op::Xor, 9, 11);
            seq.acc(Op::Or, 8, lo);
            seq.acc(Op::Or, 9, hi);
            seq.acc(Op::And, 10, 8);
            seq.acc(Op::And, 11, 9);
            seq.acc(Op::AndNot, lo, 8);
            seq.acc(Op::AndNot, hi, 9);

            seq.extend(state_update);

            if odd {
                seq.comment("determine diff:");
                if i == quadrows {
                    // Only reached on AVX2: the tile height is half a
                    // register short, so the merge drops to xmm width.
                    narrow_merge(seq, dst);
                } else {
                    seq.acc(Op::And, 14, 10);
                    seq.load(dst, 8);
                    seq.logic(Op::AndNot, 8, 14, 11);
                    seq.acc(Op::Or, 10, 11);
                    seq.store(11, dst);
                }

                if i == 1 {
                    seq.logic(Op::Xor, 11, 8, 15);
                    seq.comment("save diff:");
                    seq.store(15, MemRef::new(Base::Temp, 0));
                } else {
                    seq.acc(Op::Xor, 11, 8);
                    seq.acc(Op::Or, 8, 15);
                }

                let last = if regbytes == 16 { quadrows - 1 } else { quadrows };
                if i == last {
                    seq.comment("save diffs:");
                    if target == Target::Avx2 {
                        seq.store(8, MemRef::new(Base::Temp, 64));
                        seq.store(15, MemRef::new(Base::Temp, 32));
                    } else {
                        seq.store(8, MemRef::new(Base::Temp, 32));
                        seq.store(15, MemRef::new(Base::Temp, 16));
                    }
                }
            } else {
                seq.comment("store result:");
                seq.store(10, dst);
            }
        }
    }

    if odd || history {
        seq.push(Instr::AsmClose {
            operands: operand_fragment(target),
            clobbers: clobber_fragment(target),
        });
    }
}

/// Rotates the previous block's sum/carry/state planes down by one row
/// against the current block's, leaving the three shifted copies in
/// registers 8, 9 and 12 and the two-row shifts in 10 and 11.
fn vertical_shift(seq: &mut InstructionSequence, target: Target, i: u32) {
    let m = (i % 2) as u8;
    let (lo, hi, st) = (3 + 3 * m, 4 + 3 * m, 2 + 3 * m);
    let (olo, ohi, ost) = (6 - 3 * m, 7 - 3 * m, 5 - 3 * m);
    match target {
        Target::Avx2 => {
            for (mask, src1, src2, dst) in [
                (1, olo, lo, 8),
                (1, ohi, hi, 9),
                (3, olo, lo, 10),
                (3, ohi, hi, 11),
                (1, ost, st, 12),
            ] {
                seq.push(Instr::Blend {
                    mask,
                    src1,
                    src2,
                    dst,
                });
            }
            seq.push(Instr::Permute { table: 13, reg: 8 });
            seq.push(Instr::Permute { table: 13, reg: 9 });
            seq.push(Instr::PermuteQuad { imm: 57, reg: 10 });
            seq.push(Instr::PermuteQuad { imm: 57, reg: 11 });
            seq.push(Instr::Permute { table: 13, reg: 12 });
        }
        Target::Avx1 => {
            seq.logic(Op::And, 13, lo, 8);
            seq.logic(Op::And, 13, hi, 9);
            seq.logic(Op::And, 13, st, 12);
            for (other, dst) in [(olo, 8), (ohi, 9), (ost, 12)] {
                seq.logic(Op::AndNot, other, 13, 0);
                seq.acc(Op::Or, 0, dst);
            }
            shuffle(seq, 0x39, 8, 8);
            shuffle(seq, 0x39, 9, 9);
            seq.push(Instr::Shuffle {
                imm: 0x4e,
                src1: olo,
                src2: lo,
                dst: 10,
            });
            seq.push(Instr::Shuffle {
                imm: 0x4e,
                src1: ohi,
                src2: hi,
                dst: 11,
            });
            shuffle(seq, 0x39, 12, 12);
        }
        Target::Sse2 => {
            for (src, dst) in [(lo, 8), (hi, 9), (lo, 10), (hi, 11), (st, 12)] {
                seq.push(Instr::Move { src, dst });
            }
            for (other, dst) in [(olo, 8), (ohi, 9), (ost, 12)] {
                seq.push(Instr::Move { src: 13, dst: 0 });
                seq.acc(Op::And, 13, dst);
                seq.logic(Op::AndNot, other, 0, 0);
                seq.acc(Op::Or, 0, dst);
            }
            shuffle(seq, 0x39, 8, 8);
            shuffle(seq, 0x39, 9, 9);
            shuffle(seq, 0x4e, olo, 10);
            shuffle(seq, 0x4e, ohi, 11);
            shuffle(seq, 0x39, 12, 12);
        }
    }
}

fn shuffle(seq: &mut InstructionSequence, imm: u8, src1: u8, dst: u8) {
    seq.push(Instr::Shuffle {
        imm,
        src1,
        src2: dst,
        dst,
    });
}

/// The xmm-width merge of the final half row block (AVX2 odd pass only).
fn narrow_merge(seq: &mut InstructionSequence, dst: MemRef) {
    for instr in [
        Instr::Logic {
            op: Op::And,
            src1: 14,
            src2: 10,
            dst: 10,
            narrow: true,
        },
        Instr::Load {
            src: dst,
            dst: 8,
            narrow: true,
        },
        Instr::Logic {
            op: Op::AndNot,
            src1: 8,
            src2: 14,
            dst: 11,
            narrow: true,
        },
        Instr::Logic {
            op: Op::Or,
            src1: 10,
            src2: 11,
            dst: 11,
            narrow: true,
        },
        Instr::Store {
            src: 11,
            dst,
            narrow: true,
        },
    ] {
        seq.push(instr);
    }
}

fn operand_fragment(target: Target) -> String {
    match target {
        Target::Avx2 => String::from("\"r\" (sqt->d), \"r\" (e), \"r\" (globarray)"),
        _ => String::from("\"r\" (sqt->d), \"r\" (e)"),
    }
}

fn clobber_fragment(target: Target) -> String {
    let mut clobbers = String::new();
    if !matches!(target, Target::Avx2) {
        clobbers.push_str("\"ebx\", ");
    }
    for i in 0..16 {
        clobbers.push_str(&format!("\"xmm{}\", ", i));
    }
    clobbers.push_str("\"memory\"");
    clobbers
}
