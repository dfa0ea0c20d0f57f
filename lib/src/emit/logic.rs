//! Emission of the per-row state-update logic.
//!
//! This is the tail of every row-block iteration: it consumes the
//! neighbour-count bit-planes left behind by the counting network and
//! produces the new cell-state bit-plane. The sequence is independent of
//! the vector width; only its rendering differs per backend.

use crate::{
    asm::InstructionSequence,
    circuit::{Circuit, Op},
    rule::RuleSpec,
};

/// Machine registers backing the six physical circuit slots.
///
/// Slots 0–3 are pre-bound by the counting network in registers 10, 8, 9
/// and 12; slot 0 doubles as the new-state output. Slots 4 and 5 borrow
/// the shift scratch registers 1 and 0.
pub const SLOT_REGS: [u8; 6] = [10, 8, 9, 12, 1, 0];

/// Emits the state-update logic for one row block.
///
/// The sequence has three parts: the bit-extraction preamble that turns
/// the raw adder outputs into clean count bit-planes (plus the extra
/// count-8 plane when the rule needs it), the quaternary Boolean function
/// itself, and the optional top-bit correction XOR.
///
/// The circuit must already be register-allocated. For `b3s23` a
/// hand-scheduled gate order is used instead of the catalog circuit; it
/// computes the same function with better instruction-level parallelism.
pub fn state_update(rule: RuleSpec, circuit: &Circuit) -> InstructionSequence {
    let correction = rule.top_bit_correction();
    let mut seq = InstructionSequence::new();

    seq.comment("extract bits of neighbour count:");
    seq.logic(Op::And, 8, 11, 1);
    seq.acc(Op::Xor, 11, 8);
    if correction.birth_differs && !correction.survival_differs {
        seq.logic(Op::And, 1, 9, 0);
        seq.logic(Op::AndNot, 0, 12, 11);
    } else if correction.needed() {
        seq.logic(Op::And, 1, 9, 11);
    }
    if correction.survival_differs && !correction.birth_differs {
        seq.acc(Op::And, 12, 11);
    }
    seq.acc(Op::Xor, 1, 9);

    seq.comment("compute appropriate quaternary Boolean function:");
    if rule.is_standard_life() {
        seq.acc(Op::Xor, 9, 8);
        seq.acc(Op::Or, 10, 12);
        seq.acc(Op::Xor, 9, 10);
        seq.acc(Op::And, 12, 8);
        seq.acc(Op::And, 8, 10);
    } else {
        for step in circuit.steps() {
            seq.logic(
                step.op,
                SLOT_REGS[step.src1 as usize],
                SLOT_REGS[step.src2 as usize],
                SLOT_REGS[step.dest as usize],
            );
        }
    }

    if correction.needed() {
        seq.comment("correct for B8/S8 nonsense:");
        seq.acc(Op::Xor, 11, 10);
    }
    seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{alloc::allocate, asm::Instr, catalog::Catalog};

    fn logic_ops(seq: &InstructionSequence) -> Vec<(Op, u8, u8, u8)> {
        seq.instrs()
            .iter()
            .filter_map(|instr| match instr {
                Instr::Logic {
                    op,
                    src1,
                    src2,
                    dst,
                    ..
                } => Some((*op, *src1, *src2, *dst)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn standard_life_uses_hand_scheduled_gates() {
        let rule: RuleSpec = "b3s23".parse().unwrap();
        let circuit = allocate(&Catalog::default().circuit(0).unwrap()).unwrap();
        let seq = state_update(rule, &circuit);
        let ops = logic_ops(&seq);
        // Three extraction gates, five function gates, no correction.
        assert_eq!(ops.len(), 8);
        assert_eq!(ops[3], (Op::Xor, 9, 8, 8));
        assert_eq!(ops[7], (Op::And, 8, 10, 10));
    }

    #[test]
    fn top_bit_rules_get_a_correction_gate() {
        let rule: RuleSpec = "b3s238".parse().unwrap();
        let circuit = allocate(&Catalog::default().circuit(0).unwrap()).unwrap();
        let seq = state_update(rule, &circuit);
        let ops = logic_ops(&seq);
        assert_eq!(*ops.last().unwrap(), (Op::Xor, 11, 10, 10));
        // survival_differs alone also masks the top-bit plane with the carry.
        assert!(ops.contains(&(Op::And, 12, 11, 11)));
    }

    #[test]
    fn circuit_gates_are_mapped_through_slot_registers() {
        // A rule that is not special-cased: the decoded gates must appear
        // in slot-register form, in order.
        let rule: RuleSpec = "b36s125".parse().unwrap();
        let circuit = allocate(&Circuit::decode("0124").unwrap()).unwrap();
        let seq = state_update(rule, &circuit);
        let ops = logic_ops(&seq);
        assert_eq!(ops[3], (Op::Xor, SLOT_REGS[1], SLOT_REGS[2], SLOT_REGS[0]));
    }
}
