//! The register allocator.
//!
//! Re-maps a circuit's logical register ids onto the six physical vector
//! slots reserved for circuit evaluation, respecting liveness over the
//! remainder of the gate sequence.

use crate::{
    circuit::Circuit,
    error::Error,
};

/// The number of physical slots available to circuit evaluation.
///
/// The remaining vector registers have fixed roles in the update pipeline
/// (shift scratch, row-mask constants, diff accumulators) and are never
/// handed to the allocator.
pub const PHYSICAL_SLOTS: u8 = 6;

/// Lowers a circuit from logical register ids to physical slots `0..6`.
///
/// For each gate in program order, the slots are scanned from 0 upwards;
/// a gate keeps the slot matching its own logical id if possible, and
/// otherwise takes the lowest slot that no later gate still reads. After
/// a slot is chosen, the logical id is rewritten to it in the gate's
/// destination and in every later source.
///
/// Fails with [`Error::RegisterExhaustion`] when a gate needs more
/// simultaneously live values than the slot pool offers; the circuit
/// cannot be lowered for this architecture. Deterministic for a given
/// input circuit.
pub fn allocate(circuit: &Circuit) -> Result<Circuit, Error> {
    let mut steps = circuit.steps().to_vec();
    for i in 0..steps.len() {
        let logical = steps[i].dest;

        // Logical ids still read by some gate after this one.
        let mut live_later = [false; 10];
        for later in &steps[i + 1..] {
            live_later[later.src1 as usize] = true;
            live_later[later.src2 as usize] = true;
        }

        let mut slot = None;
        for d in 0..PHYSICAL_SLOTS {
            if logical == d {
                slot = Some(d);
                break;
            }
            if !live_later[d as usize] {
                slot = Some(d);
                break;
            }
        }
        let slot = slot.ok_or(Error::RegisterExhaustion { step: i })?;

        steps[i].dest = slot;
        for later in &mut steps[i + 1..] {
            if later.src1 == logical {
                later.src1 = slot;
            }
            if later.src2 == logical {
                later.src2 = slot;
            }
        }
    }
    Ok(steps.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Evaluates a gate sequence over a register file, returning the value
    /// written by each step in order.
    fn trace(circuit: &Circuit, inputs: [bool; 4], slots: usize) -> Vec<bool> {
        let mut regs = vec![false; slots];
        regs[..4].copy_from_slice(&inputs);
        let mut written = Vec::new();
        for step in circuit.steps() {
            let a = regs[step.src1 as usize];
            let b = regs[step.src2 as usize];
            let v = match step.op {
                crate::circuit::Op::And => a & b,
                crate::circuit::Op::Or => a | b,
                crate::circuit::Op::AndNot => a & !b,
                crate::circuit::Op::Xor => a ^ b,
            };
            regs[step.dest as usize] = v;
            written.push(v);
        }
        written
    }

    #[test]
    fn allocation_preserves_every_gate_value() {
        // Two scratch values live at once, then folded into the output.
        let circuit = Circuit::decode("-014-4200531").unwrap();
        let allocated = allocate(&circuit).unwrap();
        assert!(allocated.steps().iter().all(|s| s.dest < PHYSICAL_SLOTS
            && s.src1 < PHYSICAL_SLOTS
            && s.src2 < PHYSICAL_SLOTS));
        for bits in 0u32..16 {
            let inputs = [bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0];
            assert_eq!(
                trace(&circuit, inputs, 16),
                trace(&allocated, inputs, PHYSICAL_SLOTS as usize),
                "inputs {:?}",
                inputs
            );
        }
    }

    #[test]
    fn prefers_own_slot() {
        // A single gate writing logical register 0 keeps slot 0.
        let circuit = Circuit::decode("0120").unwrap();
        let allocated = allocate(&circuit).unwrap();
        assert_eq!(allocated.steps()[0].dest, 0);
    }

    #[test]
    fn scratch_values_fall_into_free_slots() {
        let circuit = Circuit::decode("-014-4200531").unwrap();
        let allocated = allocate(&circuit).unwrap();
        // The first scratch output lands in slot 0: registers 0 and 1 are
        // dead after the first gate reads them.
        assert_eq!(allocated.steps()[0].dest, 0);
    }

    #[test]
    fn determinism() {
        let circuit = Circuit::decode("-014-4200531").unwrap();
        assert_eq!(allocate(&circuit).unwrap(), allocate(&circuit).unwrap());
    }

    #[test]
    fn exhaustion_is_reported_with_the_step() {
        // Six live values block every slot when the third scratch needs one.
        let circuit = Circuit::decode("-010-010-0100450101022303660").unwrap();
        assert_eq!(
            allocate(&circuit).unwrap_err(),
            Error::RegisterExhaustion { step: 2 }
        );
    }
}
