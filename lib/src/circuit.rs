//! Boolean circuits for the birth/survival decision.
//!
//! A circuit is a short ordered list of binary gates over logical
//! registers. Registers 0–3 are pre-bound by the neighbour-counting
//! network (count low bit, count high bit, carry, cell state); register
//! `4 + g` names the output of the `g`-th gate.

/// A binary Boolean gate operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// `dest = src1 & src2`.
    And,
    /// `dest = src1 | src2`.
    Or,
    /// `dest = src1 & !src2` (in the operand convention of `vpandn`).
    AndNot,
    /// `dest = src1 ^ src2`.
    Xor,
}

impl Op {
    /// The x86 mnemonic stem; prefixed with `p` or `vp` at rendering.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::And => "and",
            Op::Or => "or",
            Op::AndNot => "andn",
            Op::Xor => "xor",
        }
    }
}

/// One gate: `dest = src1 op src2` over logical or physical registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateStep {
    /// Destination register id.
    pub dest: u8,
    /// First source register id.
    pub src1: u8,
    /// Second source register id.
    pub src2: u8,
    /// The gate operation.
    pub op: Op,
}

/// An ordered gate sequence computing the new-state bit from the four
/// pre-bound inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Circuit {
    steps: Vec<GateStep>,
}

impl Circuit {
    /// The gates in program order.
    pub fn steps(&self) -> &[GateStep] {
        &self.steps
    }

    /// The number of gates.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Decodes a catalog identifier into a circuit.
    ///
    /// The identifier is read in groups of 4 symbols: destination, first
    /// source, second source, opcode. A `-` in the destination position of
    /// group `g` resolves to logical register `4 + g`, the group's own
    /// output slot. Opcode digit 3 denotes an ANDN with reversed operands
    /// and is normalised here: the sources are swapped and the opcode
    /// rewritten to the canonical [`Op::AndNot`].
    ///
    /// Returns `None` if the identifier is not well-formed; the catalog
    /// loader skips such lines.
    pub fn decode(identifier: &str) -> Option<Self> {
        let symbols: Vec<char> = identifier.chars().collect();
        if symbols.is_empty() || symbols.len() % 4 != 0 {
            return None;
        }
        let mut steps = Vec::with_capacity(symbols.len() / 4);
        for (group, chunk) in symbols.chunks(4).enumerate() {
            let field = |i: usize| -> Option<u8> {
                let c = chunk[i];
                if c == '-' && i == 0 {
                    Some(4 + group as u8)
                } else {
                    c.to_digit(10).map(|d| d as u8)
                }
            };
            let dest = field(0)?;
            let mut src1 = field(1)?;
            let mut src2 = field(2)?;
            let op = match chunk[3].to_digit(10)? {
                0 => Op::And,
                1 => Op::Or,
                2 => Op::AndNot,
                3 => {
                    std::mem::swap(&mut src1, &mut src2);
                    Op::AndNot
                }
                4 => Op::Xor,
                _ => return None,
            };
            steps.push(GateStep {
                dest,
                src1,
                src2,
                op,
            });
        }
        Some(Circuit { steps })
    }
}

impl From<Vec<GateStep>> for Circuit {
    fn from(steps: Vec<GateStep>) -> Self {
        Circuit { steps }
    }
}
