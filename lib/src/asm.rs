//! The instruction model and its renderer.
//!
//! Emission builds an explicit [`InstructionSequence`] value; a separate
//! renderer turns it into the C-embedded AT&T inline-assembly text. This
//! keeps the pipeline algorithm testable independently of formatting, and
//! replaces mnemonic string-pasting with a closed instruction enumeration
//! whose per-width encodings live in one place.

use crate::{circuit::Op, target::Target};
use std::fmt::Write;

/// A machine vector-register number (0–15).
pub type Reg = u8;

/// The inline-asm operand a memory reference is based on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base {
    /// `%0`: the tile's cell rows.
    Tile,
    /// `%1`: the per-call scratch array holding the intermediate
    /// generation and the diff rows.
    Temp,
    /// `%2`: the global constant array (permutation tables and row
    /// masks); only referenced by the 256-bit backend.
    Consts,
}

impl Base {
    fn operand(self) -> &'static str {
        match self {
            Base::Tile => "%0",
            Base::Temp => "%1",
            Base::Consts => "%2",
        }
    }
}

/// A byte-offset memory reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemRef {
    /// Which inline-asm operand the address comes from.
    pub base: Base,
    /// Byte offset from the base.
    pub offset: u32,
}

impl MemRef {
    /// A reference at a byte offset from a base operand.
    pub fn new(base: Base, offset: u32) -> Self {
        MemRef { base, offset }
    }

    fn render(self) -> String {
        if self.offset == 0 {
            format!("({})", self.base.operand())
        } else {
            format!("{}({})", self.offset, self.base.operand())
        }
    }
}

/// One emitted operation.
///
/// The enumeration is closed over everything the three backends need;
/// `narrow` marks the few 256-bit instructions that drop to xmm encodings
/// for the final half-width row block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instr {
    /// An assembly comment line.
    Comment(&'static str),
    /// Vector load from memory.
    Load {
        src: MemRef,
        dst: Reg,
        narrow: bool,
    },
    /// Vector store to memory.
    Store {
        src: Reg,
        dst: MemRef,
        narrow: bool,
    },
    /// Register-to-register move (`movdqa`); only the 128-bit backend
    /// needs it.
    Move { src: Reg, dst: Reg },
    /// Shift every 32-bit lane right by one bit. The 128-bit backend
    /// shifts in place, so its emitters keep `src == dst`.
    ShiftRight1 { src: Reg, dst: Reg },
    /// Shift every 32-bit lane left by one bit.
    ShiftLeft1 { src: Reg, dst: Reg },
    /// Three-operand logical operation `dst = src1 op src2` in the
    /// operand convention of the VEX encodings; the renderer lowers it to
    /// two-operand form for the 128-bit backend.
    Logic {
        op: Op,
        src1: Reg,
        src2: Reg,
        dst: Reg,
        narrow: bool,
    },
    /// 32-bit lane blend (`vpblendd`), 256-bit only.
    Blend {
        mask: u8,
        src1: Reg,
        src2: Reg,
        dst: Reg,
    },
    /// Full-lane permute through a table register (`vpermd`), 256-bit
    /// only.
    Permute { table: Reg, reg: Reg },
    /// 64-bit lane permute by immediate (`vpermq`), 256-bit only.
    PermuteQuad { imm: u8, reg: Reg },
    /// Cross-register 32-bit lane shuffle (`shufps`). The 128-bit backend
    /// encodes two operands, so its emitters keep `src2 == dst`.
    Shuffle {
        imm: u8,
        src1: Reg,
        src2: Reg,
        dst: Reg,
    },
    /// 32-bit lane broadcast/shuffle by immediate (`pshufd`).
    ShuffleWords { imm: u8, src: Reg, dst: Reg },
    /// Load a 32-bit immediate into the scratch GPR (`mov $imm, %ebx`).
    MovImm32 { value: u32 },
    /// Move the scratch GPR into the low lane of a vector register.
    MovdToVec { dst: Reg },
    /// Open an inline-asm block.
    AsmOpen,
    /// Close an inline-asm block with its literal operand and clobber
    /// fragments.
    AsmClose { operands: String, clobbers: String },
}

/// An ordered, append-only list of emitted operations.
///
/// Built once per (rule, geometry, history mode) triple and never mutated
/// after emission completes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstructionSequence {
    instrs: Vec<Instr>,
}

impl InstructionSequence {
    /// An empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// The emitted operations in order.
    pub fn instrs(&self) -> &[Instr] {
        &self.instrs
    }

    /// Appends one operation.
    pub fn push(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    /// Appends every operation of another sequence.
    pub fn extend(&mut self, other: &InstructionSequence) {
        self.instrs.extend_from_slice(&other.instrs);
    }

    /// Appends a comment line.
    pub fn comment(&mut self, text: &'static str) {
        self.push(Instr::Comment(text));
    }

    /// Appends `dst = src1 op src2`.
    pub fn logic(&mut self, op: Op, src1: Reg, src2: Reg, dst: Reg) {
        self.push(Instr::Logic {
            op,
            src1,
            src2,
            dst,
            narrow: false,
        });
    }

    /// Appends the accumulating form `dst = src op dst`.
    pub fn acc(&mut self, op: Op, src: Reg, dst: Reg) {
        self.logic(op, src, dst, dst);
    }

    /// Appends a load.
    pub fn load(&mut self, src: MemRef, dst: Reg) {
        self.push(Instr::Load {
            src,
            dst,
            narrow: false,
        });
    }

    /// Appends a store.
    pub fn store(&mut self, src: Reg, dst: MemRef) {
        self.push(Instr::Store {
            src,
            dst,
            narrow: false,
        });
    }
}

/// Renders a sequence as the body text of a C function using GCC inline
/// assembly, in the encodings of the given backend.
pub fn render(seq: &InstructionSequence, target: Target) -> String {
    let mut out = String::new();
    for instr in seq.instrs() {
        render_instr(instr, target, &mut out);
    }
    out
}

fn instr_line(out: &mut String, text: &str) {
    let _ = writeln!(out, "                \"{} \\n\\t\"", text);
}

fn render_instr(instr: &Instr, target: Target, out: &mut String) {
    let prefix = target.reg_prefix();
    match instr {
        Instr::Comment(text) => {
            let _ = writeln!(out, "                // {}", text);
        }
        Instr::Load { src, dst, narrow } => {
            let prefix = if *narrow { "xmm" } else { prefix };
            instr_line(
                out,
                &format!("{} {}, %%{}{}", target.accessor(), src.render(), prefix, dst),
            );
        }
        Instr::Store { src, dst, narrow } => {
            let prefix = if *narrow { "xmm" } else { prefix };
            instr_line(
                out,
                &format!("{} %%{}{}, {}", target.accessor(), prefix, src, dst.render()),
            );
        }
        Instr::Move { src, dst } => {
            instr_line(out, &format!("movdqa %%xmm{}, %%xmm{}", src, dst));
        }
        Instr::ShiftRight1 { src, dst } => render_shift(out, target, "srld", *src, *dst),
        Instr::ShiftLeft1 { src, dst } => render_shift(out, target, "slld", *src, *dst),
        Instr::Logic {
            op,
            src1,
            src2,
            dst,
            narrow,
        } => render_logic(out, target, *op, *src1, *src2, *dst, *narrow),
        Instr::Blend {
            mask,
            src1,
            src2,
            dst,
        } => {
            instr_line(
                out,
                &format!(
                    "vpblendd ${}, %%ymm{}, %%ymm{}, %%ymm{}",
                    mask, src1, src2, dst
                ),
            );
        }
        Instr::Permute { table, reg } => {
            instr_line(out, &format!("vpermd %%ymm{0}, %%ymm{1}, %%ymm{0}", reg, table));
        }
        Instr::PermuteQuad { imm, reg } => {
            instr_line(out, &format!("vpermq ${0}, %%ymm{1}, %%ymm{1}", imm, reg));
        }
        Instr::Shuffle {
            imm,
            src1,
            src2,
            dst,
        } => {
            if target.vex() {
                instr_line(
                    out,
                    &format!(
                        "vshufps $0x{:02x}, %%xmm{}, %%xmm{}, %%xmm{}",
                        imm, src1, src2, dst
                    ),
                );
            } else {
                debug_assert_eq!(src2, dst);
                instr_line(out, &format!("shufps $0x{:02x}, %%xmm{}, %%xmm{}", imm, src1, dst));
            }
        }
        Instr::ShuffleWords { imm, src, dst } => {
            let mnemonic = if target.vex() { "vpshufd" } else { "pshufd" };
            instr_line(out, &format!("{} ${}, %%xmm{}, %%xmm{}", mnemonic, imm, src, dst));
        }
        Instr::MovImm32 { value } => {
            instr_line(out, &format!("mov $0x{:08x}, %%ebx", value));
        }
        Instr::MovdToVec { dst } => {
            instr_line(out, &format!("movd %%ebx, %%xmm{}", dst));
        }
        Instr::AsmOpen => {
            out.push_str("        asm (\n");
        }
        Instr::AsmClose { operands, clobbers } => {
            out.push_str("                : /* no output operands */ \n");
            let _ = writeln!(out, "                : {} ", operands);
            let _ = writeln!(out, "                : {});", clobbers);
            out.push('\n');
        }
    }
}

fn render_shift(out: &mut String, target: Target, mnemonic: &str, src: Reg, dst: Reg) {
    match target {
        Target::Avx2 => instr_line(out, &format!("vp{} $1, %%ymm{}, %%ymm{}", mnemonic, src, dst)),
        Target::Avx1 => instr_line(out, &format!("vp{} $1, %%xmm{}, %%xmm{}", mnemonic, src, dst)),
        Target::Sse2 => {
            debug_assert_eq!(src, dst);
            instr_line(out, &format!("p{} $1, %%xmm{}", mnemonic, dst));
        }
    }
}

fn render_logic(
    out: &mut String,
    target: Target,
    op: Op,
    src1: Reg,
    src2: Reg,
    dst: Reg,
    narrow: bool,
) {
    match target {
        Target::Avx2 if !narrow => {
            instr_line(
                out,
                &format!("vp{} %%ymm{}, %%ymm{}, %%ymm{}", op.mnemonic(), src1, src2, dst),
            );
        }
        Target::Avx1 | Target::Avx2 => {
            instr_line(
                out,
                &format!("vp{} %%xmm{}, %%xmm{}, %%xmm{}", op.mnemonic(), src1, src2, dst),
            );
        }
        Target::Sse2 => {
            if src2 == dst {
                instr_line(out, &format!("p{} %%xmm{}, %%xmm{}", op.mnemonic(), src1, dst));
            } else if src1 == dst {
                if op == Op::AndNot {
                    // No commuted form exists: a & !b with a in place is
                    // rewritten as ((a | b) ^ b).
                    instr_line(out, &format!("por %%xmm{}, %%xmm{}", src2, dst));
                    instr_line(out, &format!("pxor %%xmm{}, %%xmm{}", src2, dst));
                } else {
                    instr_line(out, &format!("p{} %%xmm{}, %%xmm{}", op.mnemonic(), src2, dst));
                }
            } else {
                instr_line(out, &format!("movdqa %%xmm{}, %%xmm{}", src2, dst));
                instr_line(out, &format!("p{} %%xmm{}, %%xmm{}", op.mnemonic(), src1, dst));
            }
        }
    }
}
