mod alloc;
pub mod asm;
mod catalog;
mod circuit;
pub mod emit;
mod error;
mod gen;
mod params;
mod rule;
mod symmetry;
mod target;

pub use alloc::{allocate, PHYSICAL_SLOTS};
pub use catalog::Catalog;
pub use circuit::{Circuit, GateStep, Op};
pub use error::Error;
pub use gen::{generate, Artifacts, TargetArtifacts};
pub use params::{parameter_block, rule_flags, RuleFlags};
pub use rule::{RuleSpec, TopBitCorrection};
pub use symmetry::{Symmetry, SYMMETRY_NAMES};
pub use target::{Target, TileGeometry};
