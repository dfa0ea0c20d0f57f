//! SIMD backends and tile geometry.

use crate::{error::Error, symmetry::Symmetry};
use educe::Educe;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A SIMD backend, i.e. the vector width the kernel is emitted for.
///
/// All three backends compute bit-identical results; they differ in how
/// many rows travel per register and in which lane-manipulation
/// primitives are available.
#[derive(Clone, Copy, Debug, Educe, PartialEq, Eq, Hash)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Target {
    /// 128-bit vectors, legacy two-operand encodings.
    #[cfg_attr(feature = "serde", serde(rename = "sse2"))]
    Sse2,
    /// 192-bit effective width: VEX three-operand encodings on xmm
    /// registers, processing one and a half loads per row block.
    #[cfg_attr(feature = "serde", serde(rename = "avx1"))]
    Avx1,
    /// 256-bit vectors with full-width lane blend and permute.
    #[educe(Default)]
    #[cfg_attr(feature = "serde", serde(rename = "avx2"))]
    Avx2,
}

impl Target {
    /// All backends, narrowest first.
    pub const ALL: [Target; 3] = [Target::Sse2, Target::Avx1, Target::Avx2];

    /// The nominal vector width in bits.
    pub fn width_bits(self) -> u32 {
        match self {
            Target::Sse2 => 128,
            Target::Avx1 => 192,
            Target::Avx2 => 256,
        }
    }

    /// Bytes moved per vector load or store.
    pub fn reg_bytes(self) -> u32 {
        match self {
            Target::Avx2 => 32,
            _ => 16,
        }
    }

    /// 32-bit rows moved per vector load or store.
    pub fn rows_per_load(self) -> u32 {
        self.reg_bytes() / 4
    }

    /// The machine-type name used in artifact file names and function
    /// suffixes.
    pub fn name(self) -> &'static str {
        match self {
            Target::Sse2 => "sse2",
            Target::Avx1 => "avx1",
            Target::Avx2 => "avx2",
        }
    }

    /// The register-name prefix in AT&T syntax.
    pub fn reg_prefix(self) -> &'static str {
        match self {
            Target::Avx2 => "ymm",
            _ => "xmm",
        }
    }

    /// The unaligned load/store mnemonic.
    pub fn accessor(self) -> &'static str {
        match self {
            Target::Sse2 => "movups",
            _ => "vmovdqu",
        }
    }

    /// Whether VEX three-operand encodings are available.
    pub fn vex(self) -> bool {
        !matches!(self, Target::Sse2)
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sse2" => Ok(Target::Sse2),
            "avx1" => Ok(Target::Avx1),
            "avx2" => Ok(Target::Avx2),
            _ => Err(Error::InvalidTarget(s.to_string())),
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

/// How one tile maps onto vector registers for a given backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGeometry {
    /// The backend the kernel is emitted for.
    pub target: Target,
    /// Total number of 32-bit cell rows in the tile.
    pub rows: u32,
}

impl TileGeometry {
    /// Fixes the geometry for one backend and symmetry class.
    pub fn new(target: Target, symmetry: Symmetry) -> Self {
        TileGeometry {
            target,
            rows: symmetry.cell_rows(),
        }
    }

    /// The number of unrolled row blocks ("quadrows") per tile.
    pub fn quadrows(self) -> u32 {
        self.rows / self.target.rows_per_load()
    }
}
