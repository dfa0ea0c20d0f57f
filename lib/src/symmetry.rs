//! Soup symmetry classes.
//!
//! The symmetry class of the random soups decides the tile height that the
//! generated kernels are unrolled for: the asymmetric classes fit in 32
//! rows, while the symmetrised soups carry extra padding and need 40.

use crate::error::Error;
use educe::Educe;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The sixteen supported soup symmetry classes.
///
/// The names follow the usual crystallographic notation: `C` for cyclic,
/// `D` for dihedral, with the suffix describing how the symmetry centre
/// sits on the cell lattice.
#[derive(Clone, Copy, Debug, Educe, PartialEq, Eq, Hash)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Symmetry {
    /// `C1`. No symmetry at all.
    #[educe(Default)]
    C1,
    /// `C2_4`. 180° rotation about a cell-centre.
    #[cfg_attr(feature = "serde", serde(rename = "C2_4"))]
    C2Four,
    /// `C2_2`. 180° rotation about an edge-centre.
    #[cfg_attr(feature = "serde", serde(rename = "C2_2"))]
    C2Two,
    /// `C2_1`. 180° rotation about a vertex.
    #[cfg_attr(feature = "serde", serde(rename = "C2_1"))]
    C2One,
    /// `C4_4`. 90° rotation about a cell-centre.
    #[cfg_attr(feature = "serde", serde(rename = "C4_4"))]
    C4Four,
    /// `C4_1`. 90° rotation about a vertex.
    #[cfg_attr(feature = "serde", serde(rename = "C4_1"))]
    C4One,
    /// `D2_+2`. Reflection across an edge-centred orthogonal axis.
    #[cfg_attr(feature = "serde", serde(rename = "D2_+2"))]
    D2OrthoTwo,
    /// `D2_+1`. Reflection across a cell-centred orthogonal axis.
    #[cfg_attr(feature = "serde", serde(rename = "D2_+1"))]
    D2OrthoOne,
    /// `D2_x`. Reflection across a diagonal axis.
    #[cfg_attr(feature = "serde", serde(rename = "D2_x"))]
    D2Diag,
    /// `D4_+4`. Both orthogonal reflections, cell-centred.
    #[cfg_attr(feature = "serde", serde(rename = "D4_+4"))]
    D4OrthoFour,
    /// `D4_+2`. Both orthogonal reflections, edge-centred.
    #[cfg_attr(feature = "serde", serde(rename = "D4_+2"))]
    D4OrthoTwo,
    /// `D4_+1`. Both orthogonal reflections, vertex-centred.
    #[cfg_attr(feature = "serde", serde(rename = "D4_+1"))]
    D4OrthoOne,
    /// `D4_x4`. Both diagonal reflections, cell-centred.
    #[cfg_attr(feature = "serde", serde(rename = "D4_x4"))]
    D4DiagFour,
    /// `D4_x1`. Both diagonal reflections, vertex-centred.
    #[cfg_attr(feature = "serde", serde(rename = "D4_x1"))]
    D4DiagOne,
    /// `D8_4`. The full dihedral symmetry, cell-centred.
    #[cfg_attr(feature = "serde", serde(rename = "D8_4"))]
    D8Four,
    /// `D8_1`. The full dihedral symmetry, vertex-centred.
    #[cfg_attr(feature = "serde", serde(rename = "D8_1"))]
    D8One,
}

/// All symmetry class names, in the order they are documented.
pub const SYMMETRY_NAMES: [&str; 16] = [
    "C1", "C2_4", "C2_2", "C2_1", "C4_4", "C4_1", "D2_+2", "D2_+1", "D2_x", "D4_+4", "D4_+2",
    "D4_+1", "D4_x4", "D4_x1", "D8_4", "D8_1",
];

impl Symmetry {
    /// The number of cell rows in one tile for soups of this symmetry.
    ///
    /// `C1` and `D2_x` soups fit in 32 rows; all other classes are padded
    /// to 40.
    pub fn cell_rows(self) -> u32 {
        match self {
            Symmetry::C1 | Symmetry::D2Diag => 32,
            _ => 40,
        }
    }
}

impl FromStr for Symmetry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C1" => Ok(Symmetry::C1),
            "C2_4" => Ok(Symmetry::C2Four),
            "C2_2" => Ok(Symmetry::C2Two),
            "C2_1" => Ok(Symmetry::C2One),
            "C4_4" => Ok(Symmetry::C4Four),
            "C4_1" => Ok(Symmetry::C4One),
            "D2_+2" => Ok(Symmetry::D2OrthoTwo),
            "D2_+1" => Ok(Symmetry::D2OrthoOne),
            "D2_x" => Ok(Symmetry::D2Diag),
            "D4_+4" => Ok(Symmetry::D4OrthoFour),
            "D4_+2" => Ok(Symmetry::D4OrthoTwo),
            "D4_+1" => Ok(Symmetry::D4OrthoOne),
            "D4_x4" => Ok(Symmetry::D4DiagFour),
            "D4_x1" => Ok(Symmetry::D4DiagOne),
            "D8_4" => Ok(Symmetry::D8Four),
            "D8_1" => Ok(Symmetry::D8One),
            _ => Err(Error::InvalidTarget(s.to_string())),
        }
    }
}

impl Display for Symmetry {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        let s = match self {
            Symmetry::C1 => "C1",
            Symmetry::C2Four => "C2_4",
            Symmetry::C2Two => "C2_2",
            Symmetry::C2One => "C2_1",
            Symmetry::C4Four => "C4_4",
            Symmetry::C4One => "C4_1",
            Symmetry::D2OrthoTwo => "D2_+2",
            Symmetry::D2OrthoOne => "D2_+1",
            Symmetry::D2Diag => "D2_x",
            Symmetry::D4OrthoFour => "D4_+4",
            Symmetry::D4OrthoTwo => "D4_+2",
            Symmetry::D4OrthoOne => "D4_+1",
            Symmetry::D4DiagFour => "D4_x4",
            Symmetry::D4DiagOne => "D4_x1",
            Symmetry::D8Four => "D8_4",
            Symmetry::D8One => "D8_1",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_names() {
        for name in SYMMETRY_NAMES {
            let sym: Symmetry = name.parse().unwrap();
            assert_eq!(sym.to_string(), name);
        }
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            "D16".parse::<Symmetry>(),
            Err(Error::InvalidTarget(String::from("D16")))
        );
    }

    #[test]
    fn rows() {
        assert_eq!(Symmetry::C1.cell_rows(), 32);
        assert_eq!(Symmetry::D2Diag.cell_rows(), 32);
        assert_eq!(Symmetry::D8One.cell_rows(), 40);
    }
}
