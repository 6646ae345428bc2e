//! Structural steel grades (EN 10025-2)
//!
//! The selection engine only needs the characteristic yield strength `fyk`.
//! Values are the nominal yield strengths for thicknesses up to 16 mm.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CalcError;
use crate::units::MegaPascals;

/// Hot-rolled structural steel grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    S235,
    S275,
    S355,
    S420,
    S460,
}

impl SteelGrade {
    /// All grades for iteration
    pub const ALL: [SteelGrade; 5] = [
        SteelGrade::S235,
        SteelGrade::S275,
        SteelGrade::S355,
        SteelGrade::S420,
        SteelGrade::S460,
    ];

    /// Characteristic yield strength
    pub fn fyk(&self) -> MegaPascals {
        let fyk = match self {
            SteelGrade::S235 => 235.0,
            SteelGrade::S275 => 275.0,
            SteelGrade::S355 => 355.0,
            SteelGrade::S420 => 420.0,
            SteelGrade::S460 => 460.0,
        };
        MegaPascals(fyk)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SteelGrade::S235 => "S235",
            SteelGrade::S275 => "S275",
            SteelGrade::S355 => "S355",
            SteelGrade::S420 => "S420",
            SteelGrade::S460 => "S460",
        }
    }
}

impl fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (fyk = {} MPa)", self.display_name(), self.fyk().0)
    }
}

impl FromStr for SteelGrade {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SteelGrade::ALL
            .into_iter()
            .find(|g| g.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CalcError::invalid_input("grade", s, "Expected one of S235, S275, S355, S420, S460")
            })
    }
}
