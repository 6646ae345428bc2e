//! # Stress Analysis
//!
//! Combined bending and shear check of one profile under one demand.
//!
//! ## Formulas
//!
//! ```text
//! sigma_n   = M / Wel                        bending stress
//! tau       = V / Avz                        mean shear stress
//! sigma_eq  = sqrt(sigma_n² + 3·tau²)        von Mises equivalent stress
//! sigma_lim = fyk / gamma_m
//! tau_lim   = fyk / (gamma_m · sqrt(3))
//! ```
//!
//! The governing utilization is the largest of `sigma_n/sigma_lim`,
//! `tau/tau_lim` and `sigma_eq/sigma_lim`. Anything above 1.0 is overstressed.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::analysis::{evaluate, DemandCase};
//! use profile_core::catalog::ProfileRecord;
//!
//! let profile = ProfileRecord::new("Test", "IPE").with_wel(1200.0).with_avz(100.0);
//! let demand = DemandCase::new(100.0, 50.0, 235.0);
//!
//! let result = evaluate(&profile, &demand).unwrap();
//! assert!(result.is_adequate());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::ProfileRecord;
use crate::errors::{CalcError, CalcResult};
use crate::materials::SteelGrade;
use crate::settings::AnalysisSettings;
use crate::units::{KiloNewtonMeters, KiloNewtons, MegaPascals};

/// Utilization at or below this value is adequate
pub const UTILIZATION_LIMIT: f64 = 1.0;

/// One evaluation request: actions plus material strength.
///
/// ## JSON Example
///
/// ```json
/// { "moment": 100.0, "shear": 50.0, "fyk": 235.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandCase {
    /// Bending moment M (kN·m)
    pub moment: KiloNewtonMeters,
    /// Shear force V (kN)
    pub shear: KiloNewtons,
    /// Characteristic yield strength (MPa)
    pub fyk: MegaPascals,
}

impl DemandCase {
    pub fn new(moment_knm: f64, shear_kn: f64, fyk_mpa: f64) -> Self {
        DemandCase {
            moment: KiloNewtonMeters(moment_knm),
            shear: KiloNewtons(shear_kn),
            fyk: MegaPascals(fyk_mpa),
        }
    }

    pub fn with_grade(moment_knm: f64, shear_kn: f64, grade: SteelGrade) -> Self {
        DemandCase {
            moment: KiloNewtonMeters(moment_knm),
            shear: KiloNewtons(shear_kn),
            fyk: grade.fyk(),
        }
    }

    /// Reject negative or non-finite actions and a non-positive `fyk`.
    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("M", self.moment.0)?;
        check_non_negative("V", self.shear.0)?;
        if !self.fyk.0.is_finite() || self.fyk.0 <= 0.0 {
            return Err(CalcError::invalid_input(
                "fyk",
                self.fyk.0.to_string(),
                "Yield strength must be positive",
            ));
        }
        Ok(())
    }
}

fn check_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value must be finite"));
    }
    if value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value cannot be negative"));
    }
    Ok(())
}

/// Which check produced the governing utilization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoverningCheck {
    Bending,
    Shear,
    Combined,
}

impl fmt::Display for GoverningCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoverningCheck::Bending => "bending",
            GoverningCheck::Shear => "shear",
            GoverningCheck::Combined => "combined",
        };
        f.write_str(label)
    }
}

/// Stresses and utilizations of one profile under one demand.
///
/// Created fresh by [`evaluate`] and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationResult {
    pub sigma_n: MegaPascals,
    pub tau: MegaPascals,
    pub sigma_eq: MegaPascals,
    pub sigma_lim: MegaPascals,
    pub tau_lim: MegaPascals,
    pub ratio_sigma: f64,
    pub ratio_tau: f64,
    pub ratio_eq: f64,
    /// Governing utilization: max of the three ratios
    pub max_ratio: f64,
}

/// Ratios scaled to percent, for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationPercentages {
    pub sigma: f64,
    pub tau: f64,
    pub eq: f64,
    pub max: f64,
}

impl UtilizationResult {
    pub fn is_adequate(&self) -> bool {
        self.max_ratio <= UTILIZATION_LIMIT
    }

    /// Ties go to bending, then shear.
    pub fn governing(&self) -> GoverningCheck {
        if self.ratio_sigma >= self.max_ratio {
            GoverningCheck::Bending
        } else if self.ratio_tau >= self.max_ratio {
            GoverningCheck::Shear
        } else {
            GoverningCheck::Combined
        }
    }

    pub fn as_percentages(&self) -> UtilizationPercentages {
        UtilizationPercentages {
            sigma: self.ratio_sigma * 100.0,
            tau: self.ratio_tau * 100.0,
            eq: self.ratio_eq * 100.0,
            max: self.max_ratio * 100.0,
        }
    }
}

/// Evaluate a profile with the default partial safety factor.
pub fn evaluate(profile: &ProfileRecord, demand: &DemandCase) -> CalcResult<UtilizationResult> {
    evaluate_with(profile, demand, &AnalysisSettings::default())
}

/// Evaluate a profile with explicit analysis settings.
///
/// Fails with [`CalcError::InvalidProfile`] when `Wel` or `Avz` is absent or
/// not positive; the candidate filter keeps such profiles away from here.
pub fn evaluate_with(
    profile: &ProfileRecord,
    demand: &DemandCase,
    settings: &AnalysisSettings,
) -> CalcResult<UtilizationResult> {
    demand.validate()?;
    settings.validate()?;

    let wel = match profile.wel {
        Some(wel) if wel.0 > 0.0 => wel,
        Some(_) => return Err(CalcError::invalid_profile(&profile.name, "section modulus Wel must be positive")),
        None => return Err(CalcError::invalid_profile(&profile.name, "section modulus Wel is absent")),
    };
    let avz = match profile.avz {
        Some(avz) if avz.0 > 0.0 => avz,
        Some(_) => return Err(CalcError::invalid_profile(&profile.name, "shear area Avz must be positive")),
        None => return Err(CalcError::invalid_profile(&profile.name, "shear area Avz is absent")),
    };

    // N·mm / mm³ and N / mm² both land in MPa
    let sigma_n = demand.moment.to_newton_millimeters() / wel.to_mm3();
    let tau = demand.shear.to_newtons() / avz.to_mm2();
    let sigma_eq = (sigma_n.powi(2) + 3.0 * tau.powi(2)).sqrt();

    let sigma_lim = demand.fyk.0 / settings.gamma_m;
    let tau_lim = demand.fyk.0 / (settings.gamma_m * 3.0_f64.sqrt());

    let ratio_sigma = sigma_n / sigma_lim;
    let ratio_tau = tau / tau_lim;
    let ratio_eq = sigma_eq / sigma_lim;
    let max_ratio = ratio_sigma.max(ratio_tau).max(ratio_eq);

    tracing::trace!(profile = %profile.name, sigma_n, tau, sigma_eq, max_ratio, "profile evaluated");

    Ok(UtilizationResult {
        sigma_n: MegaPascals(sigma_n),
        tau: MegaPascals(tau),
        sigma_eq: MegaPascals(sigma_eq),
        sigma_lim: MegaPascals(sigma_lim),
        tau_lim: MegaPascals(tau_lim),
        ratio_sigma,
        ratio_tau,
        ratio_eq,
        max_ratio,
    })
}
