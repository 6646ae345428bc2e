//! # Unit Types
//!
//! Type-safe wrappers for the units that flow through the selection engine.
//! Each one is a plain `f64` newtype so JSON stays clean (just numbers).
//!
//! ## Units
//!
//! Catalog tables for hot-rolled sections mix three scales, and mixing them up
//! is the classic way to be off by a factor of 1000:
//! - Geometry (h, b, tw, tf, r): millimeters
//! - Section properties: cm² (Avz), cm³ (Wel), cm⁴ (Iv)
//! - Mass: kg/m
//!
//! Demands are in kN (shear) and kN·m (moment); stresses come out in MPa
//! (N/mm²). Every conversion goes through a named constant below.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::units::{CubicCentimeters, KiloNewtonMeters};
//!
//! let m = KiloNewtonMeters(100.0);
//! let wel = CubicCentimeters(800.0);
//! let sigma = m.to_newton_millimeters() / wel.to_mm3();
//! assert!((sigma - 125.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Newtons per kilonewton
pub const N_PER_KN: f64 = 1e3;

/// N·mm per kN·m (1e3 N/kN × 1e3 mm/m)
pub const NMM_PER_KNM: f64 = 1e6;

/// mm² per cm²
pub const MM2_PER_CM2: f64 = 1e2;

/// mm³ per cm³
pub const MM3_PER_CM3: f64 = 1e3;

// ============================================================================
// Geometry
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

// ============================================================================
// Section Properties
// ============================================================================

/// Area in cm² (shear area)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqCentimeters(pub f64);

/// Section modulus in cm³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicCentimeters(pub f64);

/// Moment of inertia in cm⁴
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuarticCentimeters(pub f64);

/// Mass per unit length in kg/m
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerMeter(pub f64);

impl SqCentimeters {
    pub fn to_mm2(self) -> f64 {
        self.0 * MM2_PER_CM2
    }
}

impl CubicCentimeters {
    pub fn to_mm3(self) -> f64 {
        self.0 * MM3_PER_CM3
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Moment in kilonewton-meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

impl KiloNewtons {
    pub fn to_newtons(self) -> f64 {
        self.0 * N_PER_KN
    }
}

impl KiloNewtonMeters {
    pub fn to_newton_millimeters(self) -> f64 {
        self.0 * NMM_PER_KNM
    }
}

// ============================================================================
// Stress
// ============================================================================

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaPascals(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(SqCentimeters);
impl_arithmetic!(CubicCentimeters);
impl_arithmetic!(QuarticCentimeters);
impl_arithmetic!(KgPerMeter);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(KiloNewtonMeters);
impl_arithmetic!(MegaPascals);
