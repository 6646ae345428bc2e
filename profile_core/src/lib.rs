//! # profile_core - Steel Profile Selection Engine
//!
//! Given a bending moment, a shear force and a steel grade, `profile_core`
//! filters a catalog of standard hot-rolled sections, runs a combined
//! bending/shear stress check on each candidate, and picks the best-fitting
//! profile.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over an immutable, load-once catalog
//! - **JSON-First**: Requests, results and errors all serialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Typed Units**: cm³, cm², kN·m and MPa never get mixed up silently
//!
//! ## Quick Start
//!
//! ```rust
//! use profile_core::prelude::*;
//!
//! let catalog = builtin_catalog().unwrap();
//! let request = SelectionRequest::new(
//!     DemandCase::with_grade(120.0, 80.0, SteelGrade::S355),
//!     FilterCriteria::new(["IPE", "HEA"]),
//! );
//!
//! let outcome = run(catalog, &request).unwrap();
//! if let Some(pick) = &outcome.selection {
//!     println!("{} at {:.0}%", pick.candidate.profile.name, pick.candidate.max_ratio() * 100.0);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Profile records, catalog, loader and load-once cache
//! - [`analysis`] - Combined stress check of one profile under one demand
//! - [`filter`] - Candidate filtering by family, completeness and inertia
//! - [`selection`] - Ranking and optimal pick
//! - [`engine`] - One-call facade over the whole pipeline
//! - [`materials`] - Steel grades
//! - [`settings`] - TOML configuration
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod catalog;
pub mod engine;
pub mod errors;
pub mod filter;
pub mod materials;
pub mod selection;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use catalog::{ProfileCatalog, ProfileRecord};
pub use engine::{run, SelectionOutcome, SelectionRequest, SelectionStatus};

/// Everything needed for a typical selection run
pub mod prelude {
    pub use crate::analysis::{evaluate, DemandCase, UtilizationResult};
    pub use crate::catalog::{builtin_catalog, Family, ProfileCatalog, ProfileRecord};
    pub use crate::engine::{run, run_with, SelectionOutcome, SelectionRequest, SelectionStatus};
    pub use crate::errors::{CalcError, CalcResult};
    pub use crate::filter::FilterCriteria;
    pub use crate::materials::SteelGrade;
    pub use crate::selection::{EvaluatedProfile, Selection};
    pub use crate::settings::EngineSettings;
}
