//! # Selection Engine
//!
//! One request in, one ranked result table and one pick out:
//!
//! ```text
//! SelectionRequest ─► validate ─► filter::select ─► analysis::evaluate (per candidate)
//!                                                          │
//!                     SelectionOutcome ◄─ selection::pick ◄─ selection::rank
//! ```
//!
//! Input errors are raised before any computation. Neither "nothing matched
//! the filter" nor "nothing is adequate" is an error; both are reported
//! through [`SelectionStatus`].
//!
//! ## Example
//!
//! ```rust
//! use profile_core::analysis::DemandCase;
//! use profile_core::catalog::builtin_catalog;
//! use profile_core::engine::{run, SelectionRequest, SelectionStatus};
//! use profile_core::filter::FilterCriteria;
//! use profile_core::materials::SteelGrade;
//!
//! let catalog = builtin_catalog().unwrap();
//! let request = SelectionRequest {
//!     demand: DemandCase::with_grade(80.0, 60.0, SteelGrade::S235),
//!     criteria: FilterCriteria::new(["IPE"]),
//! };
//!
//! let outcome = run(catalog, &request).unwrap();
//! assert_eq!(outcome.status, SelectionStatus::Adequate);
//! println!("Use {}", outcome.selection.unwrap().candidate.profile.name);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::{evaluate_with, DemandCase};
use crate::catalog::ProfileCatalog;
use crate::errors::CalcResult;
use crate::filter::{self, FilterCriteria};
use crate::selection::{self, EvaluatedProfile, Selection};
use crate::settings::AnalysisSettings;

/// Everything the engine needs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub demand: DemandCase,
    pub criteria: FilterCriteria,
}

impl SelectionRequest {
    pub fn new(demand: DemandCase, criteria: FilterCriteria) -> Self {
        SelectionRequest { demand, criteria }
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.demand.validate()?;
        self.criteria.validate()
    }
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStatus {
    /// An adequate profile was found
    Adequate,
    /// Candidates exist but all are overstressed; the pick is the least bad one
    NoAdequateCandidate,
    /// The filter left nothing to evaluate
    NoMatch,
}

impl fmt::Display for SelectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SelectionStatus::Adequate => "adequate profile found",
            SelectionStatus::NoAdequateCandidate => "no adequate profile, showing least overstressed",
            SelectionStatus::NoMatch => "no profile matches the filter",
        };
        f.write_str(text)
    }
}

/// Ranked results plus the pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    /// Every eligible candidate, ascending by utilization
    pub candidates: Vec<EvaluatedProfile>,
    /// `None` exactly when `status` is `NoMatch`
    pub selection: Option<Selection>,
    pub status: SelectionStatus,
}

impl SelectionOutcome {
    pub fn is_no_match(&self) -> bool {
        self.status == SelectionStatus::NoMatch
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selection
            .as_ref()
            .map(|s| s.candidate.profile.name.as_str())
    }
}

/// Run a selection with the default analysis settings.
pub fn run(catalog: &ProfileCatalog, request: &SelectionRequest) -> CalcResult<SelectionOutcome> {
    run_with(catalog, request, &AnalysisSettings::default())
}

/// Run a selection with explicit analysis settings.
pub fn run_with(
    catalog: &ProfileCatalog,
    request: &SelectionRequest,
    settings: &AnalysisSettings,
) -> CalcResult<SelectionOutcome> {
    request.validate()?;
    settings.validate()?;

    let eligible = filter::select(catalog, &request.criteria)?;
    if eligible.is_empty() {
        tracing::info!("no catalog profile matches the filter criteria");
        return Ok(SelectionOutcome {
            candidates: Vec::new(),
            selection: None,
            status: SelectionStatus::NoMatch,
        });
    }

    let evaluated = eligible
        .into_iter()
        .map(|profile| {
            evaluate_with(profile, &request.demand, settings)
                .map(|utilization| EvaluatedProfile::new(profile.clone(), utilization))
        })
        .collect::<CalcResult<Vec<_>>>()?;

    let candidates = selection::rank(evaluated);
    let selection = selection::pick(&candidates);

    let status = match &selection {
        Some(s) if s.is_adequate => SelectionStatus::Adequate,
        Some(_) => SelectionStatus::NoAdequateCandidate,
        None => SelectionStatus::NoMatch,
    };

    match &selection {
        Some(s) => tracing::info!(
            candidates = candidates.len(),
            profile = %s.candidate.profile.name,
            max_ratio = s.candidate.max_ratio(),
            %status,
            "selection finished"
        ),
        None => tracing::info!(%status, "selection finished"),
    }

    Ok(SelectionOutcome {
        candidates,
        selection,
        status,
    })
}
