//! # Optimal Selector
//!
//! Picks the best-fitting profile from a set of evaluated candidates.
//!
//! ## Rule
//!
//! - If any candidate is adequate (`max_ratio <= 1.0`), pick the adequate one
//!   with the **largest** `max_ratio`: the tightest design that still works.
//! - Otherwise pick the candidate with the **smallest** `max_ratio`, the least
//!   overstressed one, and flag the pick as not adequate.
//!
//! ## Ordering
//!
//! Candidates are ranked by `max_ratio`, then by mass per length (a profile
//! without a mass sorts after one with a mass), then by name. Among adequate
//! candidates sharing the largest ratio, the first in that order wins, i.e.
//! the lightest one.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::analysis::UtilizationResult;
use crate::catalog::ProfileRecord;

/// A profile together with its utilization under the current demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedProfile {
    pub profile: ProfileRecord,
    pub utilization: UtilizationResult,
}

impl EvaluatedProfile {
    pub fn new(profile: ProfileRecord, utilization: UtilizationResult) -> Self {
        EvaluatedProfile { profile, utilization }
    }

    pub fn max_ratio(&self) -> f64 {
        self.utilization.max_ratio
    }

    pub fn is_adequate(&self) -> bool {
        self.utilization.is_adequate()
    }
}

/// The chosen candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub candidate: EvaluatedProfile,
    /// False when no candidate satisfies the demand; `candidate` is then the
    /// least overstressed one.
    pub is_adequate: bool,
}

/// Total order used for ranking candidates.
pub fn compare_candidates(a: &EvaluatedProfile, b: &EvaluatedProfile) -> Ordering {
    a.max_ratio()
        .total_cmp(&b.max_ratio())
        .then_with(|| compare_mass(a, b))
        .then_with(|| a.profile.name.cmp(&b.profile.name))
}

fn compare_mass(a: &EvaluatedProfile, b: &EvaluatedProfile) -> Ordering {
    match (a.profile.mass_per_length, b.profile.mass_per_length) {
        (Some(ma), Some(mb)) => ma.0.total_cmp(&mb.0),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort candidates into ranking order (ascending utilization).
pub fn rank(mut evaluated: Vec<EvaluatedProfile>) -> Vec<EvaluatedProfile> {
    evaluated.sort_by(compare_candidates);
    evaluated
}

/// Choose the best-fitting candidate. Input order does not matter.
///
/// Returns `None` only for an empty input.
pub fn pick(evaluated: &[EvaluatedProfile]) -> Option<Selection> {
    let mut ordered: Vec<&EvaluatedProfile> = evaluated.iter().collect();
    ordered.sort_by(|a, b| compare_candidates(a, b));

    // Adequate candidates form a prefix of the ascending order.
    let safe_len = ordered.partition_point(|c| c.is_adequate());

    if safe_len > 0 {
        let safe = &ordered[..safe_len];
        let top_ratio = safe[safe_len - 1].max_ratio();
        let chosen = safe
            .iter()
            .find(|c| c.max_ratio().total_cmp(&top_ratio) == Ordering::Equal)
            .copied()?;
        tracing::debug!(profile = %chosen.profile.name, max_ratio = chosen.max_ratio(), "adequate profile selected");
        return Some(Selection {
            candidate: chosen.clone(),
            is_adequate: true,
        });
    }

    let least = ordered.first().copied()?;
    tracing::debug!(
        profile = %least.profile.name,
        max_ratio = least.max_ratio(),
        "no adequate profile, least overstressed selected"
    );
    Some(Selection {
        candidate: least.clone(),
        is_adequate: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::MegaPascals;

    fn candidate(name: &str, max_ratio: f64, mass: Option<f64>) -> EvaluatedProfile {
        let mut profile = ProfileRecord::new(name, "IPE").with_wel(100.0).with_avz(10.0);
        profile.mass_per_length = mass.map(crate::units::KgPerMeter);
        let utilization = UtilizationResult {
            sigma_n: MegaPascals(0.0),
            tau: MegaPascals(0.0),
            sigma_eq: MegaPascals(0.0),
            sigma_lim: MegaPascals(156.67),
            tau_lim: MegaPascals(90.45),
            ratio_sigma: max_ratio,
            ratio_tau: 0.0,
            ratio_eq: max_ratio,
            max_ratio,
        };
        EvaluatedProfile::new(profile, utilization)
    }

    #[test]
    fn test_empty_input() {
        assert!(pick(&[]).is_none());
    }

    #[test]
    fn test_picks_tightest_adequate() {
        let set = vec![
            candidate("A", 0.35, Some(10.0)),
            candidate("B", 1.40, Some(5.0)),
            candidate("C", 0.92, Some(30.0)),
            candidate("D", 0.61, Some(20.0)),
        ];
        let selection = pick(&set).unwrap();
        assert!(selection.is_adequate);
        assert_eq!(selection.candidate.profile.name, "C");
    }

    #[test]
    fn test_exactly_one_is_adequate() {
        let set = vec![candidate("A", 1.0, None), candidate("B", 1.0000001, None)];
        let selection = pick(&set).unwrap();
        assert!(selection.is_adequate);
        assert_eq!(selection.candidate.profile.name, "A");
    }

    #[test]
    fn test_least_overstressed_when_none_adequate() {
        let set = vec![
            candidate("A", 2.5, None),
            candidate("B", 1.2, None),
            candidate("C", 1.7, None),
        ];
        let selection = pick(&set).unwrap();
        assert!(!selection.is_adequate);
        assert_eq!(selection.candidate.profile.name, "B");
    }

    #[test]
    fn test_tie_prefers_lighter() {
        let set = vec![
            candidate("HEAVY", 0.8, Some(50.0)),
            candidate("LIGHT", 0.8, Some(40.0)),
            candidate("NOMASS", 0.8, None),
        ];
        let selection = pick(&set).unwrap();
        assert_eq!(selection.candidate.profile.name, "LIGHT");
    }

    #[test]
    fn test_tie_falls_back_to_name() {
        let set = vec![candidate("Z", 0.8, Some(40.0)), candidate("M", 0.8, Some(40.0))];
        assert_eq!(pick(&set).unwrap().candidate.profile.name, "M");

        let overstressed = vec![candidate("Z", 1.3, None), candidate("M", 1.3, None)];
        assert_eq!(pick(&overstressed).unwrap().candidate.profile.name, "M");
    }

    #[test]
    fn test_pick_independent_of_input_order() {
        let mut set = vec![
            candidate("A", 0.5, Some(1.0)),
            candidate("B", 0.9, Some(2.0)),
            candidate("C", 0.9, Some(1.5)),
            candidate("D", 1.1, Some(0.5)),
        ];
        let first = pick(&set).unwrap();
        set.reverse();
        let second = pick(&set).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.candidate.profile.name, "C");
    }

    #[test]
    fn test_rank_order() {
        let ranked = rank(vec![
            candidate("C", 0.9, None),
            candidate("A", 0.2, None),
            candidate("B", 0.9, Some(3.0)),
        ]);
        let names: Vec<&str> = ranked.iter().map(|c| c.profile.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_no_safe_candidate_beats_selection() {
        let set: Vec<EvaluatedProfile> = (0..12)
            .map(|i| candidate(&format!("P{:02}", i), 0.1 * i as f64, None))
            .collect();
        let selection = pick(&set).unwrap();
        assert!(selection.is_adequate);
        assert!(selection.candidate.max_ratio() <= 1.0);
        assert!(set
            .iter()
            .filter(|c| c.is_adequate())
            .all(|c| c.max_ratio() <= selection.candidate.max_ratio()));
    }
}
