//! # Candidate Filter
//!
//! Narrows the catalog to profiles worth evaluating: the right family, a
//! usable `Wel` and `Avz`, and optionally a minimum moment of inertia.
//!
//! An empty result is a normal "no match" outcome, not an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{Family, ProfileCatalog, ProfileRecord};
use crate::errors::{CalcError, CalcResult};
use crate::settings::SelectionSettings;

/// Which profiles may be considered.
///
/// ## JSON Example
///
/// ```json
/// { "families": ["IPE", "HEA"], "min_inertia_cm4": 5000.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Allowed families (must not be empty)
    pub families: BTreeSet<Family>,
    /// Minimum `Iv` in cm⁴; 0 disables the check
    #[serde(default)]
    pub min_inertia_cm4: f64,
}

impl FilterCriteria {
    pub fn new<I, F>(families: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Family>,
    {
        FilterCriteria {
            families: families.into_iter().map(Into::into).collect(),
            min_inertia_cm4: 0.0,
        }
    }

    /// Accept every family present in `catalog`.
    pub fn all_families(catalog: &ProfileCatalog) -> Self {
        FilterCriteria {
            families: catalog.families(),
            min_inertia_cm4: 0.0,
        }
    }

    /// Build criteria from configured defaults. An empty family list in the
    /// settings means every family of `catalog`.
    pub fn from_settings(settings: &SelectionSettings, catalog: &ProfileCatalog) -> Self {
        let base = if settings.families.is_empty() {
            Self::all_families(catalog)
        } else {
            Self::new(settings.families.iter().map(String::as_str))
        };
        base.with_min_inertia(settings.min_inertia_cm4)
    }

    pub fn with_min_inertia(mut self, min_cm4: f64) -> Self {
        self.min_inertia_cm4 = min_cm4;
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.families.is_empty() {
            return Err(CalcError::missing_field("families"));
        }
        if !self.min_inertia_cm4.is_finite() || self.min_inertia_cm4 < 0.0 {
            return Err(CalcError::invalid_input(
                "min_inertia_cm4",
                self.min_inertia_cm4.to_string(),
                "Minimum inertia must be zero (disabled) or positive",
            ));
        }
        Ok(())
    }

    /// Whether a single record passes every constraint.
    pub fn accepts(&self, profile: &ProfileRecord) -> bool {
        if !profile.is_analyzable() || !self.families.contains(&profile.family) {
            return false;
        }
        self.min_inertia_cm4 <= 0.0 || profile.meets_inertia(self.min_inertia_cm4)
    }
}

/// Return every catalog record the criteria accept.
///
/// The result follows catalog order, but callers must not rely on any
/// particular order; ranking belongs to the selector.
pub fn select<'a>(catalog: &'a ProfileCatalog, criteria: &FilterCriteria) -> CalcResult<Vec<&'a ProfileRecord>> {
    criteria.validate()?;

    let eligible: Vec<&ProfileRecord> = catalog.iter().filter(|p| criteria.accepts(p)).collect();

    tracing::debug!(
        catalog = catalog.len(),
        eligible = eligible.len(),
        families = criteria.families.len(),
        min_inertia_cm4 = criteria.min_inertia_cm4,
        "candidates filtered"
    );
    Ok(eligible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ProfileCatalog {
        ProfileCatalog::from_records([
            ProfileRecord::new("IPE 200", "IPE").with_wel(194.0).with_avz(14.0).with_iv(1943.0),
            ProfileRecord::new("IPE 300", "IPE").with_wel(557.0).with_avz(25.68).with_iv(8356.0),
            ProfileRecord::new("IPE X", "IPE").with_wel(600.0).with_avz(26.0),
            ProfileRecord::new("IPE NOAVZ", "IPE").with_wel(600.0).with_iv(9000.0),
            ProfileRecord::new("IPE ZERO", "IPE").with_wel(0.0).with_avz(10.0).with_iv(9000.0),
            ProfileRecord::new("HEA 200", "HEA").with_wel(389.0).with_avz(18.08).with_iv(3692.0),
        ])
    }

    fn names(selected: &[&ProfileRecord]) -> Vec<String> {
        selected.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_family_filter() {
        let cat = catalog();
        let selected = select(&cat, &FilterCriteria::new(["ipe"])).unwrap();
        assert_eq!(names(&selected), vec!["IPE 200", "IPE 300", "IPE X"]);
        assert!(selected.iter().all(|p| p.family == Family::new("IPE")));
    }

    #[test]
    fn test_incomplete_records_are_skipped() {
        let cat = catalog();
        let selected = select(&cat, &FilterCriteria::all_families(&cat)).unwrap();
        let selected = names(&selected);
        assert!(!selected.contains(&"IPE NOAVZ".to_string()));
        assert!(!selected.contains(&"IPE ZERO".to_string()));
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn test_min_inertia() {
        let cat = catalog();
        let criteria = FilterCriteria::new(["IPE", "HEA"]).with_min_inertia(3000.0);
        let selected = select(&cat, &criteria).unwrap();
        // IPE X has no Iv at all, so it fails an active inertia check
        assert_eq!(names(&selected), vec!["HEA 200", "IPE 300"]);
        assert!(selected.iter().all(|p| p.iv.unwrap().0 >= 3000.0));
    }

    #[test]
    fn test_zero_min_inertia_disables_check() {
        let cat = catalog();
        let selected = select(&cat, &FilterCriteria::new(["IPE"]).with_min_inertia(0.0)).unwrap();
        assert!(names(&selected).contains(&"IPE X".to_string()));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let cat = catalog();
        let selected = select(&cat, &FilterCriteria::new(["IPE"]).with_min_inertia(1e9)).unwrap();
        assert!(selected.is_empty());

        let selected = select(&cat, &FilterCriteria::new(["UPN"])).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_invalid_criteria() {
        let cat = catalog();
        let empty = FilterCriteria::new(Vec::<String>::new());
        assert!(matches!(select(&cat, &empty), Err(CalcError::MissingField { .. })));

        let negative = FilterCriteria::new(["IPE"]).with_min_inertia(-1.0);
        assert!(matches!(select(&cat, &negative), Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_from_settings() {
        let cat = catalog();
        let all = FilterCriteria::from_settings(&SelectionSettings::default(), &cat);
        assert_eq!(all.families.len(), 2);

        let settings = SelectionSettings {
            families: vec!["hea".to_string()],
            min_inertia_cm4: 100.0,
        };
        let criteria = FilterCriteria::from_settings(&settings, &cat);
        assert!(criteria.families.contains(&Family::new("HEA")));
        assert_eq!(criteria.min_inertia_cm4, 100.0);
    }
}
