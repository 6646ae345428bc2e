//! # Profile Catalog
//!
//! Strongly typed section records for standard hot-rolled profiles (IPE, HEA,
//! HEB, UPN, ...) and the immutable catalog that holds them.
//!
//! A catalog is only ever built by the [`loader`], which admits a record only
//! when every numeric field it carries is a valid non-negative number. Once
//! built, a catalog is never mutated.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::catalog::builtin_catalog;
//!
//! let catalog = builtin_catalog().unwrap();
//! let ipe300 = catalog.lookup("IPE 300").unwrap();
//! assert_eq!(ipe300.family.as_str(), "IPE");
//! assert!(ipe300.is_analyzable());
//! ```

pub mod loader;

pub use loader::{
    builtin_catalog, builtin_load_report, load_catalog_file, parse_catalog_json, CatalogCache,
    CatalogSource, LoadReport, LoadedCatalog, RawProfileEntry, RejectReason, RejectedEntry,
};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::{CalcError, CalcResult};
use crate::units::{CubicCentimeters, KgPerMeter, Millimeters, QuarticCentimeters, SqCentimeters};

/// Cross-section family tag (e.g. "IPE", "HEA").
///
/// Normalized to trimmed uppercase so that "ipe" and "IPE" are the same family.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Family(String);

impl Family {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Family(tag.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Family {
    fn from(s: String) -> Self {
        Family::new(s)
    }
}

impl From<&str> for Family {
    fn from(s: &str) -> Self {
        Family::new(s)
    }
}

impl From<Family> for String {
    fn from(f: Family) -> Self {
        f.0
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One catalog entry.
///
/// Geometry is in mm, section properties in cm², cm³ and cm⁴, mass in kg/m.
/// Every property the table may omit is an explicit `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Catalog key (e.g. "IPE 300")
    pub name: String,

    /// Shape family, used for filtering
    pub family: Family,

    // === Geometry ===
    /// Overall height
    pub h: Option<Millimeters>,
    /// Flange width
    pub b: Option<Millimeters>,
    /// Web thickness
    pub tw: Option<Millimeters>,
    /// Flange thickness
    pub tf: Option<Millimeters>,
    /// Root radius (0 when the table omits it)
    pub r: Millimeters,

    // === Section Properties ===
    /// Elastic section modulus
    pub wel: Option<CubicCentimeters>,
    /// Shear area
    pub avz: Option<SqCentimeters>,
    /// Moment of inertia
    pub iv: Option<QuarticCentimeters>,

    /// Mass per length (display and tie-breaking only)
    pub mass_per_length: Option<KgPerMeter>,
}

impl ProfileRecord {
    /// Create a record with no section data. Mostly useful for hand-built
    /// catalogs and tests; real catalogs come from the loader.
    pub fn new(name: impl Into<String>, family: impl Into<Family>) -> Self {
        ProfileRecord {
            name: name.into(),
            family: family.into(),
            h: None,
            b: None,
            tw: None,
            tf: None,
            r: Millimeters(0.0),
            wel: None,
            avz: None,
            iv: None,
            mass_per_length: None,
        }
    }

    pub fn with_wel(mut self, wel_cm3: f64) -> Self {
        self.wel = Some(CubicCentimeters(wel_cm3));
        self
    }

    pub fn with_avz(mut self, avz_cm2: f64) -> Self {
        self.avz = Some(SqCentimeters(avz_cm2));
        self
    }

    pub fn with_iv(mut self, iv_cm4: f64) -> Self {
        self.iv = Some(QuarticCentimeters(iv_cm4));
        self
    }

    pub fn with_mass(mut self, kg_per_m: f64) -> Self {
        self.mass_per_length = Some(KgPerMeter(kg_per_m));
        self
    }

    /// Both `Wel` and `Avz` are present and strictly positive.
    pub fn is_analyzable(&self) -> bool {
        matches!(self.wel, Some(w) if w.0 > 0.0) && matches!(self.avz, Some(a) if a.0 > 0.0)
    }

    /// `Iv` is present and at least `min_cm4`.
    pub fn meets_inertia(&self, min_cm4: f64) -> bool {
        matches!(self.iv, Some(iv) if iv.0 >= min_cm4)
    }
}

impl fmt::Display for ProfileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.family)?;
        if let Some(wel) = self.wel {
            write!(f, " Wel={:.1} cm³", wel.0)?;
        }
        if let Some(avz) = self.avz {
            write!(f, " Avz={:.2} cm²", avz.0)?;
        }
        if let Some(iv) = self.iv {
            write!(f, " Iv={:.0} cm⁴", iv.0)?;
        }
        Ok(())
    }
}

/// Immutable name → record mapping.
///
/// Backed by a `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileCatalog {
    profiles: BTreeMap<String, ProfileRecord>,
}

impl ProfileCatalog {
    /// Build a catalog from already-validated records.
    ///
    /// When two records share a name the first one is kept.
    pub fn from_records(records: impl IntoIterator<Item = ProfileRecord>) -> Self {
        let mut catalog = ProfileCatalog::default();
        for record in records {
            let name = record.name.clone();
            if !catalog.insert(record) {
                tracing::warn!(profile = %name, "duplicate profile name ignored");
            }
        }
        catalog
    }

    /// Returns false (and keeps the existing entry) on a name collision.
    pub(crate) fn insert(&mut self, record: ProfileRecord) -> bool {
        if self.profiles.contains_key(&record.name) {
            return false;
        }
        self.profiles.insert(record.name.clone(), record);
        true
    }

    /// Exact lookup, falling back to a case-insensitive match.
    pub fn get(&self, name: &str) -> Option<&ProfileRecord> {
        let name = name.trim();
        self.profiles.get(name).or_else(|| {
            self.profiles
                .values()
                .find(|p| p.name.eq_ignore_ascii_case(name))
        })
    }

    /// Like [`get`](Self::get) but reports a missing profile as an error.
    pub fn lookup(&self, name: &str) -> CalcResult<&ProfileRecord> {
        self.get(name)
            .ok_or_else(|| CalcError::profile_not_found(name))
    }

    /// Every family present in the catalog, sorted.
    pub fn families(&self) -> BTreeSet<Family> {
        self.profiles.values().map(|p| p.family.clone()).collect()
    }

    /// All records of one family, in name order.
    pub fn of_family(&self, family: &Family) -> Vec<&ProfileRecord> {
        self.profiles
            .values()
            .filter(|p| &p.family == family)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfileRecord> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
