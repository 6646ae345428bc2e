//! Catalog Loader
//!
//! Turns a JSON section table into a [`ProfileCatalog`]. The document is an
//! object keyed by profile name:
//!
//! ```json
//! {
//!   "IPE 300": { "type": "IPE", "h": 300, "b": 150, "tw": 7.1, "tf": 10.7, "r": 15,
//!                "Wel": 557, "Avz": 25.68, "Iv": 8356, "G": 42.2 }
//! }
//! ```
//!
//! Numeric fields may be JSON numbers or numeric strings (a decimal comma is
//! accepted). `null`, `""` and `"-"` mean "absent". A record is admitted only
//! when every present numeric field is a finite, non-negative number; one bad
//! field drops the whole record. Dropped records never fail the load. They
//! are collected in a [`LoadReport`] and logged at `warn`.
//!
//! The built-in table ships inside the crate and is parsed at most once per
//! process through [`CatalogCache`].

use once_cell::sync::OnceCell;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{Family, ProfileCatalog, ProfileRecord};
use crate::errors::{CalcError, CalcResult};
use crate::units::{CubicCentimeters, KgPerMeter, Millimeters, QuarticCentimeters, SqCentimeters};

/// European hot-rolled sections (IPE, HEA, HEB, UPN)
const BUILTIN_CATALOG_JSON: &str = include_str!("../../assets/profiles.json");

static BUILTIN: CatalogCache = CatalogCache::builtin();

/// Serde view of one raw table entry.
///
/// Numeric fields stay as untyped JSON so that a malformed value becomes a
/// rejection reason instead of a deserialization failure for the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProfileEntry {
    #[serde(rename = "type")]
    pub family: Option<String>,
    pub h: Option<Value>,
    pub b: Option<Value>,
    pub tw: Option<Value>,
    pub tf: Option<Value>,
    pub r: Option<Value>,
    #[serde(rename = "Wel")]
    pub wel: Option<Value>,
    #[serde(rename = "Avz")]
    pub avz: Option<Value>,
    #[serde(rename = "Iv")]
    pub iv: Option<Value>,
    #[serde(rename = "G")]
    pub mass: Option<Value>,
}

/// Why a raw entry was kept out of the catalog
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RejectReason {
    #[error("entry has the wrong shape: {reason}")]
    Malformed { reason: String },

    #[error("profile name is empty")]
    EmptyName,

    #[error("profile name collides with an earlier entry")]
    DuplicateName,

    #[error("family ('type') is missing or empty")]
    MissingFamily,

    #[error("field '{field}' is not a number: {value}")]
    Unparsable { field: String, value: String },

    #[error("field '{field}' is negative: {value}")]
    Negative { field: String, value: f64 },

    #[error("field '{field}' is not finite")]
    NonFinite { field: String },
}

/// One dropped entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedEntry {
    pub name: String,
    pub reason: RejectReason,
}

/// Outcome of a catalog load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Number of records admitted
    pub loaded: usize,
    /// Entries dropped, in document order
    pub rejected: Vec<RejectedEntry>,
}

impl LoadReport {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn rejected_names(&self) -> impl Iterator<Item = &str> {
        self.rejected.iter().map(|r| r.name.as_str())
    }
}

/// A catalog together with the report of how it was built
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCatalog {
    pub catalog: ProfileCatalog,
    pub report: LoadReport,
}

impl ProfileRecord {
    /// Validate one raw entry. All-or-nothing: the first bad field rejects
    /// the record.
    pub fn from_raw(name: &str, raw: &RawProfileEntry) -> Result<ProfileRecord, RejectReason> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RejectReason::EmptyName);
        }

        let family = raw
            .family
            .as_deref()
            .map(Family::new)
            .filter(|f| !f.is_empty())
            .ok_or(RejectReason::MissingFamily)?;

        Ok(ProfileRecord {
            name: name.to_string(),
            family,
            h: parse_field("h", raw.h.as_ref())?.map(Millimeters),
            b: parse_field("b", raw.b.as_ref())?.map(Millimeters),
            tw: parse_field("tw", raw.tw.as_ref())?.map(Millimeters),
            tf: parse_field("tf", raw.tf.as_ref())?.map(Millimeters),
            r: Millimeters(parse_field("r", raw.r.as_ref())?.unwrap_or(0.0)),
            wel: parse_field("Wel", raw.wel.as_ref())?.map(CubicCentimeters),
            avz: parse_field("Avz", raw.avz.as_ref())?.map(SqCentimeters),
            iv: parse_field("Iv", raw.iv.as_ref())?.map(QuarticCentimeters),
            mass_per_length: parse_field("G", raw.mass.as_ref())?.map(KgPerMeter),
        })
    }
}

/// Parse one optional numeric field.
///
/// `Ok(None)` means the field is absent; any present value must be a finite,
/// non-negative number.
fn parse_field(field: &str, value: Option<&Value>) -> Result<Option<f64>, RejectReason> {
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| RejectReason::Unparsable {
            field: field.to_string(),
            value: n.to_string(),
        })?,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "-" || trimmed == "—" {
                return Ok(None);
            }
            trimmed
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| RejectReason::Unparsable {
                    field: field.to_string(),
                    value: s.clone(),
                })?
        }
        Some(other) => {
            return Err(RejectReason::Unparsable {
                field: field.to_string(),
                value: other.to_string(),
            })
        }
    };

    if !number.is_finite() {
        return Err(RejectReason::NonFinite {
            field: field.to_string(),
        });
    }
    if number < 0.0 {
        return Err(RejectReason::Negative {
            field: field.to_string(),
            value: number,
        });
    }
    Ok(Some(number))
}

/// Top-level table entries in document order.
///
/// Repeated keys are all kept so the loader can report the later ones
/// instead of letting them overwrite the first.
struct DocumentEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for DocumentEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = DocumentEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by profile name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DocumentEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push((name, value));
                }
                Ok(DocumentEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parse a JSON section table.
///
/// Fails only when the document is not valid JSON or its root is not an
/// object; bad entries are reported, not raised. Entries are visited in
/// document order, so on a name collision the first entry wins.
pub fn parse_catalog_json(json: &str) -> CalcResult<LoadedCatalog> {
    let DocumentEntries(entries) = serde_json::from_str(json).map_err(|e| {
        if e.is_data() {
            CalcError::catalog_error(format!("Catalog root must be {}", e))
        } else {
            CalcError::serialization(format!("Catalog is not valid JSON: {}", e))
        }
    })?;

    let mut catalog = ProfileCatalog::default();
    let mut report = LoadReport::default();

    for (name, value) in entries {
        let parsed = serde_json::from_value::<RawProfileEntry>(value)
            .map_err(|e| RejectReason::Malformed {
                reason: e.to_string(),
            })
            .and_then(|raw| ProfileRecord::from_raw(&name, &raw));

        let outcome = parsed.and_then(|record| {
            if catalog.insert(record) {
                Ok(())
            } else {
                Err(RejectReason::DuplicateName)
            }
        });

        if let Err(reason) = outcome {
            tracing::warn!(profile = %name, %reason, "dropping catalog entry");
            report.rejected.push(RejectedEntry { name, reason });
        }
    }

    report.loaded = catalog.len();
    tracing::debug!(
        loaded = report.loaded,
        rejected = report.rejected_count(),
        "catalog parsed"
    );

    Ok(LoadedCatalog { catalog, report })
}

/// Read and parse a JSON section table from disk.
pub fn load_catalog_file(path: &Path) -> CalcResult<LoadedCatalog> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;
    let loaded = parse_catalog_json(&json)?;
    tracing::info!(
        path = %path.display(),
        loaded = loaded.report.loaded,
        rejected = loaded.report.rejected_count(),
        "catalog loaded"
    );
    Ok(loaded)
}

// ============================================================================
// Load-once cache
// ============================================================================

/// Where a cached catalog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The table embedded in this crate
    Builtin,
    /// A JSON file on disk
    File(PathBuf),
}

/// Single-initialization cache for one catalog source.
///
/// The first successful [`get`](Self::get) parses the source; concurrent
/// first callers block until that one parse finishes, and every later call is
/// a lock-free read. A failed load is not cached, so the next call retries.
/// The data is static for the life of the process, so there is no
/// invalidation.
#[derive(Debug)]
pub struct CatalogCache {
    source: CatalogSource,
    cell: OnceCell<LoadedCatalog>,
}

impl CatalogCache {
    pub const fn builtin() -> Self {
        CatalogCache {
            source: CatalogSource::Builtin,
            cell: OnceCell::new(),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        CatalogCache {
            source: CatalogSource::File(path.into()),
            cell: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> CalcResult<&LoadedCatalog> {
        self.cell.get_or_try_init(|| match &self.source {
            CatalogSource::Builtin => {
                let loaded = parse_catalog_json(BUILTIN_CATALOG_JSON)?;
                tracing::debug!(loaded = loaded.report.loaded, "built-in catalog initialized");
                Ok(loaded)
            }
            CatalogSource::File(path) => load_catalog_file(path),
        })
    }

    pub fn catalog(&self) -> CalcResult<&ProfileCatalog> {
        self.get().map(|loaded| &loaded.catalog)
    }
}

/// The built-in catalog, parsed on first use and cached for the process.
pub fn builtin_catalog() -> CalcResult<&'static ProfileCatalog> {
    BUILTIN.catalog()
}

/// Load report of the built-in catalog.
pub fn builtin_load_report() -> CalcResult<&'static LoadReport> {
    BUILTIN.get().map(|loaded| &loaded.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawProfileEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_field_variants() {
        assert_eq!(parse_field("h", None), Ok(None));
        assert_eq!(parse_field("h", Some(&Value::Null)), Ok(None));
        assert_eq!(parse_field("h", Some(&json!(300))), Ok(Some(300.0)));
        assert_eq!(parse_field("h", Some(&json!(" 7.1 "))), Ok(Some(7.1)));
        assert_eq!(parse_field("h", Some(&json!("10,7"))), Ok(Some(10.7)));
        assert_eq!(parse_field("h", Some(&json!("-"))), Ok(None));
        assert_eq!(parse_field("h", Some(&json!(""))), Ok(None));
        assert!(matches!(
            parse_field("h", Some(&json!("abc"))),
            Err(RejectReason::Unparsable { .. })
        ));
        assert!(matches!(
            parse_field("h", Some(&json!(-3.0))),
            Err(RejectReason::Negative { .. })
        ));
        assert!(matches!(
            parse_field("h", Some(&json!("NaN"))),
            Err(RejectReason::NonFinite { .. })
        ));
        assert!(matches!(
            parse_field("h", Some(&json!([1, 2]))),
            Err(RejectReason::Unparsable { .. })
        ));
    }

    #[test]
    fn test_from_raw_full_record() {
        let entry = raw(json!({
            "type": "ipe", "h": 300, "b": 150, "tw": 7.1, "tf": 10.7,
            "Wel": 557, "Avz": "25.68", "Iv": 8356, "G": 42.2
        }));
        let record = ProfileRecord::from_raw(" IPE 300 ", &entry).unwrap();
        assert_eq!(record.name, "IPE 300");
        assert_eq!(record.family, Family::new("IPE"));
        assert_eq!(record.r, Millimeters(0.0));
        assert_eq!(record.avz, Some(SqCentimeters(25.68)));
        assert_eq!(record.mass_per_length, Some(KgPerMeter(42.2)));
    }

    #[test]
    fn test_from_raw_is_all_or_nothing() {
        // Only the optional mass is bad, yet the whole record goes.
        let entry = raw(json!({ "type": "IPE", "Wel": 557, "Avz": 25.68, "G": "heavy" }));
        assert_eq!(
            ProfileRecord::from_raw("IPE 300", &entry),
            Err(RejectReason::Unparsable {
                field: "G".to_string(),
                value: "heavy".to_string()
            })
        );
    }

    #[test]
    fn test_from_raw_requires_family_and_name() {
        let no_family = raw(json!({ "Wel": 1.0 }));
        assert_eq!(ProfileRecord::from_raw("A", &no_family), Err(RejectReason::MissingFamily));

        let blank_family = raw(json!({ "type": "  " }));
        assert_eq!(ProfileRecord::from_raw("A", &blank_family), Err(RejectReason::MissingFamily));

        let ok = raw(json!({ "type": "HEA" }));
        assert_eq!(ProfileRecord::from_raw("  ", &ok), Err(RejectReason::EmptyName));
    }

    #[test]
    fn test_parse_catalog_reports_rejections() {
        let json = r#"{
            "IPE 100": { "type": "IPE", "Wel": 34.2, "Avz": 5.08, "Iv": 171 },
            "IPE 120": { "type": "IPE", "Wel": "oops", "Avz": 6.31 },
            "HEA 100": { "type": "HEA", "Wel": 72.8, "Avz": -7.56 },
            "UPN 80": "not an object",
            "HEB 100": { "type": "HEB", "Wel": 89.9 }
        }"#;
        let loaded = parse_catalog_json(json).unwrap();

        assert_eq!(loaded.catalog.len(), 2);
        assert!(loaded.catalog.get("IPE 100").is_some());
        assert!(loaded.catalog.get("HEB 100").is_some());

        assert_eq!(loaded.report.loaded, 2);
        assert_eq!(loaded.report.rejected_count(), 3);
        let names: Vec<&str> = loaded.report.rejected_names().collect();
        assert_eq!(names, vec!["IPE 120", "HEA 100", "UPN 80"]);
        assert!(!loaded.report.is_clean());
    }

    #[test]
    fn test_rejections_keep_document_order() {
        let json = r#"{
            "ZZZ": { "type": "IPE", "Wel": "bad" },
            "Q": { "Wel": 1.0 },
            "AAA": { "type": "IPE", "Avz": -1 }
        }"#;
        let loaded = parse_catalog_json(json).unwrap();
        let names: Vec<&str> = loaded.report.rejected_names().collect();
        assert_eq!(names, vec!["ZZZ", "Q", "AAA"]);
    }

    #[test]
    fn test_repeated_key_is_rejected() {
        let json = r#"{
            "IPE 300": { "type": "IPE", "Wel": 557 },
            "IPE 300": { "type": "IPE", "Wel": 999 }
        }"#;
        let loaded = parse_catalog_json(json).unwrap();

        assert_eq!(loaded.catalog.len(), 1);
        assert_eq!(
            loaded.catalog.lookup("IPE 300").unwrap().wel,
            Some(CubicCentimeters(557.0))
        );
        assert_eq!(loaded.report.rejected.len(), 1);
        assert_eq!(loaded.report.rejected[0].name, "IPE 300");
        assert_eq!(loaded.report.rejected[0].reason, RejectReason::DuplicateName);
    }

    #[test]
    fn test_wrong_shape_reason() {
        let loaded = parse_catalog_json(r#"{ "IPE 300": { "type": 5, "Wel": 557 } }"#).unwrap();
        let reason = &loaded.report.rejected[0].reason;
        assert!(matches!(reason, RejectReason::Malformed { .. }));
        assert!(reason.to_string().starts_with("entry has the wrong shape"));
    }

    #[test]
    fn test_trimmed_name_collision_is_rejected() {
        let json = r#"{
            "IPE 100": { "type": "IPE", "Wel": 34.2 },
            "IPE 100 ": { "type": "IPE", "Wel": 99.0 }
        }"#;
        let loaded = parse_catalog_json(json).unwrap();
        assert_eq!(loaded.catalog.len(), 1);
        assert_eq!(
            loaded.catalog.lookup("IPE 100").unwrap().wel,
            Some(CubicCentimeters(34.2))
        );
        assert_eq!(loaded.report.rejected[0].reason, RejectReason::DuplicateName);
    }

    #[test]
    fn test_root_must_be_object() {
        let err = parse_catalog_json("[1, 2, 3]").unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_ERROR");

        let err = parse_catalog_json("\"IPE 300\"").unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_ERROR");

        let err = parse_catalog_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_builtin_catalog_is_clean_and_cached() {
        let first = builtin_catalog().unwrap();
        let second = builtin_catalog().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.len() > 50);
        assert!(builtin_load_report().unwrap().is_clean());

        let families: Vec<String> = first.families().into_iter().map(String::from).collect();
        assert_eq!(families, vec!["HEA", "HEB", "IPE", "UPN"]);
        assert!(first.iter().all(|p| p.is_analyzable()));
    }

    #[test]
    fn test_cache_loads_once_across_threads() {
        let cache = CatalogCache::builtin();
        assert!(!cache.is_loaded());

        let pointers: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| cache.catalog().unwrap() as *const ProfileCatalog as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(cache.is_loaded());
        assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_file_cache_missing_file_is_not_cached() {
        let cache = CatalogCache::from_file("/nonexistent/profiles.json");
        let err = cache.get().unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(!cache.is_loaded());
        assert_eq!(
            cache.source(),
            &CatalogSource::File(PathBuf::from("/nonexistent/profiles.json"))
        );
    }
}
