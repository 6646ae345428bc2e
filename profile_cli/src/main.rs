//! # Profile CLI
//!
//! Terminal front end for the steel profile selection engine.
//!
//! ```text
//! profile_cli select --moment 100 --shear 50 --grade S235 --family IPE --family HEA
//! profile_cli families
//! profile_cli show "IPE 300"
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=profile_core=debug` to see the pipeline.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use profile_core::analysis::DemandCase;
use profile_core::catalog::{CatalogCache, LoadedCatalog};
use profile_core::engine::{run_with, SelectionOutcome, SelectionRequest, SelectionStatus};
use profile_core::filter::FilterCriteria;
use profile_core::materials::SteelGrade;
use profile_core::settings::EngineSettings;

#[derive(Parser)]
#[command(name = "profile_cli")]
#[command(about = "Select the best-fitting steel profile for a bending and shear demand")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true, default_value = "profile.toml")]
    config: PathBuf,

    /// JSON section table (overrides the settings file; built-in table otherwise)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a selection
    Select {
        /// Bending moment M (kN·m)
        #[arg(long)]
        moment: f64,
        /// Shear force V (kN)
        #[arg(long)]
        shear: f64,
        /// Steel grade (S235, S275, S355, S420, S460)
        #[arg(long, conflicts_with = "fyk")]
        grade: Option<SteelGrade>,
        /// Yield strength fyk in MPa, instead of a grade
        #[arg(long)]
        fyk: Option<f64>,
        /// Allowed family; repeat for several (default: settings, then all)
        #[arg(long = "family")]
        families: Vec<String>,
        /// Minimum moment of inertia Iv (cm⁴)
        #[arg(long)]
        min_inertia: Option<f64>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the families in the catalog
    Families,
    /// Show one catalog entry
    Show {
        /// Profile name, e.g. "IPE 300"
        name: String,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = EngineSettings::load(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    tracing::debug!(config = %cli.config.display(), gamma_m = settings.analysis.gamma_m, "settings loaded");

    let cache = match cli.catalog.clone().or_else(|| settings.catalog.path.clone()) {
        Some(path) => CatalogCache::from_file(path),
        None => CatalogCache::builtin(),
    };
    let loaded = cache.get().context("loading section catalog")?;
    tracing::info!(
        source = ?cache.source(),
        profiles = loaded.report.loaded,
        rejected = loaded.report.rejected_count(),
        "section catalog ready"
    );
    report_rejections(loaded);

    match cli.command {
        Commands::Select {
            moment,
            shear,
            grade,
            fyk,
            families,
            min_inertia,
            json,
        } => {
            let demand = match (grade, fyk) {
                (Some(grade), _) => DemandCase::with_grade(moment, shear, grade),
                (None, Some(fyk)) => DemandCase::new(moment, shear, fyk),
                (None, None) => bail!("either --grade or --fyk is required"),
            };

            let mut criteria = if families.is_empty() {
                FilterCriteria::from_settings(&settings.selection, &loaded.catalog)
            } else {
                FilterCriteria::new(families.iter().map(String::as_str))
                    .with_min_inertia(settings.selection.min_inertia_cm4)
            };
            if let Some(min) = min_inertia {
                criteria = criteria.with_min_inertia(min);
            }

            let request = SelectionRequest::new(demand, criteria);
            let outcome = run_with(&loaded.catalog, &request, &settings.analysis)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&request, &outcome);
            }
        }
        Commands::Families => {
            for family in loaded.catalog.families() {
                let count = loaded.catalog.of_family(&family).len();
                println!("{:<8} {:>3} profiles", family.as_str(), count);
            }
        }
        Commands::Show { name } => {
            let profile = loaded.catalog.lookup(&name)?;
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
    }

    Ok(())
}

fn report_rejections(loaded: &LoadedCatalog) {
    if loaded.report.is_clean() {
        return;
    }
    eprintln!(
        "Note: {} catalog entries were dropped ({} loaded):",
        loaded.report.rejected_count(),
        loaded.report.loaded
    );
    for rejected in &loaded.report.rejected {
        eprintln!("  {} - {}", rejected.name, rejected.reason);
    }
}

fn print_outcome(request: &SelectionRequest, outcome: &SelectionOutcome) {
    let demand = &request.demand;
    let families: Vec<&str> = request.criteria.families.iter().map(|f| f.as_str()).collect();

    println!("═══════════════════════════════════════════════════════════════");
    println!("  PROFILE SELECTION");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("Demand:");
    println!("  M   = {:.1} kN·m", demand.moment.0);
    println!("  V   = {:.1} kN", demand.shear.0);
    println!("  fyk = {:.0} MPa", demand.fyk.0);
    println!("Filter:");
    println!("  Families:    {}", families.join(", "));
    if request.criteria.min_inertia_cm4 > 0.0 {
        println!("  Min Iv:      {:.0} cm⁴", request.criteria.min_inertia_cm4);
    }
    println!();

    if outcome.status == SelectionStatus::NoMatch {
        println!("No profile matches the filter criteria.");
        return;
    }

    println!(
        "{:<12} {:>9} {:>9} {:>9} {:>8} {:>8} {:>8} {:>8}",
        "Profile", "σn MPa", "τ MPa", "σeq MPa", "σ %", "τ %", "eq %", "max %"
    );
    println!("{}", "─".repeat(79));
    for candidate in &outcome.candidates {
        let u = &candidate.utilization;
        let pct = u.as_percentages();
        let marker = match &outcome.selection {
            Some(s) if s.candidate.profile.name == candidate.profile.name => " <",
            _ => "",
        };
        println!(
            "{:<12} {:>9.1} {:>9.1} {:>9.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {}{}",
            candidate.profile.name,
            u.sigma_n.0,
            u.tau.0,
            u.sigma_eq.0,
            pct.sigma,
            pct.tau,
            pct.eq,
            pct.max,
            status_icon(u.is_adequate()),
            marker
        );
    }
    println!();

    if let Some(selection) = &outcome.selection {
        let chosen = &selection.candidate;
        println!("═══════════════════════════════════════════════════════════════");
        println!(
            "  RESULT: {} at {:.1}% (governs: {}) {}",
            chosen.profile.name,
            chosen.max_ratio() * 100.0,
            chosen.utilization.governing(),
            if selection.is_adequate { "PASS" } else { "FAIL" }
        );
        if !selection.is_adequate {
            println!("  Warning: {}", outcome.status);
        }
        println!("═══════════════════════════════════════════════════════════════");
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
