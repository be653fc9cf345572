//! # pglib-io: Case File Loading
//!
//! Reads MATPOWER / PGLib-OPF `.m` case files into the typed datasets of
//! [`pglib_core`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pglib_io::load;
//!
//! fn main() -> Result<(), pglib_core::CaseError> {
//!     let (bus, gen, branch) = load("pglib_opf_case5_pjm.m")?;
//!
//!     println!("Buses: {}", bus.len());
//!     println!("Generators: {}", gen.len());
//!     println!("Branches: {}", branch.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Extraction** ([`extract`]) - split text into named raw tables at the
//!    `%% name` / `];` markers
//! 2. **Resolution** ([`tables`]) - pick out "bus data", "generator data",
//!    "generator cost data" and "branch data"
//! 3. **Normalization** ([`normalize`]) - map rows onto headers, merge
//!    generator and cost rows, add `line_idx`, infer column types
//! 4. **Diagnostics** - padded rows and other recoverable anomalies are
//!    returned alongside the datasets in [`LoadResult`]
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use pglib_io::{load_case, LoadOptions};
//!
//! match load_case("cases/pglib_opf_case14_ieee.m", &LoadOptions::strict()) {
//!     Ok(result) => {
//!         if result.diagnostics.has_issues() {
//!             eprintln!("{}", result.diagnostics);
//!         }
//!     }
//!     Err(e) => eprintln!("Failed to load case: {}", e),
//! }
//! ```

pub mod config;
pub mod extract;
pub mod loader;
pub mod metadata;
pub mod normalize;
pub mod tables;
pub mod text;

pub use config::{LoadOptions, ShortRowPolicy, DEFAULT_MAX_COST_COEFFICIENTS};
pub use extract::{extract_tables, extract_tables_with_diagnostics, RawTable};
pub use loader::{load, load_case, load_case_str, Case, LoadResult};
pub use metadata::{scan_metadata, CaseMetadata};
pub use normalize::{
    cost_coefficient_names, detect_generator_type, normalize_branch, normalize_bus,
    normalize_generator, GENERATOR_TYPE_COLUMN,
};
pub use tables::{CaseTables, TableKind};
pub use text::{read_csv, write_csv};
