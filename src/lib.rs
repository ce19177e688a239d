//! DocGap - Documentation freshness checks driven by git history
//!
//! This library decides whether each documentation file is still current with
//! the source files it describes, and scores how many declared entities the
//! documentation mentions.

pub mod cli;
pub mod coverage;
pub mod drift;
pub mod error;
pub mod extract;
pub mod repo;

/// Re-export commonly used types
pub use coverage::CoverageReport;
pub use drift::{DriftDetector, DriftStatus, DriftVerdict};
pub use error::DriftError;
pub use repo::Repository;

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docgap";
