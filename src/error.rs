use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::SourceType;

/// Errors produced while loading catalogs and generating tiles.
#[derive(Debug, Error)]
pub enum TilingError {
    /// The geometry source could not be read or parsed. Fatal to the caller.
    #[error("failed to load {source_type} catalog from {}: {reason}", .path.display())]
    CatalogLoad {
        source_type: SourceType,
        path: PathBuf,
        reason: String,
    },

    /// The requested region is not in the catalog.
    #[error("region '{name}' not found{}", format_suggestions(.suggestions))]
    RegionNotFound {
        name: String,
        /// Closest catalog names, best first. May be empty.
        suggestions: Vec<String>,
    },

    /// A single region's geometry could not be tiled.
    #[error("failed to process geometry for region '{region}': {reason}")]
    GeometryProcessing { region: String, reason: String },

    /// A PROJ.4 definition could not be built or a coordinate failed to transform.
    #[error("projection error: {0}")]
    Projection(String),

    /// Invalid or unreadable configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TilingError>;

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() { String::new() }
    else { format!(" (did you mean: {}?)", suggestions.join(", ")) }
}

impl TilingError {
    /// Suggestions attached to a `RegionNotFound`, empty for every other variant.
    pub fn suggestions(&self) -> &[String] {
        match self {
            TilingError::RegionNotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Wrap any per-region failure as a `GeometryProcessing` error for `region`.
    pub(crate) fn geometry(region: &str, reason: impl ToString) -> Self {
        TilingError::GeometryProcessing { region: region.to_string(), reason: reason.to_string() }
    }
}
