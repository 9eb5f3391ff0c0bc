use std::path::{Path, PathBuf};

use ahash::AHashMap;
use geo::Area;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{lookup::close_matches, normalize_name, Region, SourceType};
use crate::{
    common::{read_features_from_geojson_bytes, read_features_from_shapefile, Feature, ParseError},
    config::LookupConfig,
    error::{Result, TilingError},
    geom::Projector,
};

/// Read-only snapshot of every region in one geometry source.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    source: SourceType,
    regions: Vec<Region>,
    index: AHashMap<String, usize>,
}

impl RegionCatalog {
    /// Load a catalog from a GeoJSON (`.geojson`, `.json`) or ESRI shapefile (`.shp`) path.
    pub fn load(source: SourceType, path: &Path, projector: &Projector) -> Result<Self> {
        info!(%source, path = %path.display(), "loading region catalog");
        let load_error = |reason: String| TilingError::CatalogLoad {
            source_type: source,
            path: path.to_path_buf(),
            reason,
        };

        let extension = path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let features = match extension.as_deref() {
            Some("shp") => read_features_from_shapefile(path, &source.field_map().columns()),
            Some("geojson" | "json") => {
                let bytes = std::fs::read(path).map_err(|e| load_error(e.to_string()))?;
                read_features_from_geojson_bytes(&bytes)
            }
            _ => Err(ParseError("unsupported file type (expected .geojson, .json or .shp)".into())),
        }.map_err(|e| load_error(e.to_string()))?;

        Self::from_features(source, features, projector).map_err(|e| load_error(e.to_string()))
    }

    /// Build a catalog from in-memory GeoJSON bytes.
    pub fn from_geojson_bytes(source: SourceType, bytes: &[u8], projector: &Projector) -> Result<Self> {
        let load_error = |reason: String| TilingError::CatalogLoad {
            source_type: source,
            path: PathBuf::from("<memory>"),
            reason,
        };
        let features = read_features_from_geojson_bytes(bytes).map_err(|e| load_error(e.to_string()))?;
        Self::from_features(source, features, projector).map_err(|e| load_error(e.to_string()))
    }

    /// Build a catalog from regions constructed elsewhere. Later duplicates of a key are dropped.
    pub fn from_regions(source: SourceType, regions: impl IntoIterator<Item = Region>) -> Self {
        let mut catalog = Self { source, regions: Vec::new(), index: AHashMap::new() };
        for region in regions { catalog.insert(region) }
        catalog
    }

    fn from_features(source: SourceType, features: Vec<Feature>, projector: &Projector) -> std::result::Result<Self, ParseError> {
        let fields = source.field_map();
        let total = features.len();
        let mut catalog = Self { source, regions: Vec::with_capacity(total), index: AHashMap::new() };

        for (idx, feature) in features.into_iter().enumerate() {
            let Some(name) = text_field(&feature.properties, fields.name) else {
                debug!(idx, key = fields.name, "skipping feature without a name");
                continue
            };
            let Some(geometry) = feature.geometry else {
                debug!(region = %name, "skipping feature without geometry");
                continue
            };

            let derived_area_sqkm = match projector.to_planar(&geometry) {
                Ok(planar) => planar.unsigned_area() / 1.0e6,
                Err(e) => {
                    warn!(region = %name, error = %e, "could not derive area from geometry");
                    0.0
                }
            };

            let mut region = Region::new(&name, geometry, derived_area_sqkm);
            region.metadata_area_sqkm = fields.area.and_then(|key| numeric_field(&feature.properties, key));
            region.parent_group = fields.parent_group.and_then(|key| text_field(&feature.properties, key));
            region.state = fields.state.and_then(|key| text_field(&feature.properties, key));
            region.context = fields.context.iter()
                .filter_map(|key| text_field(&feature.properties, key))
                .collect();

            catalog.insert(region);
        }

        if catalog.is_empty() && total > 0 {
            return Err(ParseError(format!("none of {total} features has a '{}' name and a polygon geometry", fields.name)));
        }

        info!(%source, regions = catalog.len(), features = total, "region catalog loaded");
        Ok(catalog)
    }

    fn insert(&mut self, region: Region) {
        if self.index.contains_key(region.key()) {
            warn!(region = region.key(), "duplicate region name, keeping the first");
            return
        }
        self.index.insert(region.key().to_string(), self.regions.len());
        self.regions.push(region);
    }

    #[inline] pub fn source(&self) -> SourceType { self.source }

    #[inline] pub fn len(&self) -> usize { self.regions.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    /// All regions, in source order.
    #[inline] pub fn all_regions(&self) -> &[Region] { &self.regions }

    /// Exact lookup by normalised name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.index.get(&normalize_name(name)).map(|&idx| &self.regions[idx])
    }

    /// Resolve `name` with the default suggestion settings.
    pub fn resolve(&self, name: &str) -> Result<&Region> {
        self.resolve_with(name, &LookupConfig::default())
    }

    /// Exact, case-insensitive lookup; on a miss the error carries the closest names.
    pub fn resolve_with(&self, name: &str, lookup: &LookupConfig) -> Result<&Region> {
        self.get(name).ok_or_else(|| {
            let suggestions = self.suggestions(name, lookup);
            debug!(name, ?suggestions, "region not found");
            TilingError::RegionNotFound { name: name.trim().to_string(), suggestions }
        })
    }

    /// Closest catalog keys to `name`, best first.
    pub fn suggestions(&self, name: &str, lookup: &LookupConfig) -> Vec<String> {
        close_matches(
            &normalize_name(name),
            self.regions.iter().map(Region::key),
            lookup.max_suggestions,
            lookup.similarity_cutoff,
        )
    }
}

/// Trimmed, non-empty string value of `key`.
fn text_field(properties: &Map<String, Value>, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric value of `key`, accepting numbers stored as strings.
fn numeric_field(properties: &Map<String, Value>, key: &str) -> Option<f64> {
    match properties.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
