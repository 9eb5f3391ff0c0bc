use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TilingError};

/// All tunables of the tiling pipeline. Every section falls back to its
/// defaults when omitted from a JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    pub projection: ProjectionConfig,
    pub heuristic: HeuristicConfig,
    pub partition: PartitionConfig,
    pub diagnostics: DiagnosticsConfig,
    pub lookup: LookupConfig,
}

impl TilingConfig {
    /// Reads a config from a JSON file at `path`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| TilingError::Config(format!("failed to open {}: {e}", path.display())))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| TilingError::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the partitioner cannot work with.
    pub fn validate(&self) -> Result<()> {
        let p = &self.partition;
        if !(0.0..=1.0).contains(&p.small_region_min_overlap) || !(0.0..=1.0).contains(&p.large_region_min_overlap) {
            return Err(TilingError::Config("min overlap ratios must lie in [0, 1]".into()));
        }
        if p.dedup_precision > 12 {
            return Err(TilingError::Config(format!("dedup_precision {} exceeds 12 decimals", p.dedup_precision)));
        }
        if p.fallback_aspect_ratio < 1.0 {
            return Err(TilingError::Config("fallback_aspect_ratio must be at least 1".into()));
        }
        if self.heuristic.area_brackets.iter().any(|b| b.tile_km == 0) || self.heuristic.default_tile_km == 0 {
            return Err(TilingError::Config("tile sizes must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.lookup.similarity_cutoff) {
            return Err(TilingError::Config("similarity_cutoff must lie in [0, 1]".into()));
        }
        Ok(())
    }
}

/// PROJ.4 definitions of the geodetic (storage) and planar (metric) frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub geodetic: String,
    pub planar: String,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            // GDA2020 lon/lat (GRS80, coincident with WGS84 at the metre level).
            geodetic: "+proj=longlat +ellps=GRS80 +towgs84=0,0,0 +no_defs".into(),
            // Australian Albers (EPSG:3577 parameters), equal-area so km² stay honest.
            planar: "+proj=aea +lat_1=-18 +lat_2=-36 +lat_0=0 +lon_0=132 +x_0=0 +y_0=0 \
                     +ellps=GRS80 +towgs84=0,0,0 +units=m +no_defs".into(),
        }
    }
}

/// One row of the area-bracket table: regions with `min_sqkm <= area < max_sqkm`
/// get `tile_km` tiles. `max_sqkm = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaBracket {
    pub min_sqkm: f64,
    pub max_sqkm: Option<f64>,
    pub tile_km: u32,
}

impl AreaBracket {
    pub const fn new(min_sqkm: f64, max_sqkm: Option<f64>, tile_km: u32) -> Self {
        Self { min_sqkm, max_sqkm, tile_km }
    }

    #[inline]
    pub fn contains(&self, area_sqkm: f64) -> bool {
        area_sqkm >= self.min_sqkm && self.max_sqkm.is_none_or(|max| area_sqkm < max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Substrings marking sparsely populated areas (matched case-insensitively).
    pub low_density_keywords: Vec<String>,
    /// Parent-group names of the major metro groupings.
    pub metro_names: Vec<String>,
    pub metro_area_threshold_sqkm: f64,
    pub metro_small_tile_km: u32,
    pub metro_large_tile_km: u32,
    /// Ascending, non-overlapping brackets.
    pub area_brackets: Vec<AreaBracket>,
    pub default_tile_km: u32,
}

impl HeuristicConfig {
    /// Largest tile size of the bracket table, used for low-density regions.
    pub fn max_tile_km(&self) -> u32 {
        self.area_brackets.iter()
            .map(|b| b.tile_km)
            .max()
            .unwrap_or(self.default_tile_km)
    }
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        let keywords = [
            "desert", "reserve", "national park", "conservation", "state forest",
            "offshore", "shipping", "migratory", "unincorporated", "military",
            "training area", "defence", "outback", "no usual address",
        ];
        let metros = [
            "Greater Sydney", "Greater Melbourne", "Greater Brisbane", "Greater Perth",
            "Greater Adelaide", "Greater Hobart", "Greater Darwin", "Australian Capital Territory",
        ];
        Self {
            low_density_keywords: keywords.iter().map(|s| s.to_string()).collect(),
            metro_names: metros.iter().map(|s| s.to_string()).collect(),
            metro_area_threshold_sqkm: 5000.0,
            metro_small_tile_km: 5,
            metro_large_tile_km: 10,
            area_brackets: vec![
                AreaBracket::new(0.0, Some(3.0), 5),
                AreaBracket::new(3.0, Some(1000.0), 10),
                AreaBracket::new(1000.0, Some(5000.0), 20),
                AreaBracket::new(5000.0, None, 30),
            ],
            default_tile_km: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Single tile when `area <= factor * tile_km²`.
    pub single_tile_area_factor: f64,
    /// Single tile when `max(width, height) <= factor * tile_km`.
    pub single_tile_extent_factor: f64,
    /// Regions below this area get the small buffer and overlap settings.
    pub small_buffer_area_sqkm: f64,
    pub small_buffer_fraction: f64,
    pub large_buffer_fraction: f64,
    pub overlap_area_split_sqkm: f64,
    pub small_region_min_overlap: f64,
    pub large_region_min_overlap: f64,
    /// Fallback splits the bounding box in two above this aspect ratio.
    pub fallback_aspect_ratio: f64,
    /// Decimal places compared when dropping duplicate tiles.
    pub dedup_precision: u32,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            single_tile_area_factor: 1.5,
            single_tile_extent_factor: 3.0,
            small_buffer_area_sqkm: 200.0,
            small_buffer_fraction: 0.10,
            large_buffer_fraction: 0.02,
            overlap_area_split_sqkm: 500.0,
            small_region_min_overlap: 0.2,
            large_region_min_overlap: 0.3,
            fallback_aspect_ratio: 3.0,
            dedup_precision: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub max_deviation_pct: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self { Self { max_deviation_pct: 30.0 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub max_suggestions: usize,
    pub similarity_cutoff: f64,
}

impl Default for LookupConfig {
    fn default() -> Self { Self { max_suggestions: 5, similarity_cutoff: 0.6 } }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_brackets_cover_positive_areas() {
        let config = HeuristicConfig::default();
        for area in [0.5, 3.0, 999.9, 1000.0, 4999.0, 5000.0, 2.5e6] {
            assert_eq!(config.area_brackets.iter().filter(|b| b.contains(area)).count(), 1, "area {area}");
        }
        assert_eq!(config.max_tile_km(), 30);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "partition": {{ "dedup_precision": 4 }}, "lookup": {{ "max_suggestions": 3 }} }}"#).unwrap();

        let config = TilingConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.partition.dedup_precision, 4);
        assert_eq!(config.partition.large_region_min_overlap, 0.3);
        assert_eq!(config.lookup.max_suggestions, 3);
        assert_eq!(config.lookup.similarity_cutoff, 0.6);
        assert_eq!(config.heuristic, HeuristicConfig::default());
    }

    #[test]
    fn rejects_out_of_range_overlap() {
        let mut config = TilingConfig::default();
        config.partition.large_region_min_overlap = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loading_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "partition": {{ "small_region_min_overlap": -0.1 }} }}"#).unwrap();
        assert!(matches!(TilingConfig::from_json_file(file.path()), Err(TilingError::Config(_))));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = TilingConfig::from_json_file(Path::new("/nonexistent/placetiles.json")).unwrap_err();
        assert!(matches!(err, TilingError::Config(_)));
    }
}
