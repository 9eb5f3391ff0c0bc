use std::path::Path;

use ahash::AHashMap;
use geo::{Coord, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{
    partition::{PartitionInput, Partitioner},
    tile::{LatLng, Tile},
};
use crate::{
    catalog::{close_matches, normalize_name},
    error::{Result, TilingError},
};

/// Key of the template entry used for windows around arbitrary centres.
pub const DEFAULT_PRESET: &str = "default";

/// Source label on tiles cut from a preset window.
pub const PRESET_SOURCE: &str = "preset";

/// Explicit lat/lon window, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsOverride {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundsOverride {
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self { lat_min, lat_max, lon_min, lon_max }
    }

    fn to_rect(self) -> Rect<f64> {
        Rect::new(Coord { x: self.lon_min, y: self.lat_min }, Coord { x: self.lon_max, y: self.lat_max })
    }
}

/// A named city window. The box override wins over the centre-based window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionPreset {
    pub tile_km: u32,
    pub width_km: f64,
    pub height_km: f64,
    #[serde(default, rename = "bbox_override", skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundsOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<LatLng>,
}

/// Built-in city windows, keyed by city name.
const BUILTIN_PRESETS: &str = include_str!("presets.json");

/// Named presets with case-insensitive lookup.
#[derive(Debug, Clone)]
pub struct PresetTable {
    presets: Vec<(String, RegionPreset)>,
    index: AHashMap<String, usize>,
}

impl Default for PresetTable {
    fn default() -> Self { Self::builtin() }
}

impl PresetTable {
    /// Windows for the capitals, regional cities and remote towns, plus the `default` template.
    pub fn builtin() -> Self {
        let entries = parse_presets(BUILTIN_PRESETS).expect("embedded preset table is valid");
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, RegionPreset)>) -> Self {
        let mut table = Self { presets: Vec::new(), index: AHashMap::new() };
        for (name, preset) in entries {
            let key = normalize_name(&name);
            match table.index.get(&key) {
                Some(&idx) => table.presets[idx] = (name, preset),
                None => {
                    table.index.insert(key, table.presets.len());
                    table.presets.push((name, preset));
                }
            }
        }
        table
    }

    /// Load a JSON object of `name → preset`, in the shape of the built-ins.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config_error = |reason: String| TilingError::Config(format!("{}: {reason}", path.display()));

        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let entries = parse_presets(&text).map_err(config_error)?;

        info!(path = %path.display(), presets = entries.len(), "loaded presets");
        Ok(Self::from_entries(entries))
    }

    #[inline] pub fn len(&self) -> usize { self.presets.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.presets.is_empty() }

    /// Preset names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&RegionPreset> {
        self.index.get(&normalize_name(name)).map(|&idx| &self.presets[idx].1)
    }

    /// Case-insensitive lookup; on a miss the error carries the closest names.
    pub fn resolve(&self, name: &str, max_suggestions: usize, cutoff: f64) -> Result<(&str, &RegionPreset)> {
        match self.index.get(&normalize_name(name)) {
            Some(&idx) => Ok((self.presets[idx].0.as_str(), &self.presets[idx].1)),
            None => {
                let keys = self.index.keys().map(String::as_str).collect::<Vec<_>>();
                let suggestions = close_matches(&normalize_name(name), keys, max_suggestions, cutoff);
                Err(TilingError::RegionNotFound { name: name.trim().to_string(), suggestions })
            }
        }
    }

    /// Partition the named preset's window.
    pub fn tiles_for(&self, name: &str, partitioner: &Partitioner<'_>) -> Result<Vec<Tile>> {
        let lookup = &partitioner.config().lookup;
        let (name, preset) = self.resolve(name, lookup.max_suggestions, lookup.similarity_cutoff)?;
        preset_tiles(name, preset, partitioner)
    }

    /// Partition a window around `center` sized by the `default` template.
    pub fn tiles_around(&self, name: &str, center: LatLng, partitioner: &Partitioner<'_>) -> Result<Vec<Tile>> {
        let template = self.get(DEFAULT_PRESET)
            .ok_or_else(|| TilingError::Config(format!("no '{DEFAULT_PRESET}' preset to size the window")))?;
        let preset = RegionPreset { bbox: None, center: Some(center), ..*template };
        preset_tiles(name, &preset, partitioner)
    }
}

/// Parse a JSON object of `name → preset`.
fn parse_presets(text: &str) -> std::result::Result<Vec<(String, RegionPreset)>, String> {
    let object: Map<String, Value> = serde_json::from_str(text).map_err(|e| e.to_string())?;

    let mut entries = Vec::with_capacity(object.len());
    for (name, value) in object {
        let preset: RegionPreset = serde_json::from_value(value).map_err(|e| format!("preset '{name}': {e}"))?;
        if preset.tile_km == 0 {
            return Err(format!("preset '{name}': tile_km must be positive"));
        }
        entries.push((name, preset));
    }
    Ok(entries)
}

fn preset_tiles(name: &str, preset: &RegionPreset, partitioner: &Partitioner<'_>) -> Result<Vec<Tile>> {
    let window = window(name, preset, partitioner)?;
    debug!(preset = name, tile_km = preset.tile_km, "partitioning preset window");

    partitioner.partition(&PartitionInput {
        region_name: name,
        geometry: &window,
        tile_km: preset.tile_km,
        area_sqkm: None,
        state: None,
        source: PRESET_SOURCE,
    })
}

/// The preset's box override, or a `width_km × height_km` planar window around its centre.
fn window(name: &str, preset: &RegionPreset, partitioner: &Partitioner<'_>) -> Result<MultiPolygon<f64>> {
    if let Some(bbox) = preset.bbox {
        if !(bbox.lat_min < bbox.lat_max && bbox.lon_min < bbox.lon_max) {
            return Err(TilingError::geometry(name, "bounding box override is empty"));
        }
        return Ok(MultiPolygon::new(vec![bbox.to_rect().to_polygon()]));
    }

    let center = preset.center
        .ok_or_else(|| TilingError::geometry(name, "preset has neither a bounding box nor a centre"))?;
    if !(preset.width_km > 0.0 && preset.height_km > 0.0) {
        return Err(TilingError::geometry(name, "preset window must have positive width and height"));
    }

    let projector = partitioner.projector();
    let middle = projector.point_to_planar(Coord { x: center.longitude, y: center.latitude })?;
    let (width, height) = (preset.width_km * 1000.0, preset.height_km * 1000.0);
    let rect = Rect::new(
        Coord { x: middle.x - width / 2.0, y: middle.y - height / 2.0 },
        Coord { x: middle.x + width / 2.0, y: middle.y + height / 2.0 },
    );

    projector.to_geodetic(&MultiPolygon::new(vec![rect.to_polygon()]))
}
