use std::str::FromStr;

use ahash::AHashSet;
use geo::Rect;
use serde::{Deserialize, Serialize};

use crate::error::TilingError;

/// A geodetic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub const fn new(latitude: f64, longitude: f64) -> Self { Self { latitude, longitude } }
}

/// Parses `"LAT,LON"`, e.g. `"-14.4656,132.2635"`.
impl FromStr for LatLng {
    type Err = TilingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TilingError::Config(format!("invalid coordinate '{s}': {reason}"));

        let (lat, lon) = s.split_once(',').ok_or_else(|| invalid("expected LAT,LON"))?;
        let latitude: f64 = lat.trim().parse().map_err(|_| invalid("latitude is not a number"))?;
        let longitude: f64 = lon.trim().parse().map_err(|_| invalid("longitude is not a number"))?;

        if !(-90.0..=90.0).contains(&latitude) { return Err(invalid("latitude out of range")) }
        if !(-180.0..=180.0).contains(&longitude) { return Err(invalid("longitude out of range")) }
        Ok(Self::new(latitude, longitude))
    }
}

/// Which partitioning path produced a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileStrategy {
    Single,
    Grid,
    Fallback,
}

/// A lat/lon rectangle handed to the search client as a location-bias window.
/// Serialises to exactly `region`, `state`, `source`, `tile_name`, `low`, `high`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub region: String,
    pub state: Option<String>,
    pub source: String,
    pub tile_name: String,
    pub low: LatLng,
    pub high: LatLng,
    #[serde(skip)]
    pub(crate) planar: Rect<f64>,
    #[serde(skip)]
    pub(crate) strategy: TileStrategy,
}

impl Tile {
    /// The planar (metre) box this tile was cut from.
    #[inline] pub fn planar_box(&self) -> Rect<f64> { self.planar }

    #[inline] pub fn strategy(&self) -> TileStrategy { self.strategy }

    /// Dedup identity: the four corners rounded to `precision` decimals.
    pub fn key(&self, precision: u32) -> TileKey {
        let scale = 10f64.powi(precision as i32);
        let q = |v: f64| (v * scale).round() as i64;
        TileKey([q(self.low.latitude), q(self.low.longitude), q(self.high.latitude), q(self.high.longitude)])
    }
}

/// Rounded corner tuple `(low.lat, low.lon, high.lat, high.lon)` in units of `10^-precision` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey(pub [i64; 4]);

/// Round `value` to `precision` decimal places.
#[inline]
pub(crate) fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}

/// Insertion-ordered tile collection that drops tiles whose rounded
/// corners match a tile already present.
#[derive(Debug, Clone)]
pub(crate) struct TileSet {
    precision: u32,
    seen: AHashSet<TileKey>,
    tiles: Vec<Tile>,
}

impl TileSet {
    pub(crate) fn new(precision: u32) -> Self {
        Self { precision, seen: AHashSet::new(), tiles: Vec::new() }
    }

    /// Insert `tile` unless a tile with the same key exists. Returns whether it was inserted.
    pub(crate) fn insert(&mut self, tile: Tile) -> bool {
        if !self.seen.insert(tile.key(self.precision)) { return false }
        self.tiles.push(tile);
        true
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.tiles.len() }

    #[inline] pub(crate) fn into_vec(self) -> Vec<Tile> { self.tiles }
}

#[cfg(test)]
mod tests {
    use geo::{Coord, Rect};

    use super::*;

    fn tile(name: &str, low: (f64, f64), high: (f64, f64)) -> Tile {
        Tile {
            region: "alpine".into(),
            state: Some("Victoria".into()),
            source: "lga".into(),
            tile_name: name.into(),
            low: LatLng::new(low.0, low.1),
            high: LatLng::new(high.0, high.1),
            planar: Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }),
            strategy: TileStrategy::Grid,
        }
    }

    #[test]
    fn near_identical_corners_dedup() {
        let mut set = TileSet::new(6);
        assert!(set.insert(tile("a", (-37.1, 146.2), (-37.0, 146.3))));
        assert!(!set.insert(tile("b", (-37.1000000004, 146.2), (-37.0, 146.3000000002))));
        assert!(set.insert(tile("c", (-37.100001, 146.2), (-37.0, 146.3))));
        assert_eq!(set.len(), 2);
        assert_eq!(set.into_vec().iter().map(|t| t.tile_name.as_str()).collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn coarser_precision_merges_more() {
        let mut set = TileSet::new(2);
        assert!(set.insert(tile("a", (-37.1, 146.2), (-37.0, 146.3))));
        assert!(!set.insert(tile("b", (-37.101, 146.2), (-37.0, 146.3))));
    }

    #[test]
    fn serialises_public_fields_only() {
        let json = serde_json::to_value(tile("alpine_r0_c0", (-37.1, 146.2), (-37.0, 146.3))).unwrap();
        let mut keys = json.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        assert_eq!(keys, ["high", "low", "region", "source", "state", "tile_name"]);
        assert_eq!(json["low"]["latitude"], -37.1);
        assert_eq!(json["high"]["longitude"], 146.3);
    }

    #[test]
    fn rounds_to_requested_decimals() {
        assert_eq!(round_to(-33.86884449, 6), -33.868844);
        assert_eq!(round_to(151.2093335, 3), 151.209);
    }

    #[test]
    fn parses_lat_lon_pairs() {
        assert_eq!("-14.4656,132.2635".parse::<LatLng>().unwrap(), LatLng::new(-14.4656, 132.2635));
        assert_eq!(" -33.87 , 151.21 ".parse::<LatLng>().unwrap(), LatLng::new(-33.87, 151.21));

        for bad in ["-14.4656", "north,132.26", "-95.0,132.26", "-14.46,181.0"] {
            assert!(matches!(bad.parse::<LatLng>(), Err(TilingError::Config(_))), "{bad}");
        }
    }
}
