use tracing::{debug, warn};

/// Actual vs. area-derived tile count for one partitioning run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageReport {
    pub expected: u64,
    pub actual: usize,
    /// `|actual - expected| / expected` in percent; `None` when nothing was expected.
    pub deviation_pct: Option<f64>,
    pub flagged: bool,
}

/// Compare `actual` against `floor(area / tile_km²)` and log the result.
/// Advisory only: the caller never rejects tiles based on it.
pub fn diagnose(region: &str, area_sqkm: f64, tile_km: u32, actual: usize, max_deviation_pct: f64) -> CoverageReport {
    let tile_area = f64::from(tile_km) * f64::from(tile_km);
    let expected = if tile_area > 0.0 && area_sqkm > 0.0 { (area_sqkm / tile_area).floor() as u64 } else { 0 };

    let deviation_pct = (expected > 0)
        .then(|| (actual as f64 - expected as f64).abs() / expected as f64 * 100.0);
    let flagged = deviation_pct.is_some_and(|d| d > max_deviation_pct);

    if flagged {
        warn!(region, area_sqkm, tile_km, expected, actual, deviation_pct, "tile count deviates from area estimate");
    } else {
        debug!(region, area_sqkm, tile_km, expected, actual, deviation_pct, "tile coverage");
    }

    CoverageReport { expected, actual, deviation_pct, flagged }
}
