use tracing::debug;

use crate::{
    catalog::{Region, SourceType},
    config::HeuristicConfig,
};

/// Which rule picked a tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    LowDensityKeyword,
    Metro,
    AreaBracket,
    Default,
}

/// Pick the tile edge (km) for `region`. Rules are tried in order and the
/// first match wins:
/// 1. a low-density keyword in the name, parent group or context → the largest bracket size;
/// 2. membership of a major metro grouping → fine tiles, by area;
/// 3. the area-bracket table;
/// 4. the configured default.
pub fn determine_tile_size_km(region: &Region, source: SourceType, config: &HeuristicConfig) -> u32 {
    classify(region, source, config).0
}

/// Like [`determine_tile_size_km`], also reporting the rule that matched.
pub fn classify(region: &Region, source: SourceType, config: &HeuristicConfig) -> (u32, SizeRule) {
    let area = region.area_sqkm();

    let decision = if has_low_density_keyword(region, config) {
        (config.max_tile_km(), SizeRule::LowDensityKeyword)
    } else if is_metro(region, source, config) {
        let size = if area < config.metro_area_threshold_sqkm { config.metro_small_tile_km }
                   else { config.metro_large_tile_km };
        (size, SizeRule::Metro)
    } else if let Some(bracket) = (area > 0.0).then(|| config.area_brackets.iter().find(|b| b.contains(area))).flatten() {
        (bracket.tile_km, SizeRule::AreaBracket)
    } else {
        (config.default_tile_km, SizeRule::Default)
    };

    debug!(region = region.key(), area_sqkm = area, tile_km = decision.0, rule = ?decision.1, "tile size decided");
    decision
}

fn has_low_density_keyword(region: &Region, config: &HeuristicConfig) -> bool {
    let texts = std::iter::once(region.display_name())
        .chain(region.parent_group())
        .chain(region.context().iter().map(String::as_str))
        .map(str::to_lowercase)
        .collect::<Vec<_>>();

    config.low_density_keywords.iter()
        .map(|keyword| keyword.to_lowercase())
        .any(|keyword| texts.iter().any(|text| text.contains(&keyword)))
}

fn is_metro(region: &Region, source: SourceType, config: &HeuristicConfig) -> bool {
    // A metro-groupings catalog holds the groupings themselves.
    let group = match source {
        SourceType::Gccsa => Some(region.display_name()),
        _ => region.parent_group(),
    };
    group.is_some_and(|group| config.metro_names.iter().any(|metro| metro.eq_ignore_ascii_case(group.trim())))
}
