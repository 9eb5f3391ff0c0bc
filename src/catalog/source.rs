use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TilingError;

/// The named geometry sources a catalog can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Fine-grained statistical areas (SA2).
    Sa2,
    /// Greater capital city metro groupings (GCCSA).
    Gccsa,
    /// Local government (administrative) areas.
    Lga,
    /// States and territories.
    State,
}

/// Property keys holding each semantic field in one source's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub name: &'static str,
    pub area: Option<&'static str>,
    pub parent_group: Option<&'static str>,
    pub state: Option<&'static str>,
    /// Free-text enclosing-area names searched for low-density keywords.
    pub context: &'static [&'static str],
}

impl FieldMap {
    /// Every distinct property key this map reads.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        for key in [Some(self.name), self.area, self.parent_group, self.state].into_iter()
            .flatten()
            .chain(self.context.iter().copied())
        {
            if !columns.contains(&key) { columns.push(key) }
        }
        columns
    }
}

const SA2_FIELDS: FieldMap = FieldMap {
    name: "SA2_NAME21",
    area: Some("AREASQKM21"),
    parent_group: Some("GCC_NAME21"),
    state: Some("STE_NAME21"),
    context: &["SA3_NAME21", "SA4_NAME21"],
};

const GCCSA_FIELDS: FieldMap = FieldMap {
    name: "GCC_NAME21",
    area: Some("AREASQKM21"),
    parent_group: None,
    state: Some("STE_NAME21"),
    context: &[],
};

const LGA_FIELDS: FieldMap = FieldMap {
    name: "LGA_NAME24",
    area: Some("AREASQKM"),
    parent_group: None,
    state: Some("STE_NAME21"),
    context: &[],
};

const STATE_FIELDS: FieldMap = FieldMap {
    name: "STE_NAME21",
    area: Some("AREASQKM21"),
    parent_group: None,
    state: Some("STE_NAME21"),
    context: &[],
};

impl SourceType {
    /// Short tag used on the command line and in tile records.
    pub fn tag(&self) -> &'static str {
        match self {
            SourceType::Sa2 => "regions",
            SourceType::Gccsa => "gccsa",
            SourceType::Lga => "lga",
            SourceType::State => "states",
        }
    }

    #[inline]
    pub fn field_map(&self) -> &'static FieldMap {
        match self {
            SourceType::Sa2 => &SA2_FIELDS,
            SourceType::Gccsa => &GCCSA_FIELDS,
            SourceType::Lga => &LGA_FIELDS,
            SourceType::State => &STATE_FIELDS,
        }
    }

    pub fn all() -> [SourceType; 4] {
        [SourceType::Sa2, SourceType::Gccsa, SourceType::Lga, SourceType::State]
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.tag()) }
}

impl FromStr for SourceType {
    type Err = TilingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regions" | "sa2" => Ok(SourceType::Sa2),
            "gccsa" | "metro" => Ok(SourceType::Gccsa),
            "lga" => Ok(SourceType::Lga),
            "states" | "state" | "ste" => Ok(SourceType::State),
            other => Err(TilingError::Config(format!(
                "unknown source type '{other}' (expected one of: regions, gccsa, lga, states)"
            ))),
        }
    }
}
