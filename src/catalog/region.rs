use geo::MultiPolygon;

/// A named polygon from one catalog load. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub(crate) key: String,
    pub(crate) display_name: String,
    pub(crate) geometry: MultiPolygon<f64>,
    pub(crate) metadata_area_sqkm: Option<f64>,
    pub(crate) derived_area_sqkm: f64,
    pub(crate) parent_group: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) context: Vec<String>,
}

impl Region {
    /// Build a region directly, e.g. for ad-hoc geometries not coming from a catalog.
    /// `derived_area_sqkm` should be the planar area of `geometry`.
    pub fn new(name: &str, geometry: MultiPolygon<f64>, derived_area_sqkm: f64) -> Self {
        Self {
            key: normalize_name(name),
            display_name: name.trim().to_string(),
            geometry,
            metadata_area_sqkm: None,
            derived_area_sqkm,
            parent_group: None,
            state: None,
            context: Vec::new(),
        }
    }

    pub fn with_metadata_area(mut self, area_sqkm: f64) -> Self {
        self.metadata_area_sqkm = Some(area_sqkm);
        self
    }

    pub fn with_parent_group(mut self, parent_group: &str) -> Self {
        self.parent_group = Some(parent_group.to_string());
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context.push(context.to_string());
        self
    }

    /// Lowercase, trimmed lookup key.
    #[inline] pub fn key(&self) -> &str { &self.key }

    /// Name as it appears in the source.
    #[inline] pub fn display_name(&self) -> &str { &self.display_name }

    /// Shape in the geodetic frame (lon/lat degrees).
    #[inline] pub fn geometry(&self) -> &MultiPolygon<f64> { &self.geometry }

    #[inline] pub fn metadata_area_sqkm(&self) -> Option<f64> { self.metadata_area_sqkm }

    #[inline] pub fn derived_area_sqkm(&self) -> f64 { self.derived_area_sqkm }

    #[inline] pub fn parent_group(&self) -> Option<&str> { self.parent_group.as_deref() }

    #[inline] pub fn state(&self) -> Option<&str> { self.state.as_deref() }

    #[inline] pub fn context(&self) -> &[String] { &self.context }

    /// Metadata area when present and positive, else the area derived from the geometry.
    pub fn area_sqkm(&self) -> f64 {
        match self.metadata_area_sqkm {
            Some(area) if area > 0.0 => area,
            _ => self.derived_area_sqkm,
        }
    }
}

/// Lookup key for a region name.
#[inline]
pub fn normalize_name(name: &str) -> String { name.trim().to_lowercase() }
