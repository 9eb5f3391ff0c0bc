use std::fmt;

use geo::{Coord, MapCoords, MultiPolygon, Rect};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::{config::ProjectionConfig, error::{Result, TilingError}};

/// Converts geometries between the geodetic frame (lon/lat degrees) and the
/// planar frame (metres). Built once and shared read-only.
pub struct Projector {
    geodetic: Proj4,
    planar: Proj4,
    definitions: (String, String),
}

impl Projector {
    /// Build both transformers from their PROJ.4 strings.
    pub fn new(config: &ProjectionConfig) -> Result<Self> {
        let build = |proj_string: &str| Proj4::from_proj_string(proj_string)
            .map_err(|e| TilingError::Projection(format!("failed to build PROJ.4 '{proj_string}': {e:?}")));

        Ok(Self {
            geodetic: build(&config.geodetic)?,
            planar: build(&config.planar)?,
            definitions: (config.geodetic.clone(), config.planar.clone()),
        })
    }

    /// Project a lon/lat coordinate (degrees) to planar metres.
    pub fn point_to_planar(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        // Degrees → radians in, metres out.
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.geodetic, &self.planar, &mut point)
            .map_err(|e| TilingError::Projection(format!("({}, {}) to planar: {e:?}", coord.x, coord.y)))?;
        Ok(Coord { x: point.0, y: point.1 })
    }

    /// Unproject a planar coordinate (metres) back to lon/lat degrees.
    pub fn point_to_geodetic(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x, coord.y, 0.0);
        transform(&self.planar, &self.geodetic, &mut point)
            .map_err(|e| TilingError::Projection(format!("({}, {}) to geodetic: {e:?}", coord.x, coord.y)))?;
        Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
    }

    #[inline]
    pub fn to_planar(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.try_map_coords(|coord| self.point_to_planar(coord))
    }

    #[inline]
    pub fn to_geodetic(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.try_map_coords(|coord| self.point_to_geodetic(coord))
    }

    /// Geodetic bounding rectangle of a planar box. All four corners are
    /// unprojected since planar edges are not parallels/meridians.
    pub fn rect_to_geodetic(&self, rect: &Rect<f64>) -> Result<Rect<f64>> {
        let (min, max) = (rect.min(), rect.max());
        let corners = [
            Coord { x: min.x, y: min.y },
            Coord { x: max.x, y: min.y },
            Coord { x: max.x, y: max.y },
            Coord { x: min.x, y: max.y },
        ];

        let mut low = Coord { x: f64::INFINITY, y: f64::INFINITY };
        let mut high = Coord { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
        for corner in corners {
            let c = self.point_to_geodetic(corner)?;
            low = Coord { x: low.x.min(c.x), y: low.y.min(c.y) };
            high = Coord { x: high.x.max(c.x), y: high.y.max(c.y) };
        }
        Ok(Rect::new(low, high))
    }
}

impl fmt::Debug for Projector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector")
            .field("geodetic", &self.definitions.0)
            .field("planar", &self.definitions.1)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use geo::{Area, Coord, MultiPolygon, Rect};

    use super::Projector;
    use crate::config::ProjectionConfig;

    fn projector() -> Projector { Projector::new(&ProjectionConfig::default()).unwrap() }

    #[test]
    fn point_round_trip_is_stable() {
        let projector = projector();
        let cities = [(151.2093, -33.8688), (144.9631, -37.8142), (115.8605, -31.9505),
                      (130.8456, -12.4634), (147.3272, -42.8821), (133.8807, -23.6980)];
        for (lon, lat) in cities {
            let planar = projector.point_to_planar(Coord { x: lon, y: lat }).unwrap();
            let back = projector.point_to_geodetic(planar).unwrap();
            assert!((back.x - lon).abs() < 1e-4 && (back.y - lat).abs() < 1e-4, "{lon},{lat} -> {back:?}");
        }
    }

    #[test]
    fn planar_frame_is_metric() {
        let projector = projector();
        // One degree of latitude is ~111 km everywhere.
        let a = projector.point_to_planar(Coord { x: 140.0, y: -30.0 }).unwrap();
        let b = projector.point_to_planar(Coord { x: 140.0, y: -31.0 }).unwrap();
        let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
        assert!((d - 110_900.0).abs() < 2_000.0, "distance {d}");
    }

    #[test]
    fn equal_area_square_round_trip() {
        let projector = projector();
        let square = MultiPolygon::new(vec![
            Rect::new(Coord { x: 1_000_000.0, y: -3_500_000.0 }, Coord { x: 1_010_000.0, y: -3_490_000.0 }).to_polygon(),
        ]);
        let geodetic = projector.to_geodetic(&square).unwrap();
        let planar = projector.to_planar(&geodetic).unwrap();
        assert!((planar.unsigned_area() - 1.0e8).abs() < 1.0);
    }

    #[test]
    fn rect_to_geodetic_contains_corners() {
        let projector = projector();
        let rect = Rect::new(Coord { x: 0.0, y: -4_000_000.0 }, Coord { x: 20_000.0, y: -3_980_000.0 });
        let geo_rect = projector.rect_to_geodetic(&rect).unwrap();
        let corner = projector.point_to_geodetic(Coord { x: 20_000.0, y: -3_980_000.0 }).unwrap();
        assert!(geo_rect.min().x <= corner.x && corner.x <= geo_rect.max().x);
        assert!(geo_rect.min().y <= corner.y && corner.y <= geo_rect.max().y);
        assert!(geo_rect.min().y < geo_rect.max().y);
    }

    #[test]
    fn invalid_definition_is_rejected() {
        let config = ProjectionConfig { planar: "+proj=nonsense".into(), ..ProjectionConfig::default() };
        assert!(Projector::new(&config).is_err());
    }
}
