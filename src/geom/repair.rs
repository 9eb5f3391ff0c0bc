use geo::{BooleanOps, MultiPolygon, Validation};

/// Repair an invalid (self-intersecting, mis-oriented) shape by resolving it
/// through a boolean union with the empty set, the polygon-overlay
/// equivalent of a zero-width buffer. Valid shapes are returned unchanged.
pub(crate) fn make_valid(shape: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if shape.is_valid() { return shape.clone() }
    shape.union(&MultiPolygon::<f64>::new(vec![]))
}
