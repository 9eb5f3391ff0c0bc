use geo::{Coord, Rect};

/// Axis-aligned square with lower-left corner `(x, y)` and edge `size`.
#[inline]
pub(crate) fn square(x: f64, y: f64, size: f64) -> Rect<f64> {
    Rect::new(Coord { x, y }, Coord { x: x + size, y: y + size })
}

/// Grow `rect` by `by` on every side.
#[inline]
pub(crate) fn expand(rect: &Rect<f64>, by: f64) -> Rect<f64> {
    Rect::new(
        Coord { x: rect.min().x - by, y: rect.min().y - by },
        Coord { x: rect.max().x + by, y: rect.max().y + by },
    )
}

/// Ratio of the longer to the shorter edge (infinite for a zero-width box).
#[inline]
pub(crate) fn aspect_ratio(rect: &Rect<f64>) -> f64 {
    let (long, short) = if rect.width() >= rect.height() { (rect.width(), rect.height()) }
                        else { (rect.height(), rect.width()) };
    if short > 0.0 { long / short } else { f64::INFINITY }
}

/// Cut `rect` into `pieces` equal slabs across its longer axis.
pub(crate) fn split_long_axis(rect: &Rect<f64>, pieces: usize) -> Vec<Rect<f64>> {
    let pieces = pieces.max(1);
    let (min, max) = (rect.min(), rect.max());

    (0..pieces).map(|i| {
        let (t0, t1) = (i as f64 / pieces as f64, (i + 1) as f64 / pieces as f64);
        if rect.width() >= rect.height() {
            let (x0, x1) = (min.x + t0 * rect.width(), min.x + t1 * rect.width());
            Rect::new(Coord { x: x0, y: min.y }, Coord { x: x1, y: max.y })
        } else {
            let (y0, y1) = (min.y + t0 * rect.height(), min.y + t1 * rect.height());
            Rect::new(Coord { x: min.x, y: y0 }, Coord { x: max.x, y: y1 })
        }
    }).collect()
}

#[cfg(test)]
mod tests {
    use geo::{Coord, Rect};

    use super::*;

    fn rect(w: f64, h: f64) -> Rect<f64> { Rect::new(Coord { x: 10.0, y: 20.0 }, Coord { x: 10.0 + w, y: 20.0 + h }) }

    #[test]
    fn expand_grows_every_side() {
        let grown = expand(&rect(4.0, 2.0), 1.0);
        assert_eq!(grown.min(), Coord { x: 9.0, y: 19.0 });
        assert_eq!(grown.max(), Coord { x: 15.0, y: 23.0 });
    }

    #[test]
    fn aspect_ratio_ignores_orientation() {
        assert_eq!(aspect_ratio(&rect(8.0, 2.0)), 4.0);
        assert_eq!(aspect_ratio(&rect(2.0, 8.0)), 4.0);
        assert!(aspect_ratio(&rect(2.0, 0.0)).is_infinite());
    }

    #[test]
    fn split_follows_longer_axis() {
        let tall = split_long_axis(&rect(2.0, 10.0), 2);
        assert_eq!(tall.len(), 2);
        assert_eq!(tall[0].max().y, 25.0);
        assert_eq!(tall[1].min().y, 25.0);
        assert_eq!(tall[1].width(), 2.0);

        let wide = split_long_axis(&rect(10.0, 2.0), 2);
        assert_eq!(wide[0].max().x, 15.0);
        assert_eq!(split_long_axis(&rect(10.0, 2.0), 1), vec![rect(10.0, 2.0)]);
    }

    #[test]
    fn square_has_requested_edge() {
        let s = square(1.0, 2.0, 5.0);
        assert_eq!((s.width(), s.height()), (5.0, 5.0));
    }
}
