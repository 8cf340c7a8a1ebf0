use crate::Pt3;
use float_ord::FloatOrd;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Pt3,
    pub max: Pt3,
}

impl Bounds {
    /// Bounds in (xmin, xmax, ymin, ymax, zmin, zmax) order.
    pub fn from_array(bounds: [f64; 6]) -> Self {
        Self {
            min: Pt3::new(bounds[0], bounds[2], bounds[4]),
            max: Pt3::new(bounds[1], bounds[3], bounds[5]),
        }
    }

    /// Returns the bounds in (xmin, xmax, ymin, ymax, zmin, zmax) order.
    pub fn to_array(self) -> [f64; 6] {
        [
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        ]
    }

    /// Smallest box containing the points, or None if there are none.
    pub fn from_points<I: IntoIterator<Item = Pt3>>(points: I) -> Option<Self> {
        let points = points.into_iter().collect::<Vec<_>>();
        if points.is_empty() {
            return None;
        }

        let min = |f: fn(&Pt3) -> f64| points.iter().map(f).min_by_key(|x| FloatOrd(*x));
        let max = |f: fn(&Pt3) -> f64| points.iter().map(f).max_by_key(|x| FloatOrd(*x));

        Some(Self {
            min: Pt3::new(min(|p| p.x)?, min(|p| p.y)?, min(|p| p.z)?),
            max: Pt3::new(max(|p| p.x)?, max(|p| p.y)?, max(|p| p.z)?),
        })
    }

    /// Whether every coordinate is finite and min <= max on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|x| x.is_finite())
            && (0..3).all(|i| self.min[i] <= self.max[i])
    }

    pub fn center(&self) -> Pt3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bounds = Bounds::from_points(vec![
            Pt3::new(1.0, -2.0, 0.5),
            Pt3::new(-1.0, 4.0, 0.0),
            Pt3::new(0.0, 0.0, 3.0),
        ])
        .unwrap();
        assert_eq!(bounds.to_array(), [-1.0, 1.0, -2.0, 4.0, 0.0, 3.0]);
        assert_eq!(bounds.center(), Pt3::new(0.0, 1.0, 1.5));
    }

    #[test]
    fn test_from_no_points() {
        assert_eq!(Bounds::from_points(vec![]), None);
    }

    #[test]
    fn test_array_round_trip_and_diagonal() {
        let bounds = Bounds::from_array([0.0, 1.0, 0.0, 2.0, 0.0, 2.0]);
        assert_eq!(bounds.min, Pt3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Pt3::new(1.0, 2.0, 2.0));
        assert_eq!(bounds.diagonal(), 3.0);
    }

    #[test]
    fn test_validity() {
        assert!(Bounds::from_array([0.0, 0.0, 0.0, 1.0, 0.0, 1.0]).is_valid());
        assert!(!Bounds::from_array([1.0, 0.0, 0.0, 1.0, 0.0, 1.0]).is_valid());
        assert!(!Bounds::from_array([0.0, f64::NAN, 0.0, 1.0, 0.0, 1.0]).is_valid());
        assert!(!Bounds::from_array([0.0, f64::INFINITY, 0.0, 1.0, 0.0, 1.0]).is_valid());
    }
}
