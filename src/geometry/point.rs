use std::hash::{Hash, Hasher};

use crate::math::{canonical_bits, point_eq, Point3};

/// An immutable point in 3D space.
///
/// Equality is componentwise and the hash is derived from the same three
/// components, so points can be used directly as set members and map keys.
/// `-0.0` and `0.0` are the same coordinate; NaN coordinates equal each other.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    position: Point3,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    /// Returns the coordinates as an `(x, y, z)` tuple.
    #[must_use]
    pub fn coord(&self) -> (f64, f64, f64) {
        (self.position.x, self.position.y, self.position.z)
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// Returns the underlying nalgebra point.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }
}

impl From<Point3> for Point {
    fn from(position: Point3) -> Self {
        Self { position }
    }
}

impl From<Point> for Point3 {
    fn from(point: Point) -> Self {
        point.position
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        point_eq(&self.position, &other.position)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.position.x).hash(state);
        canonical_bits(self.position.y).hash(state);
        canonical_bits(self.position.z).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn coord_echoes_inputs() {
        let p = Point::new(1.0, 2.0, 3.2);
        assert_eq!(p.coord(), (1.0, 2.0, 3.2));
    }

    #[test]
    fn membership_by_value() {
        let p1 = Point::new(1.0, 2.0, 3.0);
        let p2 = Point::new(2.0, 3.0, 4.0);
        let p3 = Point::new(5.0, 7.0, 8.0);
        let mut list = vec![p1, p2];

        assert!(list.contains(&Point::new(1.0, 2.0, 3.0)));
        assert!(!list.contains(&p3));
        assert_eq!(list.iter().position(|p| *p == p1), Some(0));
        assert_eq!(list.iter().position(|p| *p == p2), Some(1));

        list.reverse();
        assert_eq!(list.iter().position(|p| *p == p1), Some(1));
        assert_eq!(list.iter().position(|p| *p == p2), Some(0));
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Point::new(1.0, 2.0, 3.0), "P1");
        map.insert(Point::new(2.0, 3.0, 4.0), "P2");

        assert_eq!(map[&Point::new(1.0, 2.0, 3.0)], "P1");
        assert_eq!(map[&Point::new(2.0, 3.0, 4.0)], "P2");
    }

    #[test]
    fn negative_zero_is_same_key() {
        let mut map = HashMap::new();
        map.insert(Point::new(0.0, 0.0, 0.0), 1);
        assert_eq!(map.get(&Point::new(-0.0, 0.0, -0.0)), Some(&1));
    }

    #[test]
    fn nalgebra_conversion() {
        let p: Point = Point3::new(4.0, 5.0, 6.0).into();
        let back: Point3 = p.into();
        assert_eq!(back, Point3::new(4.0, 5.0, 6.0));
    }
}
