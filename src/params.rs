//! Numeric parameter sets fed from host value vectors.

use crate::container::{DoubleVector, IntVector};

/// Fixed 1D distribution of points along edges.
///
/// The values are stored as given and read back unchanged; element types were
/// already checked when the vectors were built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedPoints1D {
    points: DoubleVector,
    segment_counts: IntVector,
    reversed_edges: IntVector,
}

impl FixedPoints1D {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parameters of the fixed points.
    pub fn set_points(&mut self, points: DoubleVector) {
        self.points = points;
    }

    #[must_use]
    pub fn points(&self) -> &DoubleVector {
        &self.points
    }

    /// Sets the number of segments between consecutive fixed points.
    pub fn set_segment_counts(&mut self, counts: IntVector) {
        self.segment_counts = counts;
    }

    #[must_use]
    pub fn segment_counts(&self) -> &IntVector {
        &self.segment_counts
    }

    /// Sets the ids of edges whose distribution runs backwards.
    pub fn set_reversed_edges(&mut self, edges: IntVector) {
        self.reversed_edges = edges;
    }

    #[must_use]
    pub fn reversed_edges(&self) -> &IntVector {
        &self.reversed_edges
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::container::RawValue::{Int, Real};

    #[test]
    fn points_read_back_unchanged() {
        let mut params = FixedPoints1D::new();
        params.set_points(DoubleVector::from_raw(&[Real(1.0), Real(3.0), Real(4.0)]).unwrap());
        assert_eq!(params.points().as_slice(), &[1.0, 3.0, 4.0]);
    }

    #[test]
    fn promoted_points_are_reals() {
        let mut params = FixedPoints1D::new();
        params.set_points(DoubleVector::from_raw(&[Real(0.0), Int(2), Real(0.5)]).unwrap());
        assert_eq!(params.points().as_slice(), &[0.0, 2.0, 0.5]);
    }

    #[test]
    fn reversed_edges_read_back_unchanged() {
        let mut params = FixedPoints1D::new();
        params.set_reversed_edges(IntVector::from_raw(&[Int(1), Int(2), Int(3)]).unwrap());
        assert_eq!(params.reversed_edges().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn segment_counts_are_kept() {
        let mut params = FixedPoints1D::new();
        params.set_segment_counts(vec![2, 3].into());
        assert_eq!(params.segment_counts().as_slice(), &[2, 3]);
    }

    #[test]
    fn later_values_replace_earlier_ones() {
        let mut params = FixedPoints1D::new();
        params.set_points(vec![1.0].into());
        params.set_points(vec![5.0, 6.0].into());
        assert_eq!(params.points().len(), 2);
    }
}
