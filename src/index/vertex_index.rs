//! Global vertex index.
//!
//! Every vertex of every blue line, sorted ascending by latitude, so that a
//! latitude band can be cut out with two binary searches.

use crate::types::{BlueLine, VertexRecord};

/// All blue vertices sorted by latitude.
#[derive(Debug, Clone, Default)]
pub struct VertexIndex {
    records: Vec<VertexRecord>,
}

impl VertexIndex {
    /// Collect the vertices of `lines` and sort them.
    ///
    /// The sort is stable, so vertices with equal latitude keep line order.
    pub fn build(lines: &[BlueLine]) -> Self {
        let mut records: Vec<VertexRecord> = lines
            .iter()
            .flat_map(|line| {
                line.vertices()
                    .into_iter()
                    .map(move |point| VertexRecord {
                        point,
                        line: line.id,
                    })
            })
            .collect();
        records.sort_by(|a, b| a.point.lat.total_cmp(&b.point.lat));

        VertexIndex { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VertexRecord] {
        &self.records
    }

    /// Index of the rightmost record with `lat <= bound`, or 0 if none is.
    pub fn rightmost_at_or_below(&self, bound: f64) -> usize {
        self.records
            .partition_point(|r| r.point.lat <= bound)
            .saturating_sub(1)
    }

    /// Records between the two bounds, widened by one record on the low side.
    ///
    /// The slice is a superset of the band `[low, high]`; callers filter by
    /// exact distance.
    pub fn window(&self, low: f64, high: f64) -> &[VertexRecord] {
        if self.records.is_empty() || high < low {
            return &[];
        }
        let start = self.rightmost_at_or_below(low);
        let end = self.rightmost_at_or_below(high);
        &self.records[start..=end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineId;
    use geo::{line_string, MultiLineString};

    fn blue(id: i64, lats: &[f64]) -> BlueLine {
        let ls: geo::LineString<f64> = lats.iter().map(|&lat| (0.0, lat)).collect::<Vec<_>>().into();
        BlueLine::new(LineId(id), MultiLineString::new(vec![ls]))
    }

    #[test]
    fn test_build_sorted_by_lat() {
        let index = VertexIndex::build(&[blue(1, &[3.0, 1.0]), blue(2, &[2.0, 0.5])]);
        let lats: Vec<f64> = index.records().iter().map(|r| r.point.lat).collect();
        assert_eq!(lats, vec![0.5, 1.0, 2.0, 3.0]);
        assert_eq!(index.records()[0].line, LineId(2));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_rightmost_at_or_below() {
        let index = VertexIndex::build(&[blue(1, &[1.0, 2.0, 3.0])]);
        assert_eq!(index.rightmost_at_or_below(2.0), 1);
        assert_eq!(index.rightmost_at_or_below(2.5), 1);
        assert_eq!(index.rightmost_at_or_below(0.0), 0);
        assert_eq!(index.rightmost_at_or_below(10.0), 2);
    }

    #[test]
    fn test_window_includes_one_below() {
        let index = VertexIndex::build(&[blue(1, &[1.0, 2.0, 3.0, 4.0])]);
        let window = index.window(2.5, 3.5);
        let lats: Vec<f64> = window.iter().map(|r| r.point.lat).collect();
        assert_eq!(lats, vec![2.0, 3.0]);
    }

    #[test]
    fn test_window_empty_index() {
        let index = VertexIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.window(0.0, 1.0).is_empty());
    }

    #[test]
    fn test_build_multi_part_line() {
        let geometry = MultiLineString::new(vec![
            line_string![(x: 0.0, y: 1.0), (x: 0.0, y: 2.0)],
            line_string![(x: 0.0, y: 5.0), (x: 0.0, y: 6.0)],
        ]);
        let index = VertexIndex::build(&[BlueLine::new(LineId(9), geometry)]);
        assert_eq!(index.len(), 4);
        assert!(index.records().iter().all(|r| r.line == LineId(9)));
    }
}
