use super::edge::Edge;

/// Edges crossing the row being swept, kept in ascending `x` for resolve.
#[derive(Default)]
pub struct ActiveEdges {
    edges: Vec<Edge>,
}

impl ActiveEdges {
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Append the edges that start on this row.
    pub fn activate(&mut self, incoming: impl IntoIterator<Item = Edge>) {
        self.edges.extend(incoming);
    }

    /// Stable sort by `x`: equal crossings keep their insertion order, which
    /// keeps the output deterministic.
    pub fn sort(&mut self) {
        self.edges.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    /// Step every edge down one row and evict the exhausted ones.
    /// Returns how many left the set.
    pub fn advance(&mut self) -> usize {
        let before = self.edges.len();
        self.edges.retain_mut(Edge::advance);
        before - self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(polygon: u32, x: f32, slope_x: f32, rows: u32) -> Edge {
        Edge {
            polygon,
            upper_row: 10,
            remaining_rows: rows,
            x,
            depth: 0.5,
            slope_x,
            depth_step: 0.0,
        }
    }

    #[test]
    fn sort_is_stable_for_equal_x() {
        let mut a = ActiveEdges::default();
        a.activate([edge(2, 5.0, 0.0, 3), edge(0, 1.0, 0.0, 3), edge(1, 5.0, 0.0, 3)]);
        a.sort();
        let order: Vec<u32> = a.edges().iter().map(|e| e.polygon).collect();
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn advance_moves_x_and_evicts_exhausted_edges() {
        let mut a = ActiveEdges::default();
        a.activate([edge(0, 1.0, 0.5, 1), edge(1, 4.0, -1.0, 2)]);
        assert_eq!(a.advance(), 1);
        assert_eq!(a.len(), 1);
        assert_eq!(a.edges()[0].polygon, 1);
        assert_eq!(a.edges()[0].x, 3.0);
        assert_eq!(a.advance(), 1);
        assert!(a.is_empty());
    }

    #[test]
    fn crossing_edges_swap_after_resort() {
        let mut a = ActiveEdges::default();
        a.activate([edge(0, 0.0, 3.0, 5), edge(1, 2.0, -3.0, 5)]);
        a.sort();
        assert_eq!(a.edges()[0].polygon, 0);
        a.advance();
        a.sort();
        assert_eq!(a.edges()[0].polygon, 1);
    }
}
