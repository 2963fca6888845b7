//! BFS two-coloring fast path.
//!
//! Bipartite graphs admit a two-coloring that the general pipeline cannot
//! always find (greedy ordering may use more colors). When the caller opts
//! in, this pass tries to prove bipartiteness by BFS; any odd cycle makes it
//! bail out so the normal pipeline runs instead. It can therefore never
//! compromise validity.

use crate::graph::Graph;
use crate::state::UNCOLORED;
use std::collections::VecDeque;

/// Attempts to two-color the graph.
///
/// Returns `Some(colors)` with every color in `{0, 1}` (isolated vertices get
/// 0) iff the graph is bipartite; `None` as soon as an odd cycle is found.
pub fn try_two_color(graph: &Graph) -> Option<Vec<i32>> {
    let n = graph.vertex_count();
    let mut colors = vec![UNCOLORED; n];
    let mut frontier = VecDeque::new();

    for root in 0..n {
        if colors[root] >= 0 {
            continue;
        }
        colors[root] = 0;
        frontier.push_back(root);
        while let Some(u) = frontier.pop_front() {
            let opposite = 1 - colors[u];
            for &w in graph.neighbors(u) {
                let w = w as usize;
                if colors[w] < 0 {
                    colors[w] = opposite;
                    frontier.push_back(w);
                } else if colors[w] == colors[u] {
                    return None;
                }
            }
        }
    }
    Some(colors)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::check_coloring;

    #[test]
    fn empty_graph_gets_color_zero() {
        let g = Graph::from_edges(4, &[]).unwrap();
        assert_eq!(try_two_color(&g), Some(vec![0, 0, 0, 0]));
    }

    #[test]
    fn path_is_two_colored() {
        let g = Graph::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]).unwrap();
        let colors = try_two_color(&g).unwrap();
        assert!(check_coloring(&g, &colors));
        assert_eq!(colors, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn grid_is_two_colored() {
        let mut edges = Vec::new();
        for r in 0..5u32 {
            for c in 0..5u32 {
                let v = r * 5 + c;
                if c + 1 < 5 {
                    edges.push((v, v + 1));
                }
                if r + 1 < 5 {
                    edges.push((v, v + 5));
                }
            }
        }
        let g = Graph::from_edges(25, &edges).unwrap();
        let colors = try_two_color(&g).unwrap();
        assert!(check_coloring(&g, &colors));
        assert_eq!(*colors.iter().max().unwrap(), 1);
    }

    #[test]
    fn triangle_is_rejected() {
        let g = Graph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]).unwrap();
        assert_eq!(try_two_color(&g), None);
    }

    #[test]
    fn odd_cycle_deep_in_one_component_is_rejected() {
        // A long even path feeding into a 5-cycle.
        let mut edges: Vec<(u32, u32)> = (0..10).map(|v| (v, v + 1)).collect();
        edges.extend([(10, 11), (11, 12), (12, 13), (13, 14), (14, 10)]);
        let g = Graph::from_edges(15, &edges).unwrap();
        assert_eq!(try_two_color(&g), None);
    }

    #[test]
    fn disconnected_components_are_each_rooted_at_zero() {
        let g = Graph::from_edges(5, &[(0, 1), (3, 4)]).unwrap();
        let colors = try_two_color(&g).unwrap();
        assert_eq!(colors[0], 0);
        assert_eq!(colors[2], 0);
        assert_eq!(colors[3], 0);
        assert!(check_coloring(&g, &colors));
    }
}
