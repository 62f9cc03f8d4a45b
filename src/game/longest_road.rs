use std::collections::HashSet;

use crate::board::{BoardGraph, EdgeId, VertexId, normalize_edge};

/// Longest simple walk (edge count) through `roads`, not passing
/// through any vertex in `blocked` except as a walk endpoint. Iterative
/// DFS with a per-branch edge bitset; boards stay under 128 edges.
pub fn longest_road_length(
    board: &BoardGraph,
    roads: &[EdgeId],
    blocked: &HashSet<VertexId>,
) -> u8 {
    let owned: HashSet<EdgeId> = roads.iter().map(|&edge| normalize_edge(edge)).collect();
    let starts: HashSet<VertexId> = owned.iter().flat_map(|&(a, b)| [a, b]).collect();

    let mut best = 0u8;
    let mut stack: Vec<(VertexId, u128, u8)> =
        starts.iter().map(|&vertex| (vertex, 0u128, 0u8)).collect();

    while let Some((vertex, visited, length)) = stack.pop() {
        best = best.max(length);
        // An opponent building severs the walk at this junction; the
        // edge that reached it still counted.
        if length > 0 && blocked.contains(&vertex) {
            continue;
        }
        for &edge in board.edges_at(vertex) {
            if !owned.contains(&edge) {
                continue;
            }
            let Some(position) = board.edge_position(edge) else {
                continue;
            };
            let bit = 1u128 << position;
            if visited & bit != 0 {
                continue;
            }
            let next = if edge.0 == vertex { edge.1 } else { edge.0 };
            stack.push((next, visited | bit, length + 1));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MapType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board() -> BoardGraph {
        let mut rng = StdRng::seed_from_u64(5);
        BoardGraph::generate(MapType::Base, &mut rng)
    }

    /// The first `length` edges of a walk along the joint boundary of
    /// two adjacent tiles. That boundary is a ten-edge cycle, so any
    /// prefix up to nine edges is a plain open chain.
    fn chain(board: &BoardGraph, length: usize) -> Vec<EdgeId> {
        assert!(length <= 9);
        let first = board.tile(0).unwrap();
        let second = board.tile(1).unwrap();
        let mut ring: Vec<EdgeId> = first
            .edges
            .iter()
            .chain(second.edges.iter())
            .copied()
            .collect();
        ring.retain(|edge| !(first.edges.contains(edge) && second.edges.contains(edge)));

        let mut vertex = ring[0].0;
        let mut used: HashSet<EdgeId> = HashSet::new();
        let mut path = Vec::new();
        while path.len() < length {
            let edge = *ring
                .iter()
                .find(|edge| !used.contains(*edge) && (edge.0 == vertex || edge.1 == vertex))
                .expect("the boundary ring is a cycle");
            used.insert(edge);
            vertex = if edge.0 == vertex { edge.1 } else { edge.0 };
            path.push(edge);
        }
        path
    }

    #[test]
    fn empty_network_has_length_zero() {
        assert_eq!(longest_road_length(&board(), &[], &HashSet::new()), 0);
    }

    #[test]
    fn simple_chain_counts_every_edge() {
        let board = board();
        let path = chain(&board, 5);
        assert_eq!(longest_road_length(&board, &path, &HashSet::new()), 5);
    }

    #[test]
    fn extension_never_shrinks_the_result() {
        let board = board();
        let path = chain(&board, 7);
        let mut previous = 0;
        for prefix in 1..=path.len() {
            let length = longest_road_length(&board, &path[..prefix], &HashSet::new());
            assert!(length >= previous);
            previous = length;
        }
    }

    #[test]
    fn blocked_junction_severs_the_walk() {
        let board = board();
        let path = chain(&board, 4);
        // Block the vertex shared by the second and third edge.
        let (a, b) = path[1];
        let shared = if path[2].0 == a || path[2].1 == a { a } else { b };
        let blocked = HashSet::from([shared]);
        let length = longest_road_length(&board, &path, &blocked);
        assert_eq!(length, 2);
    }

    #[test]
    fn disconnected_segments_score_independently() {
        let board = board();
        let path = chain(&board, 6);
        // Drop the middle edge to split the chain into 2 + 3.
        let split: Vec<EdgeId> = path
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != 2)
            .map(|(_, &edge)| edge)
            .collect();
        assert_eq!(longest_road_length(&board, &split, &HashSet::new()), 3);
    }
}
