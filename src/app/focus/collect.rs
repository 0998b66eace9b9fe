use std::collections::{HashSet, VecDeque};

use crate::host::EdgeDirection;

use super::super::graph::GraphModel;

/// Node ids reachable from `root`, following edges the way `direction` orients them.
pub(super) fn collect_reachable(
    model: &GraphModel,
    root: usize,
    direction: EdgeDirection,
) -> HashSet<String> {
    let mut adjacency = vec![Vec::new(); model.nodes.len()];
    for &(from, to) in &model.edges {
        let (source, target) = match direction {
            EdgeDirection::Dependency => (from, to),
            EdgeDirection::Inverse => (to, from),
        };
        adjacency[source].push(target);
    }

    let mut visited = vec![false; model.nodes.len()];
    let mut queue = VecDeque::new();
    if let Some(flag) = visited.get_mut(root) {
        *flag = true;
        queue.push_back(root);
    }

    let mut reachable = HashSet::new();
    while let Some(index) = queue.pop_front() {
        reachable.insert(model.nodes[index].id.clone());
        for &next in &adjacency[index] {
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    reachable
}
