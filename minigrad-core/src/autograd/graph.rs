use crate::tensor::{NodeId, Tensor};
use log::trace;
use std::collections::HashSet;

/// Builds a topological ordering of the computation graph rooted at `root`.
///
/// Every node reachable through recorded contexts appears exactly once, after
/// all of the nodes it was computed from; `root` is therefore last. Constants
/// recorded in a context are not nodes and are skipped. Nodes that do not
/// require gradients are still ordered; the backward pass filters them out.
///
/// The depth-first search uses an explicit stack so long chains of operations
/// do not exhaust the call stack. Nodes are visited by identity (`NodeId`),
/// never by value.
pub fn topological_sort(root: &Tensor) -> Vec<Tensor> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut sorted: Vec<Tensor> = Vec::new();
    // (node, inputs already pushed)
    let mut stack: Vec<(Tensor, bool)> = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            trace!("[topological_sort] Adding node {:?} to sorted list", node.id_ptr());
            sorted.push(node);
            continue;
        }
        if !visited.insert(node.id_ptr()) {
            trace!("[topological_sort] Node {:?} already visited", node.id_ptr());
            continue;
        }

        let inputs = node.saved_tensors();
        if inputs.is_empty() {
            trace!("[topological_sort] Node {:?} is a leaf or detached", node.id_ptr());
        }
        stack.push((node, true));
        // Reversed so inputs are expanded in recording order.
        for input in inputs.into_iter().rev() {
            if !visited.contains(&input.id_ptr()) {
                stack.push((input, false));
            }
        }
    }
    sorted
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
