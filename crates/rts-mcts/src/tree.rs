//! Arena-allocated search tree.
//!
//! Nodes live in one `Vec` and point at each other by [`NodeId`]; the whole tree is dropped at
//! the end of a planning cycle.

use std::cmp::Ordering;

use rts_core::PlayerId;

use crate::node::{NodeId, SearchNode};

#[derive(Debug, Clone)]
pub struct SearchTree<E> {
    nodes: Vec<SearchNode<E>>,
}

impl<E> SearchTree<E> {
    pub fn new(root: SearchNode<E>) -> Self {
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<E> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<E> {
        &mut self.nodes[id.index()]
    }

    pub fn allocate(&mut self, node: SearchNode<E>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach `child` under `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, mut child: SearchNode<E>) -> NodeId {
        child.parent = Some(parent);
        let id = self.allocate(child);
        self.get_mut(parent).children.push(id);
        id
    }

    /// Child of `id` with the highest UCB1 for `player`.
    ///
    /// Equal values fall back to the macro-action priority order.
    pub fn select_child(&self, id: NodeId, player: PlayerId, c: f64) -> Option<NodeId> {
        let node = self.get(id);
        let parent_visits = node.visits;
        node.children.iter().copied().max_by(|a, b| {
            let ua = self.get(*a).ucb1(player, parent_visits, c);
            let ub = self.get(*b).ucb1(player, parent_visits, c);
            ua.total_cmp(&ub).then_with(|| self.compare_actions(*a, *b))
        })
    }

    /// Root child with the most visits, then the most wins for `player`, then action priority.
    pub fn best_child(&self, player: PlayerId) -> Option<NodeId> {
        self.get(self.root()).children.iter().copied().max_by(|a, b| {
            let na = self.get(*a);
            let nb = self.get(*b);
            na.visits
                .cmp(&nb.visits)
                .then_with(|| na.wins_for(player).cmp(&nb.wins_for(player)))
                .then_with(|| self.compare_actions(*a, *b))
        })
    }

    fn compare_actions(&self, a: NodeId, b: NodeId) -> Ordering {
        match (&self.get(a).action, &self.get(b).action) {
            (Some(x), Some(y)) => x.compare(y),
            _ => Ordering::Equal,
        }
    }

    /// Count one simulation on every node from `leaf` up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, winners: &[bool]) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.record(winners);
            current = node.parent;
        }
    }

    /// Nodes on the way from the root down to `id`, root first.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            path.push(parent);
            current = self.get(parent).parent;
        }
        path.reverse();
        path
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.path_to(id).len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(visits: u32, wins: u32) -> SearchNode<()> {
        let mut node = SearchNode::new((), Vec::new(), PlayerId(0), None, 1, 0.0);
        node.visits = visits;
        node.wins[0] = wins;
        node
    }

    #[test]
    fn backpropagate_reaches_root() {
        let mut tree = SearchTree::new(leaf(0, 0));
        let a = tree.add_child(tree.root(), leaf(0, 0));
        let b = tree.add_child(a, leaf(0, 0));

        tree.backpropagate(b, &[true]);
        tree.backpropagate(a, &[false]);

        assert_eq!(tree.get(tree.root()).visits, 2);
        assert_eq!(tree.get(tree.root()).wins, vec![1]);
        assert_eq!(tree.get(a).visits, 2);
        assert_eq!(tree.get(b).visits, 1);
        assert_eq!(tree.path_to(b), vec![tree.root(), a, b]);
        assert_eq!(tree.depth(b), 2);
    }
}
