//! Search tree nodes.

use rts_command::CommandQueue;
use rts_core::PlayerId;
use rts_macro::MacroAction;

/// Index of a node in the [`crate::SearchTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One simulated state and the statistics gathered below it.
#[derive(Debug, Clone)]
pub struct SearchNode<E> {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    /// State after `action` was committed and one tick simulated.
    pub state: E,
    /// Per-player command queues belonging to `state`.
    pub queues: Vec<CommandQueue>,

    /// Player whose choice produced this node.
    pub actor: PlayerId,
    /// `None` only at the root.
    pub action: Option<MacroAction>,

    /// Per-player win counters, indexed by [`PlayerId::index`].
    pub wins: Vec<u32>,
    pub visits: u32,

    /// Actions not yet expanded, popped from the back.
    pub unexplored: Vec<MacroAction>,

    /// Raw heuristic score of `state` for `actor`.
    pub score: f64,
}

impl<E> SearchNode<E> {
    pub fn new(
        state: E,
        queues: Vec<CommandQueue>,
        actor: PlayerId,
        action: Option<MacroAction>,
        players: usize,
        score: f64,
    ) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            state,
            queues,
            actor,
            action,
            wins: vec![0; players],
            visits: 0,
            unexplored: Vec::new(),
            score,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.unexplored.is_empty()
    }

    pub fn wins_for(&self, player: PlayerId) -> u32 {
        self.wins.get(player.index()).copied().unwrap_or(0)
    }

    /// Observed win rate for `player`; 0 before the first visit.
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins_for(player) as f64 / self.visits as f64
        }
    }

    /// UCB1 value of this node as a child of a node visited `parent_visits` times.
    ///
    /// Unvisited nodes score `+inf` so every child is tried once.
    pub fn ucb1(&self, player: PlayerId, parent_visits: u32, c: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let exploration = ((parent_visits.max(1) as f64).ln() / self.visits as f64).sqrt();
        self.win_rate(player) + c * exploration
    }

    pub fn record(&mut self, winners: &[bool]) {
        self.visits += 1;
        for (slot, won) in self.wins.iter_mut().zip(winners) {
            if *won {
                *slot += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(visits: u32, wins: u32) -> SearchNode<()> {
        let mut n = SearchNode::new((), Vec::new(), PlayerId(0), None, 2, 0.0);
        n.visits = visits;
        n.wins[0] = wins;
        n
    }

    #[test]
    fn unvisited_is_infinite() {
        assert!(node(0, 0).ucb1(PlayerId(0), 5, 1.0).is_infinite());
    }

    #[test]
    fn record_counts_winners_only() {
        let mut n = node(0, 0);
        n.record(&[true, false]);
        n.record(&[false, false]);
        assert_eq!(n.visits, 2);
        assert_eq!(n.wins, vec![1, 0]);
    }
}
