/*!
The implication graph.

For each atom there is an [ImplicationNode] noting the clause which forced the current value of the atom (none, if the value was a decision) together with edges to parent and child atoms.
The parents of an atom are the other atoms of the forcing clause, and the children of an atom are those atoms whose forcing clause contains the atom.

The graph is an arena indexed by atom, with parents and children stored as sets of atoms.
So, forgetting the value of an atom is an O(degree) clear of index sets.

# Unique implication points

A unique implication point (UIP) of a conflict at some level is an atom through which every path from the decision of the level to the conflict passes.
[first_uip](ImplicationGraph::first_uip) finds the UIP closest to the conflict as the immediate dominator of a synthetic conflict node, using [petgraph].

```rust,ignore
let uip = self.implication_graph.first_uip(decision, &level_atoms, &conflict_atoms);
```
*/

use std::collections::{BTreeSet, HashMap};

use petgraph::{algo::dominators::simple_fast, graph::DiGraph};

use crate::{
    db::keys::ClauseKey,
    misc::log::targets::{self},
    structures::atom::Atom,
};

/// A node of the implication graph.
#[derive(Clone, Debug, Default)]
pub struct ImplicationNode {
    /// The clause which forced the value of the atom, if any.
    pub reason: Option<ClauseKey>,

    /// The other atoms of the forcing clause.
    pub parents: BTreeSet<Atom>,

    /// Atoms whose forcing clause contains this atom.
    pub children: BTreeSet<Atom>,
}

/// The implication graph, as an arena of nodes indexed by atom.
#[derive(Default)]
pub struct ImplicationGraph {
    nodes: Vec<ImplicationNode>,
}

impl ImplicationGraph {
    /// Extends the graph to include `atom`.
    pub fn fresh_atom(&mut self, atom: Atom) {
        while self.nodes.len() <= atom as usize {
            self.nodes.push(ImplicationNode::default());
        }
    }

    /// Notes `atom` was valued by `reason`, with the given parents.
    pub fn note(&mut self, atom: Atom, reason: Option<ClauseKey>, parents: impl Iterator<Item = Atom>) {
        self.fresh_atom(atom);
        let parents: BTreeSet<Atom> = parents.filter(|parent| *parent != atom).collect();
        for parent in &parents {
            self.fresh_atom(*parent);
            self.nodes[*parent as usize].children.insert(atom);
        }
        let node = &mut self.nodes[atom as usize];
        node.reason = reason;
        node.parents = parents;
    }

    /// Clears the node of `atom`, and removes the atom from the children of its parents.
    pub fn reset(&mut self, atom: Atom) {
        let Some(node) = self.nodes.get_mut(atom as usize) else {
            return;
        };
        let parents = std::mem::take(&mut node.parents);
        node.children.clear();
        node.reason = None;
        for parent in parents {
            self.nodes[parent as usize].children.remove(&atom);
        }
    }

    /// The node of `atom`, if the atom is in the graph.
    pub fn node(&self, atom: Atom) -> Option<&ImplicationNode> {
        self.nodes.get(atom as usize)
    }

    /// The forcing clause of `atom`, if any.
    pub fn reason(&self, atom: Atom) -> Option<ClauseKey> {
        self.nodes.get(atom as usize).and_then(|node| node.reason)
    }

    /// True if some edge of the graph mentions an atom for which `valued` is false.
    pub fn has_dangling_edge(&self, valued: impl Fn(Atom) -> bool) -> bool {
        self.nodes.iter().enumerate().any(|(atom, node)| {
            let edges = node.parents.iter().chain(node.children.iter());
            match valued(atom as Atom) {
                true => edges.into_iter().any(|other| !valued(*other)),
                false => edges.count() > 0 || node.reason.is_some(),
            }
        })
    }

    /// The first unique implication point of a conflict.
    ///
    /// - `decision` is the decision of the current level.
    /// - `level_atoms` are the atoms valued at the current level.
    /// - `conflict_atoms` are the atoms of the conflict clause valued at the current level.
    ///
    /// Returns the immediate dominator of the conflict, with `decision` as root.
    /// None is returned if the conflict is not reachable from the decision through the current level.
    pub fn first_uip(
        &self,
        decision: Atom,
        level_atoms: &[Atom],
        conflict_atoms: &[Atom],
    ) -> Option<Atom> {
        let mut graph = DiGraph::<Option<Atom>, ()>::with_capacity(level_atoms.len() + 1, 0);
        let mut indicies = HashMap::with_capacity(level_atoms.len());

        for atom in level_atoms {
            indicies.insert(*atom, graph.add_node(Some(*atom)));
        }
        let conflict = graph.add_node(None);

        for atom in level_atoms {
            let Some(node) = self.nodes.get(*atom as usize) else {
                continue;
            };
            for parent in &node.parents {
                if let Some(parent_index) = indicies.get(parent) {
                    graph.add_edge(*parent_index, indicies[atom], ());
                }
            }
        }

        for atom in conflict_atoms {
            if let Some(index) = indicies.get(atom) {
                graph.add_edge(*index, conflict, ());
            }
        }

        let root = *indicies.get(&decision)?;
        let dominators = simple_fast(&graph, root);
        let uip = dominators
            .immediate_dominator(conflict)
            .and_then(|index| graph[index]);

        log::trace!(target: targets::ANALYSIS, "First UIP from {decision}: {uip:?}");
        uip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uip_on_a_diamond() {
        // 0 -> 1, 0 -> 2, {1, 2} -> 3, 3 -> 4, 3 -> 5, {4, 5} -> conflict
        let mut graph = ImplicationGraph::default();
        graph.note(0, None, std::iter::empty());
        graph.note(1, Some(ClauseKey::Original(0)), [0].into_iter());
        graph.note(2, Some(ClauseKey::Original(1)), [0].into_iter());
        graph.note(3, Some(ClauseKey::Original(2)), [1, 2].into_iter());
        graph.note(4, Some(ClauseKey::Original(3)), [3].into_iter());
        graph.note(5, Some(ClauseKey::Original(4)), [3].into_iter());

        let level = [0, 1, 2, 3, 4, 5];
        assert_eq!(graph.first_uip(0, &level, &[4, 5]), Some(3));
        assert_eq!(graph.first_uip(0, &level, &[1, 2]), Some(0));
        assert_eq!(graph.first_uip(0, &level, &[4]), Some(4));
    }

    #[test]
    fn reset_clears_edges() {
        let mut graph = ImplicationGraph::default();
        graph.note(0, None, std::iter::empty());
        graph.note(1, Some(ClauseKey::Original(0)), [0].into_iter());

        graph.reset(1);
        assert!(graph.node(0).is_some_and(|node| node.children.is_empty()));
        assert!(!graph.has_dangling_edge(|atom| atom == 0));
    }
}
