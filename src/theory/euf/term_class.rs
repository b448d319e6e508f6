/*!
Congruence classes of terms.

Terms are interned as nodes of a DAG, with equal terms sharing a node.
Each node has a *find* pointer, and the representative of the class of a node is found by following find pointers until a node points to itself.
The parents of a class (the nodes with some argument in the class) are kept on the representative.

On [process_equality](TermClasses::process_equality) two classes are merged, and any pair of parents of the two classes which have become congruent are merged in turn.

Merges are recorded in an undo log, with [checkpoint](TermClasses::checkpoint) marking a point in the log and [restore](TermClasses::restore) undoing every merge since the most recent checkpoint.
As find pointers are never compressed, undoing a merge is resetting a single find pointer and removing the parents added to the representative.

```rust
# use otter_smt::theory::euf::term_class::TermClasses;
# use otter_smt::language::predicate::Term;
let mut classes = TermClasses::default();
let fx = classes.intern(&Term::parse("f(x)").unwrap());
let fy = classes.intern(&Term::parse("f(y)").unwrap());
let x = classes.intern(&Term::parse("x").unwrap());
let y = classes.intern(&Term::parse("y").unwrap());

classes.checkpoint();
classes.process_equality(x, y);
assert!(classes.same_class(fx, fy));

classes.restore();
assert!(!classes.same_class(fx, fy));
```
*/

use std::collections::{BTreeSet, HashMap};

use crate::{language::predicate::Term, misc::log::targets::{self}};

/// The index of a node.
pub type TermId = usize;

#[derive(Clone, Debug)]
struct TermNode {
    symbol: String,
    arguments: Vec<TermId>,
    find: TermId,
    parents: BTreeSet<TermId>,
}

/// A merge of the class of `absorbed` into the class of `representative`.
#[derive(Clone, Debug)]
struct Merge {
    absorbed: TermId,
    representative: TermId,
    added_parents: Vec<TermId>,
}

/// Congruence classes over a DAG of terms.
#[derive(Clone, Debug, Default)]
pub struct TermClasses {
    nodes: Vec<TermNode>,
    signatures: HashMap<(String, Vec<TermId>), TermId>,
    undo_log: Vec<Merge>,
    checkpoints: Vec<usize>,
}

impl TermClasses {
    /// The node of a term, interning the term (and each subterm) if required.
    pub fn intern(&mut self, term: &Term) -> TermId {
        let arguments = term
            .arguments()
            .iter()
            .map(|argument| self.intern(argument))
            .collect();
        self.intern_node(term.root(), arguments)
    }

    /// The node with the given symbol and arguments, interning the node if required.
    pub fn intern_node(&mut self, symbol: &str, arguments: Vec<TermId>) -> TermId {
        let signature = (symbol.to_owned(), arguments);
        if let Some(id) = self.signatures.get(&signature) {
            return *id;
        }

        let id = self.nodes.len();
        for argument in &signature.1 {
            let representative = self.representative(*argument);
            self.nodes[representative].parents.insert(id);
        }
        self.nodes.push(TermNode {
            symbol: signature.0.clone(),
            arguments: signature.1.clone(),
            find: id,
            parents: BTreeSet::default(),
        });
        self.signatures.insert(signature, id);
        id
    }

    /// The node of a term, if the term has been interned.
    pub fn id_of(&self, term: &Term) -> Option<TermId> {
        let arguments = term
            .arguments()
            .iter()
            .map(|argument| self.id_of(argument))
            .collect::<Option<Vec<_>>>()?;
        self.signatures
            .get(&(term.root().to_owned(), arguments))
            .copied()
    }

    /// A count of all interned nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The representative of the class of `id`.
    pub fn representative(&self, id: TermId) -> TermId {
        let mut id = id;
        while self.nodes[id].find != id {
            id = self.nodes[id].find;
        }
        id
    }

    /// True if `a` and `b` are in the same class.
    pub fn same_class(&self, a: TermId, b: TermId) -> bool {
        self.representative(a) == self.representative(b)
    }

    /// True if `a` and `b` have the same symbol and pairwise equal arguments.
    pub fn is_congruent(&self, a: TermId, b: TermId) -> bool {
        let (a, b) = (&self.nodes[a], &self.nodes[b]);
        a.symbol == b.symbol
            && a.arguments.len() == b.arguments.len()
            && a
                .arguments
                .iter()
                .zip(&b.arguments)
                .all(|(x, y)| self.same_class(*x, *y))
    }

    /// Merges the classes of `a` and `b`, and closes the result under congruence.
    ///
    /// Returns the number of merges made.
    pub fn process_equality(&mut self, a: TermId, b: TermId) -> usize {
        let mut merges = 0;
        let mut pending = vec![(a, b)];

        while let Some((a, b)) = pending.pop() {
            let (absorbed, representative) = (self.representative(a), self.representative(b));
            if absorbed == representative {
                continue;
            }

            let absorbed_parents: Vec<TermId> =
                self.nodes[absorbed].parents.iter().copied().collect();
            let representative_parents: Vec<TermId> =
                self.nodes[representative].parents.iter().copied().collect();

            self.nodes[absorbed].find = representative;
            let mut added_parents = Vec::default();
            for parent in &absorbed_parents {
                if self.nodes[representative].parents.insert(*parent) {
                    added_parents.push(*parent);
                }
            }
            self.undo_log.push(Merge {
                absorbed,
                representative,
                added_parents,
            });
            merges += 1;

            for p in &absorbed_parents {
                for q in &representative_parents {
                    if !self.same_class(*p, *q) && self.is_congruent(*p, *q) {
                        log::trace!(target: targets::THEORY, "Congruent parents {p} and {q}");
                        pending.push((*p, *q));
                    }
                }
            }
        }

        merges
    }

    /// Marks the current point in the undo log.
    pub fn checkpoint(&mut self) {
        self.checkpoints.push(self.undo_log.len());
    }

    /// Undoes every merge since the most recent checkpoint, and removes the checkpoint.
    ///
    /// Returns false if there was no checkpoint to restore.
    pub fn restore(&mut self) -> bool {
        let Some(mark) = self.checkpoints.pop() else {
            return false;
        };

        while self.undo_log.len() > mark {
            let Some(merge) = self.undo_log.pop() else {
                break;
            };
            self.nodes[merge.absorbed].find = merge.absorbed;
            for parent in merge.added_parents {
                self.nodes[merge.representative].parents.remove(&parent);
            }
        }
        true
    }

    /// A count of checkpoints.
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(string: &str) -> Term {
        Term::parse(string).unwrap()
    }

    #[test]
    fn interning_shares_nodes() {
        let mut classes = TermClasses::default();
        let a = classes.intern(&term("f(g(x),g(x))"));
        assert_eq!(classes.len(), 3);
        assert_eq!(classes.id_of(&term("f(g(x),g(x))")), Some(a));
        assert_eq!(classes.id_of(&term("g(y)")), None);
    }

    #[test]
    fn congruence_closure() {
        let mut classes = TermClasses::default();
        let ffx = classes.intern(&term("f(f(x))"));
        let fffx = classes.intern(&term("f(f(f(x)))"));
        let x = classes.intern(&term("x"));
        let fx = classes.intern(&term("f(x)"));

        // f(f(f(x))) = x and f(f(x)) = x gives f(x) = x.
        classes.process_equality(fffx, x);
        assert!(!classes.same_class(fx, x));
        classes.process_equality(ffx, x);
        assert!(classes.same_class(fx, x));
    }

    #[test]
    fn restore_to_checkpoints() {
        let mut classes = TermClasses::default();
        let [a, b, c] = ["a", "b", "c"].map(|name| classes.intern(&term(name)));
        let ga = classes.intern(&term("g(a,c)"));
        let gb = classes.intern(&term("g(b,c)"));

        classes.checkpoint();
        classes.process_equality(a, b);
        assert!(classes.same_class(ga, gb));

        classes.checkpoint();
        classes.process_equality(b, c);
        assert!(classes.same_class(a, c));
        assert_eq!(classes.checkpoint_count(), 2);

        assert!(classes.restore());
        assert!(!classes.same_class(a, c));
        assert!(classes.same_class(ga, gb));

        assert!(classes.restore());
        assert!(!classes.same_class(ga, gb));
        assert_eq!(classes.checkpoint_count(), 0);
        assert!(!classes.restore());
    }
}
