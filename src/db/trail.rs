/*!
The trail of assignments, partitioned into decision levels.

Level zero holds literals valued without any decision, e.g. unit clauses and their consequences.
Each further level is opened by a decision, and holds the decision followed by the consequences of the decision, in order of assignment.

```rust
# use otter_smt::db::trail::Trail;
# use otter_smt::structures::literal::CLiteral;
let mut trail = Trail::default();
trail.store_assignment(CLiteral::new(0, true));

trail.open_level();
trail.store_assignment(CLiteral::new(1, false));
trail.store_assignment(CLiteral::new(2, true));

let top = trail.top_level();
assert_eq!(top.decision, Some(CLiteral::new(1, false)));
assert_eq!(top.history.len(), 2);

assert_eq!(trail.forget_top_level().len(), 2);
assert_eq!(trail.level(), 0);
```
*/

use crate::{db::LevelIndex, structures::literal::CLiteral};

/// A view of some decision level.
pub struct DecisionLevel<'trail> {
    /// The decision which opened the level, if any.
    pub decision: Option<CLiteral>,

    /// All literals valued at the level, the decision first and then consequences, in order.
    pub history: &'trail [CLiteral],
}

/// The trail.
#[derive(Default)]
pub struct Trail {
    literals: Vec<CLiteral>,
    level_indicies: Vec<usize>,
}

impl Trail {
    /// Stores an assignment at the (current) top level, returning the position of the assignment on the trail.
    pub fn store_assignment(&mut self, literal: CLiteral) -> usize {
        self.literals.push(literal);
        self.literals.len() - 1
    }

    /// Opens a fresh level.
    /// The next assignment stored is the decision of the level.
    pub fn open_level(&mut self) {
        self.level_indicies.push(self.literals.len());
    }

    /// The current level.
    pub fn level(&self) -> LevelIndex {
        self.level_indicies.len() as LevelIndex
    }

    /// True if some decision has been made.
    pub fn decision_is_made(&self) -> bool {
        !self.level_indicies.is_empty()
    }

    /// The given level, if it exists.
    pub fn at_level(&self, level: LevelIndex) -> Option<DecisionLevel<'_>> {
        let level = level as usize;
        let start = match level {
            0 => 0,
            _ => *self.level_indicies.get(level - 1)?,
        };
        let end = self
            .level_indicies
            .get(level)
            .copied()
            .unwrap_or(self.literals.len());
        let history = &self.literals[start..end];
        let decision = match level {
            0 => None,
            _ => history.first().copied(),
        };
        Some(DecisionLevel { decision, history })
    }

    /// The (current) top level.
    pub fn top_level(&self) -> DecisionLevel<'_> {
        let start = self.level_indicies.last().copied().unwrap_or(0);
        let history = &self.literals[start..];
        let decision = match self.level_indicies.is_empty() {
            true => None,
            false => history.first().copied(),
        };
        DecisionLevel { decision, history }
    }

    /// Removes the top level, if some decision has been made, returning the literals of the level.
    ///
    /// # Soundness
    /// Does not clear the *valuation* of the literals.
    pub fn forget_top_level(&mut self) -> Vec<CLiteral> {
        match self.level_indicies.pop() {
            Some(start) => self.literals.split_off(start),
            None => Vec::default(),
        }
    }

    /// All literals on the trail, in order of assignment.
    pub fn literals(&self) -> &[CLiteral] {
        &self.literals
    }
}
