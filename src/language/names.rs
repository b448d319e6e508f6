/*!
A source of fresh names.

Fresh names are a prefix followed by a counter, e.g. `z1`, `z2`, ….
Names to avoid (typically, those already present in some formula) are registered with [avoid](FreshNames::avoid), and are skipped.

The source is an explicit value, and so each transformation takes the source it draws from.

```rust
# use otter_smt::language::names::FreshNames;
let mut names = FreshNames::default();
names.avoid(["z2".to_string()]);

assert_eq!(names.fresh(), "z1");
assert_eq!(names.fresh(), "z3");

names.reset();
assert_eq!(names.fresh(), "z1");
```
*/

use std::collections::HashSet;

/// A source of fresh names.
#[derive(Clone, Debug)]
pub struct FreshNames {
    prefix: String,
    counter: usize,
    avoid: HashSet<String>,
}

impl Default for FreshNames {
    fn default() -> Self {
        Self::with_prefix("z")
    }
}

impl FreshNames {
    /// A source of names `prefix1`, `prefix2`, ….
    pub fn with_prefix(prefix: &str) -> Self {
        FreshNames {
            prefix: prefix.to_owned(),
            counter: 0,
            avoid: HashSet::default(),
        }
    }

    /// Notes some names which should never be returned.
    pub fn avoid(&mut self, names: impl IntoIterator<Item = String>) {
        self.avoid.extend(names);
    }

    /// A name not returned since the last reset, and not noted to be avoided.
    pub fn fresh(&mut self) -> String {
        loop {
            self.counter += 1;
            let name = format!("{}{}", self.prefix, self.counter);
            if !self.avoid.contains(&name) {
                return name;
            }
        }
    }

    /// Restarts the counter, and forgets any names to avoid.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.avoid.clear();
    }
}
