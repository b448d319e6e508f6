/*!
Propositional formulas.

# Syntax

- Variables are a letter from `p` to `z`, followed by any number of digits, e.g. `p`, `x12`.
- Constants are `T` (true) and `F` (false).
- Negation is the prefix `~`.
- Binary connectives are always parenthesised, e.g. `(p&~q)`:
  + `&` and, `|` or, `->` implication, `+` exclusive or, `<->` biconditional, `-&` nand, `-|` nor.

```rust
# use otter_smt::language::propositional::Formula;
let formula = Formula::parse("((p->q)&~q12)").unwrap();
assert_eq!(formula.to_string(), "((p->q)&~q12)");
assert_eq!(formula.variables().len(), 3);

assert!(Formula::parse("(p&q").is_err());
assert!(Formula::parse("p&q").is_err());
```
*/

use std::collections::{BTreeMap, BTreeSet};

use crate::{language::Cursor, types::err};

/// Binary connectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Connective {
    And,
    Or,
    Implies,
    Xor,
    Iff,
    Nand,
    Nor,
}

impl Connective {
    /// All connectives, with longer symbols before any symbol they extend.
    const PARSE_ORDER: [Connective; 7] = [
        Connective::Iff,
        Connective::Implies,
        Connective::Nand,
        Connective::Nor,
        Connective::And,
        Connective::Or,
        Connective::Xor,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::And => "&",
            Self::Or => "|",
            Self::Implies => "->",
            Self::Xor => "+",
            Self::Iff => "<->",
            Self::Nand => "-&",
            Self::Nor => "-|",
        }
    }

    /// The truth function of the connective.
    pub fn apply(&self, a: bool, b: bool) -> bool {
        match self {
            Self::And => a && b,
            Self::Or => a || b,
            Self::Implies => !a || b,
            Self::Xor => a != b,
            Self::Iff => a == b,
            Self::Nand => !(a && b),
            Self::Nor => !(a || b),
        }
    }
}

/// A propositional formula.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Formula {
    Constant(bool),
    Variable(String),
    Not(Box<Formula>),
    Binary(Connective, Box<Formula>, Box<Formula>),
}

/// True if `name` is a propositional variable.
pub fn is_variable(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| ('p'..='z').contains(&c)) && chars.all(|c| c.is_ascii_digit())
}

impl Formula {
    /// The formula written in `string`.
    pub fn parse(string: &str) -> Result<Formula, err::ParseError> {
        let mut cursor = Cursor::new(string);
        let formula = Self::parse_prefix(&mut cursor)?;
        cursor.finish()?;
        Ok(formula)
    }

    pub(crate) fn parse_prefix(cursor: &mut Cursor) -> Result<Formula, err::ParseError> {
        match cursor.peek() {
            None => Err(err::ParseError::UnexpectedEnd),

            Some('T') => {
                cursor.eat("T");
                Ok(Formula::Constant(true))
            }

            Some('F') => {
                cursor.eat("F");
                Ok(Formula::Constant(false))
            }

            Some('~') => {
                cursor.eat("~");
                Ok(Formula::Not(Box::new(Self::parse_prefix(cursor)?)))
            }

            Some('p'..='z') => {
                let mut name = String::new();
                name.extend(cursor.peek());
                cursor.eat(&name);
                name.push_str(&cursor.take_while(|c| c.is_ascii_digit()));
                Ok(Formula::Variable(name))
            }

            Some('(') => {
                cursor.eat("(");
                let first = Self::parse_prefix(cursor)?;
                let Some(connective) = Connective::PARSE_ORDER
                    .into_iter()
                    .find(|connective| cursor.eat(connective.symbol()))
                else {
                    return Err(cursor.unexpected());
                };
                let second = Self::parse_prefix(cursor)?;
                cursor.expect(")")?;
                Ok(Formula::Binary(
                    connective,
                    Box::new(first),
                    Box::new(second),
                ))
            }

            Some(_) => Err(cursor.unexpected()),
        }
    }

    /// The negation of a formula.
    pub fn negate(self) -> Formula {
        Formula::Not(Box::new(self))
    }

    /// The binary combination of two formulas.
    pub fn binary(connective: Connective, first: Formula, second: Formula) -> Formula {
        Formula::Binary(connective, Box::new(first), Box::new(second))
    }

    /// Every variable in the formula.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut variables = BTreeSet::default();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables(&self, variables: &mut BTreeSet<String>) {
        match self {
            Self::Constant(_) => {}
            Self::Variable(name) => {
                variables.insert(name.clone());
            }
            Self::Not(formula) => formula.collect_variables(variables),
            Self::Binary(_, first, second) => {
                first.collect_variables(variables);
                second.collect_variables(variables);
            }
        }
    }

    /// The value of the formula on `model`, or None if some variable has no value on the model.
    pub fn evaluate(&self, model: &BTreeMap<String, bool>) -> Option<bool> {
        match self {
            Self::Constant(value) => Some(*value),
            Self::Variable(name) => model.get(name).copied(),
            Self::Not(formula) => formula.evaluate(model).map(|value| !value),
            Self::Binary(connective, first, second) => {
                Some(connective.apply(first.evaluate(model)?, second.evaluate(model)?))
            }
        }
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(true) => write!(f, "T"),
            Self::Constant(false) => write!(f, "F"),
            Self::Variable(name) => write!(f, "{name}"),
            Self::Not(formula) => write!(f, "~{formula}"),
            Self::Binary(connective, first, second) => {
                write!(f, "({first}{}{second})", connective.symbol())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_connectives() {
        for string in [
            "(p&q)", "(p|q)", "(p->q)", "(p+q)", "(p<->q)", "(p-&q)", "(p-|q)", "~~T", "(F|x1)",
        ] {
            let formula = Formula::parse(string).unwrap();
            assert_eq!(formula.to_string(), string);
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Formula::parse(""), Err(err::ParseError::UnexpectedEnd));
        assert_eq!(Formula::parse("(p&q))"), Err(err::ParseError::TrailingInput(5)));
        assert_eq!(Formula::parse("(p=q)"), Err(err::ParseError::UnexpectedSymbol(2)));
        assert_eq!(Formula::parse("a"), Err(err::ParseError::UnexpectedSymbol(0)));
        assert_eq!(Formula::parse("(p&q"), Err(err::ParseError::UnexpectedEnd));
    }

    #[test]
    fn variable_names() {
        assert!(is_variable("p"));
        assert!(is_variable("z123"));
        assert!(!is_variable("a"));
        assert!(!is_variable("p1q"));
        assert!(!is_variable(""));

        let formula = Formula::parse("(p12|~p1)").unwrap();
        assert_eq!(
            formula.variables().into_iter().collect::<Vec<_>>(),
            vec!["p1".to_string(), "p12".to_string()]
        );
    }

    #[test]
    fn evaluation() {
        let formula = Formula::parse("((p<->q)-|(p+~q))").unwrap();
        let mut model = BTreeMap::default();
        model.insert("p".to_string(), true);
        assert_eq!(formula.evaluate(&model), None);

        model.insert("q".to_string(), false);
        // (F -| (T + T)) = ~(F | F)
        assert_eq!(formula.evaluate(&model), Some(true));
    }
}
