use std::collections::BTreeSet;

use crate::{language::Cursor, types::err};

/// True if `name` is a constant name: either `_`, or alphanumeric and beginning with a digit or a letter from `a` to `d`.
pub fn is_constant(name: &str) -> bool {
    name == "_"
        || name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || ('a'..='d').contains(&c))
            && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// True if `name` is a variable name: alphanumeric and beginning with a letter from `u` to `z`.
pub fn is_variable(name: &str) -> bool {
    name.chars().next().is_some_and(|c| ('u'..='z').contains(&c))
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// True if `name` is a function name: alphanumeric and beginning with a letter from `f` to `t`.
pub fn is_function(name: &str) -> bool {
    name.chars().next().is_some_and(|c| ('f'..='t').contains(&c))
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A first-order term.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Variable(String),
    Constant(String),
    Function(String, Vec<Term>),
}

impl Term {
    /// The term written in `string`.
    pub fn parse(string: &str) -> Result<Term, err::ParseError> {
        let mut cursor = Cursor::new(string);
        let term = Self::parse_prefix(&mut cursor)?;
        cursor.finish()?;
        Ok(term)
    }

    pub(crate) fn parse_prefix(cursor: &mut Cursor) -> Result<Term, err::ParseError> {
        if cursor.eat("_") {
            return Ok(Term::Constant("_".to_string()));
        }

        let start = cursor.position();
        let name = cursor.take_while(|c| c.is_ascii_alphanumeric());

        if is_constant(&name) {
            Ok(Term::Constant(name))
        } else if is_variable(&name) {
            Ok(Term::Variable(name))
        } else if is_function(&name) {
            cursor.expect("(")?;
            let mut arguments = vec![Self::parse_prefix(cursor)?];
            while cursor.eat(",") {
                arguments.push(Self::parse_prefix(cursor)?);
            }
            cursor.expect(")")?;
            Ok(Term::Function(name, arguments))
        } else {
            match cursor.is_at_end() && name.is_empty() {
                true => Err(err::ParseError::UnexpectedEnd),
                false => Err(err::ParseError::UnexpectedSymbol(start)),
            }
        }
    }

    /// The name at the root of the term.
    pub fn root(&self) -> &str {
        match self {
            Self::Variable(name) | Self::Constant(name) | Self::Function(name, _) => name,
        }
    }

    /// The arguments of the term, empty unless the term is a function application.
    pub fn arguments(&self) -> &[Term] {
        match self {
            Self::Function(_, arguments) => arguments,
            Self::Variable(_) | Self::Constant(_) => &[],
        }
    }

    /// Every subterm of the term, including the term itself.
    pub fn subterms(&self) -> BTreeSet<&Term> {
        let mut subterms = BTreeSet::default();
        let mut todo = vec![self];
        while let Some(term) = todo.pop() {
            if subterms.insert(term) {
                todo.extend(term.arguments());
            }
        }
        subterms
    }

    /// Every variable in the term.
    pub fn variables(&self) -> BTreeSet<String> {
        self.subterms()
            .into_iter()
            .filter_map(|term| match term {
                Self::Variable(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable(name) | Self::Constant(name) => write!(f, "{name}"),
            Self::Function(name, arguments) => {
                write!(f, "{name}(")?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(is_constant("_"));
        assert!(is_constant("c12"));
        assert!(is_constant("0"));
        assert!(!is_constant("e"));
        assert!(is_variable("x1"));
        assert!(!is_variable("t"));
        assert!(is_function("plus"));
        assert!(!is_function("u"));
    }

    #[test]
    fn parse_and_display() {
        for string in ["a12", "f(a,g(x))", "s(s(s(0)))", "plus(x,s(_))", "plus(plus(x,plus(y,z)),w)"] {
            assert_eq!(Term::parse(string).unwrap().to_string(), string);
        }
        assert_eq!(Term::parse("f()"), Err(err::ParseError::UnexpectedSymbol(2)));
        assert_eq!(Term::parse("f(x"), Err(err::ParseError::UnexpectedEnd));
        assert_eq!(Term::parse("X"), Err(err::ParseError::UnexpectedSymbol(0)));
    }

    #[test]
    fn subterms_are_shared() {
        let term = Term::parse("f(g(x),g(x))").unwrap();
        assert_eq!(term.subterms().len(), 3);
        assert_eq!(term.variables().len(), 1);
    }
}
