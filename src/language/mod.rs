/*!
Formulas, as read from strings, and their translation to clauses.

- [Propositional formulas](crate::language::propositional), in a fully parenthesised infix syntax.
- [First-order formulas](crate::language::predicate), over terms built from variables, constants, and function applications.
- [Fresh names](crate::language::names), for the atoms introduced by the [Tseitin transformation](crate::language::tseitin) and by propositional skeletons.

Whitespace is ignored by each parser.
*/

pub mod names;
pub mod predicate;
pub mod propositional;
pub mod tseitin;

use crate::types::err::{self};

/// A cursor over the characters of some string, used by each parser.
pub(crate) struct Cursor {
    chars: Vec<char>,
    position: usize,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        Cursor {
            chars: source.chars().filter(|c| !c.is_whitespace()).collect(),
            position: 0,
        }
    }

    /// The (character) position of the cursor, ignoring whitespace.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Advances past `expected`, if the remaining characters begin with `expected`.
    pub fn eat(&mut self, expected: &str) -> bool {
        let mut end = self.position;
        for c in expected.chars() {
            if self.chars.get(end) != Some(&c) {
                return false;
            }
            end += 1;
        }
        self.position = end;
        true
    }

    /// Advances past `expected`, or returns an error at the current position.
    pub fn expect(&mut self, expected: &str) -> Result<(), err::ParseError> {
        match self.eat(expected) {
            true => Ok(()),
            false => Err(self.unexpected()),
        }
    }

    /// Takes the longest prefix of the remaining characters whose characters satisfy `f`.
    pub fn take_while(&mut self, f: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.peek().is_some_and(&f) {
            self.position += 1;
        }
        self.chars[start..self.position].iter().collect()
    }

    /// An error for the character at the current position.
    pub fn unexpected(&self) -> err::ParseError {
        match self.is_at_end() {
            true => err::ParseError::UnexpectedEnd,
            false => err::ParseError::UnexpectedSymbol(self.position),
        }
    }

    /// An error if some character remains.
    pub fn finish(&self) -> Result<(), err::ParseError> {
        match self.is_at_end() {
            true => Ok(()),
            false => Err(err::ParseError::TrailingInput(self.position)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cursor = Cursor::new("( p12 -> q )");
        assert!(cursor.eat("("));
        assert_eq!(cursor.take_while(|c| c.is_ascii_alphanumeric()), "p12");
        assert!(!cursor.eat("<->"));
        assert!(cursor.eat("->"));
        assert_eq!(cursor.position(), 6);
        assert_eq!(cursor.expect(")"), Err(err::ParseError::UnexpectedSymbol(6)));
        assert!(cursor.eat("q)"));
        assert!(cursor.finish().is_ok());
    }
}
