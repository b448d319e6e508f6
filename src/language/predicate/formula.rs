use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    language::{
        names::FreshNames,
        predicate::term::{is_variable, Term},
        propositional::{self, Connective},
        Cursor,
    },
    types::err,
};

/// A first-order formula.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Formula {
    Equality(Term, Term),
    Relation(String, Vec<Term>),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    ForAll(String, Box<Formula>),
    Exists(String, Box<Formula>),
}

/// True if `name` is a relation name: alphanumeric and beginning with a letter from `F` to `T`.
pub fn is_relation(name: &str) -> bool {
    name.chars().next().is_some_and(|c| ('F'..='T').contains(&c))
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A map from the variables of a propositional skeleton to the subformulas they replace.
pub type SkeletonMap = BTreeMap<String, Formula>;

impl Formula {
    /// The formula written in `string`.
    pub fn parse(string: &str) -> Result<Formula, err::ParseError> {
        let mut cursor = Cursor::new(string);
        let formula = Self::parse_prefix(&mut cursor)?;
        cursor.finish()?;
        Ok(formula)
    }

    fn parse_prefix(cursor: &mut Cursor) -> Result<Formula, err::ParseError> {
        match cursor.peek() {
            None => Err(err::ParseError::UnexpectedEnd),

            Some('~') => {
                cursor.eat("~");
                Ok(Formula::Not(Box::new(Self::parse_prefix(cursor)?)))
            }

            Some(quantifier @ ('A' | 'E')) => {
                cursor.eat(&quantifier.to_string());
                let start = cursor.position();
                let variable = cursor.take_while(|c| c.is_ascii_alphanumeric());
                if !is_variable(&variable) {
                    return Err(err::ParseError::UnexpectedSymbol(start));
                }
                cursor.expect("[")?;
                let body = Box::new(Self::parse_prefix(cursor)?);
                cursor.expect("]")?;
                match quantifier {
                    'A' => Ok(Formula::ForAll(variable, body)),
                    _ => Ok(Formula::Exists(variable, body)),
                }
            }

            Some('F'..='T') => {
                let name = cursor.take_while(|c| c.is_ascii_alphanumeric());
                cursor.expect("(")?;
                let mut arguments = Vec::default();
                if !cursor.eat(")") {
                    arguments.push(Term::parse_prefix(cursor)?);
                    while cursor.eat(",") {
                        arguments.push(Term::parse_prefix(cursor)?);
                    }
                    cursor.expect(")")?;
                }
                Ok(Formula::Relation(name, arguments))
            }

            Some('(') => {
                cursor.eat("(");
                let first = Box::new(Self::parse_prefix(cursor)?);
                let connective = if cursor.eat("&") {
                    Connective::And
                } else if cursor.eat("|") {
                    Connective::Or
                } else if cursor.eat("->") {
                    Connective::Implies
                } else {
                    return Err(cursor.unexpected());
                };
                let second = Box::new(Self::parse_prefix(cursor)?);
                cursor.expect(")")?;
                Ok(match connective {
                    Connective::And => Formula::And(first, second),
                    Connective::Or => Formula::Or(first, second),
                    _ => Formula::Implies(first, second),
                })
            }

            Some(_) => {
                let left = Term::parse_prefix(cursor)?;
                cursor.expect("=")?;
                let right = Term::parse_prefix(cursor)?;
                Ok(Formula::Equality(left, right))
            }
        }
    }

    /// True if the formula is an equality or a relation.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Self::Equality(..) | Self::Relation(..))
    }

    /// Every term which is an argument of an equality or relation of the formula.
    pub fn argument_terms(&self) -> BTreeSet<&Term> {
        let mut terms = BTreeSet::default();
        self.for_each_atom(&mut |atom| match atom {
            Formula::Equality(left, right) => {
                terms.insert(left);
                terms.insert(right);
            }
            Formula::Relation(_, arguments) => terms.extend(arguments.iter()),
            _ => {}
        });
        terms
    }

    fn for_each_atom<'f>(&'f self, f: &mut impl FnMut(&'f Formula)) {
        match self {
            Self::Equality(..) | Self::Relation(..) => f(self),
            Self::Not(inner) | Self::ForAll(_, inner) | Self::Exists(_, inner) => {
                inner.for_each_atom(f)
            }
            Self::And(first, second) | Self::Or(first, second) | Self::Implies(first, second) => {
                first.for_each_atom(f);
                second.for_each_atom(f);
            }
        }
    }

    /// The propositional skeleton of the formula.
    ///
    /// Each outermost equality, relation, or quantified subformula is replaced by a fresh propositional variable, with equal subformulas replaced by the same variable.
    /// Returned with the skeleton is a map from the fresh variables to the subformulas they replace.
    ///
    /// ```rust
    /// # use otter_smt::language::{names::FreshNames, predicate::Formula};
    /// let formula = Formula::parse("(f(x)=g(y)&(~f(x)=g(y)|Ax[R(x)]))").unwrap();
    /// let (skeleton, map) = formula.propositional_skeleton(&mut FreshNames::default());
    ///
    /// assert_eq!(skeleton.to_string(), "(z1&(~z1|z2))");
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(Formula::from_propositional_skeleton(&skeleton, &map), Some(formula));
    /// ```
    pub fn propositional_skeleton(
        &self,
        names: &mut FreshNames,
    ) -> (propositional::Formula, SkeletonMap) {
        let mut replaced: HashMap<&Formula, String> = HashMap::default();
        let skeleton = self.skeleton_with(names, &mut replaced);
        let map = replaced
            .into_iter()
            .map(|(formula, name)| (name, formula.clone()))
            .collect();
        (skeleton, map)
    }

    fn skeleton_with<'f>(
        &'f self,
        names: &mut FreshNames,
        replaced: &mut HashMap<&'f Formula, String>,
    ) -> propositional::Formula {
        use propositional::Formula as P;

        match self {
            Self::Not(inner) => inner.skeleton_with(names, replaced).negate(),
            Self::And(first, second) => P::binary(
                Connective::And,
                first.skeleton_with(names, replaced),
                second.skeleton_with(names, replaced),
            ),
            Self::Or(first, second) => P::binary(
                Connective::Or,
                first.skeleton_with(names, replaced),
                second.skeleton_with(names, replaced),
            ),
            Self::Implies(first, second) => P::binary(
                Connective::Implies,
                first.skeleton_with(names, replaced),
                second.skeleton_with(names, replaced),
            ),
            Self::Equality(..) | Self::Relation(..) | Self::ForAll(..) | Self::Exists(..) => {
                let name = replaced.entry(self).or_insert_with(|| names.fresh());
                P::Variable(name.clone())
            }
        }
    }

    /// The formula given by replacing each variable of `skeleton` with the formula it maps to.
    ///
    /// Connectives other than `&`, `|`, and `->` are expressed through those connectives and negation.
    /// None is returned if some variable is not mapped, or if the skeleton contains a constant.
    pub fn from_propositional_skeleton(
        skeleton: &propositional::Formula,
        map: &SkeletonMap,
    ) -> Option<Formula> {
        use propositional::Formula as P;

        match skeleton {
            P::Constant(_) => None,
            P::Variable(name) => map.get(name).cloned(),
            P::Not(inner) => Some(Formula::Not(Box::new(Self::from_propositional_skeleton(
                inner, map,
            )?))),
            P::Binary(connective, first, second) => {
                let a = Box::new(Self::from_propositional_skeleton(first, map)?);
                let b = Box::new(Self::from_propositional_skeleton(second, map)?);
                let not = |formula: Formula| Formula::Not(Box::new(formula));
                let iff = |a: Box<Formula>, b: Box<Formula>| {
                    Formula::And(
                        Box::new(Formula::Implies(a.clone(), b.clone())),
                        Box::new(Formula::Implies(b, a)),
                    )
                };
                Some(match connective {
                    Connective::And => Formula::And(a, b),
                    Connective::Or => Formula::Or(a, b),
                    Connective::Implies => Formula::Implies(a, b),
                    Connective::Iff => iff(a, b),
                    Connective::Xor => not(iff(a, b)),
                    Connective::Nand => not(Formula::And(a, b)),
                    Connective::Nor => not(Formula::Or(a, b)),
                })
            }
        }
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equality(left, right) => write!(f, "{left}={right}"),
            Self::Relation(name, arguments) => {
                write!(f, "{name}(")?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            }
            Self::Not(inner) => write!(f, "~{inner}"),
            Self::And(first, second) => write!(f, "({first}&{second})"),
            Self::Or(first, second) => write!(f, "({first}|{second})"),
            Self::Implies(first, second) => write!(f, "({first}->{second})"),
            Self::ForAll(variable, body) => write!(f, "A{variable}[{body}]"),
            Self::Exists(variable, body) => write!(f, "E{variable}[{body}]"),
        }
    }
}
