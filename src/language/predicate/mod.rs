/*!
First-order terms and formulas.

# Syntax

Terms:
- Constants are `_`, or alphanumeric names beginning with a digit or a letter from `a` to `d`, e.g. `c12`, `0`.
- Variables are alphanumeric names beginning with a letter from `u` to `z`.
- Function applications are a name beginning with a letter from `f` to `t`, applied to a (non-empty) parenthesised list of terms, e.g. `f(x,g(c))`.

Formulas:
- Equalities `t=s`.
- Relations, a name beginning with a letter from `F` to `T` applied to a parenthesised list of terms (which may be empty), e.g. `R(x,c)`, `Q()`.
- Negation `~φ`, and the parenthesised binary connectives `(φ&ψ)`, `(φ|ψ)`, `(φ->ψ)`.
- Quantification `Ax[φ]` and `Ex[φ]`.

```rust
# use otter_smt::language::predicate::{Formula, Term};
let formula = Formula::parse("(~f(x)=f(y)&(y=x|~x=x))").unwrap();
assert_eq!(formula.to_string(), "(~f(x)=f(y)&(y=x|~x=x))");

let Formula::And(first, _) = formula else { panic!() };
let Formula::Not(equality) = *first else { panic!() };
assert_eq!(*equality, Formula::Equality(Term::parse("f(x)").unwrap(), Term::parse("f(y)").unwrap()));
```
*/

mod formula;
pub use formula::{is_relation, Formula, SkeletonMap};

mod term;
pub use term::{is_constant, is_function, is_variable, Term};
