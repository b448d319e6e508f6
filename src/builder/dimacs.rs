use std::io::BufRead;

use crate::{
    context::GenericContext,
    misc::log::targets::{self},
    structures::{clause::CClause, literal::CLiteral},
    types::err::{self, ErrorKind},
};

/// Counts noted while reading a DIMACS file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DimacsCounts {
    /// The atom and clause counts of the problem line, if present.
    pub expected: Option<(usize, usize)>,

    /// The number of clauses read.
    pub clauses: usize,
}

impl<R: rand::Rng> GenericContext<R> {
    /// Reads a DIMACS file into the context.
    ///
    /// The name of each atom is the (absolute) integer used for the atom in the file.
    /// Comment lines begin with 'c', and reading stops at a line beginning with '%'.
    ///
    /// ```rust
    /// # use otter_smt::context::Context;
    /// # use otter_smt::config::Config;
    /// # use otter_smt::reports::Report;
    /// let mut the_context = Context::from_config(Config::default());
    ///
    /// let dimacs = b"
    /// c An unsatisfiable formula
    /// p cnf 2 4
    ///  1  2 0
    ///  1 -2 0
    /// -1  2 0
    /// -1 -2 0
    /// ";
    ///
    /// assert!(the_context.read_dimacs(dimacs.as_slice()).is_ok());
    /// assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
    /// ```
    pub fn read_dimacs(&mut self, reader: impl BufRead) -> Result<DimacsCounts, ErrorKind> {
        let mut counts = DimacsCounts::default();
        let mut clause_buffer: CClause = Vec::default();

        'line_loop: for (line_number, line) in reader.lines().enumerate() {
            let Ok(line) = line else {
                return Err(err::ParseError::Literal(line_number + 1).into());
            };
            let line = line.trim();

            match line.chars().next() {
                None | Some('c') => continue 'line_loop,

                Some('%') => break 'line_loop,

                Some('p') => {
                    let mut details = line.split_whitespace().skip(2);
                    let atoms = details.next().and_then(|count| count.parse().ok());
                    let clauses = details.next().and_then(|count| count.parse().ok());
                    match (atoms, clauses) {
                        (Some(atoms), Some(clauses)) => counts.expected = Some((atoms, clauses)),
                        _ => return Err(err::ParseError::ProblemSpecification.into()),
                    }
                }

                _ => {
                    for item in line.split_whitespace() {
                        let Ok(int) = item.parse::<isize>() else {
                            return Err(err::ParseError::Literal(line_number + 1).into());
                        };

                        match int {
                            0 => {
                                let clause = std::mem::take(&mut clause_buffer);
                                self.add_clause(clause)?;
                                counts.clauses += 1;
                            }

                            _ => {
                                let atom = self.atom_from_name(&int.unsigned_abs().to_string())?;
                                clause_buffer.push(CLiteral::new(atom, int.is_positive()));
                            }
                        }
                    }
                }
            }
        }

        if !clause_buffer.is_empty() {
            self.add_clause(clause_buffer)?;
            counts.clauses += 1;
        }

        if let Some((atoms, clauses)) = counts.expected {
            if atoms < self.atom_db.count() || clauses != counts.clauses {
                log::info!(target: targets::CLAUSE_DB, "Read {} atoms and {} clauses, expected {atoms} and {clauses}", self.atom_db.count(), counts.clauses);
            }
        }

        Ok(counts)
    }
}
