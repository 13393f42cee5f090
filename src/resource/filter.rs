//! Filter clauses and the compiled predicate
//!
//! A filter is a list of `(attribute, acceptable values)` clauses. A resource
//! matches when every clause matches (AND), and a clause matches when the
//! attribute is present and its canonical string form equals one of the
//! acceptable values exactly. For list attributes any element may match.
//!
//! Clauses with the same attribute name are all kept and must all hold.

use super::attributes::{AttributeMap, AttributeValue};
use super::error::LookupError;
use std::collections::BTreeSet;
use std::str::FromStr;

/// One `(attribute, values)` filter block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub name: String,
    pub values: Vec<String>,
}

impl FilterClause {
    pub fn new(name: &str, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }
}

/// Parses `name=v1,v2`
impl FromStr for FilterClause {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, values)) = s.split_once('=') else {
            return Err(format!("expected NAME=VALUE[,VALUE...], got `{}`", s));
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing attribute name in `{}`", s));
        }

        // A bare `name=` asks for the empty string
        let values = if values.is_empty() {
            vec![String::new()]
        } else {
            values
                .split(',')
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        };

        Ok(Self::new(name, values))
    }
}

/// The full set of clauses for one lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    clauses: Vec<FilterClause>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style clause append
    pub fn with(mut self, name: &str, values: &[&str]) -> Self {
        self.push(FilterClause::new(
            name,
            values.iter().map(|v| v.to_string()).collect(),
        ));
        self
    }

    pub fn push(&mut self, clause: FilterClause) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl FromIterator<FilterClause> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = FilterClause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledClause {
    name: String,
    accepted: BTreeSet<String>,
}

impl CompiledClause {
    fn matches(&self, attributes: &AttributeMap) -> bool {
        attributes
            .get(&self.name)
            .is_some_and(|value| self.accepts(value))
    }

    fn accepts(&self, value: &AttributeValue) -> bool {
        match value {
            AttributeValue::List(items) => items.iter().any(|item| self.accepts(item)),
            scalar => scalar
                .as_canonical()
                .is_some_and(|s| self.accepted.contains(&*s)),
        }
    }
}

/// A compiled, immutable filter
#[derive(Debug, Clone)]
pub struct Predicate {
    clauses: Vec<CompiledClause>,
}

impl Predicate {
    /// Compile without knowledge of the resource kind
    ///
    /// Clauses naming attributes a resource lacks simply never match it.
    pub fn compile(spec: &FilterSpec) -> Result<Self, LookupError> {
        if spec.is_empty() {
            return Err(LookupError::EmptyFilter);
        }

        let clauses = spec
            .clauses()
            .iter()
            .map(|clause| {
                if clause.values.is_empty() {
                    return Err(LookupError::EmptyFilterValues {
                        name: clause.name.clone(),
                    });
                }
                Ok(CompiledClause {
                    name: clause.name.clone(),
                    accepted: clause.values.iter().cloned().collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { clauses })
    }

    /// Compile for a resource kind, rejecting attribute names it does not document
    pub fn compile_for(spec: &FilterSpec, kind: &str, known: &[&str]) -> Result<Self, LookupError> {
        if let Some(unknown) = spec
            .clauses()
            .iter()
            .find(|clause| !known.contains(&clause.name.as_str()))
        {
            return Err(LookupError::UnknownAttribute {
                kind: kind.to_string(),
                name: unknown.name.clone(),
                known: known.iter().map(|k| k.to_string()).collect(),
            });
        }

        Self::compile(spec)
    }

    /// True when every clause matches
    pub fn matches(&self, attributes: &AttributeMap) -> bool {
        self.clauses.iter().all(|clause| clause.matches(attributes))
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }
}
