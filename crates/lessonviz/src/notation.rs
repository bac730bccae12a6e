//! Set notation and relationship text.
//!
//! Produces the plain-text lines drawn around set diagrams: the roster
//! notation `A = { 1, 2, 3 }`, the cardinality line `n(A) = 3`, relationship
//! statements such as `A ⊆ B` and membership statements such as `2 ∈ A`.
//! Every line pairs the symbolic statement with a plain-language gloss.

use crate::params::Label;

/// Elements printed in roster notation before the list is cut short.
pub(crate) const NOTATION_CAP: usize = 10;

/// Annotation drawn beside the notation of a set with no elements.
pub(crate) const EMPTY_SET_NOTE: &str = "(empty set)";

/// Formats the roster notation of a set.
///
/// A description replaces the element list verbatim. Lists longer than
/// [`NOTATION_CAP`] keep their first elements and end with `...`.
pub(crate) fn roster(name: &str, elements: &[Label], description: Option<&str>, braces: bool) -> String {
    if let Some(description) = description.filter(|text| !text.trim().is_empty()) {
        return wrap(name, description, braces);
    }
    if elements.is_empty() {
        return format!("{name} = {{ }}");
    }

    let mut shown: Vec<&str> = elements
        .iter()
        .take(NOTATION_CAP)
        .map(Label::as_str)
        .collect();
    if elements.len() > NOTATION_CAP {
        shown.push("...");
    }
    wrap(name, &shown.join(", "), braces)
}

fn wrap(name: &str, body: &str, braces: bool) -> String {
    if braces {
        format!("{name} = {{ {body} }}")
    } else {
        format!("{name} = {body}")
    }
}

/// Formats the cardinality line for a set with `count` elements.
pub(crate) fn cardinality(name: &str, count: usize) -> String {
    format!("n({name}) = {count}")
}

/// A relationship between the displayed set and another named set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relationship<'a> {
    Subset(&'a str),
    Equal(&'a str),
    Disjoint(&'a str),
}

impl Relationship<'_> {
    /// The symbolic statement, e.g. `A ⊆ B`.
    pub fn statement(&self, name: &str) -> String {
        match self {
            Self::Subset(other) => format!("{name} ⊆ {other}"),
            Self::Equal(other) => format!("{name} = {other}"),
            Self::Disjoint(other) => format!("{name} ∩ {other} = ∅"),
        }
    }

    /// The plain-language reading of the statement.
    pub fn gloss(&self, name: &str) -> String {
        match self {
            Self::Subset(other) => format!("({name} is a subset of {other})"),
            Self::Equal(other) => format!("({name} and {other} have exactly the same elements)"),
            Self::Disjoint(other) => format!("({name} and {other} have no elements in common)"),
        }
    }

    /// Statement and gloss on one line.
    pub fn line(&self, name: &str) -> String {
        format!("{}  {}", self.statement(name), self.gloss(name))
    }
}

/// Collects the relationships that are present, in the order subset,
/// equality, disjoint.
pub(crate) fn relationships<'a>(
    subset_of: Option<&'a str>,
    equal_to: Option<&'a str>,
    disjoint_from: Option<&'a str>,
) -> Vec<Relationship<'a>> {
    [
        subset_of.map(Relationship::Subset),
        equal_to.map(Relationship::Equal),
        disjoint_from.map(Relationship::Disjoint),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Formats one membership statement with its gloss.
///
/// The statement is printed as given; it is not checked against the
/// element list.
pub(crate) fn membership(name: &str, element: &str, is_member: bool) -> String {
    if is_member {
        format!("{element} ∈ {name}  ({element} is an element of {name})")
    } else {
        format!("{element} ∉ {name}  ({element} is not an element of {name})")
    }
}
