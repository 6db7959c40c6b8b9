use thiserror::Error;

/// A line of the family description could not be interpreted as a valid
/// person record. All variants carry the 1-based offending line number;
/// parsing never continues past them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: person entry has no name")]
    MissingName { line: usize },

    #[error("line {line}: unterminated attribute list, missing ')'")]
    UnterminatedAttributes { line: usize },

    #[error("line {line}: child entry appears before any parent in its block")]
    ChildWithoutParents { line: usize },

    #[error("line {line}: family block has {count} parents, at most two are supported")]
    TooManyParents { line: usize, count: usize },
}

/// The requested root identifier is absent from the parsed family.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no person matching \"{0}\" in the family")]
pub struct LookupError(pub String);
