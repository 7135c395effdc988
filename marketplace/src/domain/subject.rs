//! Subject identity and role.
//!
//! A subject is the user a dashboard or saved-selection set belongs to. The
//! identifier is opaque: the backend issues it and the client never inspects
//! its structure beyond rejecting blank or padded values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`SubjectId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    PaddedId,
}

impl fmt::Display for SubjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "subject id must not be empty"),
            Self::PaddedId => write!(f, "subject id must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for SubjectValidationError {}

/// Opaque identifier of a student or employer.
///
/// # Examples
/// ```
/// use marketplace::domain::SubjectId;
///
/// let id = SubjectId::new("64b7f0c2a1").expect("valid id");
/// assert_eq!(id.as_ref(), "64b7f0c2a1");
/// assert!(SubjectId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Validate and construct a [`SubjectId`].
    pub fn new(id: impl Into<String>) -> Result<Self, SubjectValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SubjectValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(SubjectValidationError::PaddedId);
        }
        Ok(Self(id))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = SubjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for SubjectId {
    type Err = SubjectValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

/// Role tag deciding which sources a dashboard queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A student looking for work.
    Student,
    /// An employer posting jobs.
    Employer,
}

impl Role {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Employer => "employer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.input)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" | "worker" => Ok(Self::Student),
            "employer" => Ok(Self::Employer),
            _ => Err(ParseRoleError {
                input: value.to_owned(),
            }),
        }
    }
}

/// A subject identifier paired with its role.
///
/// Never mutated; a fresh value is supplied per dashboard load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    id: SubjectId,
    role: Role,
}

impl Subject {
    /// Pair an identifier with a role.
    pub fn new(id: SubjectId, role: Role) -> Self {
        Self { id, role }
    }

    /// Shorthand for a student subject.
    pub fn student(id: SubjectId) -> Self {
        Self::new(id, Role::Student)
    }

    /// Shorthand for an employer subject.
    pub fn employer(id: SubjectId) -> Self {
        Self::new(id, Role::Employer)
    }

    /// The subject identifier.
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    /// The subject role.
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", SubjectValidationError::EmptyId)]
    #[case::blank("   ", SubjectValidationError::EmptyId)]
    #[case::padded(" abc", SubjectValidationError::PaddedId)]
    #[case::trailing("abc\n", SubjectValidationError::PaddedId)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: SubjectValidationError) {
        let error = SubjectId::new(raw).expect_err("id should be rejected");
        assert_eq!(error, expected);
    }

    #[rstest]
    fn subject_id_round_trips_through_serde() {
        let id = SubjectId::new("64b7f0c2a1").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"64b7f0c2a1\"");
        let back: SubjectId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }

    #[rstest]
    fn blank_subject_id_fails_deserialisation() {
        let result = serde_json::from_str::<SubjectId>("\"\"");
        assert!(result.is_err());
    }

    #[rstest]
    #[case("student", Role::Student)]
    #[case("Employer", Role::Employer)]
    #[case("worker", Role::Student)]
    fn parses_roles(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>().expect("role parses"), expected);
    }

    #[rstest]
    fn unknown_role_reports_input() {
        let error = "admin".parse::<Role>().expect_err("unknown role");
        assert_eq!(error.to_string(), "unknown role: admin");
    }
}
