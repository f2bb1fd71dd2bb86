//! PropertyPath parsing and formatting.
//!
//! Grammar:
//!   member(.member)*[(args)]
//! - '.' separates member segments, outermost first
//! - the final segment may carry a parenthesised argument string that is passed
//!   verbatim to the accessor (e.g. the id of a named time scale)
//!
//! Examples:
//!   "alpha"                 -> members=["alpha"], args=None
//!   "transform.position.x"  -> members=["transform","position","x"], args=None
//!   "scale(ui)"             -> members=["scale"], args=Some("ui")
//!
//! Resolution against a concrete host object is left to accessor resolvers.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty property path")]
    Empty,
    #[error("invalid property path '{path}': empty member segment")]
    EmptySegment { path: String },
    #[error("invalid property path '{path}': member '{member}' is not an identifier")]
    InvalidMember { path: String, member: String },
    #[error("invalid property path '{path}': unbalanced argument list")]
    UnbalancedArgs { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    members: Vec<String>,
    args: Option<String>,
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl PropertyPath {
    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let (head, args) = match s.find('(') {
            Some(open) => {
                let inner_ok = s.ends_with(')')
                    && !s[open + 1..s.len() - 1].contains(|c: char| c == '(' || c == ')');
                if !inner_ok {
                    return Err(PathError::UnbalancedArgs { path: s.to_string() });
                }
                (&s[..open], Some(s[open + 1..s.len() - 1].trim().to_string()))
            }
            None => {
                if s.contains(')') {
                    return Err(PathError::UnbalancedArgs { path: s.to_string() });
                }
                (s, None)
            }
        };

        let mut members = Vec::new();
        for segment in head.split('.') {
            if segment.is_empty() {
                return Err(PathError::EmptySegment { path: s.to_string() });
            }
            if !is_identifier(segment) {
                return Err(PathError::InvalidMember {
                    path: s.to_string(),
                    member: segment.to_string(),
                });
            }
            members.push(segment.to_string());
        }

        Ok(PropertyPath {
            members,
            // "scale()" means no argument at all
            args: args.filter(|a| !a.is_empty()),
        })
    }

    /// Single-member path without arguments.
    pub fn member(name: impl Into<String>) -> Self {
        Self {
            members: vec![name.into()],
            args: None,
        }
    }

    /// The outermost member name.
    pub fn root(&self) -> &str {
        &self.members[0]
    }

    /// The innermost member name.
    pub fn leaf(&self) -> &str {
        &self.members[self.members.len() - 1]
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|s| s.as_str())
    }

    pub fn depth(&self) -> usize {
        self.members.len()
    }

    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }

    /// Dotted member chain without the argument list.
    pub fn member_chain(&self) -> String {
        self.members.join(".")
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.member_chain())?;
        if let Some(args) = &self.args {
            write!(f, "({args})")?;
        }
        Ok(())
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyPath::parse(s)
    }
}

impl TryFrom<&str> for PropertyPath {
    type Error = PathError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PropertyPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for PropertyPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PropertyPath {
    fn deserialize<D>(deserializer: D) -> Result<PropertyPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PropertyPath::parse(&s).map_err(de::Error::custom)
    }
}
