pub mod error;

pub use error::{DocweaveError, Result};

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of declaration that can carry a docstring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Function,
    Class,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => write!(f, "function"),
            Self::Class => write!(f, "class"),
        }
    }
}

impl std::str::FromStr for DeclKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "function" | "def" => Ok(Self::Function),
            "class" => Ok(Self::Class),
            other => Err(format!("Unknown declaration kind: {}", other)),
        }
    }
}

/// Type-safe identity for a declaration within one source file.
///
/// Formatted as `{kind}:{qualified name}:{line}` so that two same-named
/// declarations at different positions never collide in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclId(String);

impl DeclId {
    pub fn new(kind: DeclKind, qualified_name: &str, line: usize) -> Self {
        Self(format!("{}:{}:{}", kind, qualified_name, line))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DeclId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_decl_kind_display() {
        assert_eq!(DeclKind::Function.to_string(), "function");
        assert_eq!(DeclKind::Class.to_string(), "class");
    }

    #[test]
    fn test_decl_kind_from_str() {
        assert_eq!(DeclKind::from_str("function"), Ok(DeclKind::Function));
        assert_eq!(DeclKind::from_str("def"), Ok(DeclKind::Function));
        assert_eq!(DeclKind::from_str("Class"), Ok(DeclKind::Class));
        assert!(DeclKind::from_str("module").is_err());
    }

    #[test]
    fn test_decl_id_format() {
        let id = DeclId::new(DeclKind::Function, "Calculator.add", 12);
        assert_eq!(id.as_str(), "function:Calculator.add:12");
    }

    #[test]
    fn test_decl_id_distinguishes_positions() {
        let a = DeclId::new(DeclKind::Function, "helper", 3);
        let b = DeclId::new(DeclKind::Function, "helper", 40);
        assert_ne!(a, b);
    }
}
