//! The fixed set of declarable types

use std::fmt;

/// A type name accepted by `DECLARE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Integer,
    Boolean,
    Real,
    String,
    Char,
}

impl VarType {
    pub const ALL: [VarType; 5] = [
        VarType::Integer,
        VarType::Boolean,
        VarType::Real,
        VarType::String,
        VarType::Char,
    ];

    /// Parse a type name as written in source (case-sensitive)
    pub fn parse(name: &str) -> Option<VarType> {
        VarType::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// The type name as written in source
    pub fn name(&self) -> &'static str {
        match self {
            VarType::Integer => "INTEGER",
            VarType::Boolean => "BOOLEAN",
            VarType::Real => "REAL",
            VarType::String => "STRING",
            VarType::Char => "CHAR",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
