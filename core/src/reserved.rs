//! Reserved property-bag keys.
//!
//! A class definition treats these keys specially instead of copying them
//! onto the prototype.

use std::fmt;

/// Sentinel key terminating a property bag. Always ignored.
pub const END_SENTINEL: &str = "__end__";

/// A key with engine-defined meaning in a class definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedKey {
    /// Instance constructor body.
    Construct,
    /// Instance destructor body.
    Destruct,
    /// Blocks direct instantiation.
    Abstract,
    /// Blocks further extension.
    Final,
    /// Identifier for diagnostics and `toString`.
    Classname,
    /// Sub-map promoted to static members.
    Static,
    /// Mutator declarations.
    Mutators,
    /// Trailing terminator.
    End,
}

impl ReservedKey {
    pub const ALL: [ReservedKey; 8] = [
        ReservedKey::Construct,
        ReservedKey::Destruct,
        ReservedKey::Abstract,
        ReservedKey::Final,
        ReservedKey::Classname,
        ReservedKey::Static,
        ReservedKey::Mutators,
        ReservedKey::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservedKey::Construct => "__construct",
            ReservedKey::Destruct => "__destruct",
            ReservedKey::Abstract => "__abstract",
            ReservedKey::Final => "__final",
            ReservedKey::Classname => "__classname",
            ReservedKey::Static => "__static",
            ReservedKey::Mutators => "__mutators",
            ReservedKey::End => END_SENTINEL,
        }
    }

    /// Look up a reserved key by its textual form.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }

    /// The system variable this key carries, if any.
    pub fn sysvar(&self) -> Option<SysVar> {
        match self {
            ReservedKey::Abstract => Some(SysVar::Abstract),
            ReservedKey::Final => Some(SysVar::Final),
            ReservedKey::Classname => Some(SysVar::Classname),
            _ => None,
        }
    }
}

impl fmt::Display for ReservedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System variables promoted from the property bag onto the class itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SysVar {
    Abstract,
    Final,
    Classname,
}

impl SysVar {
    pub const ALL: [SysVar; 3] = [SysVar::Abstract, SysVar::Final, SysVar::Classname];

    pub fn key(&self) -> ReservedKey {
        match self {
            SysVar::Abstract => ReservedKey::Abstract,
            SysVar::Final => ReservedKey::Final,
            SysVar::Classname => ReservedKey::Classname,
        }
    }
}
