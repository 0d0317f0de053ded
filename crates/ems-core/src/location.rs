//! Map locations and their roles.

use std::fmt;

use crate::LocationId;

/// The role a location plays in the dispatch problem.
///
/// The one-letter codes mirror the map interchange format
/// (`A`/`H`/`E`/`I` in the `type` column of a locations table).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationKind {
    /// Ambulance base — fleet units start and end every mission here.
    Base,
    /// Hospital — transport destination for picked-up patients.
    Hospital,
    /// Emergency zone — a location where incidents may spawn.
    EmergencyZone,
    /// Plain intersection — routing waypoint only.
    Intersection,
}

impl LocationKind {
    /// Parse the one-letter interchange code.  Returns `None` for anything
    /// other than `A`, `H`, `E`, or `I`.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(LocationKind::Base),
            'H' => Some(LocationKind::Hospital),
            'E' => Some(LocationKind::EmergencyZone),
            'I' => Some(LocationKind::Intersection),
            _ => None,
        }
    }

    /// The one-letter interchange code for this kind.
    pub fn code(self) -> char {
        match self {
            LocationKind::Base => 'A',
            LocationKind::Hospital => 'H',
            LocationKind::EmergencyZone => 'E',
            LocationKind::Intersection => 'I',
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocationKind::Base => "base",
            LocationKind::Hospital => "hospital",
            LocationKind::EmergencyZone => "emergency zone",
            LocationKind::Intersection => "intersection",
        };
        write!(f, "{name}")
    }
}

/// A node of the city map.  Immutable after map construction.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub id: LocationId,
    pub kind: LocationKind,
    pub name: String,
}

impl Location {
    pub fn new(id: LocationId, kind: LocationKind, name: impl Into<String>) -> Self {
        Self { id, kind, name: name.into() }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.id, self.kind)
    }
}
