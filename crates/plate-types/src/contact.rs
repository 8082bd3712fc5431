use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometric relationship of a resolved plate-plate contact.
///
/// The tag is directional: `FS` read from plate i means "face of i against
/// side of j"; the mirrored entry on plate j reads `SF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    /// Face-to-face.
    FF,
    /// Face (this plate) to side (neighbor).
    FS,
    /// Side (this plate) to face (neighbor).
    SF,
    /// Edge (this plate) to side (neighbor).
    ES,
    /// Side (this plate) to edge (neighbor).
    SE,
    /// Side-to-side.
    SS,
    /// Intersecting volumes.
    IN,
}

impl ContactType {
    /// The same physical contact seen from the other plate.
    pub fn mirror(&self) -> ContactType {
        match self {
            ContactType::FS => ContactType::SF,
            ContactType::SF => ContactType::FS,
            ContactType::ES => ContactType::SE,
            ContactType::SE => ContactType::ES,
            other => *other,
        }
    }

    pub fn is_face_side(&self) -> bool {
        matches!(self, ContactType::FS | ContactType::SF)
    }

    pub fn is_edge_side(&self) -> bool {
        matches!(self, ContactType::ES | ContactType::SE)
    }

    /// Canonical insertion-space branch index (FF, FS/SF, ES/SE, SS, IN).
    pub fn space_branch(&self) -> usize {
        match self {
            ContactType::FF => 0,
            ContactType::FS | ContactType::SF => 1,
            ContactType::ES | ContactType::SE => 2,
            ContactType::SS => 3,
            ContactType::IN => 4,
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContactType::FF => "FF",
            ContactType::FS => "FS",
            ContactType::SF => "SF",
            ContactType::ES => "ES",
            ContactType::SE => "SE",
            ContactType::SS => "SS",
            ContactType::IN => "IN",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_pairs() {
        assert_eq!(ContactType::FS.mirror(), ContactType::SF);
        assert_eq!(ContactType::ES.mirror(), ContactType::SE);
        assert_eq!(ContactType::FF.mirror(), ContactType::FF);
        assert_eq!(ContactType::SS.mirror(), ContactType::SS);
        assert_eq!(ContactType::IN.mirror(), ContactType::IN);
    }
}
