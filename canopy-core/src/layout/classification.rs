use std::fmt::Display;

use crate::{Error, Result};

pub const CREATED_NEVER_CLASSIFIED: u8 = 0;
pub const UNCLASSIFIED: u8 = 1;
pub const GROUND: u8 = 2;
pub const LOW_VEGETATION: u8 = 3;
pub const MEDIUM_VEGETATION: u8 = 4;
pub const HIGH_VEGETATION: u8 = 5;
pub const BUILDING: u8 = 6;
pub const LOW_POINT: u8 = 7;
pub const MODEL_KEY_POINT: u8 = 8;
pub const WATER: u8 = 9;
pub const RAIL: u8 = 10;
pub const ROAD_SURFACE: u8 = 11;
pub const OVERLAP: u8 = 12;
pub const WIRE_GUARD: u8 = 13;
pub const WIRE_CONDUCTOR: u8 = 14;
pub const TRANSMISSION_TOWER: u8 = 15;
pub const WIRE_STRUCTURE_CONNECTOR: u8 = 16;
pub const BRIDGE_DECK: u8 = 17;
pub const HIGH_NOISE: u8 = 18;

/// Largest classification code representable in a [ClassificationSet]
pub const MAX_CLASSIFICATION_CODE: u8 = 31;

/// A set of classification codes in the range `0..=31`, stored as a bit mask
///
/// ```
/// # use canopy_core::layout::classification::{ClassificationSet, OVERLAP, BRIDGE_DECK, GROUND};
/// let codes = ClassificationSet::from_codes(&[OVERLAP, BRIDGE_DECK]).unwrap();
/// assert!(codes.contains(OVERLAP));
/// assert!(!codes.contains(GROUND));
/// assert_eq!(codes.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u8>", into = "Vec<u8>"))]
pub struct ClassificationSet {
    mask: u32,
}

impl ClassificationSet {
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    /// The ASPRS "Overlap Points" code only
    pub const fn overlap() -> Self {
        Self {
            mask: 1 << OVERLAP,
        }
    }

    /// Overlap points together with bridge deck points. Older processing chains removed both, even though
    /// bridge decks are regular surface returns and not overlap
    pub const fn overlap_and_bridge_deck() -> Self {
        Self {
            mask: (1 << OVERLAP) | (1 << BRIDGE_DECK),
        }
    }

    /// Builds a set from a slice of codes. Fails if any code is larger than [MAX_CLASSIFICATION_CODE]
    pub fn from_codes(codes: &[u8]) -> Result<Self> {
        let mut set = Self::empty();
        for code in codes {
            set.insert(*code)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, code: u8) -> Result<()> {
        if code > MAX_CLASSIFICATION_CODE {
            return Err(Error::InvalidParameter(format!(
                "classification code {} is outside of the range 0..={}",
                code, MAX_CLASSIFICATION_CODE
            )));
        }
        self.mask |= 1 << code;
        Ok(())
    }

    /// Codes outside of `0..=31` are never contained
    pub fn contains(&self, code: u8) -> bool {
        code <= MAX_CLASSIFICATION_CODE && self.mask & (1 << code) != 0
    }

    pub fn is_subset(&self, other: &ClassificationSet) -> bool {
        self.mask & !other.mask == 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Iterates the contained codes in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=MAX_CLASSIFICATION_CODE).filter(move |code| self.contains(*code))
    }
}

impl Display for ClassificationSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes = self.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        write!(f, "{{{}}}", codes.join(", "))
    }
}

impl TryFrom<Vec<u8>> for ClassificationSet {
    type Error = Error;

    fn try_from(codes: Vec<u8>) -> Result<Self> {
        Self::from_codes(&codes)
    }
}

impl From<ClassificationSet> for Vec<u8> {
    fn from(set: ClassificationSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_codes_above_31() {
        let mut set = ClassificationSet::empty();
        assert!(set.insert(31).is_ok());
        assert!(matches!(set.insert(32), Err(Error::InvalidParameter(_))));
        assert!(!set.contains(200));
    }

    #[test]
    fn test_overlap_presets() {
        assert_eq!(ClassificationSet::overlap().iter().collect::<Vec<_>>(), vec![12]);
        assert_eq!(
            ClassificationSet::overlap_and_bridge_deck()
                .iter()
                .collect::<Vec<_>>(),
            vec![12, 17]
        );
        assert!(ClassificationSet::overlap().is_subset(&ClassificationSet::overlap_and_bridge_deck()));
    }

    #[test]
    fn test_display() {
        let set = ClassificationSet::from_codes(&[17, 2, 12]).unwrap();
        assert_eq!(set.to_string(), "{2, 12, 17}");
    }
}
