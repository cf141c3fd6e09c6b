//! Paper size registry
//!
//! Named sheet sizes in points. A trailing `L` on a name selects the
//! landscape variant (`A5L`), a trailing `P` forces portrait (`LedgerP`).

use crate::types::Orientation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A physical sheet size in points
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaperSize {
    pub name: String,
    pub width: f32,
    pub height: f32,
}

impl PaperSize {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.width, self.height)
    }

    /// Returns this size turned so that it has the requested orientation.
    pub fn with_orientation(&self, orientation: Orientation) -> Self {
        if self.orientation() == orientation {
            return self.clone();
        }
        Self {
            name: self.name.clone(),
            width: self.height,
            height: self.width,
        }
    }

    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// (name, width, height) in points, in the orientation the name implies
const PAPER_SIZES: &[(&str, f32, f32)] = &[
    // ISO 216 A series
    ("A0", 2384.0, 3370.0),
    ("A1", 1684.0, 2384.0),
    ("A2", 1191.0, 1684.0),
    ("A3", 842.0, 1191.0),
    ("A4", 595.0, 842.0),
    ("A5", 420.0, 595.0),
    ("A6", 298.0, 420.0),
    ("A7", 210.0, 298.0),
    ("A8", 147.0, 210.0),
    ("A9", 105.0, 147.0),
    ("A10", 74.0, 105.0),
    // ISO 216 B series
    ("B0", 2835.0, 4008.0),
    ("B1", 2004.0, 2835.0),
    ("B2", 1417.0, 2004.0),
    ("B3", 1001.0, 1417.0),
    ("B4", 709.0, 1001.0),
    ("B5", 499.0, 709.0),
    ("B6", 354.0, 499.0),
    ("B7", 249.0, 354.0),
    ("B8", 176.0, 249.0),
    ("B9", 125.0, 176.0),
    ("B10", 88.0, 125.0),
    // ISO 269 C series (envelopes)
    ("C0", 2599.0, 3677.0),
    ("C1", 1837.0, 2599.0),
    ("C2", 1298.0, 1837.0),
    ("C3", 918.0, 1298.0),
    ("C4", 649.0, 918.0),
    ("C5", 459.0, 649.0),
    ("C6", 323.0, 459.0),
    ("C7", 230.0, 323.0),
    ("C8", 162.0, 230.0),
    ("C9", 113.0, 162.0),
    ("C10", 79.0, 113.0),
    // North American sizes
    ("Letter", 612.0, 792.0),
    ("Legal", 612.0, 1008.0),
    ("Ledger", 1224.0, 792.0),
    ("Tabloid", 792.0, 1224.0),
    ("Executive", 522.0, 756.0),
    ("HalfLetter", 396.0, 612.0),
    ("JuniorLegal", 360.0, 576.0),
    ("GovLetter", 576.0, 756.0),
    ("GovLegal", 612.0, 936.0),
];

fn find(name: &str) -> Option<PaperSize> {
    PAPER_SIZES
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(name))
        .map(|&(known, width, height)| PaperSize::new(known, width, height))
}

/// Look up a paper size by name, honouring an `L`/`P` orientation suffix.
pub fn lookup_paper_size(name: &str) -> Option<PaperSize> {
    let name = name.trim();
    if let Some(size) = find(name) {
        return Some(size);
    }

    let (base, orientation) = match name.char_indices().last() {
        Some((idx, 'L' | 'l')) => (&name[..idx], Orientation::Landscape),
        Some((idx, 'P' | 'p')) => (&name[..idx], Orientation::Portrait),
        _ => return None,
    };

    let mut size = find(base)?.with_orientation(orientation);
    size.name = name.to_string();
    Some(size)
}

/// All registered base names, in table order
pub fn known_paper_sizes() -> impl Iterator<Item = &'static str> {
    PAPER_SIZES.iter().map(|(name, _, _)| *name)
}
