use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImposeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[cfg(feature = "serde")]
    #[error("Failed to (de)serialize configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to impose")]
    NoPages,
    #[error("Page {0} not found")]
    PageNotFound(u32),
    #[error("No image object {} {} R on page {page}", object_id.0, object_id.1)]
    ImageNotFound {
        page: u32,
        object_id: lopdf::ObjectId,
    },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Configuration failures surfaced by [`crate::ImpositionConfig::build`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("{n}-up is not supported for {kind:?}")]
    UnsupportedNUp { n: usize, kind: LayoutKind },
    #[error("either papersize or dimensions must be given")]
    MissingPaperSize,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("degenerate bounds: {0}")]
    DegenerateBounds(String),
}

pub type Result<T> = std::result::Result<T, ImposeError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height >= width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

impl Orientation {
    pub fn of(width: f32, height: f32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Which sheet edge the finished booklet is bound on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Binding {
    #[default]
    Long,
    Short,
}

impl Binding {
    /// The binding edge a sheet of the given orientation folds along without turning.
    pub fn natural_for(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => Binding::Long,
            Orientation::Landscape => Binding::Short,
        }
    }
}

/// Layout families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutKind {
    /// Plain N-up: consecutive pages fill the grid, one side per sheet
    #[default]
    PlainNUp,
    /// Saddle-stitch booklet folded along the side
    Booklet,
    /// Saddle-stitch booklet folded along the top
    BookletTopfold,
}

impl LayoutKind {
    pub fn is_booklet(self) -> bool {
        !matches!(self, LayoutKind::PlainNUp)
    }
}

/// Page scaling behavior when source pages don't match the cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Fit page to available space (preserve aspect ratio)
    #[default]
    Fit,
    /// Fill available space (may crop)
    Fill,
    /// Center without scaling
    None,
    /// Stretch to fill (ignore aspect ratio)
    Stretch,
}

/// Clockwise rotation for placed pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Normalizes any multiple of 90 (negative allowed); other angles yield `None`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::None),
            90 => Some(Rotation::Clockwise90),
            180 => Some(Rotation::Clockwise180),
            _ => Some(Rotation::Clockwise270),
        }
    }

    /// Adds `other` on top of this rotation.
    pub fn then(self, other: Rotation) -> Self {
        let degrees = self.degrees() + other.degrees();
        Rotation::from_degrees(degrees).unwrap_or(Rotation::None)
    }

    pub fn half_turned(self) -> Self {
        self.then(Rotation::Clockwise180)
    }
}

/// Cell fill order for plain N-up sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellOrder {
    /// Left to right, then top to bottom
    #[default]
    RightDown,
    /// Top to bottom, then left to right
    DownRight,
    /// Right to left, then top to bottom
    LeftDown,
    /// Top to bottom, then right to left
    DownLeft,
}

/// Statistics about the imposition
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionStatistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Total number of output sheets
    pub output_sheets: usize,
    /// Number of signatures (booklets only)
    pub signatures: Option<usize>,
    /// Pages per signature (booklets only)
    pub pages_per_signature: Option<Vec<usize>>,
    /// Output page count
    pub output_pages: usize,
    /// Number of blank pages added for padding
    pub blank_pages_added: usize,
}
