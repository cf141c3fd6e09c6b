//! Imposition configuration
//!
//! Options arrive as a flat `key:value, key:value` string, e.g.
//! `papersize:A5L, btype:booklet-topfold, binding:short`, and are normalized
//! into an [`ImpositionConfig`].

use crate::constants::{DEFAULT_BORDER_WIDTH, DEFAULT_FOLIO_SIZE, POINTS_PER_INCH, mm_to_pt};
use crate::layout::{BOOKLET_NUP_VALUES, FoldPlan, GridShape, booklet_grid, plain_grid};
use crate::paper::{PaperSize, lookup_paper_size};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Option Strings
// =============================================================================

/// Parsed but not yet validated `key:value` pairs, keys lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOptions {
    entries: Vec<(String, String)>,
}

impl RawOptions {
    pub fn parse(input: &str) -> std::result::Result<Self, ConfigError> {
        let mut entries = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, value) = part
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidOption(format!("missing ':' in \"{part}\"")))?;
            let key = key.trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(ConfigError::InvalidOption(format!("missing key in \"{part}\"")));
            }
            entries.push((key, value.trim().to_string()));
        }
        Ok(Self { entries })
    }

    /// Last value given for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidOption(format!("{key}: \"{value}\""))
}

fn parse_bool(key: &str, value: &str) -> std::result::Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "t" | "yes" => Ok(true),
        "off" | "false" | "f" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_length(key: &str, value: &str, unit: Unit) -> std::result::Result<f32, ConfigError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| unit.to_points(v))
        .ok_or_else(|| invalid(key, value))
}

/// Unit for `dimensions`, `margin` and `border` values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Unit {
    #[default]
    Points,
    Millimeters,
    Centimeters,
    Inches,
}

impl Unit {
    fn parse(value: &str) -> std::result::Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "pt" | "po" | "points" => Ok(Unit::Points),
            "mm" => Ok(Unit::Millimeters),
            "cm" => Ok(Unit::Centimeters),
            "in" | "inch" | "inches" => Ok(Unit::Inches),
            _ => Err(invalid("unit", value)),
        }
    }

    fn to_points(self, value: f32) -> f32 {
        match self {
            Unit::Points => value,
            Unit::Millimeters => mm_to_pt(value),
            Unit::Centimeters => mm_to_pt(value * 10.0),
            Unit::Inches => value * POINTS_PER_INCH,
        }
    }
}

// =============================================================================
// Imposition Configuration
// =============================================================================

/// Canonical imposition configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImpositionConfig {
    /// Source pages per sheet side
    pub n: usize,
    pub kind: LayoutKind,
    pub binding: Binding,
    /// Output sheet, already turned to its final orientation
    pub paper: PaperSize,
    pub grid: GridShape,
    /// Space between a cell edge and its content, in points
    pub margin: f32,
    /// Frame width drawn around each cell, in points
    pub border: Option<f32>,
    pub cell_order: CellOrder,
    /// Turn plain N-up pages 90° when they don't match the cell orientation
    pub enforce_orientation: bool,
    pub scaling: ScalingMode,
    /// Split booklets into signatures of `folio_size` sheets
    pub multi_folio: bool,
    pub folio_size: usize,
}

impl ImpositionConfig {
    /// Configuration for a plain N-up layout.
    pub fn nup(n: usize, options: &str) -> std::result::Result<Self, ConfigError> {
        let raw = RawOptions::parse(options)?;
        for key in ["btype", "booklettype", "binding", "multifolio", "foliosize"] {
            if raw.get(key).is_some() {
                return Err(ConfigError::InvalidOption(format!(
                    "{key} only applies to booklets"
                )));
            }
        }
        Self::from_raw(n, &raw, Some(LayoutKind::PlainNUp))
    }

    /// Configuration for a booklet; `btype` picks the fold, defaulting to `booklet`.
    pub fn booklet(n: usize, options: &str) -> std::result::Result<Self, ConfigError> {
        let raw = RawOptions::parse(options)?;
        let kind = booklet_type(&raw)?.unwrap_or(LayoutKind::Booklet);
        if kind == LayoutKind::PlainNUp {
            return Err(ConfigError::InvalidOption("btype: \"nup\"".to_string()));
        }
        Self::from_raw(n, &raw, Some(kind))
    }

    /// Configuration for any layout: booklet when `btype` is given, plain N-up otherwise.
    pub fn build(n: usize, options: &str) -> std::result::Result<Self, ConfigError> {
        let raw = RawOptions::parse(options)?;
        Self::from_raw(n, &raw, None)
    }

    fn from_raw(
        n: usize,
        raw: &RawOptions,
        kind: Option<LayoutKind>,
    ) -> std::result::Result<Self, ConfigError> {
        let unit = match raw.get("unit") {
            Some(v) => Unit::parse(v)?,
            None => Unit::default(),
        };

        let mut paper = None;
        let mut orientation = None;
        let mut binding = Binding::default();
        let mut margin = 0.0;
        let mut border = None;
        let mut cell_order = CellOrder::default();
        let mut enforce_orientation = true;
        let mut scaling = ScalingMode::default();
        let mut multi_folio = false;
        let mut folio_size = DEFAULT_FOLIO_SIZE;

        for (key, value) in raw.iter() {
            match key {
                "papersize" | "formsize" => {
                    paper = Some(lookup_paper_size(value).ok_or_else(|| invalid(key, value))?);
                }
                "dimensions" => paper = Some(parse_dimensions(value, unit)?),
                "unit" | "btype" | "booklettype" => {}
                "orientation" => {
                    orientation = Some(match value.to_ascii_lowercase().as_str() {
                        "portrait" | "p" => Orientation::Portrait,
                        "landscape" | "l" => Orientation::Landscape,
                        _ => return Err(invalid(key, value)),
                    });
                }
                "binding" => {
                    binding = match value.to_ascii_lowercase().as_str() {
                        "long" => Binding::Long,
                        "short" => Binding::Short,
                        _ => return Err(invalid(key, value)),
                    };
                }
                "border" => {
                    border = match parse_bool(key, value) {
                        Ok(true) => Some(DEFAULT_BORDER_WIDTH),
                        Ok(false) => None,
                        Err(_) => Some(parse_length(key, value, unit)?).filter(|w| *w > 0.0),
                    };
                }
                "margin" => margin = parse_length(key, value, unit)?,
                "order" => cell_order = parse_cell_order(value)?,
                "enforce" => enforce_orientation = parse_bool(key, value)?,
                "scaling" => scaling = parse_scaling(value)?,
                "multifolio" => multi_folio = parse_bool(key, value)?,
                "foliosize" => {
                    folio_size = value
                        .parse::<usize>()
                        .ok()
                        .filter(|v| *v > 0)
                        .ok_or_else(|| invalid(key, value))?;
                }
                _ => {
                    return Err(ConfigError::InvalidOption(format!("unknown key \"{key}\"")));
                }
            }
        }

        let kind = match kind {
            Some(kind) => kind,
            None => booklet_type(raw)?.unwrap_or(LayoutKind::PlainNUp),
        };

        let mut paper = paper.ok_or(ConfigError::MissingPaperSize)?;
        if let Some(orientation) = orientation {
            paper = paper.with_orientation(orientation);
        }

        let grid = grid_for(n, kind, binding, paper.orientation())?;

        let config = Self {
            n,
            kind,
            binding,
            paper,
            grid,
            margin,
            border,
            cell_order,
            enforce_orientation,
            scaling,
            multi_folio,
            folio_size,
        };
        config.validate()?;

        log::debug!(
            "{}-up {:?} on {} ({}x{}pt), grid {}x{}, {:?}",
            config.n,
            config.kind,
            config.paper.name,
            config.paper.width,
            config.paper.height,
            config.grid.cols,
            config.grid.rows,
            config.fold_plan()
        );
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let expected = grid_for(self.n, self.kind, self.binding, self.paper.orientation())?;
        if self.grid != expected || self.grid.cell_count() != self.n {
            return Err(ConfigError::InvalidOption(format!(
                "grid {}x{} does not hold {}-up",
                self.grid.cols, self.grid.rows, self.n
            )));
        }

        if !(self.paper.width > 0.0 && self.paper.height > 0.0) {
            return Err(ConfigError::InvalidOption(format!(
                "paper {}x{}",
                self.paper.width, self.paper.height
            )));
        }

        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(ConfigError::InvalidOption(format!("margin: {}", self.margin)));
        }

        if let Some(width) = self.border {
            if !(width.is_finite() && width > 0.0) {
                return Err(ConfigError::InvalidOption(format!("border: {width}")));
            }
        }

        if self.folio_size == 0 || self.folio_size.checked_mul(2 * self.n).is_none() {
            return Err(ConfigError::InvalidOption(format!(
                "foliosize: {}",
                self.folio_size
            )));
        }

        Ok(())
    }

    pub fn fold_plan(&self) -> FoldPlan {
        FoldPlan::select(self.kind, self.binding, self.paper.orientation())
    }

    pub fn orientation(&self) -> Orientation {
        self.paper.orientation()
    }

    /// Space kept clear inside every cell
    pub fn cell_inset(&self) -> f32 {
        self.margin + self.border.unwrap_or(0.0)
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

fn booklet_type(raw: &RawOptions) -> std::result::Result<Option<LayoutKind>, ConfigError> {
    let Some(value) = raw.get("btype").or_else(|| raw.get("booklettype")) else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "booklet" => Ok(Some(LayoutKind::Booklet)),
        "booklet-topfold" | "booklettopfold" | "topfold" => Ok(Some(LayoutKind::BookletTopfold)),
        _ => Err(invalid("btype", value)),
    }
}

fn grid_for(
    n: usize,
    kind: LayoutKind,
    binding: Binding,
    orientation: Orientation,
) -> std::result::Result<GridShape, ConfigError> {
    if kind.is_booklet() {
        if !BOOKLET_NUP_VALUES.contains(&n) {
            return Err(ConfigError::UnsupportedNUp { n, kind });
        }
        let plan = FoldPlan::select(kind, binding, orientation);
        booklet_grid(n, plan.fold).ok_or(ConfigError::UnsupportedNUp { n, kind })
    } else {
        plain_grid(n, orientation)
            .ok_or_else(|| ConfigError::InvalidOption(format!("{n}-up is not supported")))
    }
}

fn parse_dimensions(value: &str, unit: Unit) -> std::result::Result<PaperSize, ConfigError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [width, height] = parts.as_slice() else {
        return Err(invalid("dimensions", value));
    };
    let width = parse_length("dimensions", width, unit)?;
    let height = parse_length("dimensions", height, unit)?;
    if width <= 0.0 || height <= 0.0 {
        return Err(invalid("dimensions", value));
    }
    Ok(PaperSize::new("custom", width, height))
}

fn parse_cell_order(value: &str) -> std::result::Result<CellOrder, ConfigError> {
    let normalized: String = value
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("");
    match normalized.as_str() {
        "rd" | "rightdown" => Ok(CellOrder::RightDown),
        "dr" | "downright" => Ok(CellOrder::DownRight),
        "ld" | "leftdown" => Ok(CellOrder::LeftDown),
        "dl" | "downleft" => Ok(CellOrder::DownLeft),
        _ => Err(invalid("order", value)),
    }
}

fn parse_scaling(value: &str) -> std::result::Result<ScalingMode, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "fit" => Ok(ScalingMode::Fit),
        "fill" => Ok(ScalingMode::Fill),
        "none" => Ok(ScalingMode::None),
        "stretch" => Ok(ScalingMode::Stretch),
        _ => Err(invalid("scaling", value)),
    }
}
