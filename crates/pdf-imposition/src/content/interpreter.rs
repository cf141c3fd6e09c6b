//! Content-stream geometry interpreter
//!
//! Tracks the current transformation matrix through `q`, `Q` and `cm` and
//! reports it wherever a targeted XObject is painted with `Do`. Form
//! XObjects are followed recursively, each with its own graphics-state
//! stack, starting from the matrix in effect where they are painted.

use crate::constants::{MAX_FORM_DEPTH, MAX_FORM_VISITS};
use crate::matrix::AffineMatrix;
use crate::types::Result;
use lopdf::Object;
use lopdf::content::Operation;
use std::collections::HashSet;

use super::{ContentSource, XObjectRef};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which painted XObjects to report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TargetNames {
    /// Every image, plus names that don't resolve to a known XObject
    #[default]
    All,
    /// Only these resource names; forms are reported only when named here
    Named(HashSet<String>),
}

impl TargetNames {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TargetNames::Named(names.into_iter().map(Into::into).collect())
    }

    fn includes(&self, name: &str) -> bool {
        match self {
            TargetNames::All => true,
            TargetNames::Named(names) => names.contains(name),
        }
    }

    fn includes_form(&self, name: &str) -> bool {
        matches!(self, TargetNames::Named(names) if names.contains(name))
    }
}

/// Placement of one painted XObject
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImagePositionResult {
    /// Resource name used by `Do`, without the leading slash
    pub reference_name: String,
    /// Matrix in effect when the object was painted
    pub matrix: AffineMatrix,
}

/// Resolve the placement of targeted XObjects on a 1-based page.
///
/// One result is produced per `Do`, in paint order.
pub fn resolve_positions<S: ContentSource>(
    source: &S,
    page: u32,
    targets: &TargetNames,
) -> Result<Vec<ImagePositionResult>> {
    let scope = source.page_scope(page)?;
    let tokens = source.content_tokens(&scope)?;

    let mut interpreter = Interpreter {
        source,
        targets,
        results: Vec::new(),
        active: vec![scope.clone()],
        visits: 0,
    };
    interpreter.walk(&scope, &tokens, AffineMatrix::identity());

    log::debug!(
        "page {page}: {} placement(s) resolved",
        interpreter.results.len()
    );
    Ok(interpreter.results)
}

struct Interpreter<'a, S: ContentSource> {
    source: &'a S,
    targets: &'a TargetNames,
    results: Vec<ImagePositionResult>,
    /// Scopes currently being walked, outermost first
    active: Vec<S::Scope>,
    /// Forms entered so far, bounded by `MAX_FORM_VISITS`
    visits: usize,
}

impl<S: ContentSource> Interpreter<'_, S> {
    fn walk(&mut self, scope: &S::Scope, tokens: &[Operation], initial: AffineMatrix) {
        let mut ctm = initial;
        let mut stack: Vec<AffineMatrix> = Vec::new();

        for op in tokens {
            match op.operator.as_str() {
                "q" => stack.push(ctm),
                "Q" => match stack.pop() {
                    Some(saved) => ctm = saved,
                    None => log::debug!("{scope:?}: unbalanced Q ignored"),
                },
                "cm" => match matrix_operands(&op.operands) {
                    Some(m) => ctm = ctm.multiply(&m),
                    None => log::debug!(
                        "{scope:?}: skipping cm with operands {:?}",
                        op.operands
                    ),
                },
                "Do" => match op.operands.as_slice() {
                    [Object::Name(name)] => self.paint(scope, name, ctm),
                    operands => log::debug!("{scope:?}: skipping Do with operands {operands:?}"),
                },
                _ => {}
            }
        }
    }

    fn paint(&mut self, scope: &S::Scope, name: &[u8], ctm: AffineMatrix) {
        let reference_name = String::from_utf8_lossy(name).into_owned();

        match self.source.resolve_xobject(scope, name) {
            Some(XObjectRef::Image) | None => {
                if self.targets.includes(&reference_name) {
                    self.results.push(ImagePositionResult {
                        reference_name,
                        matrix: ctm,
                    });
                }
            }
            Some(XObjectRef::Form {
                scope: child,
                matrix,
            }) => {
                if self.targets.includes_form(&reference_name) {
                    self.results.push(ImagePositionResult {
                        reference_name: reference_name.clone(),
                        matrix: ctm,
                    });
                }
                self.enter_form(child, &reference_name, ctm.multiply(&matrix));
            }
        }
    }

    fn enter_form(&mut self, child: S::Scope, name: &str, initial: AffineMatrix) {
        if self.active.len() > MAX_FORM_DEPTH {
            log::warn!("form /{name} nested deeper than {MAX_FORM_DEPTH} levels, not followed");
            return;
        }
        if self.active.contains(&child) {
            log::warn!("form /{name} ({child:?}) paints itself, not followed");
            return;
        }
        if self.visits >= MAX_FORM_VISITS {
            if self.visits == MAX_FORM_VISITS {
                log::warn!(
                    "more than {MAX_FORM_VISITS} forms painted, remaining forms not followed"
                );
                self.visits += 1;
            }
            return;
        }
        self.visits += 1;

        let tokens = match self.source.content_tokens(&child) {
            Ok(tokens) => tokens,
            Err(e) => {
                log::warn!("form /{name} ({child:?}) content unreadable: {e}");
                return;
            }
        };

        self.active.push(child.clone());
        self.walk(&child, &tokens, initial);
        self.active.pop();
    }
}

/// Six numeric operands as a matrix
pub(crate) fn matrix_operands(operands: &[Object]) -> Option<AffineMatrix> {
    if operands.len() != 6 {
        return None;
    }
    let mut values = [0.0f32; 6];
    for (slot, operand) in values.iter_mut().zip(operands) {
        *slot = number(operand)?;
    }
    Some(AffineMatrix::from_array(values))
}

/// Extract numeric value from a PDF object
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
