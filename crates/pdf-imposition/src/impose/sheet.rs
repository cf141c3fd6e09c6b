//! Sheet rendering for imposition

use crate::layout::{
    CellGeometry, FitOptions, PageAssignment, Rect, best_fit_rotation, placement_matrix,
};
use crate::options::ImpositionConfig;
use crate::render::create_page_xobject;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// A source page and the document it lives in
pub(crate) struct SourcePage {
    pub doc: usize,
    pub page_id: ObjectId,
    pub bbox: Rect,
}

/// Everything shared by the sides of one imposition run
pub(crate) struct SheetContext<'a> {
    pub documents: &'a [Document],
    /// Indexed by 1-based source page number minus one
    pub sources: &'a [SourcePage],
    pub config: &'a ImpositionConfig,
    pub geometry: CellGeometry,
    pub parent_pages_id: ObjectId,
}

/// Copied objects and created forms, kept across sheet sides
pub(crate) struct RenderCache {
    /// Per source document: source object id -> output object id
    pub objects: Vec<HashMap<ObjectId, ObjectId>>,
    /// Source page number -> form XObject id
    pub forms: HashMap<u32, ObjectId>,
}

impl RenderCache {
    pub fn new(documents: usize) -> Self {
        Self {
            objects: vec![HashMap::new(); documents],
            forms: HashMap::new(),
        }
    }
}

/// Rotation a cell's content is drawn with
pub(crate) fn placement_rotation(
    config: &ImpositionConfig,
    assignment: &PageAssignment,
    source_bbox: &Rect,
    cell: &Rect,
) -> Rotation {
    if config.kind == LayoutKind::PlainNUp && config.enforce_orientation {
        assignment
            .rotation
            .then(best_fit_rotation(source_bbox, cell))
    } else {
        assignment.rotation
    }
}

/// Render one side of a sheet to the output document
pub(crate) fn render_sheet_side(
    output: &mut Document,
    ctx: &SheetContext<'_>,
    assignments: &[PageAssignment],
    cache: &mut RenderCache,
) -> Result<ObjectId> {
    let sheet = &ctx.config.paper;
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(ctx.parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(sheet.width),
            Object::Real(sheet.height),
        ]),
    );

    let fit = FitOptions {
        inset: ctx.config.cell_inset(),
        scaling: ctx.config.scaling,
    };
    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for assignment in assignments {
        let Some(page) = assignment.source_page else {
            continue;
        };
        let source = page
            .checked_sub(1)
            .and_then(|idx| ctx.sources.get(idx as usize))
            .ok_or(ImposeError::PageNotFound(page))?;

        let xobject_id = match cache.forms.get(&page) {
            Some(&id) => id,
            None => {
                let id = create_page_xobject(
                    output,
                    &ctx.documents[source.doc],
                    source.page_id,
                    &mut cache.objects[source.doc],
                )?;
                cache.forms.insert(page, id);
                id
            }
        };

        let cell = ctx.geometry.cell_rect(assignment.cell_index);
        let rotation = placement_rotation(ctx.config, assignment, &source.bbox, &cell);
        let matrix = placement_matrix(&cell, rotation, &source.bbox, &fit)?;

        let xobject_name = format!("P{}", assignment.cell_index);
        xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));
        content_ops.push(format!("q {matrix} cm /{xobject_name} Do Q\n"));
    }

    if let Some(width) = ctx.config.border {
        for cell_index in 0..ctx.geometry.grid.cell_count() {
            let frame = ctx
                .geometry
                .cell_rect(cell_index)
                .inset(ctx.config.margin + width / 2.0);
            content_ops.push(format!(
                "q {} w {} {} {} {} re S Q\n",
                width, frame.x, frame.y, frame.width, frame.height
            ));
        }
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}
