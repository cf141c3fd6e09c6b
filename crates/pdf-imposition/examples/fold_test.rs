//! Writes numbered test pages and their booklet impositions, for checking
//! page order by printing and folding.
//!
//! Usage: cargo run --example fold_test -p pdf-imposition
//!
//! Print each `fold_test_*.pdf` double-sided, fold as named in the file, and
//! the pages should read 1, 2, 3, ... in order.

use lopdf::{Dictionary, Document, Object, Stream};
use pdf_imposition::*;

fn create_numbered_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    let font_id = doc.add_object(font_dict);

    let mut kids = Vec::new();
    for page_num in 1..=num_pages {
        // Page number, plus a bar marking the head of the page
        let content = format!(
            "BT /F1 200 Tf 200 350 Td ({page_num}) Tj ET 0 742 612 50 re f"
        );
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut font_resources = Dictionary::new();
        font_resources.set("F1", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(font_resources));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);
    doc
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let source_doc = create_numbered_pdf(16);

    let layouts = [
        ("side_fold", 4, "papersize:A4, border:on"),
        ("top_fold", 4, "papersize:A4, btype:booklet-topfold, binding:short, border:on"),
        ("eight_up", 8, "papersize:A3, border:on"),
    ];

    for (label, n, options) in layouts {
        let config = ImpositionConfig::booklet(n, options)?;
        let imposed = impose(std::slice::from_ref(&source_doc), &config).await?;

        let path = format!("fold_test_{label}.pdf");
        save_pdf(imposed, &path).await?;
        println!("Created {path} ({n}-up, {:?})", config.fold_plan());

        for side in compute_page_order(16, &config).chunks(n) {
            let cells: Vec<String> = side
                .iter()
                .map(|a| match (a.source_page, a.rotation) {
                    (Some(page), Rotation::None) => page.to_string(),
                    (Some(page), rotation) => format!("{page}@{}", rotation.degrees()),
                    (None, _) => "-".to_string(),
                })
                .collect();
            println!(
                "  sheet {} {:?}: {}",
                side[0].sheet_index + 1,
                side[0].side,
                cells.join(" ")
            );
        }
    }

    Ok(())
}
