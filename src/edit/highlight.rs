use std::path::Path;

use lopdf::{Document, Object, dictionary};

use super::page::push_annotation;
use crate::error::Result;

/// Rectangle in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightRect {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

/// Adds one yellow `/Highlight` annotation per rectangle on the 1-based page.
pub fn highlight_page(
    doc: &mut Document,
    page_number: u32,
    rects: &[HighlightRect],
    note: &str,
) -> Result<usize> {
    let page_id = super::page_id(doc, page_number)?;
    for rect in rects {
        let annot = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Highlight",
            "Rect" => vec![rect.left.into(), rect.bottom.into(), rect.right.into(), rect.top.into()],
            "QuadPoints" => vec![
                rect.left.into(), rect.top.into(),
                rect.right.into(), rect.top.into(),
                rect.left.into(), rect.bottom.into(),
                rect.right.into(), rect.bottom.into(),
            ],
            "C" => vec![1.into(), 1.into(), 0.into()],
            "CA" => 0.4_f32,
            "F" => 4,
            "P" => page_id,
            "Contents" => Object::string_literal(note),
        });
        push_annotation(doc, page_id, annot)?;
    }
    Ok(rects.len())
}

pub fn highlight_page_file(
    input: &Path,
    page_number: u32,
    rects: &[HighlightRect],
    note: &str,
    output: &Path,
) -> Result<()> {
    let mut doc = super::load(input)?;
    let count = highlight_page(&mut doc, page_number, rects, note)?;
    super::save(&mut doc, output)?;
    tracing::info!(page = page_number, count, output = %output.display(), "highlighted matches");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::fixtures;

    fn annotation_count(doc: &Document, page_number: u32) -> usize {
        let page = doc.get_pages()[&page_number];
        doc.get_dictionary(page)
            .unwrap()
            .get(b"Annots")
            .ok()
            .and_then(|a| a.as_array().ok())
            .map_or(0, Vec::len)
    }

    #[test]
    fn one_annotation_per_rect_on_target_page_only() {
        let mut doc = fixtures::document(2, "H");
        let rects = [
            HighlightRect { left: 50.0, bottom: 695.0, right: 90.0, top: 712.0 },
            HighlightRect { left: 50.0, bottom: 600.0, right: 90.0, top: 617.0 },
        ];
        assert_eq!(highlight_page(&mut doc, 2, &rects, "H").unwrap(), 2);
        assert_eq!(annotation_count(&doc, 1), 0);
        assert_eq!(annotation_count(&doc, 2), 2);

        let page = doc.get_pages()[&2];
        let annots = doc.get_dictionary(page).unwrap().get(b"Annots").unwrap();
        let first = annots.as_array().unwrap()[0].as_reference().unwrap();
        let annot = doc.get_dictionary(first).unwrap();
        assert_eq!(annot.get(b"Subtype").unwrap().as_name().unwrap(), b"Highlight");
        assert_eq!(annot.get(b"QuadPoints").unwrap().as_array().unwrap().len(), 8);
    }

    #[test]
    fn existing_annotations_are_kept() {
        let mut doc = fixtures::document(1, "H");
        let rect = [HighlightRect { left: 0.0, bottom: 0.0, right: 1.0, top: 1.0 }];
        highlight_page(&mut doc, 1, &rect, "a").unwrap();
        highlight_page(&mut doc, 1, &rect, "b").unwrap();
        assert_eq!(annotation_count(&doc, 1), 2);
    }
}
