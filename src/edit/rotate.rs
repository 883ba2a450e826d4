use std::path::Path;

use lopdf::Document;

use super::page::{inherited, resolve};
use crate::error::Result;

/// Turns the 1-based page a quarter clockwise on top of any rotation it
/// already has (own or inherited). Returns the new angle.
pub fn rotate_page(doc: &mut Document, page_number: u32) -> Result<i64> {
    let page_id = super::page_id(doc, page_number)?;
    let current = inherited(doc, page_id, b"Rotate")
        .and_then(|raw| resolve(doc, &raw).as_i64().ok())
        .unwrap_or(0);
    let angle = (current + 90).rem_euclid(360);
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Rotate", angle);
    Ok(angle)
}

pub fn rotate_page_file(input: &Path, page_number: u32, output: &Path) -> Result<()> {
    let mut doc = super::load(input)?;
    let angle = rotate_page(&mut doc, page_number)?;
    super::save(&mut doc, output)?;
    tracing::info!(page = page_number, angle, output = %output.display(), "rotated page");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::fixtures;

    fn rotation(doc: &Document, page_number: u32) -> Option<i64> {
        let page = doc.get_pages()[&page_number];
        doc.get_dictionary(page)
            .unwrap()
            .get(b"Rotate")
            .ok()
            .and_then(|r| r.as_i64().ok())
    }

    #[test]
    fn only_the_target_page_turns() {
        let mut doc = fixtures::document(3, "R");
        assert_eq!(rotate_page(&mut doc, 2).unwrap(), 90);
        assert_eq!(rotation(&doc, 1), None);
        assert_eq!(rotation(&doc, 2), Some(90));
        assert_eq!(rotation(&doc, 3), None);
    }

    #[test]
    fn four_turns_come_back_to_zero() {
        let mut doc = fixtures::document(1, "R");
        let angles: Vec<i64> = (0..4).map(|_| rotate_page(&mut doc, 1).unwrap()).collect();
        assert_eq!(angles, [90, 180, 270, 0]);
    }

    #[test]
    fn rotation_is_written_to_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "in.pdf", fixtures::document(2, "R"));
        let output = dir.path().join("out.pdf");
        rotate_page_file(&input, 1, &output).unwrap();
        let doc = Document::load(&output).unwrap();
        assert_eq!(rotation(&doc, 1), Some(90));
        assert_eq!(fixtures::texts(&doc), ["R-1", "R-2"]);
    }
}
