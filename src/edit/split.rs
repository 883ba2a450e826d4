use std::path::{Path, PathBuf};

use lopdf::{Document, ObjectId};

use super::page::rebuild_page_tree;
use crate::error::{Error, Result};
use crate::page_range::PageRange;

/// Builds a copy of `doc` that keeps only the pages in `range`, in their
/// original order.
pub fn split_document(doc: &Document, range: PageRange) -> Result<Document> {
    let pages = doc.get_pages();
    let total = pages.len();
    let keep: Vec<ObjectId> = range
        .pages()
        .map(|n| {
            pages.get(&n).copied().ok_or(Error::PageOutOfRange {
                page: n as usize,
                total,
            })
        })
        .collect::<Result<_>>()?;

    let mut part = doc.clone();
    rebuild_page_tree(&mut part, &keep)?;
    part.prune_objects();
    part.renumber_objects();
    Ok(part)
}

/// `<dir>/<stem>_part<k>.pdf` for each of `count` ranges.
pub fn split_output_paths(base: &Path, count: usize) -> Vec<PathBuf> {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "split".to_string());
    (1..=count)
        .map(|k| base.with_file_name(format!("{stem}_part{k}.pdf")))
        .collect()
}

/// Writes one file per range. Ranges and outputs are paired by position.
pub fn split_file(input: &Path, ranges: &[PageRange], outputs: &[PathBuf]) -> Result<()> {
    if ranges.len() != outputs.len() {
        return Err(Error::InvalidRange(format!(
            "{} ranges but {} output files",
            ranges.len(),
            outputs.len()
        )));
    }
    let doc = super::load(input)?;
    // Validate every range before writing anything.
    let mut parts = ranges
        .iter()
        .map(|&range| split_document(&doc, range))
        .collect::<Result<Vec<_>>>()?;
    for (part, output) in parts.iter_mut().zip(outputs) {
        super::save(part, output)?;
    }
    tracing::info!(input = %input.display(), parts = parts.len(), "split document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::fixtures;
    use crate::page_range::parse_ranges;

    #[test]
    fn ranges_produce_matching_parts() {
        let doc = fixtures::document(3, "S");
        let first = split_document(&doc, PageRange::new(1, 2).unwrap()).unwrap();
        let second = split_document(&doc, PageRange::single(3).unwrap()).unwrap();
        assert_eq!(fixtures::texts(&first), ["S-1", "S-2"]);
        assert_eq!(fixtures::texts(&second), ["S-3"]);
    }

    #[test]
    fn range_past_the_end_fails() {
        let doc = fixtures::document(2, "S");
        assert!(matches!(
            split_document(&doc, PageRange::new(2, 3).unwrap()),
            Err(Error::PageOutOfRange { page: 3, total: 2 })
        ));
    }

    #[test]
    fn split_file_writes_every_part() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "book.pdf", fixtures::document(3, "S"));
        let ranges = parse_ranges("1-2,3").unwrap();
        let outputs = split_output_paths(&dir.path().join("book.pdf"), ranges.len());
        assert_eq!(outputs[1].file_name().unwrap(), "book_part2.pdf");

        split_file(&input, &ranges, &outputs).unwrap();

        let counts: Vec<usize> = outputs
            .iter()
            .map(|p| Document::load(p).unwrap().get_pages().len())
            .collect();
        assert_eq!(counts, [2, 1]);
    }

    #[test]
    fn invalid_range_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "book.pdf", fixtures::document(2, "S"));
        let ranges = parse_ranges("1,5").unwrap();
        let outputs = split_output_paths(&input, 2);
        assert!(split_file(&input, &ranges, &outputs).is_err());
        assert!(outputs.iter().all(|p| !p.exists()));
    }
}
