use std::path::Path;

use lopdf::{Document, ObjectId};

use super::page::rebuild_page_tree;
use crate::error::{Error, Result};

/// Concatenates the pages of `documents`, in order, into the first one.
///
/// Objects of every later document are renumbered past the current maximum
/// id, copied in, and their pages re-parented under the first document's page
/// tree. Catalogs and page tree nodes of the later documents end up
/// unreferenced and are pruned.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut documents = documents.into_iter();
    let mut merged = documents.next().ok_or(Error::NothingToMerge)?;
    let mut pages: Vec<ObjectId> = merged.get_pages().into_values().collect();

    for mut source in documents {
        source.renumber_objects_with(merged.max_id + 1);
        pages.extend(source.get_pages().into_values());
        merged.max_id = merged.max_id.max(source.max_id);
        merged.objects.extend(source.objects);
    }

    rebuild_page_tree(&mut merged, &pages)?;
    merged.prune_objects();
    merged.renumber_objects();
    Ok(merged)
}

/// Merges `inputs` in the given order and writes the result to `output`.
pub fn merge_files<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<usize> {
    let documents = inputs
        .iter()
        .map(|p| super::load(p.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let mut merged = merge_documents(documents)?;
    let count = super::page_count(&merged);
    super::save(&mut merged, output)?;
    tracing::info!(inputs = inputs.len(), pages = count, output = %output.display(), "merged documents");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::fixtures;

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(merge_documents(vec![]), Err(Error::NothingToMerge)));
    }

    #[test]
    fn pages_follow_input_order() {
        let merged = merge_documents(vec![
            fixtures::document(2, "A"),
            fixtures::document(3, "B"),
        ])
        .unwrap();
        assert_eq!(
            fixtures::texts(&merged),
            ["A-1", "A-2", "B-1", "B-2", "B-3"]
        );
    }

    #[test]
    fn merged_file_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let a = fixtures::write(dir.path(), "a.pdf", fixtures::document(1, "A"));
        let b = fixtures::write(dir.path(), "b.pdf", fixtures::document(2, "B"));
        let out = dir.path().join("merged.pdf");

        let count = merge_files(&[b, a], &out).unwrap();
        assert_eq!(count, 3);

        let doc = Document::load(&out).unwrap();
        assert_eq!(fixtures::texts(&doc), ["B-1", "B-2", "A-1"]);
    }

    #[test]
    fn merged_pages_keep_inherited_media_box() {
        let merged = merge_documents(vec![
            fixtures::document(1, "A"),
            fixtures::document(1, "B"),
        ])
        .unwrap();
        for (_, page) in merged.get_pages() {
            let dict = merged.get_dictionary(page).unwrap();
            assert!(dict.has(b"MediaBox"));
            assert!(dict.has(b"Resources"));
        }
    }
}
