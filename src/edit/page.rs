//! Page-level helpers shared by the edit operations.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Looks `key` up on the page, then on each `Parent` in turn.
pub(crate) fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    // Bounded so a cyclic Parent chain cannot hang us.
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return Some(value.clone());
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Resolves one level of indirection.
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Copies inherited attributes onto the page itself so it survives being
/// moved under a different page tree node.
pub(crate) fn flatten_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let values: Vec<(&[u8], Object)> = INHERITABLE
        .iter()
        .filter_map(|key| inherited(doc, page_id, key).map(|value| (*key, value)))
        .collect();
    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    for (key, value) in values {
        if !page.has(key) {
            page.set(key, value);
        }
    }
    Ok(())
}

/// Object id of the root `Pages` node.
pub(crate) fn pages_root(doc: &Document) -> Result<ObjectId> {
    let catalog = doc.catalog()?;
    Ok(catalog.get(b"Pages")?.as_reference()?)
}

/// Makes `pages` the complete, flat, ordered page list of `doc`.
pub(crate) fn rebuild_page_tree(doc: &mut Document, pages: &[ObjectId]) -> Result<()> {
    let root = pages_root(doc)?;
    for &page in pages {
        flatten_inherited(doc, page)?;
    }
    for &page in pages {
        doc.get_object_mut(page)?
            .as_dict_mut()?
            .set("Parent", Object::Reference(root));
    }
    let tree = doc.get_object_mut(root)?.as_dict_mut()?;
    tree.set(
        "Kids",
        pages.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
    );
    tree.set("Count", pages.len() as i64);
    Ok(())
}

/// Page geometry in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MediaBox {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Result<MediaBox> {
    let raw = inherited(doc, page_id, b"MediaBox")
        .ok_or_else(|| Error::Malformed("page has no MediaBox".into()))?;
    let values: Vec<f32> = resolve(doc, &raw)
        .as_array()?
        .iter()
        .map(|v| resolve(doc, v).as_float())
        .collect::<std::result::Result<_, _>>()?;
    match values[..] {
        [x0, y0, x1, y1] => Ok(MediaBox {
            left: x0.min(x1),
            bottom: y0.min(y1),
            right: x0.max(x1),
            top: y0.max(y1),
        }),
        _ => Err(Error::Malformed("MediaBox must have four numbers".into())),
    }
}

/// Registers `target` as `/<category>/<name>` in the page's own resources,
/// copying inherited or shared resources first.
pub(crate) fn add_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &[u8],
    name: &str,
    target: ObjectId,
) -> Result<()> {
    let mut resources = match inherited(doc, page_id, b"Resources") {
        Some(raw) => resolve(doc, &raw).as_dict().cloned().unwrap_or_default(),
        None => Dictionary::new(),
    };
    let mut entries = match resources.get(category) {
        Ok(raw) => resolve(doc, raw).as_dict().cloned().unwrap_or_default(),
        Err(_) => Dictionary::new(),
    };
    entries.set(name, Object::Reference(target));
    resources.set(category, Object::Dictionary(entries));
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Appends `content` to the page, isolating the existing content in a
/// `q`/`Q` pair so its graphics state cannot leak into ours.
pub(crate) fn append_content(doc: &mut Document, page_id: ObjectId, content: Vec<u8>) -> Result<()> {
    let existing: Vec<Object> = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(other) => vec![other.clone()],
        Err(_) => Vec::new(),
    };

    let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let mut tail = b"\nQ\n".to_vec();
    tail.extend(content);
    let close = doc.add_object(Stream::new(Dictionary::new(), tail));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open));
    contents.extend(existing);
    contents.push(Object::Reference(close));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", contents);
    Ok(())
}

/// Adds an annotation reference to the page's `/Annots` array.
pub(crate) fn push_annotation(doc: &mut Document, page_id: ObjectId, annot_id: ObjectId) -> Result<()> {
    let annots = doc.get_dictionary(page_id)?.get(b"Annots").ok().cloned();
    match annots {
        Some(Object::Reference(array_id)) => {
            if let Object::Array(items) = doc.get_object_mut(array_id)? {
                items.push(Object::Reference(annot_id));
                return Ok(());
            }
            Err(Error::Malformed("/Annots does not point to an array".into()))
        }
        Some(Object::Array(mut items)) => {
            items.push(Object::Reference(annot_id));
            doc.get_object_mut(page_id)?.as_dict_mut()?.set("Annots", items);
            Ok(())
        }
        _ => {
            doc.get_object_mut(page_id)?
                .as_dict_mut()?
                .set("Annots", vec![Object::Reference(annot_id)]);
            Ok(())
        }
    }
}
