//! End-to-end document edits through the public API, no PDFium needed.

use std::path::{Path, PathBuf};

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use pdfdesk::Error;
use pdfdesk::commands::EditJob;
use pdfdesk::edit;
use pdfdesk::page_range::parse_ranges_for;

fn sample(pages: u32, label: &str) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let body = format!("BT /F1 12 Tf 72 720 Td ({label} page {n}) Tj ET");
            let content = doc.add_object(Stream::new(Dictionary::new(), body.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
                "Contents" => content,
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => i64::from(pages),
        }),
    );
    let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog);
    doc
}

fn write(dir: &Path, name: &str, pages: u32, label: &str) -> PathBuf {
    let path = dir.join(name);
    sample(pages, label).save(&path).unwrap();
    path
}

fn first_text(doc: &Document, page_number: u32) -> String {
    let page = doc.get_pages()[&page_number];
    let content = Content::decode(&doc.get_page_content(page).unwrap()).unwrap();
    content
        .operations
        .iter()
        .find(|op| op.operator == "Tj")
        .and_then(|op| op.operands.first())
        .and_then(|o| o.as_str().ok())
        .map(|b| String::from_utf8_lossy(b).to_string())
        .unwrap_or_default()
}

fn rotation(doc: &Document, page_number: u32) -> i64 {
    let page = doc.get_pages()[&page_number];
    doc.get_dictionary(page)
        .unwrap()
        .get(b"Rotate")
        .and_then(Object::as_i64)
        .unwrap_or(0)
}

#[test]
fn merge_split_rotate_encrypt_decrypt() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.pdf", 2, "alpha");
    let b = write(dir.path(), "b.pdf", 3, "beta");

    let merged = dir.path().join("merged.pdf");
    assert_eq!(edit::merge_files(&[&a, &b], &merged).unwrap(), 5);
    let doc = edit::load(&merged).unwrap();
    assert_eq!(edit::page_count(&doc), 5);
    assert_eq!(first_text(&doc, 2), "alpha page 2");
    assert_eq!(first_text(&doc, 3), "beta page 1");

    let ranges = parse_ranges_for("1-2, 4-5", 5).unwrap();
    let outputs = edit::split_output_paths(&merged, ranges.len());
    edit::split_file(&merged, &ranges, &outputs).unwrap();
    let second = edit::load(&outputs[1]).unwrap();
    assert_eq!(edit::page_count(&second), 2);
    assert_eq!(first_text(&second, 1), "beta page 2");
    assert!(outputs[1].ends_with("merged_part2.pdf"));

    let rotated = edit::derived_path(&outputs[1], "rotated");
    edit::rotate_page_file(&outputs[1], 2, &rotated).unwrap();
    let doc = edit::load(&rotated).unwrap();
    assert_eq!(rotation(&doc, 1), 0);
    assert_eq!(rotation(&doc, 2), 90);

    let locked = edit::derived_path(&rotated, "encrypted");
    edit::encrypt_file(&rotated, "s3cret", &locked).unwrap();
    assert!(Document::load(&locked).unwrap().is_encrypted());

    let refused = dir.path().join("refused.pdf");
    assert!(matches!(
        edit::decrypt_file(&locked, "guess", &refused),
        Err(Error::WrongPassword)
    ));
    assert!(!refused.exists());

    let unlocked = edit::derived_path(&locked, "decrypted");
    edit::decrypt_file(&locked, "s3cret", &unlocked).unwrap();
    let doc = edit::load(&unlocked).unwrap();
    assert!(!doc.is_encrypted());
    assert_eq!(edit::page_count(&doc), 2);
    assert_eq!(rotation(&doc, 2), 90);
}

#[test]
fn split_rejects_ranges_past_the_end() {
    assert!(matches!(
        parse_ranges_for("1-3,7", 5),
        Err(Error::PageOutOfRange { page: 7, total: 5 })
    ));
}

#[test]
fn annotation_on_missing_page_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "doc.pdf", 2, "gamma");
    let output = dir.path().join("doc_annotated.pdf");
    let job = EditJob::StampText {
        input,
        at: edit::Placement {
            page_number: 3,
            x: 10.0,
            y: 10.0,
        },
        text: "late note".into(),
        output: output.clone(),
    };
    assert!(matches!(job.run(), Err(Error::PageOutOfRange { page: 3, total: 2 })));
    assert!(!output.exists());
}

#[test]
fn annotation_lands_on_requested_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "doc.pdf", 2, "delta");
    let output = dir.path().join("doc_annotated.pdf");
    let outcome = EditJob::StampText {
        input,
        at: edit::Placement {
            page_number: 2,
            x: 72.0,
            y: 72.0,
        },
        text: "checked".into(),
        output: output.clone(),
    }
    .run()
    .unwrap();
    assert!(outcome.reload);

    let doc = edit::load(&output).unwrap();
    let page = doc.get_pages()[&2];
    let content = Content::decode(&doc.get_page_content(page).unwrap()).unwrap();
    let shown: Vec<String> = content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first()?.as_str().ok())
        .map(|b| String::from_utf8_lossy(b).to_string())
        .collect();
    assert_eq!(shown, ["delta page 2", "checked"]);
}
