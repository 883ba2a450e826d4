//! Fixed-size text boxes and images placed onto a page.

use std::path::Path;

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use super::page::{add_resource, append_content, media_box};
use crate::error::Result;

/// Width and height of a text box, in points.
pub const TEXT_BOX: (f32, f32) = (200.0, 50.0);
/// Box an inserted image is fitted into, in points.
pub const IMAGE_BOX: (f32, f32) = (200.0, 200.0);

const FONT_SIZE: f32 = 11.0;
const LEADING: f32 = 13.0;
const PADDING: f32 = 2.0;
/// Helvetica averages about half an em per glyph.
const AVG_GLYPH_WIDTH: f32 = 0.5 * FONT_SIZE;

/// Where to put a box: 1-based page, top-left corner in points measured from
/// the top-left of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page_number: u32,
    pub x: f32,
    pub y: f32,
}

/// Writes `text` into a [`TEXT_BOX`] at `at`. Words wrap at the box width;
/// lines that do not fit the box height are dropped. Returns the lines drawn.
pub fn stamp_text(doc: &mut Document, at: Placement, text: &str) -> Result<Vec<String>> {
    let page_id = super::page_id(doc, at.page_number)?;
    let page = media_box(doc, page_id)?;

    let columns = ((TEXT_BOX.0 - 2.0 * PADDING) / AVG_GLYPH_WIDTH).floor() as usize;
    let rows = ((TEXT_BOX.1 - 2.0 * PADDING) / LEADING).floor() as usize;
    let mut lines = wrap(text, columns);
    lines.truncate(rows);

    let font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let font_name = format!("PdDeskF{}", font.0);
    add_resource(doc, page_id, b"Font", &font_name, font)?;

    let left = page.left + at.x + PADDING;
    let baseline = page.top - at.y - PADDING - FONT_SIZE;
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font_name.into_bytes()), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![left.into(), baseline.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(line), StringFormat::Literal)],
        ));
    }
    operations.push(Operation::new("ET", vec![]));

    append_content(doc, page_id, Content { operations }.encode()?)?;
    Ok(lines)
}

/// Draws `image` scaled to fit [`IMAGE_BOX`], keeping its aspect ratio.
pub fn stamp_image(doc: &mut Document, at: Placement, image: &RgbImage) -> Result<()> {
    let page_id = super::page_id(doc, at.page_number)?;
    let page = media_box(doc, page_id)?;

    let (width, height) = image.dimensions();
    let scale = (IMAGE_BOX.0 / width as f32).min(IMAGE_BOX.1 / height as f32);
    let (draw_w, draw_h) = (width as f32 * scale, height as f32 * scale);

    let xobject = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        image.as_raw().clone(),
    ));
    let name = format!("PdDeskIm{}", xobject.0);
    add_resource(doc, page_id, b"XObject", &name, xobject)?;

    let x = page.left + at.x;
    let y = page.top - at.y - draw_h;
    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                draw_w.into(),
                0.into(),
                0.into(),
                draw_h.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.into_bytes())]),
        Operation::new("Q", vec![]),
    ];
    append_content(doc, page_id, Content { operations }.encode()?)
}

pub fn stamp_text_file(input: &Path, at: Placement, text: &str, output: &Path) -> Result<()> {
    let mut doc = super::load(input)?;
    let lines = stamp_text(&mut doc, at, text)?;
    super::save(&mut doc, output)?;
    tracing::info!(page = at.page_number, lines = lines.len(), output = %output.display(), "added text box");
    Ok(())
}

pub fn stamp_image_file(input: &Path, at: Placement, image_path: &Path, output: &Path) -> Result<()> {
    let mut doc = super::load(input)?;
    // Check the page before paying for the decode.
    super::page_id(&doc, at.page_number)?;
    let image = image::open(image_path)?.to_rgb8();
    stamp_image(&mut doc, at, &image)?;
    super::save(&mut doc, output)?;
    tracing::info!(page = at.page_number, image = %image_path.display(), output = %output.display(), "inserted image");
    Ok(())
}

/// Greedy word wrap at `columns` characters; over-long words are cut.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > columns {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(columns);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if line.is_empty() { word.len() } else { line.chars().count() + 1 + word.len() };
            if needed > columns {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }
    lines
}

/// Helvetica with WinAnsiEncoding covers Latin-1; anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7e | 0xa0..=0xff) => code as u8,
            _ => b'?',
        })
        .collect()
}
