use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::edit::{self, HighlightRect, Placement};
use crate::error::Result;
use crate::page_range::PageRange;
use crate::pdf_engine::{OpenedDocument, RenderedPage};
use crate::search::PageMatches;

pub type Reply<T> = oneshot::Sender<Result<T>>;

/// Requests handled by the engine thread, one at a time.
#[derive(Debug)]
pub enum PdfCommand {
    Open(PathBuf, Reply<OpenedDocument>),
    Render {
        page_index: usize,
        zoom: f32,
        reply: Reply<RenderedPage>,
    },
    ExtractText(usize, Reply<String>),
    Search(String, Reply<Option<PageMatches>>),
    Edit(EditJob, Reply<EditOutcome>),
    Close,
}

/// A file-to-file edit. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum EditJob {
    Merge {
        inputs: Vec<PathBuf>,
        output: PathBuf,
    },
    Split {
        input: PathBuf,
        ranges: Vec<PageRange>,
        outputs: Vec<PathBuf>,
    },
    Rotate {
        input: PathBuf,
        page_number: u32,
        output: PathBuf,
    },
    Encrypt {
        input: PathBuf,
        password: String,
        output: PathBuf,
    },
    Decrypt {
        input: PathBuf,
        password: String,
        output: PathBuf,
    },
    Highlight {
        input: PathBuf,
        page_number: u32,
        rects: Vec<HighlightRect>,
        note: String,
        output: PathBuf,
    },
    StampText {
        input: PathBuf,
        at: Placement,
        text: String,
        output: PathBuf,
    },
    StampImage {
        input: PathBuf,
        at: Placement,
        image: PathBuf,
        output: PathBuf,
    },
}

/// What an edit wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub outputs: Vec<PathBuf>,
    /// Whether the first output should replace the active document.
    pub reload: bool,
}

impl EditJob {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Merge { .. } => "merge",
            Self::Split { .. } => "split",
            Self::Rotate { .. } => "rotate",
            Self::Encrypt { .. } => "encrypt",
            Self::Decrypt { .. } => "decrypt",
            Self::Highlight { .. } => "highlight",
            Self::StampText { .. } => "annotate",
            Self::StampImage { .. } => "insert image",
        }
    }

    /// Rotations, highlights and stamps replace the document on screen;
    /// merge, split and the security copies only report where they wrote.
    pub const fn reloads(&self) -> bool {
        matches!(
            self,
            Self::Rotate { .. } | Self::Highlight { .. } | Self::StampText { .. } | Self::StampImage { .. }
        )
    }

    pub fn run(self) -> Result<EditOutcome> {
        let reload = self.reloads();
        let outputs = match self {
            Self::Merge { inputs, output } => {
                edit::merge_files(&inputs, &output)?;
                vec![output]
            }
            Self::Split {
                input,
                ranges,
                outputs,
            } => {
                edit::split_file(&input, &ranges, &outputs)?;
                outputs
            }
            Self::Rotate {
                input,
                page_number,
                output,
            } => {
                edit::rotate_page_file(&input, page_number, &output)?;
                vec![output]
            }
            Self::Encrypt {
                input,
                password,
                output,
            } => {
                edit::encrypt_file(&input, &password, &output)?;
                vec![output]
            }
            Self::Decrypt {
                input,
                password,
                output,
            } => {
                edit::decrypt_file(&input, &password, &output)?;
                vec![output]
            }
            Self::Highlight {
                input,
                page_number,
                rects,
                note,
                output,
            } => {
                edit::highlight_page_file(&input, page_number, &rects, &note, &output)?;
                vec![output]
            }
            Self::StampText {
                input,
                at,
                text,
                output,
            } => {
                edit::stamp_text_file(&input, at, &text, &output)?;
                vec![output]
            }
            Self::StampImage {
                input,
                at,
                image,
                output,
            } => {
                edit::stamp_image_file(&input, at, &image, &output)?;
                vec![output]
            }
        };
        Ok(EditOutcome { outputs, reload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::fixtures;
    use crate::error::Error;

    #[test]
    fn rotate_job_asks_for_reload() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "in.pdf", fixtures::document(2, "R"));
        let output = dir.path().join("in_rotated.pdf");

        let outcome = EditJob::Rotate {
            input,
            page_number: 2,
            output: output.clone(),
        }
        .run()
        .unwrap();

        assert_eq!(outcome.outputs, [output.clone()]);
        assert!(outcome.reload);
        assert!(output.exists());
    }

    #[test]
    fn split_job_reports_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "in.pdf", fixtures::document(3, "S"));
        let outputs = edit::split_output_paths(&dir.path().join("in.pdf"), 2);

        let outcome = EditJob::Split {
            input,
            ranges: vec![PageRange::single(1).unwrap(), PageRange::new(2, 3).unwrap()],
            outputs: outputs.clone(),
        }
        .run()
        .unwrap();

        assert_eq!(outcome.outputs, outputs);
        assert!(!outcome.reload);
    }

    #[test]
    fn failed_job_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "in.pdf", fixtures::document(1, "T"));
        let job = EditJob::StampText {
            input,
            at: Placement {
                page_number: 9,
                x: 0.0,
                y: 0.0,
            },
            text: "late".into(),
            output: dir.path().join("out.pdf"),
        };
        assert_eq!(job.name(), "annotate");
        assert!(matches!(job.run(), Err(Error::PageOutOfRange { page: 9, .. })));
    }
}
