use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use crate::commands::{EditJob, EditOutcome, PdfCommand, Reply};
use crate::error::{Error, Result};
use crate::pdf_engine::{OpenedDocument, PdfEngine, RenderedPage};
use crate::search::PageMatches;

/// Cheap, cloneable sender side of the engine thread.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<PdfCommand>,
}

pub fn spawn_engine_thread() -> EngineHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(32);

    if let Err(e) = std::thread::Builder::new()
        .name("pdf-engine".into())
        .spawn(move || run(cmd_rx))
    {
        // Every request will now fail with EngineGone.
        tracing::error!("failed to start engine thread: {e}");
    }

    EngineHandle { cmd_tx }
}

fn run(mut cmd_rx: mpsc::Receiver<PdfCommand>) {
    // PDFium is optional: lopdf edits keep working without it.
    let pdfium = match PdfEngine::init_pdfium() {
        Ok(pdfium) => Some(pdfium),
        Err(e) => {
            tracing::error!("{e}");
            None
        }
    };
    let mut engine = pdfium.as_ref().map(PdfEngine::new);

    while let Some(cmd) = cmd_rx.blocking_recv() {
        match cmd {
            PdfCommand::Open(path, reply) => {
                let _ = reply.send(with_engine(engine.as_mut(), |e| e.open_document(&path)));
            }
            PdfCommand::Render {
                page_index,
                zoom,
                reply,
            } => {
                let _ = reply.send(with_engine(engine.as_mut(), |e| e.render_page(page_index, zoom)));
            }
            PdfCommand::ExtractText(page_index, reply) => {
                let _ = reply.send(with_engine(engine.as_mut(), |e| e.extract_text(page_index)));
            }
            PdfCommand::Search(query, reply) => {
                let _ = reply.send(with_engine(engine.as_mut(), |e| e.search(&query)));
            }
            PdfCommand::Edit(job, reply) => {
                let name = job.name();
                let result = job.run();
                if let Err(e) = &result {
                    tracing::warn!(job = name, "edit failed: {e}");
                }
                let _ = reply.send(result);
            }
            PdfCommand::Close => {
                if let Some(engine) = engine.as_mut() {
                    engine.close_document();
                }
            }
        }
    }
    tracing::debug!("engine channel closed, shutting down");
}

fn with_engine<'e, 'p: 'e, T>(
    engine: Option<&'e mut PdfEngine<'p>>,
    f: impl FnOnce(&mut PdfEngine<'p>) -> Result<T>,
) -> Result<T> {
    match engine {
        Some(engine) => f(engine),
        None => Err(Error::Pdfium("PDFium library is not available".into())),
    }
}

impl EngineHandle {
    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> PdfCommand) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(reply))
            .await
            .map_err(|_| Error::EngineGone)?;
        rx.await.map_err(|_| Error::EngineGone)?
    }

    pub async fn open(&self, path: PathBuf) -> Result<OpenedDocument> {
        self.request(|reply| PdfCommand::Open(path, reply)).await
    }

    pub async fn render(&self, page_index: usize, zoom: f32) -> Result<RenderedPage> {
        self.request(|reply| PdfCommand::Render {
            page_index,
            zoom,
            reply,
        })
        .await
    }

    pub async fn extract_text(&self, page_index: usize) -> Result<String> {
        self.request(|reply| PdfCommand::ExtractText(page_index, reply))
            .await
    }

    pub async fn search(&self, query: String) -> Result<Option<PageMatches>> {
        self.request(|reply| PdfCommand::Search(query, reply)).await
    }

    pub async fn edit(&self, job: EditJob) -> Result<EditOutcome> {
        self.request(|reply| PdfCommand::Edit(job, reply)).await
    }

    /// Drops the open document handle. Fire and forget.
    pub fn close(&self) {
        let _ = self.cmd_tx.try_send(PdfCommand::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::fixtures;

    #[tokio::test]
    async fn edits_run_on_the_engine_thread() {
        let dir = tempfile::tempdir().unwrap();
        let a = fixtures::write(dir.path(), "a.pdf", fixtures::document(1, "A"));
        let b = fixtures::write(dir.path(), "b.pdf", fixtures::document(2, "B"));
        let output = dir.path().join("merged.pdf");

        let engine = spawn_engine_thread();
        let outcome = engine
            .edit(EditJob::Merge {
                inputs: vec![a, b],
                output: output.clone(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.outputs, [output.clone()]);
        let merged = lopdf::Document::load(&output).unwrap();
        assert_eq!(fixtures::texts(&merged), ["A-1", "B-1", "B-2"]);
    }

    #[tokio::test]
    async fn closed_channel_reports_engine_gone() {
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        drop(cmd_rx);
        let engine = EngineHandle { cmd_tx };
        assert!(matches!(engine.extract_text(0).await, Err(Error::EngineGone)));
    }
}
