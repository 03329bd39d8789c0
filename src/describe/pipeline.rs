//! Bounded-concurrency description fan-out with a single CSV writer.
//!
//! At most `concurrency` requests are in flight at once. Finished rows go
//! through a channel to one blocking writer task, so rows never interleave.
//! A failed request still produces a row, with an `Error: ...` placeholder as
//! its description.

use super::{DescriptionGenerator, EntityBlock};
use crate::error::{KgdescError, Result};
use futures_util::future::join_all;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Outcome counts for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug)]
struct DescriptionRow {
    entity: String,
    description: String,
}

/// Describe every block and write `Entity,Description` rows to `sink`.
///
/// Rows are written in completion order. Returns once every block has a row.
///
/// # Errors
///
/// Only writer failures are returned; generation failures become rows.
pub async fn run_pipeline<G, W>(
    generator: Arc<G>,
    blocks: Vec<EntityBlock>,
    concurrency: usize,
    sink: W,
) -> Result<PipelineSummary>
where
    G: DescriptionGenerator + ?Sized + 'static,
    W: Write + Send + 'static,
{
    if concurrency == 0 {
        return Err(KgdescError::InvalidInput(
            "concurrency must be at least 1".to_string(),
        ));
    }

    let total = blocks.len();
    let (tx, rx) = mpsc::channel::<DescriptionRow>(concurrency * 2);
    let writer = tokio::task::spawn_blocking(move || write_rows(sink, rx, total));

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut entities = Vec::with_capacity(total);
    let mut handles = Vec::with_capacity(total);

    for block in blocks {
        entities.push(block.entity.clone());
        let semaphore = Arc::clone(&semaphore);
        let generator = Arc::clone(&generator);
        let tx = tx.clone();

        handles.push(tokio::spawn(async move {
            let prompt = block.prompt();
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => generator.generate(&prompt).await,
                Err(e) => Err(KgdescError::Generation(e.to_string())),
            };

            let (description, ok) = match outcome {
                Ok(text) => (text, true),
                Err(e) => {
                    log::warn!("Description failed for {}: {}", block.entity, e);
                    (format!("Error: {}", e), false)
                }
            };

            let row = DescriptionRow {
                entity: block.entity,
                description,
            };
            // The writer only hangs up after an I/O failure, which is reported below.
            let _ = tx.send(row).await;
            ok
        }));
    }

    let mut summary = PipelineSummary {
        total,
        ..PipelineSummary::default()
    };
    for (entity, joined) in entities.into_iter().zip(join_all(handles).await) {
        match joined {
            Ok(true) => summary.succeeded += 1,
            Ok(false) => summary.failed += 1,
            Err(e) => {
                log::error!("Description task for {} aborted: {}", entity, e);
                summary.failed += 1;
                let _ = tx
                    .send(DescriptionRow {
                        entity,
                        description: format!("Error: {}", e),
                    })
                    .await;
            }
        }
    }
    drop(tx);

    writer
        .await
        .map_err(|e| KgdescError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

    log::info!(
        "Descriptions complete: {} succeeded, {} failed",
        summary.succeeded,
        summary.failed
    );
    Ok(summary)
}

fn write_rows<W: Write>(
    sink: W,
    mut rx: mpsc::Receiver<DescriptionRow>,
    total: usize,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(["Entity", "Description"])?;

    let mut written = 0;
    while let Some(row) = rx.blocking_recv() {
        writer.write_record([row.entity.as_str(), row.description.as_str()])?;
        written += 1;
        if written % 100 == 0 {
            log::info!("Description progress: {}/{}", written, total);
        }
    }

    writer.flush()?;
    Ok(())
}
