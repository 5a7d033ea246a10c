//! Parallel random access
//!
//! Coordinator/worker fan-out over one archive file:
//!
//! ```text
//!   ids ──▶ index (read-only) ──▶ offsets ──▶ job channel
//!                                               │
//!                    ┌──────────────┬───────────┴──┐
//!                    ▼              ▼              ▼
//!                 worker 0      worker 1   ...  worker N
//!              (own File +    (own File +     (own File +
//!               own Reader)    own Reader)     own Reader)
//!                    │              │              │
//!                    └──────▶ result channel ◀─────┘
//! ```
//!
//! Workers share nothing but the channels. Results come back in input order.

use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::Path;

use crossbeam::channel;

use crate::config::Config;
use crate::error::{Result, WarcError};
use crate::index::ArchiveIndex;
use crate::reader::Reader;
use crate::record::Record;
use crate::Offset;

/// Decode the records at `offsets` using up to `workers` threads
///
/// The outer `Result` fails if the archive cannot be opened or a worker
/// panics; each inner `Result` is the outcome for the offset in the same
/// position.
pub fn fetch_records(
    path: impl AsRef<Path>,
    offsets: &[Offset],
    workers: usize,
    config: &Config,
) -> Result<Vec<Result<Record>>> {
    config.validate()?;
    let path = path.as_ref();

    if offsets.is_empty() {
        return Ok(Vec::new());
    }

    let workers = workers.clamp(1, offsets.len());

    // One read handle per worker, opened up front so open errors surface here
    let handles = (0..workers)
        .map(|_| File::open(path))
        .collect::<io::Result<Vec<_>>>()?;

    let (job_tx, job_rx) = channel::unbounded::<(usize, Offset)>();
    let (result_tx, result_rx) = channel::unbounded::<(usize, Result<Record>)>();

    for job in offsets.iter().copied().enumerate() {
        // job_rx is alive, so the channel cannot be disconnected
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    tracing::debug!(
        "Fetching {} records from {} with {} workers",
        offsets.len(),
        path.display(),
        workers
    );

    crossbeam::scope(|scope| {
        for (worker_id, file) in handles.into_iter().enumerate() {
            let jobs = job_rx.clone();
            let results = result_tx.clone();

            scope.spawn(move |_| {
                let mut reader = Reader::build(file, config);
                let mut decoded = 0usize;

                for (slot, offset) in jobs.iter() {
                    let outcome = reader.record_at(offset);
                    decoded += 1;
                    if results.send((slot, outcome)).is_err() {
                        break;
                    }
                }

                tracing::trace!("Worker {} decoded {} records", worker_id, decoded);
            });
        }
    })
    .map_err(|_| WarcError::Io(io::Error::new(ErrorKind::Other, "fetch worker panicked")))?;

    drop(result_tx);

    let mut slots: Vec<Option<Result<Record>>> = (0..offsets.len()).map(|_| None).collect();
    for (slot, outcome) in result_rx.iter() {
        slots[slot] = Some(outcome);
    }

    Ok(slots
        .into_iter()
        .zip(offsets)
        .map(|(outcome, &offset)| {
            outcome.unwrap_or(Err(WarcError::EndOfArchive { offset }))
        })
        .collect())
}

/// Resolve `ids` through `index`, then fetch them in parallel
///
/// Fails with `NoSuchEntry` before any decoding if an identifier is unknown.
pub fn fetch_by_id<S: AsRef<str>>(
    path: impl AsRef<Path>,
    index: &ArchiveIndex,
    ids: &[S],
    workers: usize,
    config: &Config,
) -> Result<Vec<Result<Record>>> {
    let offsets = ids
        .iter()
        .map(|id| index.lookup(id.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    fetch_records(path, &offsets, workers, config)
}
