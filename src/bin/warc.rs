//! warc command-line tool
//!
//! Dumps archives, builds identifier indexes, and fetches single records.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use warcstore::index::read_offsets;
use warcstore::record::RECORD_ID;
use warcstore::{ArchiveIndex, Reader, Result, WarcError};

/// warc
#[derive(Parser, Debug)]
#[command(name = "warc")]
#[command(about = "Read, index and query record-at-time gzip WARC archives")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the offset and headers of every record
    Dump {
        /// Archive path, or "-" for stdin
        archive: String,
    },

    /// Build (or extend) an identifier index for an archive
    Index {
        /// Archive path
        archive: PathBuf,

        /// Index file path
        index: PathBuf,

        /// Header field whose value identifies each record
        #[arg(long, default_value = RECORD_ID)]
        id_field: String,
    },

    /// Print one record looked up by identifier
    Get {
        /// Archive path
        archive: PathBuf,

        /// Index file path
        index: PathBuf,

        /// Record identifier
        id: String,
    },

    /// Print the offsets stored in an offset log
    Offsets {
        /// Offset log path
        log: PathBuf,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,warcstore=debug"));

    // Logs go to stderr; stdout carries record data
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let outcome = match args.command {
        Commands::Dump { archive } => dump(&archive),
        Commands::Index {
            archive,
            index,
            id_field,
        } => build_index(&archive, &index, &id_field),
        Commands::Get { archive, index, id } => get(&archive, &index, &id),
        Commands::Offsets { log } => offsets(&log),
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn dump(archive: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if archive == "-" {
        let mut reader = Reader::from_stream(io::stdin().lock());
        dump_records(&mut reader, &mut out)?;
    } else {
        let mut reader = Reader::new(File::open(archive)?);
        dump_records(&mut reader, &mut out)?;
    }

    out.flush()?;
    Ok(())
}

fn dump_records<R: io::Read, W: Write>(reader: &mut Reader<R>, out: &mut W) -> Result<()> {
    let mut count = 0u64;
    while let Some((offset, record)) = reader.next_with_offset()? {
        writeln!(out, "@{}", offset)?;
        for field in &record.fields {
            writeln!(out, "  {}: {}", field.name, field.value)?;
        }
        writeln!(out, "  [{} byte block]", record.block.len())?;
        count += 1;
    }

    tracing::info!("Dumped {} records", count);
    Ok(())
}

fn build_index(archive: &Path, index: &Path, id_field: &str) -> Result<()> {
    let mut reader = Reader::new(File::open(archive)?);
    let mut index = ArchiveIndex::open(index)?;

    let mut added = 0u64;
    while let Some((offset, record)) = reader.next_with_offset()? {
        let Some(id) = record.field(id_field) else {
            tracing::warn!("Record at offset {} has no {} field, skipping", offset, id_field);
            continue;
        };

        match index.put(id, offset) {
            Ok(()) => added += 1,
            Err(WarcError::AlreadyExists(id)) => {
                tracing::warn!("{} is already indexed, skipping record at offset {}", id, offset);
            }
            Err(WarcError::Unsupported(reason)) => {
                tracing::warn!("Cannot index record at offset {}: {}", offset, reason);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Indexed {} new records ({} total) into {}",
        added,
        index.len(),
        index.path().display()
    );
    index.close()
}

fn get(archive: &Path, index: &Path, id: &str) -> Result<()> {
    let offset = ArchiveIndex::open(index)?.lookup(id)?;

    let mut reader = Reader::new(File::open(archive)?);
    let record = reader.record_at(offset)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(&record.encode())?;
    out.flush()?;
    Ok(())
}

fn offsets(log: &Path) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for offset in read_offsets(File::open(log)?)? {
        writeln!(out, "{}", offset)?;
    }

    out.flush()?;
    Ok(())
}
