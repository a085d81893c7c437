//! Flat record store over one shared CSV file
//!
//! Every table lives in the same file; rows are distinguished by their tag
//! column. All lookups are linear scans, re-reading the file each time.
//! Update and delete rewrite the whole file through a temporary file in the
//! same directory, which is renamed over the original only after a complete
//! write. There is no locking; concurrent writers can corrupt the file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter, WriterBuilder};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::errors::{StorageError, StorageResult};
use super::record::{decode_row, Record, Row};
use crate::schema::{header_row, Table};

/// Handle to the shared record file.
///
/// Holds only the path; every operation opens the file afresh.
#[derive(Debug, Clone)]
pub struct FlatStore {
    path: PathBuf,
}

/// Counts reported by [`FlatStore::rewrite`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    /// Rows written back unchanged
    pub kept: usize,
    /// Rows written back with different contents
    pub changed: usize,
    /// Rows the transform dropped
    pub dropped: usize,
}

impl FlatStore {
    /// Opens the store, creating the file and its header if missing.
    ///
    /// Parent directories are created as needed. An existing file is never
    /// modified here.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Returns the path to the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header row if the file does not exist yet.
    fn initialize(&self) -> StorageResult<()> {
        if let Some(parent) = self.parent_dir() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::write_failed(
                        format!("Failed to create directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => {
                return Err(StorageError::unavailable(
                    format!("Failed to create record file: {}", self.path.display()),
                    e,
                ))
            }
        };

        let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
        writer
            .write_record(header_row())
            .map_err(|e| StorageError::write_failed("Failed to write header row", e))?;
        let file = writer
            .into_inner()
            .map_err(|e| StorageError::write_failed("Failed to flush header row", e.into_error()))?;
        file.sync_all()
            .map_err(|e| StorageError::write_failed("fsync failed after header row", e))?;

        info!(path = %self.path.display(), "initialized record file");
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn open_reader(&self) -> StorageResult<csv::Reader<File>> {
        let file = File::open(&self.path).map_err(|e| {
            StorageError::unavailable(
                format!("Failed to open record file: {}", self.path.display()),
                e,
            )
        })?;
        Ok(ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file))
    }

    /// Appends one record to the end of the file.
    ///
    /// Recreates the header first if the file has gone missing.
    pub fn append(&self, record: &Record) -> StorageResult<()> {
        self.initialize()?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                StorageError::unavailable(
                    format!("Failed to open record file: {}", self.path.display()),
                    e,
                )
            })?;

        let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
        writer.write_record(record.to_row()).map_err(|e| {
            StorageError::write_failed(format!("Failed to append {} row", record.table), e)
        })?;
        let file = writer.into_inner().map_err(|e| {
            StorageError::write_failed(
                format!("Failed to flush {} row", record.table),
                e.into_error(),
            )
        })?;
        file.sync_all().map_err(|e| {
            StorageError::write_failed(format!("fsync failed after {} row", record.table), e)
        })?;

        debug!(table = %record.table, key = record.key(), "appended row");
        Ok(())
    }

    /// Lazily yields rows of `table` accepted by `predicate`.
    ///
    /// Each call opens the file and starts a fresh linear pass. The first
    /// read or decode failure is yielded as an error and ends the scan.
    pub fn scan<P>(&self, table: Table, predicate: P) -> StorageResult<Scan<P>>
    where
        P: FnMut(&Record) -> bool,
    {
        let reader = self.open_reader()?;
        debug!(table = %table, "scan started");
        Ok(Scan {
            rows: reader.into_records(),
            table,
            predicate,
            finished: false,
        })
    }

    /// Every row of `table`, in file order.
    pub fn rows(&self, table: Table) -> StorageResult<Vec<Record>> {
        self.scan(table, |_| true)?.collect()
    }

    /// First row of `table` whose key field equals `key`.
    pub fn find_by_key(&self, table: Table, key: &str) -> StorageResult<Option<Record>> {
        self.scan(table, |r| r.key() == key)?.next().transpose()
    }

    /// Key values of every row in `target`, in insertion order.
    pub fn foreign_key_options(&self, target: Table) -> StorageResult<Vec<String>> {
        self.scan(target, |_| true)?
            .map(|r| r.map(|rec| rec.key().to_string()))
            .collect()
    }

    /// Rewrites the whole file through `transform`.
    ///
    /// `transform` returns `None` to drop a row. The header is always kept.
    /// Output goes to a temporary file next to the record file and is
    /// renamed into place only after every row has been written and synced;
    /// on any failure the original file is untouched.
    pub fn rewrite<F>(&self, mut transform: F) -> StorageResult<RewriteSummary>
    where
        F: FnMut(Record) -> Option<Record>,
    {
        let reader = self.open_reader()?;
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir).map_err(|e| {
            StorageError::write_failed(
                format!("Failed to create temporary file in {}", dir.display()),
                e,
            )
        })?;

        let mut writer = WriterBuilder::new().flexible(true).from_writer(tmp);
        writer
            .write_record(header_row())
            .map_err(|e| StorageError::write_failed("Failed to write header row", e))?;

        let mut summary = RewriteSummary::default();
        for result in reader.into_records() {
            let row = result.map_err(|e| StorageError::read_failed("Failed to read row", e))?;
            let line = row.position().map_or(0, |p| p.line());
            let record = match decode_row(&row, line)? {
                Row::Header => continue,
                Row::Data(record) => record,
            };

            let original = record.clone();
            match transform(record) {
                Some(out) => {
                    if out == original {
                        summary.kept += 1;
                    } else {
                        summary.changed += 1;
                    }
                    writer.write_record(out.to_row()).map_err(|e| {
                        StorageError::write_failed(format!("Failed to write {} row", out.table), e)
                    })?;
                }
                None => summary.dropped += 1,
            }
        }

        let mut tmp = writer.into_inner().map_err(|e| {
            StorageError::write_failed("Failed to flush rewritten rows", e.into_error())
        })?;
        tmp.flush()
            .map_err(|e| StorageError::write_failed("Failed to flush rewritten rows", e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StorageError::write_failed("fsync failed on rewritten file", e))?;
        tmp.persist(&self.path).map_err(|e| {
            StorageError::write_failed(
                format!("Failed to replace {}", self.path.display()),
                e.error,
            )
        })?;

        debug!(
            kept = summary.kept,
            changed = summary.changed,
            dropped = summary.dropped,
            "rewrote record file"
        );
        Ok(summary)
    }
}

/// Lazy row iterator returned by [`FlatStore::scan`]
pub struct Scan<P> {
    rows: StringRecordsIntoIter<File>,
    table: Table,
    predicate: P,
    finished: bool,
}

impl<P> Iterator for Scan<P>
where
    P: FnMut(&Record) -> bool,
{
    type Item = StorageResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(StorageError::read_failed("Failed to read row", e)));
                }
            };
            let line = row.position().map_or(0, |p| p.line());
            match decode_row(&row, line) {
                Ok(Row::Data(record)) => {
                    if record.table == self.table && (self.predicate)(&record) {
                        return Some(Ok(record));
                    }
                }
                Ok(Row::Header) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
