//! CSV-file ticket store with an optional append-only archive file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::{core::ledger::RawTicketRow, ticket::TicketRecord};

use super::{PersistError, PersistResult, TicketStore};

/// Column order of both the active and the archive file.
pub const COLUMNS: [&str; 4] = ["number", "identifier", "name", "contact"];

/// CSV implementation of [`crate::persist::TicketStore`].
///
/// The active file is rewritten whole on every commit, through a temp file in
/// the same directory followed by an atomic rename, so a crash mid-write
/// leaves either the old or the new set on disk. The archive file is
/// append-only and written before the active file, so an accepted record can
/// never be missing from the archive.
pub struct CsvTicketStore {
    active: PathBuf,
    archive: Option<PathBuf>,
}

impl CsvTicketStore {
    /// Store without an archive. The file need not exist yet.
    pub fn open(active: impl Into<PathBuf>) -> Self {
        Self {
            active: active.into(),
            archive: None,
        }
    }

    /// Store with a companion archive file.
    pub fn with_archive(active: impl Into<PathBuf>, archive: impl Into<PathBuf>) -> Self {
        Self {
            active: active.into(),
            archive: Some(archive.into()),
        }
    }

    fn read_rows(path: &Path) -> PersistResult<Vec<RawTicketRow>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(_) => {
                warn!(path = %path.display(), "unreadable header row, treating file as empty");
                return Ok(Vec::new());
            }
        };

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let Some(number_col) = column("number") else {
            // Without a number column no row can be reconstructed.
            warn!(path = %path.display(), "no number column, treating file as empty");
            return Ok(Vec::new());
        };
        let identifier_col = column("identifier");
        let name_col = column("name");
        let contact_col = column("contact");

        let mut rows = Vec::new();
        let mut unreadable = 0usize;
        for record in reader.records() {
            let Ok(record) = record else {
                unreadable += 1;
                continue;
            };
            let field =
                |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("").to_string();
            rows.push(RawTicketRow {
                number: field(Some(number_col)),
                identifier: field(identifier_col),
                name: field(name_col),
                contact: field(contact_col),
            });
        }

        if unreadable > 0 {
            warn!(path = %path.display(), unreadable, "skipped unreadable rows");
        }
        Ok(rows)
    }

    fn rewrite_active(&self, records: &[&TicketRecord]) -> PersistResult<()> {
        let dir = self
            .active
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;

        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file_mut());
            writer.write_record(COLUMNS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        tmp.as_file().sync_all()?;
        tmp.persist(&self.active)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(())
    }

    fn append_archive(path: &Path, record: &TicketRecord) -> PersistResult<()> {
        let fresh = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if fresh {
            writer.write_record(COLUMNS)?;
        }
        writer.serialize(record)?;
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|err| PersistError::Message(format!("archive writer: {err}")))?;
        file.sync_all()?;
        Ok(())
    }
}

impl TicketStore for CsvTicketStore {
    fn load(&mut self) -> PersistResult<Vec<RawTicketRow>> {
        Self::read_rows(&self.active)
    }

    fn commit_issue(
        &mut self,
        existing: &[TicketRecord],
        issued: &TicketRecord,
    ) -> PersistResult<()> {
        if let Some(archive) = &self.archive {
            Self::append_archive(archive, issued)?;
        }

        let all: Vec<&TicketRecord> = existing.iter().chain(std::iter::once(issued)).collect();
        self.rewrite_active(&all)
    }

    fn commit_reset(&mut self) -> PersistResult<()> {
        self.rewrite_active(&[])
    }

    fn load_archive(&mut self) -> PersistResult<Vec<RawTicketRow>> {
        match &self.archive {
            Some(path) => Self::read_rows(path),
            None => Ok(Vec::new()),
        }
    }
}
