//! Streaming CSV tables.

use csv_async::{AsyncWriter, AsyncWriterBuilder};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

use crate::FormatError;

/// Writes a CSV table row by row to a file.
///
/// The header is written once, on the first call to
/// [`write_header`](Self::write_header); later calls are ignored so that
/// pages of a paginated download can all pass their columns.
pub struct TableWriter {
    writer: AsyncWriter<File>,
    path: PathBuf,
    headers: Option<Vec<String>>,
    rows: u64,
}

impl std::fmt::Debug for TableWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableWriter")
            .field("path", &self.path)
            .field("headers", &self.headers)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

impl TableWriter {
    /// Creates (or truncates) the file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let file = File::create(path).await?;
        let writer = AsyncWriterBuilder::new().has_headers(false).create_writer(file);
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            headers: None,
            rows: 0,
        })
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header row, once written.
    #[must_use]
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Number of data rows written.
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.rows
    }

    /// Writes the header row unless one was already written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub async fn write_header(&mut self, headers: &[String]) -> Result<(), FormatError> {
        if self.headers.is_some() {
            return Ok(());
        }
        self.writer.write_record(headers).await?;
        self.headers = Some(headers.to_vec());
        Ok(())
    }

    /// Writes one data row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub async fn write_row<I, T>(&mut self, row: I) -> Result<(), FormatError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(row).await?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes buffered rows to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub async fn flush(&mut self) -> Result<(), FormatError> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Flushes and closes the file, returning the number of data rows.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub async fn finish(mut self) -> Result<u64, FormatError> {
        self.flush().await?;
        Ok(self.rows)
    }
}

/// Writes a complete table to `path`, replacing any previous content.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn write_table<R, T>(
    path: impl AsRef<Path>,
    headers: &[String],
    rows: impl IntoIterator<Item = R>,
) -> Result<u64, FormatError>
where
    R: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut table = TableWriter::create(path).await?;
    table.write_header(headers).await?;
    for row in rows {
        table.write_row(row).await?;
    }
    table.finish().await
}
