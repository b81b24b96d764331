use crate::error::TemplateSheetError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub(crate) enum SourceReaderError {
    #[error("No data from remote file: '{0}'")]
    RemoteFileNoDataError(String),
}

/// Byte source of a workbook: a local file or a buffer already held in memory.
pub(crate) enum SourceReader {
    /// Local file reader
    Local(BufReader<File>),
    /// In-memory buffer (remote blobs and caller supplied bytes)
    Memory(Cursor<Vec<u8>>),
}

impl SourceReader {
    /// Opens a workbook from a local path or a remote URL.
    ///
    /// Remote URLs (http, https, s3, gs, ...) are fetched in full through DuckDB's
    /// `read_blob`, which takes care of protocols and credentials.
    pub(crate) fn open(file_name: &str) -> Result<SourceReader, TemplateSheetError> {
        if Self::is_remote_url(file_name) {
            Self::read_blob_with_duckdb(file_name)
        } else {
            let file = File::open(file_name)?;
            Ok(SourceReader::Local(BufReader::new(file)))
        }
    }

    /// Wraps bytes that are already in memory.
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> SourceReader {
        SourceReader::Memory(Cursor::new(bytes))
    }

    /// Checks if a file name represents a remote URL
    pub(crate) fn is_remote_url(file_name: &str) -> bool {
        match Url::parse(file_name) {
            // Single letter schemes are Windows drive letters, e.g. `C:\invoice.xlsx`
            Ok(url) => url.scheme() != "file" && url.scheme().len() > 1,
            Err(_) => false,
        }
    }

    fn read_blob_with_duckdb(file_name: &str) -> Result<SourceReader, TemplateSheetError> {
        let connection = duckdb::Connection::open_in_memory()?;
        let result: Result<Vec<u8>, _> = connection.query_row("SELECT content FROM read_blob(?)", [file_name], |row| row.get(0));
        connection.close().map_err(|(_, e)| e)?;

        let bytes = result?;
        if bytes.is_empty() {
            Err(SourceReaderError::RemoteFileNoDataError(file_name.to_owned()))?;
        }
        Ok(Self::from_bytes(bytes))
    }
}

impl Read for SourceReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            SourceReader::Local(reader) => reader.read(buf),
            SourceReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for SourceReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            SourceReader::Local(reader) => reader.seek(pos),
            SourceReader::Memory(reader) => reader.seek(pos),
        }
    }
}
