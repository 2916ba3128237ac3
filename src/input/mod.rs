pub mod annotation;
pub mod counts;
pub mod na;
pub mod tables;
pub mod toc;

use std::path::{Path, PathBuf};
use std::{fmt, io};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("missing required file: {0}")]
    MissingFile(String),
    #[error("invalid TSV row in {path} at line {line}: {reason}")]
    InvalidTsvRow {
        path: String,
        line: usize,
        reason: String,
    },
    #[error("duplicate sample {0} in table of contents")]
    DuplicateSample(String),
    #[error("duplicate project {project} in {path}")]
    DuplicateProject { path: String, project: String },
    #[error("table {path} has no rows")]
    EmptyTable { path: String },
    #[error("unsupported gzip input without feature enabled: {0}")]
    GzipNotEnabled(PathBuf),
    #[error("tsv error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub fn open_reader(path: &Path) -> Result<Box<dyn io::BufRead>, InputError> {
    if !path.is_file() {
        return Err(InputError::MissingFile(path_display(path).to_string()));
    }
    let file = std::fs::File::open(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        #[cfg(feature = "gz")]
        {
            let decoder = flate2::read::GzDecoder::new(file);
            return Ok(Box::new(io::BufReader::new(decoder)));
        }
        #[cfg(not(feature = "gz"))]
        {
            return Err(InputError::GzipNotEnabled(path.to_path_buf()));
        }
    }
    Ok(Box::new(io::BufReader::new(file)))
}

/// Tab-separated reader with a header row, as used for every metadata table.
pub fn open_tsv(path: &Path) -> Result<csv::Reader<Box<dyn io::BufRead>>, InputError> {
    let reader = open_reader(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader))
}

pub fn csv_error(path: &Path, source: csv::Error) -> InputError {
    InputError::Csv {
        path: path_display(path).to_string(),
        source,
    }
}

pub fn path_display(path: &Path) -> impl fmt::Display + '_ {
    path.to_string_lossy()
}
