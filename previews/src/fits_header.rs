//! Header field extraction for preview classification.
//!
//! Reads the header of header unit 1 (the first extension after the primary)
//! and pulls out the handful of keys the classifier needs. The file handle is
//! closed when `FitsFile` drops at the end of `read_header_fields`.

use fitsio::FitsFile;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Header unit inspected for classification.
pub const CLASSIFICATION_HDU: usize = 1;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Failed to open FITS file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: fitsio::errors::Error,
    },
    #[error("{path} has no header unit {index}")]
    MissingHdu { path: String, index: usize },
    #[error("{path} header unit {index} is missing required key {key}")]
    MissingKey {
        path: String,
        index: usize,
        key: &'static str,
    },
}

impl HeaderError {
    /// True for header-content problems that classify as Unknown rather than
    /// aborting the run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, HeaderError::Open { .. })
    }
}

/// Value of the `XTENSION` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionType {
    Image,
    BinTable,
    Other(String),
}

impl ExtensionType {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "IMAGE" => ExtensionType::Image,
            "BINTABLE" => ExtensionType::BinTable,
            other => ExtensionType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ExtensionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExtensionType::Image => write!(f, "IMAGE"),
            ExtensionType::BinTable => write!(f, "BINTABLE"),
            ExtensionType::Other(other) => write!(f, "{other}"),
        }
    }
}

/// The header fields that decide a file's classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields {
    /// `NAXIS`
    pub naxis: i64,
    /// `XTENSION`
    pub extension: ExtensionType,
    /// `EXTNAME`, trimmed
    pub extname: String,
    /// Lower-cased first character of `INSTRUME`, or of the file's base name
    /// when the key is missing or blank
    pub instrument: Option<char>,
}

impl HeaderFields {
    pub fn new(
        naxis: i64,
        extension: ExtensionType,
        extname: &str,
        instrument: Option<char>,
    ) -> Self {
        Self {
            naxis,
            extension,
            extname: extname.trim().to_string(),
            instrument: instrument.map(|c| c.to_ascii_lowercase()),
        }
    }
}

/// Lower-cased first character of `instrume`, falling back to `base_name`.
pub fn instrument_code(instrume: Option<&str>, base_name: &str) -> Option<char> {
    instrume
        .and_then(|value| value.trim().chars().next())
        .or_else(|| base_name.chars().next())
        .map(|c| c.to_ascii_lowercase())
}

/// Read the classification fields from header unit 1 of `path`.
///
/// `base_name` supplies the instrument code when `INSTRUME` is absent.
pub fn read_header_fields(path: &Path, base_name: &str) -> Result<HeaderFields, HeaderError> {
    let display = path.display().to_string();

    let mut fptr = FitsFile::open(path).map_err(|source| HeaderError::Open {
        path: display.clone(),
        source,
    })?;

    let hdu = fptr
        .hdu(CLASSIFICATION_HDU)
        .map_err(|_| HeaderError::MissingHdu {
            path: display.clone(),
            index: CLASSIFICATION_HDU,
        })?;

    let missing = |key: &'static str| HeaderError::MissingKey {
        path: display.clone(),
        index: CLASSIFICATION_HDU,
        key,
    };

    let naxis = hdu
        .read_key::<i64>(&mut fptr, "NAXIS")
        .map_err(|_| missing("NAXIS"))?;
    let xtension = hdu
        .read_key::<String>(&mut fptr, "XTENSION")
        .map_err(|_| missing("XTENSION"))?;
    let extname = hdu
        .read_key::<String>(&mut fptr, "EXTNAME")
        .map_err(|_| missing("EXTNAME"))?;
    let instrume = hdu.read_key::<String>(&mut fptr, "INSTRUME").ok();

    Ok(HeaderFields::new(
        naxis,
        ExtensionType::parse(&xtension),
        &extname,
        instrument_code(instrume.as_deref(), base_name),
    ))
}
