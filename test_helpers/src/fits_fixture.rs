//! FITS test inputs written through `fitsio`.
//!
//! A fixture is a primary header unit followed by an optional extension unit
//! whose header carries the keys preview classification looks at.

use fitsio::errors::{check_status, Result};
use fitsio::images::{ImageDescription, ImageType};
use fitsio::tables::{ColumnDataType, ColumnDescription};
use fitsio::FitsFile;
use std::ffi::CString;
use std::fs;
use std::path::Path;

/// Kind of the extension header unit (index 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    /// `XTENSION = 'IMAGE'` with the given number of axes, each of length 1
    Image { axes: usize },
    /// `XTENSION = 'BINTABLE'` with a single float column and no rows
    BinTable,
}

/// Header content of the extension unit.
#[derive(Debug, Clone)]
pub struct ExtensionSpec {
    pub kind: ExtensionKind,
    /// `EXTNAME` value, removed from the header when `None`
    pub extname: Option<String>,
    /// `INSTRUME` value, omitted from the header when `None`
    pub instrument: Option<String>,
}

/// A FITS file to be written for a test.
#[derive(Debug, Clone, Default)]
pub struct FitsFixture {
    pub extension: Option<ExtensionSpec>,
}

impl FitsFixture {
    /// File with only a primary header unit.
    pub fn primary_only() -> Self {
        Self { extension: None }
    }

    /// File whose extension is an image with `axes` dimensions.
    pub fn image(axes: usize, extname: &str, instrument: Option<&str>) -> Self {
        Self::with_extension(ExtensionKind::Image { axes }, Some(extname), instrument)
    }

    /// File whose extension is a binary table.
    pub fn bintable(extname: &str, instrument: Option<&str>) -> Self {
        Self::with_extension(ExtensionKind::BinTable, Some(extname), instrument)
    }

    pub fn with_extension(
        kind: ExtensionKind,
        extname: Option<&str>,
        instrument: Option<&str>,
    ) -> Self {
        Self {
            extension: Some(ExtensionSpec {
                kind,
                extname: extname.map(str::to_string),
                instrument: instrument.map(str::to_string),
            }),
        }
    }

    /// Write the fixture to `path`, replacing any existing file and creating
    /// parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut fptr = FitsFile::create(path).overwrite().open()?;

        let Some(ext) = &self.extension else {
            return Ok(());
        };

        // fitsio always names new extensions; a missing name is deleted below
        let extname = ext.extname.clone().unwrap_or_else(|| "UNNAMED".to_string());
        let hdu = match ext.kind {
            ExtensionKind::Image { axes } => {
                let dimensions = vec![1; axes];
                let description = ImageDescription {
                    data_type: ImageType::UnsignedByte,
                    dimensions: &dimensions,
                };
                fptr.create_image(extname, &description)?
            }
            ExtensionKind::BinTable => {
                let flux = ColumnDescription::new("FLUX")
                    .with_type(ColumnDataType::Float)
                    .create()?;
                fptr.create_table(extname, &[flux])?
            }
        };

        if let Some(instrument) = &ext.instrument {
            hdu.write_key(&mut fptr, "INSTRUME", instrument.as_str())?;
        }
        if ext.extname.is_none() {
            fptr.hdu(1)?;
            delete_key(&mut fptr, "EXTNAME")?;
        }
        Ok(())
    }
}

/// Delete `key` from the current header unit.
fn delete_key(fptr: &mut FitsFile, key: &str) -> Result<()> {
    let key = CString::new(key)?;
    let mut status = 0;
    unsafe {
        fitsio::sys::ffdkey(fptr.as_raw(), key.as_ptr(), &mut status);
    }
    check_status(status)
}
