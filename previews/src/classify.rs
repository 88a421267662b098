//! Imaging / spectral classification of FITS inputs.
//!
//! Classification is a pure function of the header fields of header unit 1.
//! The rules live in an ordered decision table; the first rule that matches
//! wins and anything unmatched is `Unknown`.

use std::fmt;
use tracing::warn;

use crate::fits_header::{read_header_fields, ExtensionType, HeaderError, HeaderFields};
use crate::input::FitsInput;

/// Instrument codes whose image extensions are never rendered as images.
const NON_IMAGING_INSTRUMENTS: [char; 2] = ['l', 'o'];

/// Extension name of association tables, which are never spectra.
const ASSOCIATION_EXTNAME: &str = "ASN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Imaging,
    Spectral,
    Unknown,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Classification::Imaging => write!(f, "imaging"),
            Classification::Spectral => write!(f, "spectral"),
            Classification::Unknown => write!(f, "unknown"),
        }
    }
}

/// One row of the decision table.
pub struct Rule {
    pub name: &'static str,
    pub classification: Classification,
    pub matches: fn(&HeaderFields) -> bool,
}

fn is_spectral_table(fields: &HeaderFields) -> bool {
    fields.naxis == 2
        && fields.extension == ExtensionType::BinTable
        && fields.extname != ASSOCIATION_EXTNAME
}

fn is_imaging_extension(fields: &HeaderFields) -> bool {
    fields.naxis >= 2
        && fields.extension == ExtensionType::Image
        && !fields
            .instrument
            .is_some_and(|c| NON_IMAGING_INSTRUMENTS.contains(&c))
}

/// Ordered rules; evaluation stops at the first match.
pub const DECISION_TABLE: [Rule; 2] = [
    Rule {
        name: "2-D binary table that is not an association",
        classification: Classification::Spectral,
        matches: is_spectral_table,
    },
    Rule {
        name: "image extension from an imaging instrument",
        classification: Classification::Imaging,
        matches: is_imaging_extension,
    },
];

/// Classify header fields against the decision table.
pub fn classify(fields: &HeaderFields) -> Classification {
    DECISION_TABLE
        .iter()
        .find(|rule| (rule.matches)(fields))
        .map(|rule| rule.classification)
        .unwrap_or(Classification::Unknown)
}

/// Read and classify `input`.
///
/// A missing header unit or missing required key classifies as `Unknown` with
/// a warning; a file that cannot be opened as FITS is an error.
pub fn classify_input(input: &FitsInput) -> Result<Classification, HeaderError> {
    let fields = match read_header_fields(&input.path, &input.base_name) {
        Ok(fields) => fields,
        Err(e) if e.is_recoverable() => {
            warn!(input = %input.path.display(), "Unable to determine FITS file type: {e}");
            return Ok(Classification::Unknown);
        }
        Err(e) => return Err(e),
    };

    let classification = classify(&fields);
    if classification == Classification::Unknown {
        warn!(
            input = %input.path.display(),
            naxis = fields.naxis,
            xtension = %fields.extension,
            extname = %fields.extname,
            "Unable to determine FITS file type"
        );
    }
    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_helpers::{FitsFixture, LogCapture};
    use tracing::Level;

    fn fields(naxis: i64, ext: ExtensionType, extname: &str, instr: Option<char>) -> HeaderFields {
        HeaderFields::new(naxis, ext, extname, instr)
    }

    const INSTRUMENTS: [Option<char>; 8] = [
        Some('a'),
        Some('i'),
        Some('j'),
        Some('l'),
        Some('o'),
        Some('w'),
        Some('L'),
        None,
    ];

    #[test]
    fn test_bintable_is_spectral_for_every_instrument() {
        for instr in INSTRUMENTS {
            let f = fields(2, ExtensionType::BinTable, "SCI", instr);
            assert_eq!(classify(&f), Classification::Spectral, "instrument {instr:?}");
        }
    }

    #[test]
    fn test_image_is_imaging_unless_instrument_excluded() {
        for naxis in [2, 3, 4] {
            for instr in INSTRUMENTS {
                let f = fields(naxis, ExtensionType::Image, "SCI", instr);
                let expected = match instr.map(|c| c.to_ascii_lowercase()) {
                    Some('l') | Some('o') => Classification::Unknown,
                    _ => Classification::Imaging,
                };
                assert_eq!(classify(&f), expected, "naxis {naxis} instrument {instr:?}");
            }
        }
    }

    #[test]
    fn test_unmatched_combinations_are_unknown() {
        let cases = [
            fields(2, ExtensionType::BinTable, "ASN", Some('i')),
            fields(1, ExtensionType::BinTable, "SCI", Some('i')),
            fields(3, ExtensionType::BinTable, "SCI", Some('i')),
            fields(1, ExtensionType::Image, "SCI", Some('i')),
            fields(0, ExtensionType::Image, "SCI", Some('i')),
            fields(2, ExtensionType::Other("TABLE".into()), "SCI", Some('i')),
        ];
        for f in cases {
            assert_eq!(classify(&f), Classification::Unknown, "{f:?}");
        }
    }

    #[test]
    fn test_extname_is_trimmed_before_comparison() {
        let f = fields(2, ExtensionType::BinTable, "ASN  ", Some('o'));
        assert_eq!(classify(&f), Classification::Unknown);
    }

    #[test]
    fn test_decision_table_order() {
        assert_eq!(DECISION_TABLE[0].classification, Classification::Spectral);
        assert_eq!(DECISION_TABLE[1].classification, Classification::Imaging);
        assert!(DECISION_TABLE.iter().all(|rule| !rule.name.is_empty()));
    }

    #[test]
    fn test_classify_input_from_files() {
        let temp_dir = TempDir::new().unwrap();

        let image = temp_dir.path().join("ia01010_flt.fits");
        FitsFixture::image(2, "SCI", Some("WFC3")).write(&image).unwrap();
        assert_eq!(
            classify_input(&FitsInput::from_local(image)).unwrap(),
            Classification::Imaging
        );

        let spectrum = temp_dir.path().join("odfa01030_x1d.fits");
        FitsFixture::bintable("SCI", Some("STIS")).write(&spectrum).unwrap();
        assert_eq!(
            classify_input(&FitsInput::from_local(spectrum)).unwrap(),
            Classification::Spectral
        );

        // no INSTRUME: the 'o' of the file name excludes it from imaging
        let stis_image = temp_dir.path().join("odfa01030_flt.fits");
        FitsFixture::image(2, "SCI", None).write(&stis_image).unwrap();
        assert_eq!(
            classify_input(&FitsInput::from_local(stis_image)).unwrap(),
            Classification::Unknown
        );
    }

    #[test]
    fn test_unknown_is_logged_as_warning() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ia01010_asn.fits");
        FitsFixture::bintable("ASN", Some("WFC3")).write(&path).unwrap();

        let capture = LogCapture::new();
        let result = tracing::dispatcher::with_default(&capture.dispatch(), || {
            classify_input(&FitsInput::from_local(path.clone()))
        });

        assert_eq!(result.unwrap(), Classification::Unknown);
        assert!(capture.contains(
            Level::WARN,
            &["Unable to determine FITS file type", "ia01010_asn.fits"]
        ));
    }

    #[test]
    fn test_primary_only_file_is_unknown() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ia01010_raw.fits");
        FitsFixture::primary_only().write(&path).unwrap();

        let input = FitsInput::from_local(path);
        assert_eq!(classify_input(&input).unwrap(), Classification::Unknown);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let input = FitsInput::from_local(PathBuf::from("/nonexistent/ia01010_flt.fits"));
        assert!(classify_input(&input).is_err());
    }
}
