//! Read [JCAMP-DX](http://www.jcamp-dx.org/) files, a line-oriented text
//! interchange format for spectral data.
//!
//! Only the subset needed to recover a mass spectrum is consumed: lines of
//! the form `##TAG=value` select the active block, and the numeric lines
//! beneath a recognized data tag are collected as interleaved
//! (mass, intensity) values.
//!
//! **Requires the `jcamp` feature, enabled by default**

use std::fs;
use std::io::{self, prelude::*};
use std::num::ParseFloatError;
use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use thiserror::Error;

use crate::spectrum::mass_spectrum::MassSpectrum;
use crate::spectrum::scan::SpectrumError;

/// The tag names whose data blocks hold interleaved (mass, intensity)
/// values.
///
/// This is the default allow-list; [`JcampReader::with_xydata_tags`]
/// substitutes a custom one.
pub const XYDATA_TAGS: [&str; 4] = ["XYDATA", "DATA TABLE", "XYPOINTS", "PEAK TABLE"];

#[derive(PartialEq, Eq, Debug, Default, Clone, Copy)]
pub enum JcampParserState {
    #[default]
    Scanning,
    TagActive,
    Done,
}

#[derive(Debug, Error)]
pub enum JcampError {
    #[error("encountered a malformed numeric token {0:?}")]
    InvalidNumber(String, #[source] ParseFloatError),
    #[error("data block holds {0} values, which do not form (mass, intensity) pairs")]
    UnpairedData(usize),
    #[error("encountered an IO error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}

/// A parser that reads the (mass, intensity) data blocks of a JCAMP-DX
/// file into a [`MassSpectrum`].
///
/// The reader walks the file line by line. A `##TAG=value` line makes
/// `TAG` the active tag; while the active tag is on the data-tag
/// allow-list, every following non-tag line is split on commas and
/// whitespace and its tokens parsed as floats. A tag whose name starts
/// with `END` terminates the walk. The collected values must form
/// (mass, intensity) pairs, which are handed to the checked
/// [`MassSpectrum`] constructor.
pub struct JcampReader<R: io::Read> {
    handle: io::BufReader<R>,
    state: JcampParserState,
    active_tag: Option<String>,
    xydata_tags: Vec<String>,
}

impl JcampReader<fs::File> {
    /// Open a JCAMP-DX file from a filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JcampError> {
        let path = path.as_ref();
        debug!("reading JCAMP file {}", path.display());
        Ok(Self::new(fs::File::open(path)?))
    }
}

impl<R: io::Read> JcampReader<R> {
    /// Wrap any byte source, using the default [`XYDATA_TAGS`] allow-list.
    pub fn new(source: R) -> Self {
        Self::with_xydata_tags(source, XYDATA_TAGS)
    }

    /// Wrap a byte source with a custom data-tag allow-list.
    ///
    /// Tag names are matched after case normalization, so the allow-list
    /// entries should be uppercase.
    pub fn with_xydata_tags<S, T>(source: R, xydata_tags: T) -> Self
    where
        S: Into<String>,
        T: IntoIterator<Item = S>,
    {
        JcampReader {
            handle: io::BufReader::new(source),
            state: JcampParserState::default(),
            active_tag: None,
            xydata_tags: xydata_tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn state(&self) -> JcampParserState {
        self.state
    }

    /// Consume the reader and build the spectrum from the collected data
    /// blocks.
    pub fn read_spectrum(mut self) -> Result<MassSpectrum, JcampError> {
        let xydata = self.read_values()?;
        if xydata.len() % 2 == 1 {
            return Err(JcampError::UnpairedData(xydata.len()));
        }

        let mut mass_list = Vec::with_capacity(xydata.len() / 2);
        let mut intensity_list = Vec::with_capacity(xydata.len() / 2);
        for pair in xydata.chunks_exact(2) {
            mass_list.push(pair[0]);
            intensity_list.push(pair[1]);
        }

        Ok(MassSpectrum::from_arrays(mass_list, intensity_list)?)
    }

    fn read_values(&mut self) -> Result<Vec<f64>, JcampError> {
        let mut values = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.handle.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(tag_line) = trimmed.strip_prefix("##") {
                let name = tag_line
                    .split('=')
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches('#')
                    .trim()
                    .to_uppercase();
                if name.starts_with("END") {
                    self.state = JcampParserState::Done;
                    break;
                }
                self.active_tag = Some(name);
                self.state = JcampParserState::TagActive;
            } else if self.in_data_block() {
                for token in separator().split(trimmed) {
                    let token = token.trim();
                    if token.is_empty() {
                        continue;
                    }
                    let value = token
                        .parse::<f64>()
                        .map_err(|e| JcampError::InvalidNumber(token.to_string(), e))?;
                    values.push(value);
                }
            }
        }
        Ok(values)
    }

    fn in_data_block(&self) -> bool {
        matches!(self.state, JcampParserState::TagActive)
            && self
                .active_tag
                .as_deref()
                .is_some_and(|tag| self.xydata_tags.iter().any(|t| t == tag))
    }
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[,\s]+").expect("static separator pattern compiles"))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;

    const SIMPLE: &str = "##TITLE=Test spectrum
##JCAMP-DX=4.24
##DATA TYPE=MASS SPECTRUM
##NPOINTS=4
##XYDATA=(XY..XY)
100.0, 5.0
110.0, 9.0
120.0 2.0
130.0,7.0
##END=
";

    #[test]
    fn reads_comma_and_space_separated_pairs() {
        let reader = JcampReader::new(SIMPLE.as_bytes());
        let ms = reader.read_spectrum().unwrap();
        assert_eq!(ms.mass_list(), &[100.0, 110.0, 120.0, 130.0]);
        assert_eq!(ms.intensity_list(), &[5.0, 9.0, 2.0, 7.0]);
        assert_eq!(ms.min_mass(), Some(100.0));
        assert_eq!(ms.max_mass(), Some(130.0));
    }

    #[test]
    fn ignores_lines_under_unrecognized_tags() {
        let data = "##TITLE=Test
##COMMENTS=free text block
1.0 2.0 3.0
##PEAK TABLE=(XY..XY)
100.0, 5.0
110.0, 9.0
##END=
";
        let ms = JcampReader::new(data.as_bytes()).read_spectrum().unwrap();
        assert_eq!(ms.mass_list(), &[100.0, 110.0]);
        assert_eq!(ms.intensity_list(), &[5.0, 9.0]);
    }

    #[test]
    fn stops_at_the_end_tag() {
        let data = "##XYDATA=(XY..XY)
100.0 5.0
##END=
##XYDATA=(XY..XY)
999.0 999.0
";
        let ms = JcampReader::new(data.as_bytes()).read_spectrum().unwrap();
        assert_eq!(ms.mass_list(), &[100.0]);
        assert_eq!(ms.intensity_list(), &[5.0]);
    }

    #[test]
    fn odd_value_count_is_rejected() {
        let data = "##XYDATA=(XY..XY)
100.0 5.0 110.0
##END=
";
        let err = JcampReader::new(data.as_bytes())
            .read_spectrum()
            .unwrap_err();
        assert!(matches!(err, JcampError::UnpairedData(3)));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let data = "##XYDATA=(XY..XY)
100.0 5.0
110.0 banana
##END=
";
        let err = JcampReader::new(data.as_bytes())
            .read_spectrum()
            .unwrap_err();
        assert!(matches!(err, JcampError::InvalidNumber(token, _) if token == "banana"));
    }

    #[test]
    fn custom_tag_allow_list() {
        let data = "##MY BLOCK=(XY..XY)
100.0 5.0
##END=
";
        let ignored = JcampReader::new(data.as_bytes()).read_spectrum().unwrap();
        assert!(ignored.is_empty());

        let read = JcampReader::with_xydata_tags(data.as_bytes(), ["MY BLOCK"])
            .read_spectrum()
            .unwrap();
        assert_eq!(read.mass_list(), &[100.0]);
    }

    #[test]
    fn reads_from_a_file_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SIMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let ms = MassSpectrum::from_jcamp(file.path()).unwrap();
        assert_eq!(ms.len(), 4);
        assert_eq!(ms.get_intensity_for_mass(110.0).unwrap(), 9.0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = MassSpectrum::from_jcamp("/nonexistent/file.jdx").unwrap_err();
        assert!(matches!(err, JcampError::Io(_)));
    }
}
