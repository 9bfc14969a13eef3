//! A data model for mass spectrometry scans and spectra.
//!
//! The core types are [`Scan`], an ordered pairing of mass and intensity
//! arrays, and [`MassSpectrum`], a mutable spectrum with cropping,
//! normalization, and peak-query operations built on top of it. Spectra can
//! be read from JCAMP-DX files via [`MassSpectrum::from_jcamp`] or the
//! lower-level [`JcampReader`](crate::io::jcamp::JcampReader). The
//! [`utils`] module holds the numeric helpers (median absolute deviation,
//! RMSD, outlier detectors) used by downstream analysis code.
pub mod coercion;
pub mod io;
pub mod spectrum;
pub mod utils;

pub use crate::coercion::{as_numeric_array, CoercionError};

pub use crate::spectrum::{
    normalize_mass_spec, normalize_mass_spec_in_place, MassSpectrum, MaxIntensity, Scan,
    SpectrumError,
};

#[cfg(feature = "jcamp")]
pub use crate::io::jcamp::{JcampError, JcampReader};
