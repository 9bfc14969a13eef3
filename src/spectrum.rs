//! The scan and mass spectrum data model.
pub mod mass_spectrum;
pub mod scan;

pub use crate::spectrum::mass_spectrum::{
    normalize_mass_spec, normalize_mass_spec_in_place, MassSpectrum, MaxIntensity,
};
pub use crate::spectrum::scan::{Scan, SpectrumError};
