//! A single instrument reading as paired mass and intensity arrays.

use log::warn;
use num_traits::ToPrimitive;
use thiserror::Error;

use crate::coercion::{as_numeric_array, CoercionError};

/// Errors produced when constructing or querying scans and mass spectra.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectrumError {
    #[error("mass list has {mass_len} entries but intensity list has {intensity_len}")]
    LengthMismatch {
        mass_len: usize,
        intensity_len: usize,
    },
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error("no entry for mass {0} in the mass list")]
    MassNotFound(f64),
    #[error("no entry for intensity {0} in the intensity list")]
    IntensityNotFound(f64),
    #[error("requested {requested} peaks but only {available} are present")]
    NotEnoughPeaks { requested: usize, available: usize },
    #[error("the spectrum is empty")]
    EmptySpectrum,
    #[error("the (m/z, intensity) pair list is empty")]
    EmptyPairList,
}

/// A single instrument reading: a mass array paired positionally with an
/// intensity array.
///
/// The mass array is stored in ascending order whenever the input order
/// allows it. Input in descending order is reversed (together with its
/// intensities) at construction; input in neither order is kept as given
/// and a warning is logged, so callers handing over unsorted data receive
/// a scan without the ascending-order guarantee.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub(crate) mass_list: Vec<f64>,
    pub(crate) intensity_list: Vec<f64>,
    pub(crate) min_mass: Option<f64>,
    pub(crate) max_mass: Option<f64>,
}

impl Scan {
    /// Build a scan from any pair of numeric sequences.
    ///
    /// Both sequences are coerced to `f64` and must have the same length.
    pub fn new<M, I>(mass_list: &[M], intensity_list: &[I]) -> Result<Self, SpectrumError>
    where
        M: ToPrimitive,
        I: ToPrimitive,
    {
        let mass_list = as_numeric_array(mass_list)?;
        let intensity_list = as_numeric_array(intensity_list)?;
        Self::from_arrays(mass_list, intensity_list)
    }

    /// Build a scan from already-coerced arrays, enforcing the pairing and
    /// ordering invariants.
    pub fn from_arrays(
        mut mass_list: Vec<f64>,
        mut intensity_list: Vec<f64>,
    ) -> Result<Self, SpectrumError> {
        if mass_list.len() != intensity_list.len() {
            return Err(SpectrumError::LengthMismatch {
                mass_len: mass_list.len(),
                intensity_len: intensity_list.len(),
            });
        }

        if !is_ascending(&mass_list) {
            if is_descending(&mass_list) {
                mass_list.reverse();
                intensity_list.reverse();
            } else {
                warn!(
                    "unknown sort order for mass list; it does not appear to be in either \
                     ascending or descending order"
                );
            }
        }

        let (min_mass, max_mass) = mass_bounds(&mass_list);

        Ok(Scan {
            mass_list,
            intensity_list,
            min_mass,
            max_mass,
        })
    }

    /// The number of (mass, intensity) pairs in the scan.
    pub fn len(&self) -> usize {
        self.mass_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass_list.is_empty()
    }

    /// The stored mass array.
    pub fn mass_list(&self) -> &[f64] {
        &self.mass_list
    }

    /// The stored intensity array.
    pub fn intensity_list(&self) -> &[f64] {
        &self.intensity_list
    }

    /// Legacy alias for [`intensity_list`](Self::intensity_list), kept for
    /// callers that address the intensity array by its historical name.
    pub fn mass_spec(&self) -> &[f64] {
        &self.intensity_list
    }

    /// The smallest mass in the scan, or `None` if the scan is empty.
    pub fn min_mass(&self) -> Option<f64> {
        self.min_mass
    }

    /// The largest mass in the scan, or `None` if the scan is empty.
    pub fn max_mass(&self) -> Option<f64> {
        self.max_mass
    }

    /// Iterate over the (mass, intensity) pairs in stored order.
    pub fn iter_peaks(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.mass_list
            .iter()
            .copied()
            .zip(self.intensity_list.iter().copied())
    }
}

/// Scans compare by their mass and intensity sequences, element-wise and
/// exactly.
impl PartialEq for Scan {
    fn eq(&self, other: &Self) -> bool {
        self.mass_list == other.mass_list && self.intensity_list == other.intensity_list
    }
}

fn is_ascending(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

fn is_descending(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] >= pair[1])
}

/// Minimum and maximum over `masses`, independent of storage order.
pub(crate) fn mass_bounds(masses: &[f64]) -> (Option<f64>, Option<f64>) {
    if masses.is_empty() {
        return (None, None);
    }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &mass in masses {
        lo = lo.min(mass);
        hi = hi.max(mass);
    }
    (Some(lo), Some(hi))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn length_matches_input() {
        let scan = Scan::new(&[50.0, 51.0, 52.0], &[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(scan.len(), 3);
        assert!(!scan.is_empty());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = Scan::new(&[50.0, 51.0], &[10.0]).unwrap_err();
        assert_eq!(
            err,
            SpectrumError::LengthMismatch {
                mass_len: 2,
                intensity_len: 1
            }
        );
    }

    #[test]
    fn descending_input_is_reversed() {
        let scan = Scan::new(&[52.0, 51.0, 50.0], &[30.0, 20.0, 10.0]).unwrap();
        assert_eq!(scan.mass_list(), &[50.0, 51.0, 52.0]);
        assert_eq!(scan.intensity_list(), &[10.0, 20.0, 30.0]);
    }

    #[test_log::test]
    fn unsorted_input_is_kept_as_given() {
        let scan = Scan::new(&[50.0, 53.0, 51.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(scan.mass_list(), &[50.0, 53.0, 51.0]);
        assert_eq!(scan.intensity_list(), &[1.0, 2.0, 3.0]);
        // Bounds still hold in the degraded case
        assert_eq!(scan.min_mass(), Some(50.0));
        assert_eq!(scan.max_mass(), Some(53.0));
    }

    #[test]
    fn empty_scan_has_no_bounds() {
        let scan = Scan::new::<f64, f64>(&[], &[]).unwrap();
        assert!(scan.is_empty());
        assert_eq!(scan.min_mass(), None);
        assert_eq!(scan.max_mass(), None);
    }

    #[test]
    fn integer_input_is_coerced() {
        let scan = Scan::new(&[50_i32, 51, 52], &[10_i32, 20, 30]).unwrap();
        assert_eq!(scan.mass_list(), &[50.0, 51.0, 52.0]);
    }

    #[test]
    fn equality_is_element_wise() {
        let a = Scan::new(&[50.0, 51.0], &[10.0, 20.0]).unwrap();
        let b = Scan::new(&[50.0, 51.0], &[10.0, 20.0]).unwrap();
        let c = Scan::new(&[50.0, 51.0], &[10.0, 21.0]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn clone_is_independent() {
        let original = Scan::new(&[50.0, 51.0], &[10.0, 20.0]).unwrap();
        let mut copied = original.clone();
        assert_eq!(original, copied);
        copied.intensity_list[0] = 99.0;
        assert_eq!(original.intensity_list(), &[10.0, 20.0]);
    }

    #[test]
    fn iter_peaks_is_restartable() {
        let scan = Scan::new(&[50.0, 51.0], &[10.0, 20.0]).unwrap();
        let first: Vec<_> = scan.iter_peaks().collect();
        let second: Vec<_> = scan.iter_peaks().collect();
        assert_eq!(first, vec![(50.0, 10.0), (51.0, 20.0)]);
        assert_eq!(first, second);
    }
}
