//! A processed mass spectrum with mutable arrays and derivation
//! operations.

use num_traits::ToPrimitive;

#[cfg(feature = "jcamp")]
use std::path::Path;

use crate::coercion::{as_numeric_array, CoercionError};
#[cfg(feature = "jcamp")]
use crate::io::jcamp::{JcampError, JcampReader};
use crate::spectrum::scan::{mass_bounds, Scan, SpectrumError};

/// A binned mass spectrum.
///
/// A `MassSpectrum` wraps a [`Scan`] and makes the two arrays replaceable
/// after construction, alongside cropping, normalization, and exact-match
/// peak queries. The scan-level invariants are checked once, on
/// construction; the setters trade those checks away for mutability, as
/// noted on each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassSpectrum {
    scan: Scan,
}

impl MassSpectrum {
    /// Build a spectrum from any pair of numeric sequences.
    ///
    /// See [`Scan::new`] for the pairing and ordering rules.
    pub fn new<M, I>(mass_list: &[M], intensity_list: &[I]) -> Result<Self, SpectrumError>
    where
        M: ToPrimitive,
        I: ToPrimitive,
    {
        Ok(MassSpectrum {
            scan: Scan::new(mass_list, intensity_list)?,
        })
    }

    /// Build a spectrum from already-coerced arrays.
    pub fn from_arrays(
        mass_list: Vec<f64>,
        intensity_list: Vec<f64>,
    ) -> Result<Self, SpectrumError> {
        Ok(MassSpectrum {
            scan: Scan::from_arrays(mass_list, intensity_list)?,
        })
    }

    /// Build a spectrum from a non-empty sequence of (m/z, intensity)
    /// pairs, coercing each element to `f64`.
    pub fn from_mz_int_pairs<M, I>(pairs: &[(M, I)]) -> Result<Self, SpectrumError>
    where
        M: ToPrimitive,
        I: ToPrimitive,
    {
        if pairs.is_empty() {
            return Err(SpectrumError::EmptyPairList);
        }
        let mut mass_list = Vec::with_capacity(pairs.len());
        let mut intensity_list = Vec::with_capacity(pairs.len());
        for (index, (mass, intensity)) in pairs.iter().enumerate() {
            mass_list.push(mass.to_f64().ok_or(CoercionError { index })?);
            intensity_list.push(intensity.to_f64().ok_or(CoercionError { index })?);
        }
        Self::from_arrays(mass_list, intensity_list)
    }

    /// Read a spectrum from a JCAMP-DX file.
    #[cfg(feature = "jcamp")]
    pub fn from_jcamp<P: AsRef<Path>>(path: P) -> Result<Self, JcampError> {
        JcampReader::open(path)?.read_spectrum()
    }

    /// Borrow the underlying scan.
    pub fn as_scan(&self) -> &Scan {
        &self.scan
    }

    pub fn len(&self) -> usize {
        self.scan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scan.is_empty()
    }

    pub fn mass_list(&self) -> &[f64] {
        self.scan.mass_list()
    }

    pub fn intensity_list(&self) -> &[f64] {
        self.scan.intensity_list()
    }

    /// Legacy alias for [`intensity_list`](Self::intensity_list), kept for
    /// callers that address the intensity array by its historical name.
    pub fn mass_spec(&self) -> &[f64] {
        self.scan.mass_spec()
    }

    pub fn min_mass(&self) -> Option<f64> {
        self.scan.min_mass()
    }

    pub fn max_mass(&self) -> Option<f64> {
        self.scan.max_mass()
    }

    /// Iterate over the (mass, intensity) pairs in stored order.
    pub fn iter_peaks(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.scan.iter_peaks()
    }

    /// Replace the mass array and recompute the mass bounds.
    ///
    /// The new array is not re-checked for sort order or for length parity
    /// with the intensity list.
    pub fn set_mass_list<M: ToPrimitive>(&mut self, values: &[M]) -> Result<(), SpectrumError> {
        let values = as_numeric_array(values)?;
        let (min_mass, max_mass) = mass_bounds(&values);
        self.scan.mass_list = values;
        self.scan.min_mass = min_mass;
        self.scan.max_mass = max_mass;
        Ok(())
    }

    /// Replace the intensity array.
    ///
    /// The new array is not checked against the mass list for length
    /// parity; callers that shrink or grow it are responsible for keeping
    /// the mass list in step. Queries that would run past the shorter
    /// array report [`SpectrumError::LengthMismatch`].
    pub fn set_intensity_list<I: ToPrimitive>(&mut self, values: &[I]) -> Result<(), SpectrumError> {
        self.scan.intensity_list = as_numeric_array(values)?;
        Ok(())
    }

    /// Legacy alias for [`set_intensity_list`](Self::set_intensity_list).
    pub fn set_mass_spec<I: ToPrimitive>(&mut self, values: &[I]) -> Result<(), SpectrumError> {
        self.set_intensity_list(values)
    }

    /// Crop to the masses between `min_mz` and `max_mz`, inclusive.
    ///
    /// Bounds default to the current mass range, and each given bound must
    /// match an entry in the mass list exactly.
    pub fn crop(&self, min_mz: Option<f64>, max_mz: Option<f64>) -> Result<Self, SpectrumError> {
        let (min_index, max_index) = self.crop_indices(min_mz, max_mz)?;
        self.icrop(min_index, max_index)
    }

    /// In-place form of [`crop`](Self::crop).
    pub fn crop_in_place(
        &mut self,
        min_mz: Option<f64>,
        max_mz: Option<f64>,
    ) -> Result<&mut Self, SpectrumError> {
        let (min_index, max_index) = self.crop_indices(min_mz, max_mz)?;
        Ok(self.icrop_in_place(min_index, max_index))
    }

    /// Crop with the historical bound resolution, which looks `min_mz` and
    /// `max_mz` up in the *intensity* list rather than the mass list.
    ///
    /// Some long-lived pipelines depend on this resolution; new code
    /// should call [`crop`](Self::crop). The result additionally carries
    /// the quirk of [`legacy_icrop`](Self::legacy_icrop).
    pub fn legacy_crop(
        &self,
        min_mz: Option<f64>,
        max_mz: Option<f64>,
    ) -> Result<Self, SpectrumError> {
        let (min_mz, max_mz) = self.crop_bounds(min_mz, max_mz)?;
        let min_index = self.intensity_index(min_mz)?;
        let max_index = self.intensity_index(max_mz)? + 1;
        self.legacy_icrop(min_index, max_index)
    }

    /// Crop to the index range `[min_index, max_index)`.
    ///
    /// Indices past the end of the arrays are clamped rather than
    /// rejected. The result is rebuilt through the checked constructor, so
    /// this only fails if the receiver's arrays already disagree in
    /// length.
    pub fn icrop(&self, min_index: usize, max_index: usize) -> Result<Self, SpectrumError> {
        let mass_list = slice_clamped(&self.scan.mass_list, min_index, max_index);
        let intensity_list = slice_clamped(&self.scan.intensity_list, min_index, max_index);
        Self::from_arrays(mass_list, intensity_list)
    }

    /// In-place form of [`icrop`](Self::icrop); recomputes the mass
    /// bounds.
    pub fn icrop_in_place(&mut self, min_index: usize, max_index: usize) -> &mut Self {
        self.scan.intensity_list = slice_clamped(&self.scan.intensity_list, min_index, max_index);
        self.scan.mass_list = slice_clamped(&self.scan.mass_list, min_index, max_index);
        let (min_mass, max_mass) = mass_bounds(&self.scan.mass_list);
        self.scan.min_mass = min_mass;
        self.scan.max_mass = max_mass;
        self
    }

    /// Index-crop with the historical quirk: BOTH arrays of the new
    /// spectrum are populated from the cropped *intensity* values, so the
    /// mass information is discarded.
    ///
    /// Kept only for compatibility with output produced under the old
    /// behaviour; [`icrop`](Self::icrop) is the corrected form.
    pub fn legacy_icrop(&self, min_index: usize, max_index: usize) -> Result<Self, SpectrumError> {
        let cropped = slice_clamped(&self.scan.intensity_list, min_index, max_index);
        Self::from_arrays(cropped.clone(), cropped)
    }

    /// The indices of the `n` most intense peaks, most intense first.
    ///
    /// Indices refer to the spectrum's own numbering. Ties resolve to the
    /// lowest index.
    pub fn n_largest_peaks(&self, n: usize) -> Result<Vec<usize>, SpectrumError> {
        let available = self.scan.intensity_list.len();
        if n > available {
            return Err(SpectrumError::NotEnoughPeaks {
                requested: n,
                available,
            });
        }

        let mut working: Vec<(usize, f64)> = self
            .scan
            .intensity_list
            .iter()
            .copied()
            .enumerate()
            .collect();
        let mut largest_indices = Vec::with_capacity(n);

        for _ in 0..n {
            // Strict comparison keeps the first occurrence on ties
            let mut peak = 0;
            for (position, entry) in working.iter().enumerate().skip(1) {
                if entry.1 > working[peak].1 {
                    peak = position;
                }
            }
            let (original_index, _) = working.remove(peak);
            largest_indices.push(original_index);
        }

        Ok(largest_indices)
    }

    /// The intensity paired with the given mass.
    ///
    /// The match is exact; there is no tolerance or binning.
    pub fn get_intensity_for_mass(&self, mass: f64) -> Result<f64, SpectrumError> {
        let index = self
            .scan
            .mass_list
            .iter()
            .position(|&m| m == mass)
            .ok_or(SpectrumError::MassNotFound(mass))?;
        self.scan
            .intensity_list
            .get(index)
            .copied()
            .ok_or(SpectrumError::LengthMismatch {
                mass_len: self.scan.mass_list.len(),
                intensity_len: self.scan.intensity_list.len(),
            })
    }

    /// The mass paired with the first occurrence of the given intensity.
    ///
    /// The match is exact; there is no tolerance or binning.
    pub fn get_mass_for_intensity(&self, intensity: f64) -> Result<f64, SpectrumError> {
        let index = self.intensity_index(intensity)?;
        self.scan
            .mass_list
            .get(index)
            .copied()
            .ok_or(SpectrumError::LengthMismatch {
                mass_len: self.scan.mass_list.len(),
                intensity_len: self.scan.intensity_list.len(),
            })
    }

    fn crop_bounds(
        &self,
        min_mz: Option<f64>,
        max_mz: Option<f64>,
    ) -> Result<(f64, f64), SpectrumError> {
        let min_mz = match min_mz {
            Some(value) => value,
            None => self.min_mass().ok_or(SpectrumError::EmptySpectrum)?,
        };
        let max_mz = match max_mz {
            Some(value) => value,
            None => self.max_mass().ok_or(SpectrumError::EmptySpectrum)?,
        };
        Ok((min_mz, max_mz))
    }

    fn crop_indices(
        &self,
        min_mz: Option<f64>,
        max_mz: Option<f64>,
    ) -> Result<(usize, usize), SpectrumError> {
        let (min_mz, max_mz) = self.crop_bounds(min_mz, max_mz)?;
        let min_index = self.mass_index(min_mz)?;
        // The upper bound is inclusive
        let max_index = self.mass_index(max_mz)? + 1;
        Ok((min_index, max_index))
    }

    fn mass_index(&self, mass: f64) -> Result<usize, SpectrumError> {
        self.scan
            .mass_list
            .iter()
            .position(|&m| m == mass)
            .ok_or(SpectrumError::MassNotFound(mass))
    }

    fn intensity_index(&self, intensity: f64) -> Result<usize, SpectrumError> {
        self.scan
            .intensity_list
            .iter()
            .position(|&i| i == intensity)
            .ok_or(SpectrumError::IntensityNotFound(intensity))
    }
}

fn slice_clamped(values: &[f64], start: usize, end: usize) -> Vec<f64> {
    let end = end.min(values.len());
    let start = start.min(end);
    values[start..end].to_vec()
}

/// The intensity ceiling for [`normalize_mass_spec`].
///
/// The two variants mirror the historical int/float distinction of the
/// parameter: an integral ceiling rounds every normalized intensity to the
/// nearest integer (ties to even), a fractional ceiling leaves them
/// fractional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxIntensity {
    Integral(i64),
    Fractional(f64),
}

impl Default for MaxIntensity {
    fn default() -> Self {
        MaxIntensity::Integral(100)
    }
}

impl From<i64> for MaxIntensity {
    fn from(value: i64) -> Self {
        MaxIntensity::Integral(value)
    }
}

impl From<f64> for MaxIntensity {
    fn from(value: f64) -> Self {
        MaxIntensity::Fractional(value)
    }
}

impl MaxIntensity {
    fn ceiling(&self) -> f64 {
        match *self {
            MaxIntensity::Integral(value) => value as f64,
            MaxIntensity::Fractional(value) => value,
        }
    }

    fn apply(&self, value: f64, relative_to: f64) -> f64 {
        let scaled = (value / relative_to) * self.ceiling();
        match self {
            MaxIntensity::Integral(_) => scaled.round_ties_even(),
            MaxIntensity::Fractional(_) => scaled,
        }
    }
}

/// Rescale every intensity in `mass_spec` so that `relative_to` maps to
/// the requested ceiling, returning the normalized spectrum.
///
/// `relative_to` defaults to the largest intensity in the spectrum, which
/// puts the most intense peak exactly on the ceiling. Pass an explicit
/// value to normalize several spectra against a common reference.
pub fn normalize_mass_spec(
    mass_spec: &MassSpectrum,
    relative_to: Option<f64>,
    max_intensity: MaxIntensity,
) -> Result<MassSpectrum, SpectrumError> {
    let normalized = normalized_intensities(mass_spec, relative_to, max_intensity)?;
    MassSpectrum::from_arrays(mass_spec.mass_list().to_vec(), normalized)
}

/// In-place form of [`normalize_mass_spec`]: the receiver's intensities
/// are replaced.
pub fn normalize_mass_spec_in_place(
    mass_spec: &mut MassSpectrum,
    relative_to: Option<f64>,
    max_intensity: MaxIntensity,
) -> Result<&mut MassSpectrum, SpectrumError> {
    let normalized = normalized_intensities(mass_spec, relative_to, max_intensity)?;
    mass_spec.scan.intensity_list = normalized;
    Ok(mass_spec)
}

fn normalized_intensities(
    mass_spec: &MassSpectrum,
    relative_to: Option<f64>,
    max_intensity: MaxIntensity,
) -> Result<Vec<f64>, SpectrumError> {
    let relative_to = match relative_to {
        Some(value) => value,
        None => mass_spec
            .intensity_list()
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, x| {
                Some(acc.map_or(x, |a| a.max(x)))
            })
            .ok_or(SpectrumError::EmptySpectrum)?,
    };

    Ok(mass_spec
        .intensity_list()
        .iter()
        .map(|&value| max_intensity.apply(value, relative_to))
        .collect())
}
