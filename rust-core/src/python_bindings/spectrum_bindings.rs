//! Python bindings for filter analysis

use numpy::PyArray1;
use num_complex::Complex64;
use pyo3::prelude::*;

use super::{unpack_system, System};
use crate::spectrum::analysis::{self, default_tolerance, FreqzOptions, FrequencyGrid, ResponseValues};

/// `worN`: a number of points or explicit frequencies
#[derive(FromPyObject)]
pub enum WorN {
    Points(usize),
    Frequencies(Vec<f64>),
}

fn options(wor_n: WorN, fs: f64, whole: bool) -> FreqzOptions {
    let grid = match wor_n {
        WorN::Points(n) => FrequencyGrid::Points(n),
        WorN::Frequencies(w) => FrequencyGrid::Frequencies(w),
    };
    FreqzOptions {
        grid,
        ..FreqzOptions::default()
    }
    .with_fs(fs)
    .with_whole(whole)
}

/// Frequency response of a digital filter
///
/// Args:
///     system: (b, a)
///     worN: Number of points or explicit frequencies
///     fs: Sample rate (default 2π)
///     outform: 'complex', 'abs' or 'dB'
///     whole: Evaluate around the whole unit circle
///
/// Returns:
///     (w, h)
#[pyfunction]
#[pyo3(signature = (system, worN=WorN::Points(512), fs=std::f64::consts::TAU, outform="complex", whole=false))]
#[allow(non_snake_case)]
pub fn freqz(
    py: Python<'_>,
    system: System,
    worN: WorN,
    fs: f64,
    outform: &str,
    whole: bool,
) -> PyResult<(PyObject, PyObject)> {
    let (b, a) = unpack_system(system);
    let form = outform.parse()?;
    let response = analysis::freqz(&b, &a, &options(worN, fs, whole))?;

    let h: PyObject = match response.values(form) {
        ResponseValues::Complex(h) => {
            let array: Py<PyArray1<Complex64>> = PyArray1::from_vec(py, h).into();
            array.into_py(py)
        }
        ResponseValues::Real(h) => {
            let array: Py<PyArray1<f64>> = PyArray1::from_vec(py, h).into();
            array.into_py(py)
        }
    };
    let w: Py<PyArray1<f64>> = PyArray1::from_vec(py, response.w).into();

    Ok((w.into_py(py), h))
}

/// Unwrapped phase response
#[pyfunction]
#[pyo3(signature = (system, worN=WorN::Points(512), fs=std::f64::consts::TAU, deg=false))]
#[allow(non_snake_case)]
pub fn phasez<'py>(
    py: Python<'py>,
    system: System,
    worN: WorN,
    fs: f64,
    deg: bool,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let (b, a) = unpack_system(system);
    let (w, phase) = analysis::phasez(&b, &a, &options(worN, fs, false), deg)?;
    Ok((PyArray1::from_vec(py, w), PyArray1::from_vec(py, phase)))
}

/// Group delay in samples
#[pyfunction]
#[pyo3(signature = (system, worN=WorN::Points(512), fs=std::f64::consts::TAU))]
#[allow(non_snake_case)]
pub fn grpdelay<'py>(
    py: Python<'py>,
    system: System,
    worN: WorN,
    fs: f64,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let (b, a) = unpack_system(system);
    let (w, gd) = analysis::grpdelay(&b, &a, &options(worN, fs, false))?;
    Ok((PyArray1::from_vec(py, w), PyArray1::from_vec(py, gd)))
}

/// Impulse response
///
/// Returns:
///     (T, y)
#[pyfunction]
#[pyo3(signature = (system, n=None, fs=1.0))]
pub fn impz<'py>(
    py: Python<'py>,
    system: System,
    n: Option<usize>,
    fs: f64,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let (b, a) = unpack_system(system);
    let (t, y) = analysis::impz(&b, &a, n, fs)?;
    Ok((PyArray1::from_vec(py, t), PyArray1::from_vec(py, y)))
}

/// Zeros, poles and gain
#[pyfunction]
pub fn tf2zpk<'py>(
    py: Python<'py>,
    system: System,
) -> PyResult<(&'py PyArray1<Complex64>, &'py PyArray1<Complex64>, f64)> {
    let (b, a) = unpack_system(system);
    let zpk = analysis::tf2zpk(&b, &a)?;
    Ok((
        PyArray1::from_vec(py, zpk.zeros),
        PyArray1::from_vec(py, zpk.poles),
        zpk.gain,
    ))
}

/// Whether all poles are inside the unit circle
#[pyfunction]
pub fn isstable(system: System) -> PyResult<bool> {
    let (b, a) = unpack_system(system);
    Ok(analysis::isstable(&b, &a)?)
}

/// Whether all zeros are inside the unit circle by at least `tol`
#[pyfunction]
#[pyo3(signature = (system, tol=None))]
pub fn isminphase(system: System, tol: Option<f64>) -> PyResult<bool> {
    let (b, a) = unpack_system(system);
    Ok(analysis::isminphase(&b, &a, tol.unwrap_or_else(default_tolerance))?)
}
