//! Python bindings for filter design and filtering

use numpy::{PyArray1, PyReadonlyArray1};
use num_complex::Complex64;
use pyo3::prelude::*;

use super::{unpack_system, FloatOrList, System, WindowArg};
use crate::args::{parse_ftype, Domain, Frequency};
use crate::filters::{self, Fir2Options, IirOrder, RemezType, TransferFilter, TransferFunction};
use crate::polynomial;

type PyTf<'py> = (&'py PyArray1<f64>, &'py PyArray1<f64>);

fn to_numpy<'py>(py: Python<'py>, tf: TransferFunction) -> PyTf<'py> {
    (PyArray1::from_vec(py, tf.b), PyArray1::from_vec(py, tf.a))
}

fn frequency_to_py(py: Python<'_>, wn: Frequency) -> PyObject {
    match wn {
        Frequency::Scalar(w) => w.into_py(py),
        Frequency::Sequence(v) => {
            let array: Py<PyArray1<f64>> = PyArray1::from_vec(py, v).into();
            array.into_py(py)
        }
    }
}

/// Kaiser window FIR order estimation
///
/// Returns:
///     (n, Wn, beta, ftype)
#[pyfunction]
#[pyo3(signature = (f, a, dev, fs=2.0))]
pub fn kaiserord(
    py: Python<'_>,
    f: Vec<f64>,
    a: Vec<f64>,
    dev: FloatOrList,
    fs: f64,
) -> PyResult<(usize, PyObject, f64, &'static str)> {
    let res = filters::kaiserord(&f, &a, &dev.into_vec(), fs)?;
    let ftype = res.filter_type.as_str();
    Ok((res.order, frequency_to_py(py, res.band_edges), res.beta, ftype))
}

/// Stabilize a polynomial by reflecting roots outside the unit circle
#[pyfunction]
pub fn polystab<'py>(py: Python<'py>, a: Vec<f64>) -> PyResult<&'py PyArray1<f64>> {
    Ok(PyArray1::from_vec(py, polynomial::polystab(&a)?))
}

/// Roots of `a` scaled by `alpha`
#[pyfunction]
pub fn polyscale<'py>(py: Python<'py>, a: Vec<f64>, alpha: Complex64) -> &'py PyArray1<Complex64> {
    PyArray1::from_vec(py, polynomial::polyscale(&a, alpha))
}

/// Window-based FIR design
///
/// Args:
///     n: Filter order
///     Wn: Cutoff frequency or band edges (1 = Nyquist)
///     ftype: 'default', 'low', 'high', 'bandpass', 'stop', 'DC-0' or 'DC-1'
///     window: Window name or ('kaiser', beta)
///     scale: Normalize the passband gain
#[pyfunction]
#[pyo3(signature = (n, Wn, ftype="default", window=None, scale=true))]
#[allow(non_snake_case)]
pub fn fir1<'py>(
    py: Python<'py>,
    n: usize,
    Wn: FloatOrList,
    ftype: &str,
    window: Option<WindowArg>,
    scale: bool,
) -> PyResult<PyTf<'py>> {
    let window = window.map(WindowArg::resolve).transpose()?.unwrap_or_default();
    let tf = filters::fir1(n, &Wn.into_frequency()?, parse_ftype(ftype)?, window, scale)?;
    Ok(to_numpy(py, tf))
}

/// Frequency-sampling FIR design
#[pyfunction]
#[pyo3(signature = (n, f, m, npt=512, window=Some(WindowArg::Name("hamming".to_string()))))]
pub fn fir2<'py>(
    py: Python<'py>,
    n: usize,
    f: Vec<f64>,
    m: Vec<f64>,
    npt: usize,
    window: Option<WindowArg>,
) -> PyResult<PyTf<'py>> {
    let options = Fir2Options {
        npt,
        window: window.map(WindowArg::resolve).transpose()?,
    };
    Ok(to_numpy(py, filters::fir2(n, &f, &m, &options)?))
}

/// Least-squares linear-phase FIR design
#[pyfunction]
#[pyo3(signature = (n, f, a, w=None))]
pub fn firls<'py>(
    py: Python<'py>,
    n: usize,
    f: Vec<f64>,
    a: Vec<f64>,
    w: Option<Vec<f64>>,
) -> PyResult<PyTf<'py>> {
    Ok(to_numpy(py, filters::firls(n, &f, &a, w.as_deref())?))
}

/// Savitzky-Golay smoothing filter
#[pyfunction]
pub fn sgolay<'py>(py: Python<'py>, order: usize, framelen: usize) -> PyResult<PyTf<'py>> {
    Ok(to_numpy(py, filters::sgolay(order, framelen)?))
}

/// Butterworth filter design
///
/// Args:
///     n: Filter order
///     Wn: Cutoff frequency or band edges
///     ftype: 'default', 'low', 'high', 'bandpass' or 'stop'
///     zs: 'z' for a digital design, 's' for an analog one
#[pyfunction]
#[pyo3(signature = (n, Wn, ftype="default", zs="z"))]
#[allow(non_snake_case)]
pub fn butter<'py>(
    py: Python<'py>,
    n: usize,
    Wn: FloatOrList,
    ftype: &str,
    zs: &str,
) -> PyResult<PyTf<'py>> {
    let domain: Domain = zs.parse()?;
    let tf = filters::butter(n, &Wn.into_frequency()?, parse_ftype(ftype)?, domain)?;
    Ok(to_numpy(py, tf))
}

/// Chebyshev type I filter design
#[pyfunction]
#[pyo3(signature = (n, Rp, Wp, ftype="default", zs="z"))]
#[allow(non_snake_case)]
pub fn cheby1<'py>(
    py: Python<'py>,
    n: usize,
    Rp: f64,
    Wp: FloatOrList,
    ftype: &str,
    zs: &str,
) -> PyResult<PyTf<'py>> {
    let domain: Domain = zs.parse()?;
    let tf = filters::cheby1(n, Rp, &Wp.into_frequency()?, parse_ftype(ftype)?, domain)?;
    Ok(to_numpy(py, tf))
}

/// Chebyshev type II filter design
#[pyfunction]
#[pyo3(signature = (n, Rs, Ws, ftype="default", zs="z"))]
#[allow(non_snake_case)]
pub fn cheby2<'py>(
    py: Python<'py>,
    n: usize,
    Rs: f64,
    Ws: FloatOrList,
    ftype: &str,
    zs: &str,
) -> PyResult<PyTf<'py>> {
    let domain: Domain = zs.parse()?;
    let tf = filters::cheby2(n, Rs, &Ws.into_frequency()?, parse_ftype(ftype)?, domain)?;
    Ok(to_numpy(py, tf))
}

/// Elliptic filter design
#[pyfunction]
#[pyo3(signature = (n, Rp, Rs, Wp, ftype="default", zs="z"))]
#[allow(non_snake_case)]
pub fn ellip<'py>(
    py: Python<'py>,
    n: usize,
    Rp: f64,
    Rs: f64,
    Wp: FloatOrList,
    ftype: &str,
    zs: &str,
) -> PyResult<PyTf<'py>> {
    let domain: Domain = zs.parse()?;
    let tf = filters::ellip(n, Rp, Rs, &Wp.into_frequency()?, parse_ftype(ftype)?, domain)?;
    Ok(to_numpy(py, tf))
}

type OrderFn = fn(&Frequency, &Frequency, f64, f64, Domain) -> crate::error::Result<IirOrder>;

#[allow(non_snake_case)]
fn estimate_order(
    py: Python<'_>,
    estimator: OrderFn,
    Wp: FloatOrList,
    Ws: FloatOrList,
    Rp: f64,
    Rs: f64,
    zs: &str,
) -> PyResult<(usize, PyObject)> {
    let domain: Domain = zs.parse()?;
    let est = estimator(&Wp.into_frequency()?, &Ws.into_frequency()?, Rp, Rs, domain)?;
    Ok((est.order, frequency_to_py(py, est.wn)))
}

/// Minimum Butterworth order
///
/// Returns:
///     (n, Wn)
#[pyfunction]
#[pyo3(signature = (Wp, Ws, Rp, Rs, zs="z"))]
#[allow(non_snake_case)]
pub fn buttord(py: Python<'_>, Wp: FloatOrList, Ws: FloatOrList, Rp: f64, Rs: f64, zs: &str) -> PyResult<(usize, PyObject)> {
    estimate_order(py, filters::buttord, Wp, Ws, Rp, Rs, zs)
}

/// Minimum Chebyshev type I order
#[pyfunction]
#[pyo3(signature = (Wp, Ws, Rp, Rs, zs="z"))]
#[allow(non_snake_case)]
pub fn cheb1ord(py: Python<'_>, Wp: FloatOrList, Ws: FloatOrList, Rp: f64, Rs: f64, zs: &str) -> PyResult<(usize, PyObject)> {
    estimate_order(py, filters::cheb1ord, Wp, Ws, Rp, Rs, zs)
}

/// Minimum Chebyshev type II order
#[pyfunction]
#[pyo3(signature = (Wp, Ws, Rp, Rs, zs="z"))]
#[allow(non_snake_case)]
pub fn cheb2ord(py: Python<'_>, Wp: FloatOrList, Ws: FloatOrList, Rp: f64, Rs: f64, zs: &str) -> PyResult<(usize, PyObject)> {
    estimate_order(py, filters::cheb2ord, Wp, Ws, Rp, Rs, zs)
}

/// Minimum elliptic order
#[pyfunction]
#[pyo3(signature = (Wp, Ws, Rp, Rs, zs="z"))]
#[allow(non_snake_case)]
pub fn ellipord(py: Python<'_>, Wp: FloatOrList, Ws: FloatOrList, Rp: f64, Rs: f64, zs: &str) -> PyResult<(usize, PyObject)> {
    estimate_order(py, filters::ellipord, Wp, Ws, Rp, Rs, zs)
}

/// Parks-McClellan equiripple FIR design
///
/// Args:
///     n: Filter order
///     f: Band edge pairs in [0, 1]
///     a: Desired amplitude at each band edge
///     w: Weight per band
///     ftype: 'bandpass', 'hilbert' or 'differentiator'
///     lgrid: Grid density (at least 16)
#[pyfunction]
#[pyo3(signature = (n, f, a, w=None, ftype="bandpass", lgrid=None))]
pub fn firpm<'py>(
    py: Python<'py>,
    n: usize,
    f: Vec<f64>,
    a: Vec<f64>,
    w: Option<Vec<f64>>,
    ftype: &str,
    lgrid: Option<usize>,
) -> PyResult<PyTf<'py>> {
    let ftype: RemezType = ftype.parse()?;
    Ok(to_numpy(py, filters::firpm(n, &f, &a, w.as_deref(), ftype, lgrid)?))
}

/// Second-order notch filter
#[pyfunction]
pub fn iirnotch<'py>(py: Python<'py>, w0: f64, bw: f64) -> PyResult<PyTf<'py>> {
    Ok(to_numpy(py, filters::iirnotch(w0, bw)?))
}

/// Second-order peaking filter
#[pyfunction]
pub fn iirpeak<'py>(py: Python<'py>, w0: f64, bw: f64) -> PyResult<PyTf<'py>> {
    Ok(to_numpy(py, filters::iirpeak(w0, bw)?))
}

/// Stateful filter exposed to Python
#[pyclass(name = "TransferFilter")]
pub struct PyTransferFilter {
    filter: TransferFilter,
}

#[pymethods]
impl PyTransferFilter {
    /// Create a filter from a (b, a) system
    #[new]
    fn new(system: System) -> PyResult<Self> {
        let (b, a) = unpack_system(system);
        Ok(Self {
            filter: TransferFilter::new(&b, &a)?,
        })
    }

    /// Process a block of samples
    ///
    /// Args:
    ///     input_signal: Input samples as numpy array
    ///
    /// Returns:
    ///     Filtered output as numpy array
    fn process_block<'py>(
        &mut self,
        py: Python<'py>,
        input_signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let mut output = input_signal.as_array().to_vec();
        self.filter.process_block_inplace(&mut output);

        Ok(PyArray1::from_vec(py, output))
    }

    /// Reset filter state
    fn reset(&mut self) {
        self.filter.reset();
    }

    /// Get (b, a), normalized so that a[0] == 1
    fn get_coefficients<'py>(&self, py: Python<'py>) -> PyTf<'py> {
        (
            PyArray1::from_slice(py, self.filter.numerator()),
            PyArray1::from_slice(py, self.filter.denominator()),
        )
    }

    /// Update filter coefficients
    fn update_coefficients(&mut self, system: System) -> PyResult<()> {
        let (b, a) = unpack_system(system);
        self.filter.update_coefficients(&b, &a)?;
        Ok(())
    }

    /// Design a Kaiser-window filter and wrap it
    #[staticmethod]
    #[pyo3(signature = (f, a, dev, fs=2.0))]
    fn from_kaiserord(f: Vec<f64>, a: Vec<f64>, dev: FloatOrList, fs: f64) -> PyResult<Self> {
        let tf = filters::kaiserord(&f, &a, &dev.into_vec(), fs)?.design()?;
        Ok(Self {
            filter: TransferFilter::from_tf(&tf)?,
        })
    }
}
