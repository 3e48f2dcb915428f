//! PyO3 bindings for Python integration
//!
//! Functions take MATLAB-style arguments: a cutoff may be a float or a list,
//! a filter is passed as a `(b, a)` tuple where either side may be a scalar.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::args::Frequency;
use crate::error::ValidationError;
use crate::filters::WindowType;

mod filter_bindings;
mod spectrum_bindings;

impl From<ValidationError> for PyErr {
    fn from(err: ValidationError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// A float or a sequence of floats
#[derive(FromPyObject, Clone)]
pub enum FloatOrList {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl FloatOrList {
    fn into_vec(self) -> Vec<f64> {
        match self {
            FloatOrList::Scalar(v) => vec![v],
            FloatOrList::Sequence(v) => v,
        }
    }

    fn into_frequency(self) -> Result<Frequency, ValidationError> {
        match self {
            FloatOrList::Scalar(v) => Ok(Frequency::Scalar(v)),
            FloatOrList::Sequence(v) => Frequency::try_from(v),
        }
    }
}

/// `(b, a)` transfer function tuple
pub type System = (FloatOrList, FloatOrList);

pub(crate) fn unpack_system(system: System) -> (Vec<f64>, Vec<f64>) {
    (system.0.into_vec(), system.1.into_vec())
}

/// Window argument: a name, or `('kaiser', beta)`
#[derive(FromPyObject)]
pub enum WindowArg {
    Name(String),
    Parameterized((String, f64)),
}

impl WindowArg {
    fn resolve(self) -> Result<WindowType, ValidationError> {
        match self {
            WindowArg::Name(name) => name.parse(),
            WindowArg::Parameterized((name, beta)) if name.eq_ignore_ascii_case("kaiser") => {
                Ok(WindowType::Kaiser(beta))
            }
            WindowArg::Parameterized((name, _)) => Err(ValidationError::UnknownWindow(name)),
        }
    }
}

/// Python module definition
#[pymodule]
fn filter_designer(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(filter_bindings::kaiserord, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::polystab, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::polyscale, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::fir1, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::fir2, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::firls, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::firpm, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::sgolay, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::butter, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::cheby1, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::cheby2, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::ellip, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::buttord, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::cheb1ord, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::cheb2ord, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::ellipord, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::iirnotch, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::iirpeak, m)?)?;
    m.add_class::<filter_bindings::PyTransferFilter>()?;

    m.add_function(wrap_pyfunction!(spectrum_bindings::freqz, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::phasez, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::grpdelay, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::impz, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::tf2zpk, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::isstable, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::isminphase, m)?)?;

    Ok(())
}
