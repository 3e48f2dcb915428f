//! Filter Designer - MATLAB-style digital filter design
//!
//! Kaiser order estimation, polynomial stabilization, FIR/IIR design and
//! filter analysis, with optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod args;
pub mod error;
pub mod filters;
pub mod polynomial;
pub mod special;
pub mod spectrum;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use args::{Domain, FilterType, Frequency};
pub use error::{Result, ValidationError};
pub use filters::{KaiserResult, TransferFunction, WindowType, kaiserord};
pub use polynomial::{polyscale, polystab};
pub use spectrum::{FreqzOptions, FrequencyResponse};
