//! FIR and IIR filter design and filtering

pub mod windows;
pub mod kaiserord;
pub mod design;
pub mod iir;
pub mod iirord;
pub mod remez;
pub mod lfilter;

pub use windows::{WindowType, generate_window, bessel_i0};
pub use kaiserord::{KaiserResult, kaiser_beta, kaiserord};
pub use design::{TransferFunction, Fir2Options, firwin, fir1, fir2, firls, sgolay};
pub use iir::{Zpk, butter, cheby1, cheby2, ellip, iirnotch, iirpeak};
pub use iirord::{IirOrder, buttord, cheb1ord, cheb2ord, ellipord};
pub use remez::{RemezType, firpm};
pub use lfilter::{TransferFilter, lfilter};
