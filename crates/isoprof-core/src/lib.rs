pub mod axial;
pub mod consts;
pub mod error;
pub mod fit;
pub mod frame;
pub mod sample;
pub mod smooth;
pub mod stats;
pub mod uncertainty;

pub use error::{IsoprofError, Result};
pub use fit::{fit_isophotes, fit_isophotes_reported, fit_isophotes_with_rng, FitConfig, FittedProfile, IsophoteGuess};
pub use frame::{Center, Frame};
