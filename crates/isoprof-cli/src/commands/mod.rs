pub mod axial;
pub mod config;
pub mod fit;
