//! Core math modules.

pub mod binomial;
pub mod erf;
pub mod gamma;
pub mod kolmogorov;
pub mod poisson;
pub mod stable;
