//! eqstats math utilities.

pub mod math;

pub use math::binomial::*;
pub use math::erf::*;
pub use math::gamma::*;
pub use math::kolmogorov::*;
pub use math::poisson::*;
pub use math::stable::*;
