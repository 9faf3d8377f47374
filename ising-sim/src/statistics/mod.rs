pub mod autocorrelation;
pub mod stats;

pub use autocorrelation::{sokal_tau, AutocorrAccum};
pub use stats::Statistics;
