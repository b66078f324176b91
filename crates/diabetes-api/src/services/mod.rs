//! 비즈니스 서비스.

pub mod prediction;

pub use prediction::{classify, round_percent, Classification, PredictionService};
