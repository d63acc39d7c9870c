//! Movement/obligation matching engine
//!
//! Pure scoring only; candidate assembly and persistence live in the
//! services layer.

pub mod score;
pub mod text;

pub use score::{score, MatchScore, MatchWeights};
pub use text::similarity;
