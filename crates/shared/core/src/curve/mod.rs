//! Bonding curve pricing
//!
//! Linear price-vs-supply curve: `price(s) = P0 + s / K`, where `P0` is the
//! initial reserve price and `K` the scaling factor. Trades are priced by the
//! integral of this curve over the supply interval they move through.

mod math;
mod params;
pub mod wide;

pub use math::CurveMath;
pub use params::CurveParameters;
