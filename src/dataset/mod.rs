// In-memory tables consumed by the similarity engine

pub mod categorical;
pub mod numeric;

pub use categorical::*;
pub use numeric::*;
