//! Primitives shared between the tiffout crates

pub mod byte_order;
pub mod math;
pub mod tag;
pub mod utils;
