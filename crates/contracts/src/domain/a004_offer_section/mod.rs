mod aggregate;

pub use aggregate::*;
