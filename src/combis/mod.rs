pub mod core;
pub mod counters;


pub use self::core::*;
pub use self::counters::*;
