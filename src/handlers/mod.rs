pub mod contracts;
pub mod health;

pub use contracts::*;
pub use health::*;
