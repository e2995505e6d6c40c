pub mod contract;
pub mod payload;
pub mod request;
pub mod response;

pub use contract::*;
pub use payload::*;
pub use request::*;
pub use response::*;
