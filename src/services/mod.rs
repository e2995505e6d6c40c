pub mod gateway;
pub mod normalizer;

pub use gateway::{ContractGateway, ContractService};
pub use normalizer::build_payload;
