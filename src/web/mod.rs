pub mod error_code;
mod gateway;
pub mod router;

pub use gateway::Gateway;
