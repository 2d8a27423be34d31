pub mod abi;
pub mod actors;
pub mod config;
pub mod error;
pub mod helpers;
pub mod providers;
pub mod types;
pub mod workflow;

pub use abi::*;
pub use actors::*;
pub use config::*;
pub use error::*;
pub use helpers::*;
pub use providers::*;
pub use types::*;
pub use workflow::*;
