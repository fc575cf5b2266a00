pub mod anchor;
pub mod choice;
pub mod edit;
pub mod lamby;
pub mod manifest;
pub mod plan;
pub mod report;
pub mod resolved;
pub mod template;
pub mod utils;
pub mod write;

pub use utils::{Error, Result};
