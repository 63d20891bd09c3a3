pub mod types;
pub mod queries;
pub mod workflow;

pub use types::*;
pub use queries::*;
pub use workflow::*;
