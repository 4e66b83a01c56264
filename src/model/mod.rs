//! Sample cloud resources with their stable, alpha and beta representations.

pub mod address;
pub mod error;
pub mod forwarding_rule;

pub use address::*;
pub use error::ModelError;
pub use forwarding_rule::*;
