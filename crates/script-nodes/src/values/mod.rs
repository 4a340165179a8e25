//! Value nodes
//!
//! Pure nodes producing constants and arithmetic results. They run on demand
//! when a consumer reads one of their outputs.

mod add;
mod boolean;
mod greater_than;
mod integer;

pub use add::AddNode;
pub use boolean::BooleanNode;
pub use greater_than::GreaterThanNode;
pub use integer::IntegerNode;
