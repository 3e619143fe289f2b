//! Tool adapter
//!
//! Converts the registry's remote tool declarations into locally invocable,
//! schema-checked operations:
//!
//! - `ToolDescriptor` / `ParamType`: parameter metadata validated once at
//!   discovery time
//! - `ToolAdapter`: name/argument checking, forwarding, and the bridge from
//!   model tool calls to transcript tool results

mod schema;
mod tools;

pub use schema::{ParamSpec, ParamType, ToolDescriptor};
pub use tools::{ToolAdapter, ToolOutput};
