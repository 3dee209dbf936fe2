//! Tool execution framework for the agent
//!
//! The model never sees registry tools directly. It is given two meta-tools,
//! `list_tools` and `call_tool`, and [`MetaToolExecutor`] carries those calls
//! to a tool server through a [`ToolTransport`](crate::transport::ToolTransport).

pub mod catalog;
pub mod executor;
pub mod meta;

// Re-export commonly used types
pub use catalog::{meta_tool_catalog, CALL_TOOL, LIST_TOOLS};
pub use executor::ToolExecutor;
pub use meta::MetaToolExecutor;
