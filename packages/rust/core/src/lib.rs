//! Dispatch core for SourceBridge.
//!
//! The [`Dispatcher`] binds every operation name to its parameter schema
//! and its remote call. Around it sit the filter builder, the usage
//! pagination harness, completion polling and the result envelope.

pub mod catalog;
pub mod envelope;
pub mod filter;
pub mod ops;
pub mod pagination;
pub mod polling;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::Operation;
pub use envelope::{TextContent, ToolResult};
pub use filter::{FilterParams, filter_from_args, filter_params};
pub use pagination::{clean_record, collect_usage, paginate};
pub use polling::{
    CompletionState, CompletionTarget, WaitOutcome, check_completion, wait_for_completion,
};
pub use registry::{Clock, Dispatcher, ToolDescriptor, tool_descriptors};
