//! Tool-Call Protocol (C3, §4.3): catalog, prompt templating, permissive
//! parsing of LM text into typed tool invocations, and dispatch.

pub mod catalog;
pub mod dispatch;
pub mod format;
pub mod parser;

pub use catalog::{catalog as tool_catalog, tool_prompt_block};
pub use dispatch::{dispatch, SubAgentRunner};
pub use format::format_search_results;
pub use parser::parse_tool_calls;
