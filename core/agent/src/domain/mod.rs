//! agent 固有のドメイン型（型と不変条件）

pub mod command;
pub mod context;
pub mod memory;
pub mod response;
pub mod time_expr;

pub use command::AgentCommand;
pub use context::{context_str, parse_context_pairs, Context};
pub use memory::{Memory, Note, Reminder, Task};
pub use response::{Metadata, Response, Stage, INTENT_ERROR};
