pub mod common;
pub mod logging;

pub use common::{DispatchArgs, DispatchOpts, ModelArg, RootOverrideArgs, ShellArg, ToolConfigArgs};
pub use logging::init_tracing;
