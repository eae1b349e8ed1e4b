//! Rendering of training and comparison invocations.

pub mod builder;
pub mod common;

pub use builder::{compare_command, one_liner, render_template, train_command, Shell};
pub use common::ProcessCommand;
