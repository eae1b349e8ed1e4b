//! Shared run configuration contracts for the deepsdf and ngp trainers.
//!
//! A run config is a single YAML document. Its `identifier` field is resolved
//! into a [`ConfigKind`] at load time, which fixes the set of top-level keys and
//! the record shape the document is decoded into.

pub mod error;
pub mod kind;
pub mod load;
pub mod sections;

pub use error::{ConfigError, ValidationError};
pub use kind::ConfigKind;
pub use load::{DeepSdfConfig, NgpConfig, RunConfig};
pub use sections::{
    DataConfig, Encoding, HashGridConfig, ModelConfig, OptimizerConfig, OptimizerKind,
    RegularGridConfig, SchedulerConfig, SchedulerKind, TrainerConfig,
};
