//! Config sections shared by both run kinds, plus the ngp-only model and grid sections.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrainerConfig {
    pub name: String,
    pub eval_interval: u32,
    /// `latest`, `best`, `scratch`, or a checkpoint path.
    pub use_checkpoint: String,
    pub workspace: PathBuf,
    #[serde(rename = "use_tensorboardX")]
    pub use_tensorboard: bool,
    pub max_keep_ckpt: u32,
    pub local_rank: u32,
    pub world_size: u32,
    pub ema_decay: f64,
    pub data_loss_weight: f64,
    pub reg_loss_weight: f64,
    /// Marching-cubes resolution of the exported mesh.
    pub resolution: u32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            name: "deepsdf".to_string(),
            eval_interval: 1,
            use_checkpoint: "latest".to_string(),
            workspace: PathBuf::from("workspace/deepsdf/bathtub_0025"),
            use_tensorboard: true,
            max_keep_ckpt: 2,
            local_rank: 0,
            world_size: 1,
            ema_decay: 0.95,
            data_loss_weight: 1.0,
            reg_loss_weight: 1.0,
            resolution: 256,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("trainer.name", &self.name)?;
        require_path("trainer.workspace", &self.workspace)?;
        require_positive("trainer.eval_interval", self.eval_interval)?;
        require_positive("trainer.max_keep_ckpt", self.max_keep_ckpt)?;
        require_positive("trainer.world_size", self.world_size)?;
        require_positive("trainer.resolution", self.resolution)?;
        if self.local_rank >= self.world_size {
            return Err(ValidationError::RankOutsideWorld {
                local_rank: self.local_rank,
                world_size: self.world_size,
            });
        }
        require_range("trainer.ema_decay", self.ema_decay, 0.0..=1.0, "[0, 1]")?;
        require_non_negative("trainer.data_loss_weight", self.data_loss_weight)?;
        require_non_negative("trainer.reg_loss_weight", self.reg_loss_weight)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub dataset_path: PathBuf,
    pub train_size: u32,
    pub valid_size: u32,
    pub num_samples_surf: u32,
    pub num_samples_space: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/ModelNet10_preprocessed/bathtub/bathtub_0025.obj"),
            train_size: 100,
            valid_size: 1,
            num_samples_surf: 20_000,
            num_samples_space: 10_000,
        }
    }
}

impl DataConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_path("data.dataset_path", &self.dataset_path)?;
        require_positive("data.train_size", self.train_size)?;
        require_positive("data.valid_size", self.valid_size)?;
        require_positive("data.num_samples_surf", self.num_samples_surf)?;
        require_positive("data.num_samples_space", self.num_samples_space)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OptimizerKind {
    Adam,
    AdamW,
    #[serde(rename = "SGD")]
    Sgd,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OptimizerConfig {
    #[serde(rename = "type")]
    pub kind: OptimizerKind,
    pub lr: f64,
    pub weight_decay: f64,
    pub betas: [f64; 2],
    pub eps: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            kind: OptimizerKind::Adam,
            lr: 1e-3,
            weight_decay: 1e-6,
            betas: [0.9, 0.999],
            eps: 1e-15,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_strictly_positive("optimizer.lr", self.lr)?;
        require_strictly_positive("optimizer.eps", self.eps)?;
        require_non_negative("optimizer.weight_decay", self.weight_decay)?;
        for beta in self.betas {
            if !(0.0..1.0).contains(&beta) {
                return Err(ValidationError::OutOfRange {
                    field: "optimizer.betas",
                    value: beta,
                    range: "[0, 1)",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SchedulerKind {
    #[serde(rename = "StepLR")]
    StepLr,
    #[serde(rename = "ExponentialLR")]
    ExponentialLr,
    #[serde(rename = "ConstantLR")]
    ConstantLr,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    #[serde(rename = "type")]
    pub kind: SchedulerKind,
    /// Epochs between learning-rate decays (StepLR only).
    pub step_size: u32,
    pub gamma: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            kind: SchedulerKind::StepLr,
            step_size: 10,
            gamma: 1.0,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind == SchedulerKind::StepLr {
            require_positive("scheduler.step_size", self.step_size)?;
        }
        require_strictly_positive("scheduler.gamma", self.gamma)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    HashGrid,
    RegGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub num_layers: u32,
    pub hidden_dim: u32,
    pub encoding: Encoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_sdf: Option<f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_layers: 3,
            hidden_dim: 64,
            encoding: Encoding::HashGrid,
            clip_sdf: None,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("model.num_layers", self.num_layers)?;
        require_positive("model.hidden_dim", self.hidden_dim)?;
        if let Some(clip) = self.clip_sdf {
            require_strictly_positive("model.clip_sdf", clip)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HashGridConfig {
    pub num_levels: u32,
    pub level_dim: u32,
    pub base_resolution: u32,
    pub log2_hashmap_size: u32,
    pub desired_resolution: u32,
    /// Half-extent of the encoded cube.
    pub bound: f64,
}

impl Default for HashGridConfig {
    fn default() -> Self {
        Self {
            num_levels: 16,
            level_dim: 2,
            base_resolution: 16,
            log2_hashmap_size: 19,
            desired_resolution: 2048,
            bound: 1.0,
        }
    }
}

impl HashGridConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("hash_grid.num_levels", self.num_levels)?;
        require_positive("hash_grid.level_dim", self.level_dim)?;
        require_positive("hash_grid.base_resolution", self.base_resolution)?;
        require_range(
            "hash_grid.log2_hashmap_size",
            f64::from(self.log2_hashmap_size),
            1.0..=32.0,
            "[1, 32]",
        )?;
        if self.desired_resolution < self.base_resolution {
            return Err(ValidationError::ResolutionOrder {
                base: self.base_resolution,
                desired: self.desired_resolution,
            });
        }
        require_strictly_positive("hash_grid.bound", self.bound)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegularGridConfig {
    pub resolution: u32,
    pub feature_dim: u32,
    pub bound: f64,
}

impl Default for RegularGridConfig {
    fn default() -> Self {
        Self {
            resolution: 128,
            feature_dim: 8,
            bound: 1.0,
        }
    }
}

impl RegularGridConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("reg_grid.resolution", self.resolution)?;
        require_positive("reg_grid.feature_dim", self.feature_dim)?;
        require_strictly_positive("reg_grid.bound", self.bound)?;
        Ok(())
    }
}

pub(crate) fn require_positive(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(())
}

fn require_strictly_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            range: "(0, inf)",
        });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            range: "[0, inf)",
        });
    }
    Ok(())
}

fn require_range(
    field: &'static str,
    value: f64,
    range: std::ops::RangeInclusive<f64>,
    label: &'static str,
) -> Result<(), ValidationError> {
    if value.is_nan() || !range.contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            range: label,
        });
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

fn require_path(field: &'static str, value: &Path) -> Result<(), ValidationError> {
    if value.as_os_str().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
