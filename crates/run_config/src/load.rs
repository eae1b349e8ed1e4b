use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{ConfigError, ValidationError};
use crate::kind::ConfigKind;
use crate::sections::{
    require_positive, DataConfig, HashGridConfig, ModelConfig, OptimizerConfig,
    RegularGridConfig, SchedulerConfig, TrainerConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeepSdfConfig {
    pub identifier: String,
    pub trainer: TrainerConfig,
    pub data: DataConfig,
    pub optimizer: OptimizerConfig,
    pub scheduler: SchedulerConfig,
    pub seed: u64,
    pub test: bool,
    pub epochs: u32,
}

impl Default for DeepSdfConfig {
    fn default() -> Self {
        Self {
            identifier: ConfigKind::DeepSdf.default_identifier().to_string(),
            trainer: TrainerConfig::default(),
            data: DataConfig::default(),
            optimizer: OptimizerConfig::default(),
            scheduler: SchedulerConfig::default(),
            seed: 0,
            test: false,
            epochs: 10,
        }
    }
}

impl DeepSdfConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("epochs", self.epochs)?;
        self.trainer.validate()?;
        self.data.validate()?;
        self.optimizer.validate()?;
        self.scheduler.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NgpConfig {
    pub identifier: String,
    pub trainer: TrainerConfig,
    pub data: DataConfig,
    pub optimizer: OptimizerConfig,
    pub scheduler: SchedulerConfig,
    pub model: ModelConfig,
    pub hash_grid: HashGridConfig,
    pub reg_grid: RegularGridConfig,
    pub seed: u64,
    pub test: bool,
    pub epochs: u32,
}

impl Default for NgpConfig {
    fn default() -> Self {
        Self {
            identifier: ConfigKind::Ngp.default_identifier().to_string(),
            trainer: TrainerConfig {
                name: "ngp".to_string(),
                workspace: "workspace/ngp/bathtub_0025".into(),
                ..TrainerConfig::default()
            },
            data: DataConfig::default(),
            optimizer: OptimizerConfig::default(),
            scheduler: SchedulerConfig::default(),
            model: ModelConfig::default(),
            hash_grid: HashGridConfig::default(),
            reg_grid: RegularGridConfig::default(),
            seed: 0,
            test: false,
            epochs: 10,
        }
    }
}

impl NgpConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("epochs", self.epochs)?;
        self.trainer.validate()?;
        self.data.validate()?;
        self.optimizer.validate()?;
        self.scheduler.validate()?;
        self.model.validate()?;
        self.hash_grid.validate()?;
        self.reg_grid.validate()
    }
}

/// A decoded run config; the variant is chosen by the document's `identifier`.
#[derive(Debug, Clone, PartialEq)]
pub enum RunConfig {
    DeepSdf(DeepSdfConfig),
    Ngp(NgpConfig),
}

impl RunConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|err| err.in_file(path))
    }

    /// Load and validate in one step.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_path(path)?;
        config.validate().map_err(|err| err.in_file(path))?;
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let value = strip_tags(serde_yaml::from_str::<Value>(raw)?);
        let mapping = value.as_mapping().ok_or(ConfigError::NotAMapping)?;
        let identifier = mapping
            .get("identifier")
            .and_then(Value::as_str)
            .ok_or(ConfigError::MissingIdentifier)?;
        let kind = ConfigKind::from_identifier(identifier)?;
        check_key_set(kind, mapping)?;
        match kind {
            ConfigKind::DeepSdf => Ok(RunConfig::DeepSdf(serde_yaml::from_value(value)?)),
            ConfigKind::Ngp => Ok(RunConfig::Ngp(serde_yaml::from_value(value)?)),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        let out = match self {
            RunConfig::DeepSdf(cfg) => serde_yaml::to_string(cfg)?,
            RunConfig::Ngp(cfg) => serde_yaml::to_string(cfg)?,
        };
        Ok(out)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let yaml = self.to_yaml_string()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn kind(&self) -> ConfigKind {
        match self {
            RunConfig::DeepSdf(_) => ConfigKind::DeepSdf,
            RunConfig::Ngp(_) => ConfigKind::Ngp,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = match self {
            RunConfig::DeepSdf(cfg) => cfg.validate(),
            RunConfig::Ngp(cfg) => cfg.validate(),
        };
        result.map_err(|source| ConfigError::Invalid {
            kind: self.kind(),
            source,
        })
    }

    pub fn identifier(&self) -> &str {
        match self {
            RunConfig::DeepSdf(cfg) => &cfg.identifier,
            RunConfig::Ngp(cfg) => &cfg.identifier,
        }
    }

    pub fn trainer(&self) -> &TrainerConfig {
        match self {
            RunConfig::DeepSdf(cfg) => &cfg.trainer,
            RunConfig::Ngp(cfg) => &cfg.trainer,
        }
    }

    pub fn data(&self) -> &DataConfig {
        match self {
            RunConfig::DeepSdf(cfg) => &cfg.data,
            RunConfig::Ngp(cfg) => &cfg.data,
        }
    }

    pub fn epochs(&self) -> u32 {
        match self {
            RunConfig::DeepSdf(cfg) => cfg.epochs,
            RunConfig::Ngp(cfg) => cfg.epochs,
        }
    }

    pub fn seed(&self) -> u64 {
        match self {
            RunConfig::DeepSdf(cfg) => cfg.seed,
            RunConfig::Ngp(cfg) => cfg.seed,
        }
    }
}

fn check_key_set(kind: ConfigKind, mapping: &Mapping) -> Result<(), ConfigError> {
    let expected = kind.top_level_keys();
    let present: Vec<String> = mapping
        .keys()
        .map(|key| match key.as_str() {
            Some(name) => name.to_string(),
            None => format!("{key:?}"),
        })
        .collect();
    let missing: Vec<String> = expected
        .iter()
        .filter(|key| !present.iter().any(|p| p == *key))
        .map(|key| key.to_string())
        .collect();
    let unexpected: Vec<String> = present
        .into_iter()
        .filter(|key| !expected.contains(&key.as_str()))
        .collect();
    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }
    Err(ConfigError::KeySet {
        kind,
        missing,
        unexpected,
    })
}

/// Drop YAML tags such as `!!python/tuple`, keeping the tagged value.
fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(strip_tags).collect()),
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(k, v)| (strip_tags(k), strip_tags(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TUPLE_BETAS: &str = "\
identifier: config.config_deepsdf.Config
trainer:
  name: deepsdf
  eval_interval: 1
  use_checkpoint: latest
  workspace: workspace/deepsdf/chair_0001
  use_tensorboardX: true
  max_keep_ckpt: 2
  local_rank: 0
  world_size: 1
  ema_decay: 0.95
  data_loss_weight: 1
  reg_loss_weight: 1
  resolution: 256
data:
  dataset_path: data/ModelNet10_preprocessed/chair/chair_0001.obj
  train_size: 100
  valid_size: 1
  num_samples_surf: 20000
  num_samples_space: 10000
optimizer:
  type: Adam
  lr: 0.001
  weight_decay: 1.0e-06
  betas: !!python/tuple
  - 0.9
  - 0.999
  eps: 1.0e-15
scheduler:
  type: StepLR
  step_size: 10
  gamma: 1
seed: 0
test: false
epochs: 10
";

    #[test]
    fn python_tuple_tag_is_accepted_for_betas() {
        let cfg = RunConfig::from_yaml_str(TUPLE_BETAS).unwrap();
        match cfg {
            RunConfig::DeepSdf(cfg) => {
                assert_eq!(cfg.optimizer.betas, [0.9, 0.999]);
                assert_eq!(cfg.trainer.data_loss_weight, 1.0);
            }
            other => panic!("expected deepsdf, got {:?}", other.kind()),
        }
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        let err = RunConfig::from_yaml_str("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping));
    }

    #[test]
    fn missing_identifier_is_reported() {
        let err = RunConfig::from_yaml_str("epochs: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentifier));
    }
}
