use std::fmt;

use crate::error::ConfigError;

/// The closed set of run config shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    DeepSdf,
    Ngp,
}

const DEEPSDF_KEYS: &[&str] = &[
    "identifier",
    "trainer",
    "data",
    "optimizer",
    "scheduler",
    "seed",
    "test",
    "epochs",
];

const NGP_KEYS: &[&str] = &[
    "identifier",
    "trainer",
    "data",
    "optimizer",
    "scheduler",
    "model",
    "hash_grid",
    "reg_grid",
    "seed",
    "test",
    "epochs",
];

impl ConfigKind {
    pub const ALL: [ConfigKind; 2] = [ConfigKind::DeepSdf, ConfigKind::Ngp];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKind::DeepSdf => "deepsdf",
            ConfigKind::Ngp => "ngp",
        }
    }

    /// Identifier written into freshly built configs of this kind.
    pub fn default_identifier(&self) -> &'static str {
        match self {
            ConfigKind::DeepSdf => "config.config_deepsdf.Config",
            ConfigKind::Ngp => "config.config_ngp.Config",
        }
    }

    /// Top-level keys a document of this kind carries, in canonical order.
    pub fn top_level_keys(&self) -> &'static [&'static str] {
        match self {
            ConfigKind::DeepSdf => DEEPSDF_KEYS,
            ConfigKind::Ngp => NGP_KEYS,
        }
    }

    /// Resolve a dotted config-class label such as `config.config_ngp.Config`.
    ///
    /// Matching is on the dotted segments, so `config_deepsdf.Config`,
    /// `deepsdf.Config` and the bare kind name all resolve.
    pub fn from_identifier(identifier: &str) -> Result<Self, ConfigError> {
        let trimmed = identifier.trim();
        for segment in trimmed.split('.') {
            let segment = segment.to_ascii_lowercase();
            let stem = segment.strip_prefix("config_").unwrap_or(&segment);
            match stem {
                "deepsdf" => return Ok(ConfigKind::DeepSdf),
                "ngp" => return Ok(ConfigKind::Ngp),
                _ => {}
            }
        }
        Err(ConfigError::UnknownIdentifier(trimmed.to_string()))
    }

    pub fn parse_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_dotted_identifiers() {
        assert_eq!(
            ConfigKind::from_identifier("config.config_deepsdf.Config").unwrap(),
            ConfigKind::DeepSdf
        );
        assert_eq!(
            ConfigKind::from_identifier("config.config_ngp.Config").unwrap(),
            ConfigKind::Ngp
        );
        assert_eq!(ConfigKind::from_identifier("NGP").unwrap(), ConfigKind::Ngp);
    }

    #[test]
    fn rejects_unrelated_identifier() {
        let err = ConfigKind::from_identifier("config.config_nerf.Config").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownIdentifier(id) if id == "config.config_nerf.Config"));
    }

    #[test]
    fn ngp_keys_extend_deepsdf_keys() {
        for key in ConfigKind::DeepSdf.top_level_keys() {
            assert!(ConfigKind::Ngp.top_level_keys().contains(key));
        }
        assert_eq!(ConfigKind::Ngp.top_level_keys().len(), 11);
    }
}
