//! 节点配置
//!
//! TOML 配置文件 + 命令行覆盖。所有字段有默认值，不给配置文件
//! 也能以标称 1 kHz 跑起来。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// 节点配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// 控制频率（Hz）
    pub frequency_hz: f64,

    /// 最大 tick 次数（None 表示一直跑到收到停止信号）
    pub max_ticks: Option<u64>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            frequency_hz: 1000.0,
            max_ticks: None,
        }
    }
}

impl NodeConfig {
    /// 从 TOML 文件加载配置
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: NodeConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.frequency_hz, 1000.0);
        assert_eq!(config.max_ticks, None);
    }

    #[test]
    fn test_parse_toml() {
        let config: NodeConfig = toml::from_str(
            r#"
            frequency_hz = 500.0
            max_ticks = 1000
            "#,
        )
        .unwrap();
        assert_eq!(config.frequency_hz, 500.0);
        assert_eq!(config.max_ticks, Some(1000));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<NodeConfig, _> = toml::from_str("frequncy_hz = 500.0");
        assert!(result.is_err());
    }
}
