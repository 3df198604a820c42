use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for `{field}`")]
    InvalidValue { field: String, value: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 文件大小档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBucket {
    Small,
    #[default]
    Medium,
    Large,
}

/// 文件保护级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protection {
    #[default]
    None,
    Password,
    Confidential,
    HighlyConfidential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    #[default]
    Xlsx,
    Xls,
    Csv,
    Other,
}

/// 随录屏一起提交的运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub scenario_id: String,
    pub source_apps: Vec<String>,
    pub file_size_bucket: SizeBucket,
    pub protection_level: Protection,
    #[serde(default)]
    pub file_type: FileType,
    #[serde(default)]
    pub notes: Option<String>,
}

const DEFAULT_SOURCE_APPS: &str = "Outlook,ExcelPreviewer,ExcelDesktop";

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Self::parse_bytes(&bytes)
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// 依次尝试 YAML、JSON5，最后按 `key: value` 逐行解析，缺失字段取默认值
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        match serde_yaml::from_str::<RunConfig>(text) {
            Ok(config) => return Ok(config),
            Err(e) => debug!("run config is not YAML: {}", e),
        }
        match json5::from_str::<RunConfig>(text) {
            Ok(config) => return Ok(config),
            Err(e) => debug!("run config is not JSON5: {}", e),
        }
        Self::parse_key_values(text)
    }

    fn parse_key_values(text: &str) -> Result<Self, ConfigError> {
        let mut kv: HashMap<&str, &str> = HashMap::new();
        for line in text.lines() {
            if let Some((key, value)) = line.split_once(':') {
                kv.insert(key.trim(), value.trim());
            }
        }

        let scenario_id = match kv.get("scenario_id") {
            Some(id) => id.to_string(),
            None => default_scenario_id(),
        };
        let source_apps = kv
            .get("source_apps")
            .copied()
            .unwrap_or(DEFAULT_SOURCE_APPS)
            .split(',')
            .map(str::trim)
            .filter(|app| !app.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            scenario_id,
            source_apps,
            file_size_bucket: parse_enum(&kv, "file_size_bucket", "medium")?,
            protection_level: parse_enum(&kv, "protection_level", "none")?,
            file_type: parse_enum(&kv, "file_type", "xlsx")?,
            notes: Some(kv.get("notes").copied().unwrap_or("").to_string()),
        })
    }
}

pub fn default_scenario_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("scenario_{}", &id[..8])
}

fn parse_enum<T: DeserializeOwned>(
    kv: &HashMap<&str, &str>,
    field: &str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = kv.get(field).copied().unwrap_or(default);
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    })
}
