use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::FeatureField;

/// 档案中的原始取值
///
/// 与表单输入一样保留原始文本，是否为合法数值交给提交流程判断。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Integer(v) => write!(f, "{}", v),
            RawValue::Float(v) => write!(f, "{}", v),
            RawValue::Text(v) => f.write_str(v),
        }
    }
}

/// 球员档案（TOML）
///
/// ```toml
/// name = "Sample Guard"
/// team = "BOS"
///
/// [features]
/// AGE = 26
/// PLAYER_HEIGHT_INCHES = 78
/// USG_PCT = 23.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, RawValue>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl PlayerProfile {
    /// 按约定键名取值，找不到时再尝试表单元素 id
    pub fn raw_value(&self, field: FeatureField) -> Option<String> {
        self.features
            .get(field.key())
            .or_else(|| self.features.get(field.element_id()))
            .map(|v| v.to_string())
    }

    /// 档案中缺失的字段
    pub fn missing_fields(&self) -> Vec<FeatureField> {
        FeatureField::ALL
            .into_iter()
            .filter(|f| self.raw_value(*f).is_none())
            .collect()
    }

    /// 不属于九个特征的键（既不是约定键名也不是表单元素 id）
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.features
            .keys()
            .map(String::as_str)
            .filter(|key| {
                FeatureField::from_key(key).is_none()
                    && !FeatureField::ALL.iter().any(|f| f.element_id() == *key)
            })
            .collect()
    }

    /// 用于日志的显示名称
    pub fn display_name(&self) -> String {
        match &self.team {
            Some(team) => format!("{} ({})", self.name, team),
            None => self.name.clone(),
        }
    }
}
