use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use crate::error::{PredictError, PredictResult};

/// 模型接受的九个特征字段
///
/// 顺序与评分服务的特征顺序一致，`key()` 是与服务约定的请求体键名，
/// 不能随意改动。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureField {
    Age,
    PlayerHeightInches,
    PlayerWeight,
    UsgPct,
    AvgSecPerTouch,
    AvgDribPerTouch,
    ElbowTouches,
    PostTouches,
    PaintTouches,
}

impl FeatureField {
    /// 字段数量
    pub const COUNT: usize = 9;

    /// 按服务约定顺序排列的全部字段
    pub const ALL: [FeatureField; FeatureField::COUNT] = [
        FeatureField::Age,
        FeatureField::PlayerHeightInches,
        FeatureField::PlayerWeight,
        FeatureField::UsgPct,
        FeatureField::AvgSecPerTouch,
        FeatureField::AvgDribPerTouch,
        FeatureField::ElbowTouches,
        FeatureField::PostTouches,
        FeatureField::PaintTouches,
    ];

    /// 请求体中的键名
    pub fn key(self) -> &'static str {
        match self {
            FeatureField::Age => "AGE",
            FeatureField::PlayerHeightInches => "PLAYER_HEIGHT_INCHES",
            FeatureField::PlayerWeight => "PLAYER_WEIGHT",
            FeatureField::UsgPct => "USG_PCT",
            FeatureField::AvgSecPerTouch => "AVG_SEC_PER_TOUCH",
            FeatureField::AvgDribPerTouch => "AVG_DRIB_PER_TOUCH",
            FeatureField::ElbowTouches => "ELBOW_TOUCHES",
            FeatureField::PostTouches => "POST_TOUCHES",
            FeatureField::PaintTouches => "PAINT_TOUCHES",
        }
    }

    /// 表单中默认的元素 id
    pub fn element_id(self) -> &'static str {
        match self {
            FeatureField::Age => "age",
            FeatureField::PlayerHeightInches => "player_height_inches",
            FeatureField::PlayerWeight => "player_weight",
            FeatureField::UsgPct => "usg_pct",
            FeatureField::AvgSecPerTouch => "avg_sec_per_touch",
            FeatureField::AvgDribPerTouch => "avg_drib_per_touch",
            FeatureField::ElbowTouches => "elbow_touches",
            FeatureField::PostTouches => "post_touches",
            FeatureField::PaintTouches => "paint_touches",
        }
    }

    /// 展示给用户的名称
    pub fn label(self) -> &'static str {
        match self {
            FeatureField::Age => "Age",
            FeatureField::PlayerHeightInches => "Height (in)",
            FeatureField::PlayerWeight => "Weight (lbs)",
            FeatureField::UsgPct => "Usage %",
            FeatureField::AvgSecPerTouch => "Seconds per Touch",
            FeatureField::AvgDribPerTouch => "Dribbles per Touch",
            FeatureField::ElbowTouches => "Elbow Touches",
            FeatureField::PostTouches => "Post Touches",
            FeatureField::PaintTouches => "Paint Touches",
        }
    }

    /// "加载示例数据" 写入表单的原始文本
    pub fn sample_value(self) -> &'static str {
        match self {
            FeatureField::Age => "26",
            FeatureField::PlayerHeightInches => "78",
            FeatureField::PlayerWeight => "215",
            FeatureField::UsgPct => "23.5",
            FeatureField::AvgSecPerTouch => "2.60",
            FeatureField::AvgDribPerTouch => "2.10",
            FeatureField::ElbowTouches => "3.5",
            FeatureField::PostTouches => "2.0",
            FeatureField::PaintTouches => "6.5",
        }
    }

    /// 在 `ALL` 中的位置
    pub fn index(self) -> usize {
        self as usize
    }

    /// 按请求体键名查找字段
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 一次预测所需的特征记录
///
/// 每次提交时根据表单当前状态重新构建，请求结束后即丢弃。
/// 序列化为 JSON 对象时，键恰好是九个约定键名，按约定顺序输出。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    values: [f64; FeatureField::COUNT],
}

impl FeatureRecord {
    /// 按 `FeatureField::ALL` 的顺序构建，不做校验
    pub fn from_values(values: [f64; FeatureField::COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, field: FeatureField) -> f64 {
        self.values[field.index()]
    }

    pub fn set(&mut self, field: FeatureField, value: f64) {
        self.values[field.index()] = value;
    }

    /// 按约定顺序遍历 (字段, 值)
    pub fn iter(&self) -> impl Iterator<Item = (FeatureField, f64)> + '_ {
        FeatureField::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    /// 校验所有值均为有限数
    ///
    /// 采集阶段已经保证了这一点，这里的二次检查是保留的契约：
    /// 采集逻辑一旦改为直接装载非数值数据，这一步会拦住它。
    pub fn validate(&self) -> PredictResult<()> {
        for (field, value) in self.iter() {
            if !value.is_finite() {
                return Err(PredictError::ValidationError { field });
            }
        }
        Ok(())
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FeatureField::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), &value)?;
        }
        map.end()
    }
}
