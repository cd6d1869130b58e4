//! 视图层
//!
//! 用 `FormView` 抽象表单页面，提交流程只通过元素 id 读写表单，
//! 不关心背后是真实浏览器页面还是内存中的表单。

pub mod memory;
pub mod page;
pub mod render;

pub use memory::MemoryView;
pub use page::PageView;

use crate::error::{PredictError, PredictResult};
use crate::models::FeatureField;

/// 结果数值元素
pub const RESULT_VALUE_ID: &str = "result-value";
/// 结果容器元素
pub const RESULT_CONTAINER_ID: &str = "result-container";
/// 错误容器元素
pub const ERROR_CONTAINER_ID: &str = "error-container";
/// 提交按钮
pub const SUBMIT_BUTTON_ID: &str = "submit-btn";

/// 表单视图
///
/// 所有方法对调用方都不会失败：实现内部的错误只记录日志，
/// 并按"元素不存在"处理（读返回 `None`，写返回 `false`）。
#[allow(async_fn_in_trait)]
pub trait FormView {
    /// 读取输入框当前值，元素不存在时返回 `None`
    async fn read_value(&self, id: &str) -> Option<String>;

    /// 写入输入框，返回元素是否存在
    async fn write_value(&self, id: &str, value: &str) -> bool;

    /// 元素是否存在
    async fn has_element(&self, id: &str) -> bool;

    /// 设置元素文本
    async fn set_text(&self, id: &str, text: &str) -> bool;

    /// 显示或隐藏元素
    async fn set_visible(&self, id: &str, visible: bool) -> bool;

    /// 切换提交按钮的忙碌状态（禁用并显示进度提示）
    async fn set_busy(&self, id: &str, busy: bool) -> bool;

    /// 兜底提示，展示元素缺失时使用
    async fn alert(&self, message: &str);
}

/// 单个输入框的绑定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub field: FeatureField,
    pub element_id: String,
}

/// 字段到元素 id 的映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBinding {
    inputs: Vec<FieldBinding>,
    pub result_value: String,
    pub result_container: String,
    pub error_container: String,
    pub submit_button: String,
}

impl Default for FormBinding {
    fn default() -> Self {
        Self {
            inputs: FeatureField::ALL
                .into_iter()
                .map(|field| FieldBinding {
                    field,
                    element_id: field.element_id().to_string(),
                })
                .collect(),
            result_value: RESULT_VALUE_ID.to_string(),
            result_container: RESULT_CONTAINER_ID.to_string(),
            error_container: ERROR_CONTAINER_ID.to_string(),
            submit_button: SUBMIT_BUTTON_ID.to_string(),
        }
    }
}

impl FormBinding {
    /// 修改某个字段对应的元素 id
    pub fn with_input(mut self, field: FeatureField, element_id: impl Into<String>) -> Self {
        self.inputs[field.index()].element_id = element_id.into();
        self
    }

    /// 按约定顺序排列的输入绑定
    pub fn inputs(&self) -> &[FieldBinding] {
        &self.inputs
    }

    pub fn element_id(&self, field: FeatureField) -> &str {
        &self.inputs[field.index()].element_id
    }

    /// 获取某个字段的访问器
    pub fn accessor<'a, V: FormView>(
        &'a self,
        view: &'a V,
        field: FeatureField,
    ) -> InputAccessor<'a, V> {
        InputAccessor {
            view,
            field,
            element_id: self.element_id(field),
        }
    }

    /// 启动时检查九个输入框是否都存在
    pub async fn verify<V: FormView>(&self, view: &V) -> PredictResult<()> {
        for binding in &self.inputs {
            if !view.has_element(&binding.element_id).await {
                return Err(PredictError::InputMissing {
                    field: binding.field,
                    element_id: binding.element_id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// 单个输入框的读写访问器
pub struct InputAccessor<'a, V> {
    view: &'a V,
    field: FeatureField,
    element_id: &'a str,
}

impl<V: FormView> InputAccessor<'_, V> {
    pub fn field(&self) -> FeatureField {
        self.field
    }

    pub fn element_id(&self) -> &str {
        self.element_id
    }

    /// 读取原始值，元素缺失时返回 InputMissing
    pub async fn get(&self) -> PredictResult<String> {
        self.view
            .read_value(self.element_id)
            .await
            .ok_or_else(|| PredictError::InputMissing {
                field: self.field,
                element_id: self.element_id.to_string(),
            })
    }

    /// 读取并解析为有限数值
    pub async fn get_number(&self) -> PredictResult<f64> {
        let raw = self.get().await?;
        parse_finite(&raw).ok_or_else(|| PredictError::InputInvalid {
            field: self.field,
            element_id: self.element_id.to_string(),
            raw,
        })
    }

    pub async fn set(&self, value: &str) -> bool {
        self.view.write_value(self.element_id, value).await
    }
}

/// 解析为有限浮点数，空串、非数字、NaN、inf 均返回 `None`
pub fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
