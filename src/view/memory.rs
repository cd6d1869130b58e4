//! 内存表单
//!
//! 批量档案模式和测试使用的 `FormView` 实现，单线程使用。

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::warn;

use super::{FormView, ERROR_CONTAINER_ID, RESULT_CONTAINER_ID, RESULT_VALUE_ID, SUBMIT_BUTTON_ID};
use crate::models::{FeatureField, PlayerProfile};

/// 忙碌状态下提交按钮显示的文本
pub const BUSY_LABEL: &str = "Predicting...";
const SUBMIT_LABEL: &str = "Predict Injury Risk";

#[derive(Debug, Clone, Default)]
struct Element {
    value: String,
    text: String,
    text_history: Vec<String>,
    visible: bool,
    disabled: bool,
    saved_label: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    elements: HashMap<String, Element>,
    alerts: Vec<String>,
}

/// 内存中的表单
#[derive(Debug, Default)]
pub struct MemoryView {
    inner: RefCell<Inner>,
}

impl MemoryView {
    /// 空表单，不含任何元素
    pub fn new() -> Self {
        Self::default()
    }

    /// 包含指定输入框和全部展示元素的表单
    pub fn with_inputs(fields: impl IntoIterator<Item = FeatureField>) -> Self {
        let view = Self::new();
        for field in fields {
            view.insert_element(field.element_id());
        }
        for id in [RESULT_VALUE_ID, RESULT_CONTAINER_ID, ERROR_CONTAINER_ID] {
            view.insert_element(id);
        }
        view.insert_element(SUBMIT_BUTTON_ID);
        view.with_element(SUBMIT_BUTTON_ID, |el| el.text = SUBMIT_LABEL.to_string());
        for id in [RESULT_CONTAINER_ID, ERROR_CONTAINER_ID] {
            view.with_element(id, |el| el.visible = false);
        }
        view
    }

    /// 用档案填充完整表单，档案缺失的字段不会生成对应输入框
    pub fn from_profile(profile: &PlayerProfile) -> Self {
        let view = Self::with_inputs(FeatureField::ALL);
        for field in FeatureField::ALL {
            match profile.raw_value(field) {
                Some(raw) => {
                    view.with_element(field.element_id(), |el| el.value = raw);
                }
                None => view.remove_element(field.element_id()),
            }
        }
        view
    }

    pub fn insert_element(&self, id: &str) {
        self.inner
            .borrow_mut()
            .elements
            .entry(id.to_string())
            .or_insert_with(|| Element {
                visible: true,
                ..Default::default()
            });
    }

    pub fn remove_element(&self, id: &str) {
        self.inner.borrow_mut().elements.remove(id);
    }

    /// 直接设置输入框的值，返回元素是否存在
    pub fn set_value(&self, id: &str, value: &str) -> bool {
        self.with_element(id, |el| el.value = value.to_string())
    }

    /// 输入框当前值
    pub fn value(&self, id: &str) -> Option<String> {
        self.inner.borrow().elements.get(id).map(|el| el.value.clone())
    }

    /// 元素当前文本
    pub fn text(&self, id: &str) -> Option<String> {
        self.inner.borrow().elements.get(id).map(|el| el.text.clone())
    }

    /// 元素历史上被设置过的全部非空文本
    pub fn text_history(&self, id: &str) -> Vec<String> {
        self.inner
            .borrow()
            .elements
            .get(id)
            .map(|el| el.text_history.clone())
            .unwrap_or_default()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.inner
            .borrow()
            .elements
            .get(id)
            .is_some_and(|el| el.visible)
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.inner
            .borrow()
            .elements
            .get(id)
            .is_some_and(|el| el.disabled)
    }

    pub fn alerts(&self) -> Vec<String> {
        self.inner.borrow().alerts.clone()
    }

    fn with_element(&self, id: &str, f: impl FnOnce(&mut Element)) -> bool {
        match self.inner.borrow_mut().elements.get_mut(id) {
            Some(el) => {
                f(el);
                true
            }
            None => false,
        }
    }
}

impl FormView for MemoryView {
    async fn read_value(&self, id: &str) -> Option<String> {
        self.value(id)
    }

    async fn write_value(&self, id: &str, value: &str) -> bool {
        self.set_value(id, value)
    }

    async fn has_element(&self, id: &str) -> bool {
        self.inner.borrow().elements.contains_key(id)
    }

    async fn set_text(&self, id: &str, text: &str) -> bool {
        self.with_element(id, |el| {
            el.text = text.to_string();
            if !text.is_empty() {
                el.text_history.push(text.to_string());
            }
        })
    }

    async fn set_visible(&self, id: &str, visible: bool) -> bool {
        self.with_element(id, |el| el.visible = visible)
    }

    async fn set_busy(&self, id: &str, busy: bool) -> bool {
        self.with_element(id, |el| {
            if busy {
                if el.saved_label.is_none() {
                    el.saved_label = Some(std::mem::take(&mut el.text));
                }
                el.text = BUSY_LABEL.to_string();
                el.disabled = true;
            } else {
                if let Some(label) = el.saved_label.take() {
                    el.text = label;
                }
                el.disabled = false;
            }
        })
    }

    async fn alert(&self, message: &str) {
        warn!("⚠️ 表单提示: {}", message);
        self.inner.borrow_mut().alerts.push(message.to_string());
    }
}
