//! 提交状态
//!
//! 由编排器独占持有，只在主任务中修改。

use std::cell::{Cell, RefCell};
use std::fmt::Display;

use tracing::debug;

use crate::models::Prediction;

/// 一次提交周期所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    #[default]
    Idle,
    Collecting,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl CyclePhase {
    /// 是否允许从当前阶段进入 `next`
    pub fn can_enter(self, next: CyclePhase) -> bool {
        use CyclePhase::*;
        matches!(
            (self, next),
            (Idle, Collecting)
                | (Collecting, Validating)
                | (Validating, Submitting)
                | (Submitting, Succeeded)
                | (Collecting | Validating | Submitting, Failed)
                | (Succeeded | Failed, Idle)
        )
    }
}

impl Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CyclePhase::Idle => "空闲",
            CyclePhase::Collecting => "采集",
            CyclePhase::Validating => "校验",
            CyclePhase::Submitting => "提交",
            CyclePhase::Succeeded => "成功",
            CyclePhase::Failed => "失败",
        };
        f.write_str(name)
    }
}

/// 提交状态
///
/// - `in_progress`：是否有提交正在进行，保证同一时间最多一个请求
/// - `phase`：当前周期阶段
/// - `last_result`：最近一次成功的预测结果，被新结果替换或被清除前一直保留
#[derive(Debug, Default)]
pub struct SubmissionState {
    in_progress: Cell<bool>,
    phase: Cell<CyclePhase>,
    last_result: RefCell<Option<Prediction>>,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.get()
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase.get()
    }

    pub fn last_result(&self) -> Option<Prediction> {
        self.last_result.borrow().clone()
    }

    /// 开始一次提交；已有提交在进行时返回 `None`
    ///
    /// 检查与置位在同一次同步调用中完成，中间没有挂起点。
    pub(crate) fn try_begin(&self) -> Option<InFlight<'_>> {
        if self.in_progress.replace(true) {
            return None;
        }
        Some(InFlight { state: self })
    }

    pub(crate) fn enter(&self, next: CyclePhase) {
        let current = self.phase.get();
        debug_assert!(
            current.can_enter(next),
            "非法阶段切换: {:?} -> {:?}",
            current,
            next
        );
        debug!("提交阶段: {} → {}", current, next);
        self.phase.set(next);
    }

    pub(crate) fn store_result(&self, prediction: Prediction) {
        *self.last_result.borrow_mut() = Some(prediction);
    }

    pub(crate) fn clear_result(&self) {
        self.last_result.borrow_mut().take();
    }
}

/// 进行中的提交
///
/// 释放时无条件清除 `in_progress` 并回到 `Idle`，
/// 包括提交 future 在等待网络时被丢弃的情况。
pub(crate) struct InFlight<'a> {
    state: &'a SubmissionState,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let phase = self.state.phase.replace(CyclePhase::Idle);
        if phase != CyclePhase::Idle {
            debug!("提交阶段: {} → {}", phase, CyclePhase::Idle);
        }
        self.state.in_progress.set(false);
    }
}
