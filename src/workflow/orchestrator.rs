//! 预测请求编排 - 流程层
//!
//! 核心职责：定义"一次提交"的完整流程
//!
//! 流程顺序：
//! 1. 采集表单中的九个字段
//! 2. 二次校验
//! 3. 进入忙碌状态，发送请求（唯一的挂起点）
//! 4. 渲染结果或错误，退出忙碌状态
//!
//! 不支持取消：已发出的请求不能被后续操作中止，重复点击只会被忽略。
//! 本地也不设超时，等待时长完全取决于传输层。

use tracing::{debug, info, warn};

use crate::clients::PredictionClient;
use crate::error::{PredictError, PredictResult};
use crate::models::{FeatureField, FeatureRecord, Prediction};
use crate::view::{render, FormBinding, FormView};
use crate::workflow::submission::{CyclePhase, SubmissionState};

/// 一次 `submit()` 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 已有提交在进行，本次被忽略
    Ignored,
    /// 预测成功，结果已渲染
    Succeeded(Prediction),
    /// 任一步骤失败，错误已渲染
    Failed(PredictError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

/// 预测请求编排器
///
/// - 独占表单视图、客户端和提交状态
/// - 每次用户提交驱动一个完整周期
/// - 只在单个任务中使用，不跨线程共享
pub struct RequestOrchestrator<V, C> {
    view: V,
    client: C,
    binding: FormBinding,
    state: SubmissionState,
}

impl<V: FormView, C: PredictionClient> RequestOrchestrator<V, C> {
    /// 绑定表单，启动时检查九个输入框都存在
    pub async fn bind(view: V, client: C, binding: FormBinding) -> PredictResult<Self> {
        binding.verify(&view).await?;
        info!("✓ 表单绑定完成，{} 个输入字段就绪", binding.inputs().len());

        Ok(Self {
            view,
            client,
            binding,
            state: SubmissionState::new(),
        })
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn binding(&self) -> &FormBinding {
        &self.binding
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn phase(&self) -> CyclePhase {
        self.state.phase()
    }

    pub fn last_result(&self) -> Option<Prediction> {
        self.state.last_result()
    }

    /// 填入示例数据，不触发提交，返回成功写入的字段数
    pub async fn load_sample_data(&self) -> usize {
        let mut written = 0;
        for binding in self.binding.inputs() {
            let accessor = self.binding.accessor(&self.view, binding.field);
            if accessor.set(binding.field.sample_value()).await {
                written += 1;
            } else {
                warn!("⚠️ 示例数据写入失败，元素不存在: #{}", binding.element_id);
            }
        }
        info!("✓ 已加载示例数据 ({}/{})", written, FeatureField::COUNT);
        written
    }

    /// 执行一次完整的提交周期
    ///
    /// 已有提交在进行时立即返回 `Ignored`，不改动任何状态。
    /// 无论成功还是失败，结束时都会退出忙碌状态并释放提交标记。
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_in_flight) = self.state.try_begin() else {
            debug!("已有提交在进行，忽略本次提交");
            return SubmitOutcome::Ignored;
        };

        render::clear_result(&self.view, &self.binding).await;
        render::clear_error(&self.view, &self.binding).await;
        self.state.clear_result();

        let outcome = match self.run_cycle().await {
            Ok(prediction) => {
                self.state.enter(CyclePhase::Succeeded);
                info!("✅ 预测完成: {}", prediction);
                render::render_result(&self.view, &self.binding, &prediction).await;
                self.state.store_result(prediction.clone());
                SubmitOutcome::Succeeded(prediction)
            }
            Err(e) => {
                self.state.enter(CyclePhase::Failed);
                if e.is_before_network() {
                    warn!("⚠️ 输入有误，未发送请求: {}", e);
                } else {
                    warn!("❌ 预测失败: {}", e);
                }
                render::render_error(&self.view, &self.binding, &e.to_string()).await;
                SubmitOutcome::Failed(e)
            }
        };

        render::set_busy(&self.view, &self.binding, false).await;
        outcome
    }

    async fn run_cycle(&self) -> PredictResult<Prediction> {
        self.state.enter(CyclePhase::Collecting);
        let record = self.collect().await?;

        self.state.enter(CyclePhase::Validating);
        record.validate()?;

        self.state.enter(CyclePhase::Submitting);
        render::set_busy(&self.view, &self.binding, true).await;
        debug!("📤 发送特征记录: {:?}", record);

        self.client.post_feature_record(&record).await
    }

    /// 按约定顺序读取九个字段
    ///
    /// 记录初始为 NaN，漏读的字段会在校验步骤被拦截。
    async fn collect(&self) -> PredictResult<FeatureRecord> {
        let mut record = FeatureRecord::from_values([f64::NAN; FeatureField::COUNT]);
        for binding in self.binding.inputs() {
            let accessor = self.binding.accessor(&self.view, binding.field);
            record.set(binding.field, accessor.get_number().await?);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_SERVICE_ERROR;
    use crate::models::PredictResponse;
    use crate::view::{
        MemoryView, ERROR_CONTAINER_ID, RESULT_CONTAINER_ID, RESULT_VALUE_ID, SUBMIT_BUTTON_ID,
    };
    use serde_json::{json, Value as JsonValue};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready, block_on, task};

    /// 按脚本返回响应的客户端，记录每次收到的请求体
    #[derive(Default)]
    struct ScriptedClient {
        responses: RefCell<VecDeque<JsonValue>>,
        requests: RefCell<Vec<JsonValue>>,
        gate: Option<Notify>,
    }

    impl ScriptedClient {
        fn replying(responses: impl IntoIterator<Item = JsonValue>) -> Self {
            Self {
                responses: RefCell::new(responses.into_iter().collect()),
                ..Default::default()
            }
        }

        fn gated(responses: impl IntoIterator<Item = JsonValue>) -> Self {
            Self {
                gate: Some(Notify::new()),
                ..Self::replying(responses)
            }
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }

        fn calls(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl PredictionClient for ScriptedClient {
        async fn post_feature_record(&self, record: &FeatureRecord) -> PredictResult<Prediction> {
            self.requests
                .borrow_mut()
                .push(serde_json::to_value(record).unwrap());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let body = self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| json!({ "success": false }));
            serde_json::from_value::<PredictResponse>(body)
                .unwrap()
                .into_prediction()
        }
    }

    fn filled_view() -> MemoryView {
        let view = MemoryView::with_inputs(FeatureField::ALL);
        for field in FeatureField::ALL {
            view.set_value(field.element_id(), field.sample_value());
        }
        view
    }

    fn bound(view: MemoryView, client: &ScriptedClient) -> RequestOrchestrator<MemoryView, &ScriptedClient> {
        block_on(RequestOrchestrator::bind(view, client, FormBinding::default())).unwrap()
    }

    #[tokio::test]
    async fn success_renders_three_decimals_and_keeps_result() {
        let client = ScriptedClient::replying([json!({ "success": true, "prediction": 0.873456 })]);
        let orchestrator =
            RequestOrchestrator::bind(filled_view(), &client, FormBinding::default())
                .await
                .unwrap();

        let outcome = orchestrator.submit().await;

        assert_eq!(outcome, SubmitOutcome::Succeeded(Prediction::Score(0.873456)));
        let view = orchestrator.view();
        assert_eq!(view.text(RESULT_VALUE_ID).as_deref(), Some("0.873"));
        assert!(view.is_visible(RESULT_CONTAINER_ID));
        assert!(!view.is_visible(ERROR_CONTAINER_ID));
        assert!(!view.is_disabled(SUBMIT_BUTTON_ID));
        assert_eq!(orchestrator.last_result(), Some(Prediction::Score(0.873456)));
        assert_eq!(orchestrator.phase(), CyclePhase::Idle);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn request_body_has_exactly_the_contract_keys() {
        let client = ScriptedClient::replying([json!({ "success": true, "prediction": 0.1 })]);
        let view = MemoryView::with_inputs(FeatureField::ALL);
        for field in FeatureField::ALL.iter().rev() {
            view.write_value(field.element_id(), "1.5").await;
        }
        let orchestrator = RequestOrchestrator::bind(view, &client, FormBinding::default())
            .await
            .unwrap();

        orchestrator.submit().await;

        let requests = client.requests.borrow();
        assert_eq!(requests.len(), 1);
        let body = requests[0].as_object().unwrap();
        let keys: Vec<&str> = body.keys().map(|k| k.as_str()).collect();
        let mut expected: Vec<&str> = FeatureField::ALL.iter().map(|f| f.key()).collect();
        expected.sort_unstable();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, expected);
        assert!(body.values().all(|v| v.as_f64() == Some(1.5)));
    }

    #[tokio::test]
    async fn invalid_input_aborts_before_network() {
        let client = ScriptedClient::default();
        let orchestrator =
            RequestOrchestrator::bind(filled_view(), &client, FormBinding::default())
                .await
                .unwrap();

        for raw in ["", "abc", "NaN", "inf"] {
            orchestrator.view().write_value("post_touches", raw).await;
            let outcome = orchestrator.submit().await;

            let SubmitOutcome::Failed(err) = outcome else {
                panic!("expected failure for {:?}", raw);
            };
            assert_eq!(err.field(), Some(FeatureField::PostTouches));
            let shown = orchestrator.view().text(ERROR_CONTAINER_ID).unwrap();
            assert!(shown.contains("post_touches"), "error should name the field: {}", shown);
        }
        assert_eq!(client.calls(), 0);
        assert!(!orchestrator.view().is_disabled(SUBMIT_BUTTON_ID));
    }

    #[tokio::test]
    async fn missing_input_renders_one_error_and_skips_network() {
        let client = ScriptedClient::default();
        let orchestrator =
            RequestOrchestrator::bind(filled_view(), &client, FormBinding::default())
                .await
                .unwrap();
        orchestrator.view().remove_element("usg_pct");

        let outcome = orchestrator.submit().await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(PredictError::InputMissing { field: FeatureField::UsgPct, .. })
        ));
        assert_eq!(client.calls(), 0);
        assert_eq!(orchestrator.view().text_history(ERROR_CONTAINER_ID).len(), 1);
        assert!(orchestrator.view().text_history(RESULT_VALUE_ID).is_empty());
    }

    #[tokio::test]
    async fn bind_fails_fast_when_an_input_is_absent() {
        let client = ScriptedClient::default();
        let view = MemoryView::with_inputs(FeatureField::ALL);
        view.remove_element("paint_touches");

        let result = RequestOrchestrator::bind(view, &client, FormBinding::default()).await;
        assert!(matches!(
            result,
            Err(PredictError::InputMissing { field: FeatureField::PaintTouches, .. })
        ));
    }

    #[tokio::test]
    async fn service_failure_message_is_rendered_verbatim() {
        let client = ScriptedClient::replying([
            json!({ "success": false, "error": "Model unavailable" }),
            json!({ "success": false }),
        ]);
        let orchestrator =
            RequestOrchestrator::bind(filled_view(), &client, FormBinding::default())
                .await
                .unwrap();

        orchestrator.submit().await;
        assert_eq!(
            orchestrator.view().text(ERROR_CONTAINER_ID).as_deref(),
            Some("Model unavailable")
        );
        assert!(!orchestrator.view().is_visible(RESULT_CONTAINER_ID));

        orchestrator.submit().await;
        assert_eq!(
            orchestrator.view().text(ERROR_CONTAINER_ID).as_deref(),
            Some(GENERIC_SERVICE_ERROR)
        );
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn new_submission_clears_previous_result() {
        let client = ScriptedClient::replying([
            json!({ "success": true, "prediction": 0.2 }),
            json!({ "success": false, "error": "Model unavailable" }),
        ]);
        let orchestrator =
            RequestOrchestrator::bind(filled_view(), &client, FormBinding::default())
                .await
                .unwrap();

        assert!(orchestrator.submit().await.is_success());
        assert!(orchestrator.last_result().is_some());

        orchestrator.submit().await;
        assert_eq!(orchestrator.last_result(), None);
        assert!(!orchestrator.view().is_visible(RESULT_CONTAINER_ID));
        assert!(orchestrator.view().is_visible(ERROR_CONTAINER_ID));
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let client = ScriptedClient::gated([json!({ "success": true, "prediction": 0.42 })]);
        let orchestrator = bound(filled_view(), &client);

        let mut first = task::spawn(orchestrator.submit());
        assert_pending!(first.poll());
        assert_eq!(orchestrator.phase(), CyclePhase::Submitting);
        assert!(orchestrator.view().is_disabled(SUBMIT_BUTTON_ID));

        let second = block_on(orchestrator.submit());
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(client.calls(), 1);
        assert_eq!(orchestrator.phase(), CyclePhase::Submitting);

        client.release();
        let outcome = assert_ready!(first.poll());
        assert_eq!(outcome, SubmitOutcome::Succeeded(Prediction::Score(0.42)));
        assert!(!orchestrator.state().is_in_progress());
        assert!(!orchestrator.view().is_disabled(SUBMIT_BUTTON_ID));
    }

    #[test]
    fn dropping_an_in_flight_submission_releases_the_flag() {
        let client = ScriptedClient::gated(Vec::<JsonValue>::new());
        let orchestrator = bound(filled_view(), &client);

        let mut first = task::spawn(orchestrator.submit());
        assert_pending!(first.poll());
        assert!(orchestrator.state().is_in_progress());
        drop(first);

        assert!(!orchestrator.state().is_in_progress());
        assert_eq!(orchestrator.phase(), CyclePhase::Idle);
    }

    #[tokio::test]
    async fn sample_data_fills_fields_without_submitting() {
        let client = ScriptedClient::default();
        let orchestrator = RequestOrchestrator::bind(
            MemoryView::with_inputs(FeatureField::ALL),
            &client,
            FormBinding::default(),
        )
        .await
        .unwrap();

        assert_eq!(orchestrator.load_sample_data().await, FeatureField::COUNT);

        let view = orchestrator.view();
        let expected = [
            ("age", "26"),
            ("player_height_inches", "78"),
            ("player_weight", "215"),
            ("usg_pct", "23.5"),
            ("avg_sec_per_touch", "2.60"),
            ("avg_drib_per_touch", "2.10"),
            ("elbow_touches", "3.5"),
            ("post_touches", "2.0"),
            ("paint_touches", "6.5"),
        ];
        for (id, value) in expected {
            assert_eq!(view.value(id).as_deref(), Some(value), "field {}", id);
        }
        assert_eq!(client.calls(), 0);
        assert_eq!(orchestrator.phase(), CyclePhase::Idle);
    }
}
