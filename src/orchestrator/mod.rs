//! 编排层（Orchestration Layer）
//!
//! 负责资源持有和批量调度，不做具体业务判断。
//!
//! ```text
//! app (按运行模式持有 Browser / HTTP 客户端)
//!     ↓
//! profile_runner (处理 Vec<PlayerProfile>)
//!     ↓
//! workflow::RequestOrchestrator (处理一次提交)
//!     ↓
//! view / clients (表单读写、评分请求)
//!     ↓
//! infrastructure (JsExecutor)
//! ```

pub mod app;
pub mod profile_runner;

pub use app::App;
pub use profile_runner::{run_profiles, ProfileStats};
