use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 步驟執行狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Skipped,
}

/// 步驟執行結果
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step_name: String,
    pub status: StepStatus,
    pub detail: String,
    pub duration: Duration,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// 步驟回傳的內容（狀態與時間由序列填入）
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub detail: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl StepOutcome {
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// 步驟執行上下文，用於在步驟間傳遞數據
#[derive(Debug, Clone)]
pub struct StepContext {
    pub execution_id: String,
    pub previous_reports: Vec<StepReport>,
    shared_data: HashMap<String, serde_json::Value>,
}

impl StepContext {
    pub fn new(execution_id: String) -> Self {
        Self {
            execution_id,
            previous_reports: Vec::new(),
            shared_data: HashMap::new(),
        }
    }

    /// 獲取上一個步驟的結果
    pub fn get_previous_report(&self) -> Option<&StepReport> {
        self.previous_reports.last()
    }

    /// 獲取指定名稱的步驟結果
    pub fn get_report_by_name(&self, name: &str) -> Option<&StepReport> {
        self.previous_reports.iter().find(|r| r.step_name == name)
    }

    /// 添加共享數據
    pub fn add_shared_data(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.shared_data.insert(key.into(), value);
    }

    /// 獲取共享數據
    pub fn get_shared_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.shared_data.get(key)
    }

    /// 共享數據的字串視圖
    pub fn shared_str(&self, key: &str) -> Option<&str> {
        self.shared_data.get(key).and_then(|v| v.as_str())
    }

    pub fn add_report(&mut self, report: StepReport) {
        self.previous_reports.push(report);
    }
}

/// 帶上下文的安裝步驟介面
#[async_trait::async_trait]
pub trait SetupStep: Send + Sync {
    async fn execute(&self, context: &StepContext) -> Result<StepOutcome>;

    /// 用於標識步驟名稱
    fn name(&self) -> &str;

    /// 冪等性防護：已滿足的步驟回傳 false 直接跳過
    fn should_run(&self, _context: &StepContext) -> bool {
        true
    }
}

/// 步驟序列，負責順序執行安裝步驟；任一步驟失敗即中止
pub struct StepSequence {
    steps: Vec<Box<dyn SetupStep>>, // 使用 trait object 支持多態
    monitor: Option<SystemMonitor>,
    monitor_enabled: bool,
    execution_id: String,
    seed_data: HashMap<String, serde_json::Value>,
}

impl StepSequence {
    pub fn new(execution_id: String) -> Self {
        Self {
            steps: Vec::new(),
            monitor: None,
            monitor_enabled: false,
            execution_id,
            seed_data: HashMap::new(),
        }
    }

    /// 啟用或禁用系統監控
    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor_enabled = enabled;
        if enabled {
            self.monitor = Some(SystemMonitor::new(enabled));
        }
        self
    }

    /// 添加步驟
    pub fn add_step(&mut self, step: Box<dyn SetupStep>) {
        self.steps.push(step);
    }

    /// 預先放入共享數據（例如虛擬環境內的直譯器路徑）
    pub fn add_shared_data(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.seed_data.insert(key.into(), value);
    }

    /// 依序執行所有步驟
    pub async fn execute_all(&mut self) -> Result<Vec<StepReport>> {
        let mut reports = Vec::new();
        let mut context = StepContext::new(self.execution_id.clone());
        for (key, value) in &self.seed_data {
            context.add_shared_data(key.clone(), value.clone());
        }

        if self.monitor_enabled {
            if let Some(monitor) = &self.monitor {
                monitor.log_stats("Provisioning started.");
            }
        }

        for step in &self.steps {
            // 冪等性防護：已滿足者直接跳過
            if !step.should_run(&context) {
                tracing::info!("⏭️ Skipping step: {} (already satisfied)", step.name());
                let report = StepReport {
                    step_name: step.name().to_string(),
                    status: StepStatus::Skipped,
                    detail: "already satisfied".to_string(),
                    duration: Duration::ZERO,
                    metadata: HashMap::new(),
                };
                context.add_report(report.clone());
                reports.push(report);
                continue;
            }

            tracing::info!("🔧 Running step: {}", step.name());
            let start_time = Instant::now();

            match step.execute(&context).await {
                Ok(outcome) => {
                    let duration = start_time.elapsed();
                    let report = StepReport {
                        step_name: step.name().to_string(),
                        status: StepStatus::Completed,
                        detail: outcome.detail,
                        duration,
                        metadata: outcome.metadata,
                    };

                    tracing::info!(
                        "✅ Step completed: {} ({}, duration: {:?})",
                        report.step_name,
                        report.detail,
                        report.duration
                    );

                    context.add_report(report.clone());
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!("❌ Step failed: {}: {}", step.name(), e);
                    return Err(e);
                }
            }
        }

        if self.monitor_enabled {
            if let Some(monitor) = &self.monitor {
                monitor.log_stats("Provisioning completed.");
                monitor.log_final_stats();
            }
        }

        Ok(reports)
    }

    /// 獲取執行摘要
    pub fn execution_summary(reports: &[StepReport]) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let total_steps = reports.len();
        let completed = reports
            .iter()
            .filter(|r| r.status == StepStatus::Completed)
            .count();
        let skipped = reports
            .iter()
            .filter(|r| r.status == StepStatus::Skipped)
            .count();
        let total_duration: Duration = reports.iter().map(|r| r.duration).sum();

        summary.insert(
            "total_steps".to_string(),
            serde_json::Value::Number(total_steps.into()),
        );
        summary.insert(
            "completed_steps".to_string(),
            serde_json::Value::Number(completed.into()),
        );
        summary.insert(
            "skipped_steps".to_string(),
            serde_json::Value::Number(skipped.into()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration.as_millis() as u64).into()),
        );

        let step_names: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| serde_json::Value::String(r.step_name.clone()))
            .collect();
        summary.insert(
            "executed_steps".to_string(),
            serde_json::Value::Array(step_names),
        );

        summary
    }
}
