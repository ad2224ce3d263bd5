use crate::core::{MonthPlan, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct PlanEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> PlanEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitor.is_enabled()
    }

    /// Extract and transform only; nothing is written.
    pub async fn plan(&self) -> Result<MonthPlan> {
        tracing::info!("Loading inventory sources...");
        let data = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        tracing::info!("Planning month...");
        let plan = self.pipeline.transform(data).await?;
        self.monitor.log_stats("Transform");

        tracing::info!(
            "Planned {} days for month {} (cycle {}), {} shortage days",
            plan.final_daily_plan.len(),
            plan.month_requested,
            plan.cycle_month,
            plan.shortage_days()
        );
        Ok(plan)
    }

    pub async fn run(&self) -> Result<String> {
        let plan = self.plan().await?;

        tracing::info!("Writing plan...");
        let output_path = self.pipeline.load(&plan).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        tracing::info!("Output saved to: {}", output_path);
        Ok(output_path)
    }
}
