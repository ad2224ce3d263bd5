pub mod plan_pipeline;
