pub mod analyze;
pub mod batch;
pub mod config;
pub mod error;
pub mod ingest;
pub mod output;
pub mod policy;
pub mod resolve;
pub mod run_id;
pub mod telemetry;
