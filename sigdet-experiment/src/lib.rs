pub mod config;
pub mod export;
pub mod runner;
pub mod scheduler;
pub mod trial_list;

pub use config::ExperimentConfig;
pub use runner::{ExperimentRunner, ResponseCollector};
pub use scheduler::{ScheduleResult, TrialScheduler, TrialTiming};
pub use trial_list::TrialListBuilder;
