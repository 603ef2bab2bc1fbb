// Application Layer - Use Cases and Business Logic

pub mod interrupt;
pub mod search;
pub mod supervisor;
pub mod workflow;

// Re-exports
pub use interrupt::{interrupt_channel, InterruptSender, InterruptToken};
pub use search::{RedditSearchService, TwitterSearchService, WebSearchService};
pub use supervisor::{
    ReadinessPolicy, ReadinessTarget, Supervisor, SupervisorPlan, SupervisorReport,
    WorkflowOutcome,
};
pub use workflow::{WorkflowDriver, WorkflowReport, WorkflowSection};
