pub mod invoke;
pub mod outcome;
pub mod registry;

pub use invoke::Invoker;
pub use outcome::{
    AnalysisResult, FailureKind, ToolFailure, ToolOutcome, ToolRun, normalize_newlines,
};
pub use registry::{ToolCategory, ToolRegistry, ToolSpec, default_registry};
