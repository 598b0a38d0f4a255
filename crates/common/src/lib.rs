pub mod structured_logging;

pub use structured_logging::{
    init_structured_logging,
    init_test_logging,
    LoggingConfig,
    StructuredLogEntry,
    ThreadContext,
    OperationTimer,
    TimedOutcome,
};
