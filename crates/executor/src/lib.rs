mod error;
mod executor;
mod resolver;
mod sink;

pub use error::SweepError;
pub use executor::{BulkTransitionExecutor, DEFAULT_CALL_TIMEOUT, LOG_PREFIX, report_summary};
pub use resolver::TransitionResolver;
pub use sink::{LogSink, MemorySink, TracingSink, WriterSink};
