//! JSON output generation for split exports.

mod sink;
mod writer;

pub use sink::{FileSink, FsSink, MemorySink};
pub use writer::{
    check_distinct, execute_plan, fragment_location, plan_output, PlannedFile, WritePlan,
};
