//! Integration tests: leg sources → planner → export, end to end.

mod mock_source;
mod pipeline;
