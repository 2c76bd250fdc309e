//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the event task against
//! mock components.  All tests run on the host with no real transport.

mod scheduling_tests;
mod threaded_tests;
mod transport_flow_tests;
