//! Integration test harness — exercises the compiled CLI binary.
