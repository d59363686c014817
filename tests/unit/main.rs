//! Unit test harness — service-level tests against in-memory port fakes.

mod diagnostics_service;
mod mocks;
