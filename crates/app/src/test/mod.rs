//! Shared test support.


pub(crate) use context::TestContext;
