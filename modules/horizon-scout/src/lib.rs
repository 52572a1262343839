pub mod pipeline;
pub mod schema;
pub mod scout;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
