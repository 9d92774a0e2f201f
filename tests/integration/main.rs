//! Integration tests for the pricing engine

mod pool_lifecycle;
mod properties;
