//! Handlers 模块

pub mod health;
pub mod metrics;
pub mod poll;

pub use health::*;
pub use metrics::*;
pub use poll::*;
