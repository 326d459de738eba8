// src/lib.rs

//! Daily Digest Library
//!
//! Collects new forum threads, tracked coin prices, and upcoming calendar
//! events into one HTML digest and delivers it.

pub mod error;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
