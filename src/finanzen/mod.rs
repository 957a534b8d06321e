// src/finanzen/mod.rs
pub mod chart;
pub mod client;
pub mod estimates;
pub mod fundamentals;
pub mod indices;
pub mod models;
pub mod quote;
pub mod search;
