//! PathSim - 图搜索算法逐步模拟器
//!
//! This crate provides a family of stepped graph-search simulators (BFS, DFS,
//! Dijkstra, A*, Best-First, Bidirectional, Random Walk) over small randomly
//! generated tree-like graphs, plus a live-map BFS variant that resolves
//! neighbors against an external road-snapping service.

pub mod config;
pub mod core;
pub mod geo;
pub mod graph;
pub mod services;
pub mod utils;
