//! Comment language filter: classifies short comments by script evidence (with an external
//! detector for ambiguous cases) and drives an incremental, generation-aware pipeline that
//! hides or collapses comments outside the allowed languages.

pub mod ai;
pub mod app;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod host;
pub mod infrastructure;
pub mod pipeline;
pub mod policy;
pub mod render;
pub mod storage;
pub mod tasks;
