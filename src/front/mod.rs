//! front ends : request parameters and pipeline, csv export, http form service

pub mod export;
pub mod request;
pub mod serve;

pub use export::dump_csv;
pub use request::{Report, RunRequest};
pub use serve::{ServerState, router, serve};
