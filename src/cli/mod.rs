//! Command line workflow, independent of clap

pub mod orchestration;
