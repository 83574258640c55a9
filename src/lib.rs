//! Branch-preview deployment for front-end projects: detect the build
//! system, patch its config for subdirectory serving, build, publish the
//! output as a branch of a shared previews repository, and point the
//! hosting server's Pages feature at it.

pub mod branch;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod git;
pub mod hosting;
pub mod manifest;
pub mod output;
pub mod patch;
pub mod platform;
pub mod runner;
