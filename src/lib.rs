#![forbid(unsafe_code)]
//! hubtree — build a UCSC track hub `trackDb` from a directory tree of
//! bigWig/bigBed files.

pub mod classify;
pub mod cli;
pub mod emit;
pub mod error;
pub mod hub;
pub mod link;
pub mod overrides;
pub mod settings;
