//! CLI library components for the ICP-OES drift correction tool.

pub mod logging;
