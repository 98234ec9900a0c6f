//! Provides architecture-specific interrupt masking strategies
#[cfg(target_arch = "aarch64")]
pub mod aarch64;
