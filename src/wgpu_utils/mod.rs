//! WGPU utility functions and helpers
//!
//! Provides convenient wrappers and builders for common wgpu operations.

pub mod binding_types;
pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;
