//! Rendering: pipeline management, the frame loop, and post-processing.

pub mod pipeline_manager;
pub mod post_process;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineManager, VertexLayoutKind};
pub use post_process::{PostMode, PostProcess};
pub use render_engine::RenderEngine;
