/// Crane3D Core Library - Joint state model and transform-stack scene evaluator
///
/// This library holds everything about the crane that is not a terminal:
/// the rig configuration and its preset format, the clamped joint state,
/// the matrix-stack scene evaluator that turns one state snapshot into an
/// ordered draw-command sequence, camera presets, and the unit meshes the
/// commands refer to.

pub mod camera;
pub mod geometry;
pub mod preset;
pub mod rig;
pub mod scene;
pub mod state;
pub mod transform;

// Re-export commonly used types
pub use camera::{projection_matrix, view_matrix, CameraAngles, ViewMode};
pub use geometry::{Mesh, Triangle, Vertex};
pub use preset::{parse_preset, PresetError};
pub use rig::{RigConfig, RigError};
pub use scene::{
    evaluate, evaluate_commands, evaluate_with, DrawCommand, DrawSink, DrawStyle, MatrixStack,
    ShapeKind,
};
pub use state::{CraneState, LoadBlock};
pub use transform::Transform;
