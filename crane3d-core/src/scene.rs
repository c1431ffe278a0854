/// Transform-stack scene evaluator: one crane state in, ordered draw commands out
use nalgebra::Matrix4;

use crate::camera::view_matrix;
use crate::rig::RigConfig;
use crate::state::CraneState;
use crate::transform::Transform;

const GROUND_COLOR: [f32; 3] = [0.3, 0.3, 0.3];
const COLUMN_COLOR: [f32; 3] = [1.0, 1.0, 0.0];
const RING_COLOR: [f32; 3] = [0.5, 0.5, 0.5];
const BOOM_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
const COUNTERWEIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const TROLLEY_COLOR: [f32; 3] = [0.0, 1.0, 0.0];
const ROPE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const HOOK_ARM_COLOR: [f32; 3] = [0.0, 0.0, 1.0];
const JAW_COLOR: [f32; 3] = [0.0, 1.0, 0.0];
const BLOCK_COLOR: [f32; 3] = [0.5, 0.5, 1.0];

/// Unit meshes the evaluator refers to by name. The geometry provider turns
/// these into triangles; the evaluator itself never sees a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Cube,
    Cylinder,
    Sphere,
    Pyramid,
}

/// Global rendering style for the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    Wireframe,
    Solid,
}

/// One draw instruction: a unit shape under a fully composed transform.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub shape: ShapeKind,
    pub style: DrawStyle,
    pub color: [f32; 3],
    pub transform: Matrix4<f32>,
}

/// Receiver for the frame's command sequence, in emission order.
pub trait DrawSink {
    fn submit(&mut self, command: DrawCommand);
}

impl DrawSink for Vec<DrawCommand> {
    fn submit(&mut self, command: DrawCommand) {
        self.push(command);
    }
}

/// Stack of composed transforms with scoped save/restore.
///
/// [`MatrixStack::with_saved`] is the only way to save a frame, so every save
/// is restored on scope exit even under early return. The save/restore
/// counters stay observable for the end-of-frame balance check.
pub struct MatrixStack {
    top: Matrix4<f32>,
    saved: Vec<Matrix4<f32>>,
    saves: usize,
    restores: usize,
}

impl MatrixStack {
    pub fn new(root: Matrix4<f32>) -> Self {
        Self {
            top: root,
            saved: Vec::new(),
            saves: 0,
            restores: 0,
        }
    }

    /// The fully composed transform at the current node.
    pub fn current(&self) -> &Matrix4<f32> {
        &self.top
    }

    /// Compose a local transform onto the current frame (post-multiply, so
    /// `m` acts in the current local coordinates).
    pub fn mult(&mut self, m: &Matrix4<f32>) {
        self.top *= m;
    }

    /// Run `body` with the current frame saved, restoring it afterwards.
    pub fn with_saved<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.saved.push(self.top);
        self.saves += 1;
        let result = body(self);
        if let Some(frame) = self.saved.pop() {
            self.top = frame;
            self.restores += 1;
        }
        result
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn restores(&self) -> usize {
        self.restores
    }

    /// Drop saved frames down to `depth`, restoring the oldest dropped frame.
    /// Recovery path for a detected imbalance; a balanced frame never needs it.
    pub fn reset_to_depth(&mut self, depth: usize) {
        while self.saved.len() > depth {
            if let Some(frame) = self.saved.pop() {
                self.top = frame;
            }
        }
    }
}

struct Emitter<'a, S: DrawSink> {
    sink: &'a mut S,
    style: DrawStyle,
}

impl<'a, S: DrawSink> Emitter<'a, S> {
    fn draw(&mut self, stack: &MatrixStack, shape: ShapeKind, color: [f32; 3]) {
        self.sink.submit(DrawCommand {
            shape,
            style: self.style,
            color,
            transform: *stack.current(),
        });
    }

    /// The ground ignores the global style so the rig always has a horizon.
    fn draw_solid(&mut self, stack: &MatrixStack, shape: ShapeKind, color: [f32; 3]) {
        self.sink.submit(DrawCommand {
            shape,
            style: DrawStyle::Solid,
            color,
            transform: *stack.current(),
        });
    }
}

/// Walk the rig once and emit its ordered draw commands.
///
/// The root transform is the current view matrix scaled by the state's zoom
/// factor; everything else composes downward from it. Reading the same state
/// twice yields the same sequence.
pub fn evaluate<S: DrawSink>(state: &CraneState, sink: &mut S) {
    let root = view_matrix(state.view(), state.camera())
        * Transform::uniform_scaling(state.zoom_scale());
    let mut stack = MatrixStack::new(root);
    evaluate_with(state, &mut stack, sink);
}

/// Collect one frame's commands into a fresh vector.
pub fn evaluate_commands(state: &CraneState) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    evaluate(state, &mut commands);
    commands
}

/// [`evaluate`] against a caller-owned stack, leaving its save/restore
/// counters observable.
///
/// The stack must end the frame exactly as deep as it entered; a mismatch is
/// a defect in the scene walk. Debug builds stop on it, release builds log
/// and reset the stack so the next frame starts clean.
pub fn evaluate_with<S: DrawSink>(state: &CraneState, stack: &mut MatrixStack, sink: &mut S) {
    let entry_depth = stack.depth();
    let mut out = Emitter {
        sink,
        style: state.draw_style(),
    };

    ground(stack, &mut out, state.rig());
    crane(stack, &mut out, state);

    debug_assert_eq!(
        stack.depth(),
        entry_depth,
        "transform stack out of balance at frame end"
    );
    if stack.depth() != entry_depth {
        log::warn!(
            "transform stack out of balance at frame end ({} saves, {} restores); resetting",
            stack.saves(),
            stack.restores()
        );
        stack.reset_to_depth(entry_depth);
    }
}

fn crane<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>, state: &CraneState) {
    let rig = state.rig();
    stack.with_saved(|s| base_column(s, out, rig));
    stack.with_saved(|s| {
        // The lift's anchor frame and the ring's slew stay on the stack:
        // everything from the boom down inherits them.
        lift_column(s, out, rig, state.hoist());
        slew_ring(s, out, state.slew_deg());
        s.with_saved(|s| {
            boom(s, out, rig);
            s.with_saved(|s| {
                counterweight(s, out);
                trolley_carriage(s, out, state.trolley());
                s.with_saved(|s| {
                    wire_rope(s, out, state.hook_len());
                    hook_assembly(s, out, state.hook_len(), state.hook_open());
                });
            });
        });
    });
    stack.with_saved(|s| load_block(s, out, state));
}

fn ground<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>, rig: &RigConfig) {
    stack.with_saved(|s| {
        s.mult(&Transform::scaling(rig.ground_length, 1.0, rig.ground_length));
        out.draw_solid(s, ShapeKind::Cube, GROUND_COLOR);
    });
}

/// Height at which the bottom column cube seats on the ground slab.
fn column_seat_y(rig: &RigConfig) -> f32 {
    (rig.base_side + 1.0) * 0.5 + 0.05
}

fn base_column<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>, rig: &RigConfig) {
    stack.mult(&Transform::translation(0.0, column_seat_y(rig), 0.0));
    for i in 0..rig.base_count {
        stack.with_saved(|s| {
            s.mult(&Transform::scaling(rig.base_side, rig.base_side, rig.base_side));
            s.mult(&Transform::translation(0.0, i as f32, 0.0));
            out.draw(s, ShapeKind::Cube, COLUMN_COLOR);
        });
    }
}

fn lift_column<S: DrawSink>(
    stack: &mut MatrixStack,
    out: &mut Emitter<'_, S>,
    rig: &RigConfig,
    hoist: f32,
) {
    stack.mult(&Transform::translation(0.0, column_seat_y(rig) + hoist, 0.0));
    for i in 0..rig.lift_count {
        if i + 1 < rig.lift_count {
            stack.with_saved(|s| lift_segment(s, out, rig, i));
        } else {
            // The topmost segment's frame is not restored: it is the anchor
            // the slew ring seats on.
            lift_segment(stack, out, rig, i);
        }
    }
}

fn lift_segment<S: DrawSink>(
    stack: &mut MatrixStack,
    out: &mut Emitter<'_, S>,
    rig: &RigConfig,
    index: usize,
) {
    stack.mult(&Transform::scaling(rig.lift_side, rig.base_side, rig.lift_side));
    stack.mult(&Transform::translation(0.0, index as f32, 0.0));
    out.draw(stack, ShapeKind::Cube, COLUMN_COLOR);
}

/// The crane's single rotational degree of freedom. The slew is composed
/// here exactly once and left on the stack for everything above the ring.
fn slew_ring<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>, slew_deg: f32) {
    stack.mult(&Transform::scaling(3.0, 0.5, 3.0));
    stack.mult(&Transform::rotation_y_deg(slew_deg));
    stack.mult(&Transform::translation(0.0, 1.5, 0.0));
    out.draw(stack, ShapeKind::Cylinder, RING_COLOR);
}

fn boom<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>, rig: &RigConfig) {
    stack.mult(&Transform::translation(0.0, 1.6, -2.8));
    stack.mult(&Transform::scaling(0.7, 2.0, 0.7));
    for i in 0..rig.boom_size {
        stack.with_saved(|s| {
            // Stacked like the columns, tipped over so "up" runs outward.
            s.mult(&Transform::rotation_x_deg(90.0));
            s.mult(&Transform::translation(0.0, i as f32, 0.0));
            out.draw(s, ShapeKind::Cube, BOOM_COLOR);
        });
    }
}

fn counterweight<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>) {
    stack.with_saved(|s| {
        s.mult(&Transform::scaling(1.0, 1.5, 1.0));
        s.mult(&Transform::translation(0.0, -0.82, 1.0));
        out.draw(s, ShapeKind::Cube, COUNTERWEIGHT_COLOR);
    });
}

fn trolley_carriage<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>, trolley: f32) {
    stack.mult(&Transform::scaling(1.0, 0.1, 1.0));
    stack.mult(&Transform::translation(0.0, -6.0, trolley));
    out.draw(stack, ShapeKind::Cube, TROLLEY_COLOR);
}

fn wire_rope<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>, hook_len: f32) {
    stack.with_saved(|s| {
        s.mult(&Transform::translation(0.0, -1.0 - hook_len * 0.5, 0.0));
        s.mult(&Transform::scaling(0.1, hook_len, 0.1));
        out.draw(s, ShapeKind::Cylinder, ROPE_COLOR);
    });
}

fn hook_assembly<S: DrawSink>(
    stack: &mut MatrixStack,
    out: &mut Emitter<'_, S>,
    hook_len: f32,
    open: bool,
) {
    // Right arm first, then left, keeping the command order fixed.
    for side in [1.0f32, -1.0] {
        stack.with_saved(|s| {
            s.mult(&Transform::translation(0.0, -hook_len - 1.05, side * 0.6));
            s.mult(&Transform::rotation_x_deg(90.0));
            s.mult(&Transform::scaling(0.2, 1.5, 0.2));
            out.draw(s, ShapeKind::Cylinder, HOOK_ARM_COLOR);
        });
    }
    // The jaws flip between two discrete poses: spread and stubby while
    // open, long and parallel below the arms while closed.
    for side in [1.0f32, -1.0] {
        stack.with_saved(|s| {
            if open {
                s.mult(&Transform::translation(0.0, -hook_len - 1.4, side * 2.1));
            } else {
                s.mult(&Transform::translation(0.0, -hook_len - 6.4, side * 1.4));
            }
            s.mult(&Transform::rotation_x_deg(90.0));
            if open {
                s.mult(&Transform::scaling(0.2, 1.5, 0.2));
            } else {
                s.mult(&Transform::scaling(0.2, 0.2, 10.0));
            }
            out.draw(s, ShapeKind::Cylinder, JAW_COLOR);
        });
    }
}

fn load_block<S: DrawSink>(stack: &mut MatrixStack, out: &mut Emitter<'_, S>, state: &CraneState) {
    let block = state.block();
    // Attached, the block swings with the crane; released, it stays where
    // the anchor snapshot left it.
    let (slew_deg, trolley) = if block.is_attached() {
        (state.slew_deg(), state.trolley())
    } else {
        (block.anchor_slew_deg(), block.anchor_trolley())
    };
    stack.with_saved(|s| {
        s.mult(&Transform::uniform_scaling(4.0));
        s.mult(&Transform::rotation_y_deg(slew_deg));
        s.mult(&Transform::translation(0.0, block.y(), trolley / 2.37 - 1.7));
        out.draw(s, ShapeKind::Cube, BLOCK_COLOR);
    });
}
