/// Key bindings: one named action per crane control, dispatched 1:1 onto
/// the state mutators
use crane3d_core::{CraneState, ViewMode};
use crossterm::event::KeyCode;

/// Camera orbit change per arrow-key press, degrees.
const ORBIT_STEP_DEG: f32 = 5.0;
/// Zoom change per z/x press.
const ZOOM_STEP: f32 = 0.1;
/// Simulation speed multiplier per +/- press.
const SPEED_FACTOR: f32 = 1.25;

/// Discrete crane controls. Everything except [`Action::Quit`] maps onto
/// exactly one `CraneState` mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RaiseHoist,
    LowerHoist,
    RaiseHook,
    LowerHook,
    TrolleyOut,
    TrolleyIn,
    SlewLeft,
    SlewRight,
    ToggleHook,
    SetView(ViewMode),
    ResetCamera,
    ToggleDrawStyle,
    SpeedUp,
    SpeedDown,
    ZoomIn,
    ZoomOut,
    OrbitLeft,
    OrbitRight,
    OrbitUp,
    OrbitDown,
    TogglePause,
    Quit,
}

/// Map a key press to its action, if any.
pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('i') => Some(Action::RaiseHoist),
        KeyCode::Char('k') => Some(Action::LowerHoist),
        KeyCode::Char('w') => Some(Action::RaiseHook),
        KeyCode::Char('s') => Some(Action::LowerHook),
        KeyCode::Char('a') => Some(Action::TrolleyOut),
        KeyCode::Char('d') => Some(Action::TrolleyIn),
        KeyCode::Char('j') => Some(Action::SlewLeft),
        KeyCode::Char('l') => Some(Action::SlewRight),
        KeyCode::Char('9') => Some(Action::ToggleHook),
        KeyCode::Char('1') => Some(Action::SetView(ViewMode::Front)),
        KeyCode::Char('2') => Some(Action::SetView(ViewMode::Top)),
        KeyCode::Char('3') => Some(Action::SetView(ViewMode::Right)),
        KeyCode::Char('4') => Some(Action::SetView(ViewMode::Axonometric)),
        KeyCode::Char('r') => Some(Action::ResetCamera),
        KeyCode::Char('0') => Some(Action::ToggleDrawStyle),
        KeyCode::Char('+') => Some(Action::SpeedUp),
        KeyCode::Char('-') => Some(Action::SpeedDown),
        KeyCode::Char('z') => Some(Action::ZoomIn),
        KeyCode::Char('x') => Some(Action::ZoomOut),
        KeyCode::Left => Some(Action::OrbitLeft),
        KeyCode::Right => Some(Action::OrbitRight),
        KeyCode::Up => Some(Action::OrbitUp),
        KeyCode::Down => Some(Action::OrbitDown),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Apply an action to the state. [`Action::Quit`] is the caller's concern
/// and does nothing here.
pub fn apply(action: Action, state: &mut CraneState) {
    let rig = state.rig().clone();
    match action {
        Action::RaiseHoist => {
            state.adjust_hoist(rig.hoist_step());
        }
        Action::LowerHoist => {
            state.adjust_hoist(-rig.hoist_step());
        }
        Action::RaiseHook => {
            state.adjust_hook(-rig.hook_step);
        }
        Action::LowerHook => {
            state.adjust_hook(rig.hook_step);
        }
        Action::TrolleyOut => {
            state.adjust_trolley(rig.trolley_step);
        }
        Action::TrolleyIn => {
            state.adjust_trolley(-rig.trolley_step);
        }
        Action::SlewLeft => {
            state.adjust_slew(rig.slew_step);
        }
        Action::SlewRight => {
            state.adjust_slew(-rig.slew_step);
        }
        Action::ToggleHook => {
            state.toggle_hook_open();
        }
        Action::SetView(view) => state.set_view(view),
        Action::ResetCamera => state.reset_camera(),
        Action::ToggleDrawStyle => {
            state.toggle_draw_style();
        }
        Action::SpeedUp => {
            state.adjust_speed(SPEED_FACTOR);
        }
        Action::SpeedDown => {
            state.adjust_speed(1.0 / SPEED_FACTOR);
        }
        Action::ZoomIn => {
            state.adjust_zoom(ZOOM_STEP);
        }
        Action::ZoomOut => {
            state.adjust_zoom(-ZOOM_STEP);
        }
        Action::OrbitLeft => {
            state.orbit_camera(-ORBIT_STEP_DEG, 0.0);
        }
        Action::OrbitRight => {
            state.orbit_camera(ORBIT_STEP_DEG, 0.0);
        }
        Action::OrbitUp => {
            state.orbit_camera(0.0, ORBIT_STEP_DEG);
        }
        Action::OrbitDown => {
            state.orbit_camera(0.0, -ORBIT_STEP_DEG);
        }
        Action::TogglePause => {
            state.toggle_animation();
        }
        Action::Quit => {}
    }
}

/// View preset by its key number (1 front, 2 top, 3 right, 4 axonometric).
pub fn view_for_index(index: u8) -> Option<ViewMode> {
    match index {
        1 => Some(ViewMode::Front),
        2 => Some(ViewMode::Top),
        3 => Some(ViewMode::Right),
        4 => Some(ViewMode::Axonometric),
        _ => None,
    }
}
