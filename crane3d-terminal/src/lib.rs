/// Terminal front-end for the crane scene: frame loop, input, HUD
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use crane3d_core::{evaluate_commands, CraneState, DrawStyle, ViewMode};

pub mod input;
pub mod renderer;

pub use input::Action;
pub use renderer::{CraneRenderer, ShapeLibrary};

const CONTROLS_LINE: &str =
    "i/k hoist  w/s hook  a/d trolley  j/l slew  9 jaws  1-4 view  arrows orbit  r reset  0 style  z/x zoom  +/- speed  space pause  q quit";

/// Interactive crane application driving the cooperative frame loop.
///
/// Owns the single [`CraneState`] for the session; key handlers mutate it
/// between frames and the evaluator reads it once per frame, so writer and
/// reader never overlap.
pub struct CraneApp {
    state: CraneState,
    shapes: ShapeLibrary,
    renderer: CraneRenderer,
    width: usize,
    height: usize,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl CraneApp {
    pub fn new(state: CraneState) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let zoom = state.rig().zoom;

        Ok(Self {
            state,
            shapes: ShapeLibrary::new(),
            renderer: CraneRenderer::new(width as usize, height as usize, zoom),
            width: width as usize,
            height: height as usize,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn state(&self) -> &CraneState {
        &self.state
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            self.handle_input()?;

            // Advance the simulation, then read it out.
            self.state.tick();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Drain every pending event so a burst of key presses lands in one
    /// frame instead of queueing up.
    fn handle_input(&mut self) -> io::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(KeyEvent { code, .. }) => match input::action_for(code) {
                    Some(Action::Quit) => self.running = false,
                    Some(action) => input::apply(action, &mut self.state),
                    None => {}
                },
                Event::Resize(width, height) => {
                    self.width = width as usize;
                    self.height = height as usize;
                    self.renderer.resize(self.width, self.height);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        for command in evaluate_commands(&self.state) {
            self.renderer.draw_command(&command, &self.shapes);
        }

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;
        self.draw_hud(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn draw_hud<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let state = &self.state;
        let status = format!(
            "{} | fps {:>4.1} | t {:>6.1} | hoist {:>4.1} slew {:>6.1} trolley {:>4.1} hook {:>5.1} | {} {}{}",
            state.rig().name,
            self.fps,
            state.sim_time(),
            state.hoist(),
            state.slew_deg(),
            state.trolley(),
            state.hook_len(),
            view_label(state.view()),
            style_label(state.draw_style()),
            if state.is_animating() { "" } else { " [paused]" },
        );
        queue!(
            writer,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(status),
        )?;
        if self.height >= 2 {
            queue!(
                writer,
                cursor::MoveTo(0, self.height as u16 - 1),
                SetForegroundColor(Color::DarkGrey),
                Print(CONTROLS_LINE),
            )?;
        }
        queue!(writer, ResetColor)?;
        Ok(())
    }
}

fn view_label(view: ViewMode) -> &'static str {
    match view {
        ViewMode::Axonometric => "axon",
        ViewMode::Front => "front",
        ViewMode::Top => "top",
        ViewMode::Right => "right",
    }
}

fn style_label(style: DrawStyle) -> &'static str {
    match style {
        DrawStyle::Wireframe => "wire",
        DrawStyle::Solid => "solid",
    }
}
