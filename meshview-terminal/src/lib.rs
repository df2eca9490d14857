/// Terminal-based STL viewer driven by an orbit camera
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::debug;
use meshview_core::{CameraConfig, OrbitController, Transform, VertexBuffer};
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Approximate pixel size of one terminal cell, so drags feel like mouse drags.
const CELL_WIDTH_PX: f32 = 8.0;
const CELL_HEIGHT_PX: f32 = 16.0;
/// Pointer-equivalent distance of one orbit key press.
const KEY_ORBIT_STEP: f32 = 20.0;
/// Radius of the sphere loaded models are scaled into.
const MODEL_RADIUS: f32 = 2.0;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    vertices: VertexBuffer,
    model: Matrix4<f32>,
    config: CameraConfig,
    controller: OrbitController,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(vertices: VertexBuffer, config: CameraConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(vertices, config, width, height))
    }

    /// Build an app for a fixed raster size without touching the terminal.
    pub fn with_size(vertices: VertexBuffer, config: CameraConfig, width: u16, height: u16) -> Self {
        let model = vertices
            .bounds()
            .map(|bounds| Transform::fit(&bounds, MODEL_RADIUS))
            .unwrap_or_else(Matrix4::identity);

        Self {
            vertices,
            model,
            config,
            controller: OrbitController::new(config),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain pending input before drawing
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(&event);
            }

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

    /// Route one terminal event to the camera controller.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                debug!("terminal resized to {}x{}", width, height);
                self.renderer.resize(*width as usize, *height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => self.controller.orbit_by(0.0, -KEY_ORBIT_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.controller.orbit_by(0.0, KEY_ORBIT_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.controller.orbit_by(-KEY_ORBIT_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.controller.orbit_by(KEY_ORBIT_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.controller.scrolled(1.0),
            KeyCode::Char('-') => self.controller.scrolled(-1.0),
            KeyCode::Char('r') => self.controller = OrbitController::new(self.config),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let x = mouse.column as f32 * CELL_WIDTH_PX;
        let y = mouse.row as f32 * CELL_HEIGHT_PX;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.controller.pointer_moved(x, y);
                self.controller.set_primary_button(true);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.controller.pointer_moved(x, y);
                self.controller.set_primary_button(false);
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                self.controller.pointer_moved(x, y);
            }
            MouseEventKind::ScrollUp => self.controller.scrolled(1.0),
            MouseEventKind::ScrollDown => self.controller.scrolled(-1.0),
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer
            .render_mesh(&self.vertices, &self.model, self.controller.camera());

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let camera = self.controller.camera();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "meshview | {} triangles | FPS: {:.1} | r={:.1} | Drag/WASD=Orbit Wheel/+-=Zoom R=Reset Q=Quit",
                self.vertices.triangle_count(),
                self.fps,
                camera.radius()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use meshview_core::OrbitalCamera;

    fn test_app() -> TerminalApp {
        TerminalApp::with_size(VertexBuffer::new(), CameraConfig::default(), 80, 24)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        app.handle_event(&key(KeyCode::Char('q')));
        assert!(!app.is_running());

        let mut app = test_app();
        app.handle_event(&key(KeyCode::Esc));
        assert!(!app.is_running());
    }

    #[test]
    fn test_left_drag_orbits() {
        let mut app = test_app();
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 20, 10));
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 20, 10));

        let camera = app.controller().camera();
        assert!((camera.azimuth() - 10.0 * CELL_WIDTH_PX * 0.005).abs() < 1e-5);
        assert_eq!(camera.polar(), 0.0);
        assert!(!app.controller().is_dragging());
    }

    #[test]
    fn test_hover_does_not_orbit() {
        let mut app = test_app();
        app.handle_event(&mouse(MouseEventKind::Moved, 0, 0));
        app.handle_event(&mouse(MouseEventKind::Moved, 30, 5));
        assert_eq!(app.controller().camera(), &OrbitalCamera::default());
    }

    #[test]
    fn test_scroll_zooms_and_reset_restores() {
        let mut app = test_app();
        app.handle_event(&mouse(MouseEventKind::ScrollUp, 0, 0));
        assert!((app.controller().camera().radius() - 4.5).abs() < 1e-6);

        app.handle_event(&key(KeyCode::Char('r')));
        assert_eq!(app.controller().camera(), &OrbitalCamera::default());
    }

    #[test]
    fn test_keyboard_orbit() {
        let mut app = test_app();
        app.handle_event(&key(KeyCode::Up));
        assert!(app.controller().camera().polar() > 0.0);
    }
}
