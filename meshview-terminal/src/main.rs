/// meshview - STL viewer for the terminal
///
/// Loads a binary or ASCII STL file and renders it with an orbit camera.
/// Controls:
///   - Left drag / WASD / Arrow Keys: Orbit around the model
///   - Mouse wheel / +/-: Zoom
///   - R: Reset the camera
///   - Q/ESC: Quit
use std::env;

use anyhow::{anyhow, Context, Result};
use log::info;
use meshview_core::{stl, CameraConfig};
use meshview_terminal::TerminalApp;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let mesh = stl::load_mesh(&options.path)
        .with_context(|| format!("failed to load STL file {}", options.path))?;

    if options.summary_only {
        println!("file: {}", options.path);
        println!("encoding: {:?}", mesh.encoding);
        println!("name: {}", mesh.name);
        println!("triangles: {}", mesh.vertices.triangle_count());
        println!("vertices: {}", mesh.vertices.vertex_count());
        println!("dropped facets: {}", mesh.dropped_facets);
        return Ok(());
    }

    info!(
        "starting viewer with {} triangles",
        mesh.vertices.triangle_count()
    );
    let mut app = TerminalApp::new(mesh.vertices, CameraConfig::default())
        .context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    Ok(())
}

struct CliOptions {
    path: String,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(path) = args.next() else {
            return Err(anyhow!("Usage: meshview <model.stl> [--summary]"));
        };
        let mut summary_only = false;
        for arg in args {
            match arg.as_str() {
                "--summary" => summary_only = true,
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --summary"
                    ));
                }
            }
        }
        Ok(Self { path, summary_only })
    }
}
