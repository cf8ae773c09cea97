mod ui;

use anyhow::{Context, Result};
use calloop::EventLoop;
use calloop_wayland_source::WaylandSource;
use clap::Parser;
use smithay_client_toolkit::{
    shell::wlr_layer::{Anchor, KeyboardInteractivity, Layer},
    shell::WaylandSurface,
};
use std::path::PathBuf;
use wayland_client::{globals::registry_queue_init, Connection};
use hotspot::catalog;
use hotspot::config::{load_config, Config};
use hotspot::controller::SelectionController;
use hotspot::launcher::DetachedSpawner;
use hotspot::settings::FileSettings;
use hotspot::sources::{desktop::DesktopSource, themes::ThemeSource, Source};
use crate::ui::icons::IconCache;
use crate::ui::render::Renderer;
use crate::ui::wayland::WaylandApp;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to read instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the application catalog and exit
    #[arg(short, long)]
    list: bool,

    /// Filter applied to --list
    #[arg(short, long, requires = "list")]
    query: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // 1. Load Config
    let config = load_config(args.config.as_deref())?;

    // 2. Load catalogs
    let applications = DesktopSource::new(config.sources.application_dirs.clone()).scan();

    if args.list {
        let view = catalog::filter(&applications, args.query.as_deref().unwrap_or(""));
        for app in view.items(&applications) {
            println!("{}\t{}", app.name, app.exec);
        }
        return Ok(());
    }

    let themes = ThemeSource::new(config.sources.theme_locations()).scan();
    let settings = FileSettings::open(config.settings.resolved_path());
    let app = SelectionController::new(applications, themes, settings, DetachedSpawner);

    run_window(&config, app)
}

fn run_window(config: &Config, app: ui::App) -> Result<()> {
    let window = &config.window;

    // 3. Setup Wayland Connection & Event Loop
    let mut event_loop: EventLoop<WaylandApp> = EventLoop::try_new()?;
    let conn = Connection::connect_to_env().context("connecting to the Wayland compositor")?;
    let (globals, event_queue) = registry_queue_init::<WaylandApp>(&conn)?;
    let qh = event_queue.handle();

    // 4. Init UI
    let (tx_icons, rx_icons) = calloop::channel::channel::<(String, Option<tiny_skia::Pixmap>)>();
    let renderer = Renderer::new(IconCache::new(window.icon_size, tx_icons), window.clone());
    let mut wayland = WaylandApp::new(&globals, &qh, app, renderer, (window.width, window.height))?;

    // 5. Create Layer Surface, centred by leaving it unanchored
    let surface = wayland.compositor_state.create_surface(&qh);
    let layer_surface = wayland.layer_shell_state.create_layer_surface(
        &qh,
        surface,
        Layer::Overlay,
        Some("hotspot"),
        None,
    );
    layer_surface.set_anchor(Anchor::empty());
    layer_surface.set_size(window.width, window.height);
    layer_surface.set_keyboard_interactivity(KeyboardInteractivity::Exclusive);
    layer_surface.commit();
    wayland.layer_surface = Some(layer_surface);

    event_loop
        .handle()
        .insert_source(rx_icons, |event, _, wayland: &mut WaylandApp| {
            if let calloop::channel::Event::Msg((name, pixmap)) = event {
                wayland.renderer.insert_icon(name, pixmap);
                wayland.draw();
            }
        })
        .map_err(|err| anyhow::anyhow!("inserting icon source: {}", err.error))?;

    event_loop
        .handle()
        .insert_source(
            WaylandSource::new(conn.clone(), event_queue),
            |_, queue, wayland| queue.dispatch_pending(wayland),
        )
        .map_err(|err| anyhow::anyhow!("inserting Wayland source: {}", err.error))?;

    // 6. Run Loop
    while !wayland.should_exit {
        event_loop.dispatch(None, &mut wayland)?;
    }

    Ok(())
}
