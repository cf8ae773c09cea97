use anyhow::{Context, Result};
use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    delegate_compositor, delegate_keyboard, delegate_layer, delegate_output, delegate_registry,
    delegate_seat, delegate_shm,
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    seat::{
        keyboard::{KeyEvent, KeyboardHandler, Modifiers},
        Capability, SeatHandler, SeatState,
    },
    shell::{
        wlr_layer::{LayerShell, LayerShellHandler, LayerSurface, LayerSurfaceConfigure},
        WaylandSurface,
    },
    shm::{slot::SlotPool, Shm, ShmHandler},
};
use wayland_client::{
    globals::GlobalList,
    protocol::{wl_keyboard, wl_output, wl_seat, wl_shm, wl_surface},
    Connection, QueueHandle,
};
use xkbcommon::xkb::{self, keysyms};
use hotspot::input::Key;
use crate::ui::render::Renderer;
use crate::ui::App;

pub struct WaylandApp {
    pub registry_state: RegistryState,
    pub seat_state: SeatState,
    pub output_state: OutputState,
    pub compositor_state: CompositorState,
    pub shm_state: Shm,
    pub layer_shell_state: LayerShell,

    pub layer_surface: Option<LayerSurface>,
    pub pool: Option<SlotPool>,
    pub width: u32,
    pub height: u32,
    pub should_exit: bool,

    pub app: App,
    pub renderer: Renderer,
}

impl WaylandApp {
    pub fn new(
        globals: &GlobalList,
        qh: &QueueHandle<Self>,
        app: App,
        renderer: Renderer,
        (width, height): (u32, u32),
    ) -> Result<Self> {
        Ok(Self {
            registry_state: RegistryState::new(globals),
            seat_state: SeatState::new(globals, qh),
            output_state: OutputState::new(globals, qh),
            compositor_state: CompositorState::bind(globals, qh).context("wl_compositor not available")?,
            shm_state: Shm::bind(globals, qh).context("wl_shm not available")?,
            layer_shell_state: LayerShell::bind(globals, qh).context("zwlr_layer_shell_v1 not available")?,
            layer_surface: None,
            pool: None,
            width,
            height,
            should_exit: false,
            app,
            renderer,
        })
    }

    pub fn draw(&mut self) {
        let Some(layer_surface) = &self.layer_surface else { return };
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return;
        }
        let Some(pool) = self.pool.as_mut() else { return };

        let (buffer, canvas) = match pool.create_buffer(
            width as i32,
            height as i32,
            (width * 4) as i32,
            wl_shm::Format::Argb8888,
        ) {
            Ok(created) => created,
            Err(err) => {
                log::warn!("Failed to create buffer: {}", err);
                return;
            }
        };

        let Some(mut pixmap) = tiny_skia::PixmapMut::from_bytes(canvas, width, height) else { return };
        self.renderer.draw(&mut pixmap, &self.app);

        // RGBA -> BGRA for Argb8888.
        for chunk in canvas.chunks_exact_mut(4) {
            chunk.swap(0, 2);
        }

        let surface = layer_surface.wl_surface();
        surface.attach(Some(buffer.wl_buffer()), 0, 0);
        surface.damage(0, 0, width as i32, height as i32);
        surface.commit();
    }

    fn ensure_pool(&mut self) {
        let needed = (self.width * self.height * 4) as usize;
        if let Some(pool) = self.pool.as_mut() {
            if pool.len() < needed {
                if let Err(err) = pool.resize(needed) {
                    log::error!("Failed to resize buffer pool: {}", err);
                    self.should_exit = true;
                }
            }
            return;
        }

        match SlotPool::new(needed, &self.shm_state) {
            Ok(pool) => self.pool = Some(pool),
            Err(err) => {
                log::error!("Failed to create buffer pool: {}", err);
                self.should_exit = true;
            }
        }
    }
}

/// Maps a key press to the controller's key vocabulary.
fn translate(event: &KeyEvent) -> Option<Key> {
    match u32::from(event.keysym) {
        keysyms::KEY_Escape => Some(Key::Escape),
        keysyms::KEY_Return | keysyms::KEY_KP_Enter => Some(Key::Enter),
        keysyms::KEY_Up => Some(Key::Up),
        keysyms::KEY_Down => Some(Key::Down),
        keysyms::KEY_BackSpace => Some(Key::Backspace),
        _ => event.utf8.clone().map(Key::Text),
    }
}

impl LayerShellHandler for WaylandApp {
    fn closed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _layer: &LayerSurface) {
        self.should_exit = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _layer: &LayerSurface,
        configure: LayerSurfaceConfigure,
        _serial: u32,
    ) {
        if configure.new_size.0 > 0 {
            self.width = configure.new_size.0;
        }
        if configure.new_size.1 > 0 {
            self.height = configure.new_size.1;
        }
        self.ensure_pool();
        self.draw();
    }
}

impl CompositorHandler for WaylandApp {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {}

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
        self.draw();
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {}

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {}

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {}
}

impl OutputHandler for WaylandApp {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }
    fn new_output(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {}
    fn update_output(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {}
    fn output_destroyed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {}
}

impl SeatHandler for WaylandApp {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_seat::WlSeat) {}

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        if capability == Capability::Keyboard {
            if let Err(err) = self.seat_state.get_keyboard(qh, &seat, None) {
                log::error!("Failed to bind keyboard: {}", err);
            }
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _: &QueueHandle<Self>,
        _: wl_seat::WlSeat,
        _capability: Capability,
    ) {}

    fn remove_seat(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_seat::WlSeat) {}
}

impl KeyboardHandler for WaylandApp {
    fn enter(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &wl_keyboard::WlKeyboard,
        _: &wl_surface::WlSurface,
        _: u32,
        _: &[u32],
        _: &[xkb::Keysym],
    ) {}

    fn leave(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &wl_keyboard::WlKeyboard,
        _: &wl_surface::WlSurface,
        _: u32,
    ) {
        self.should_exit = true;
    }

    fn press_key(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        event: KeyEvent,
    ) {
        let Some(key) = translate(&event) else { return };

        if self.app.handle_key(&key).should_exit() {
            self.should_exit = true;
            return;
        }

        if let Some(layer_surface) = &self.layer_surface {
            let surface = layer_surface.wl_surface();
            surface.frame(qh, surface.clone());
            surface.commit();
        }
    }

    fn release_key(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &wl_keyboard::WlKeyboard,
        _: u32,
        _: KeyEvent,
    ) {}

    fn update_modifiers(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &wl_keyboard::WlKeyboard,
        _serial: u32,
        _modifiers: Modifiers,
        _layout: u32,
    ) {}
}

impl ShmHandler for WaylandApp {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm_state
    }
}

delegate_compositor!(WaylandApp);
delegate_output!(WaylandApp);
delegate_shm!(WaylandApp);
delegate_seat!(WaylandApp);
delegate_keyboard!(WaylandApp);
delegate_layer!(WaylandApp);
delegate_registry!(WaylandApp);

impl ProvidesRegistryState for WaylandApp {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    fn runtime_add_global(&mut self, _: &Connection, _: &QueueHandle<Self>, _: u32, _: &str, _: u32) {}
    fn runtime_remove_global(&mut self, _: &Connection, _: &QueueHandle<Self>, _: u32, _: &str) {}
}
