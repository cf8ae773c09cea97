use hotspot::controller::SelectionController;
use hotspot::launcher::DetachedSpawner;
use hotspot::settings::FileSettings;

pub mod icons;
pub mod render;
pub mod wayland;

/// The controller as the window drives it.
pub type App = SelectionController<FileSettings, DetachedSpawner>;
