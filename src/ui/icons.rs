use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Sender};
use std::thread;
use image::ImageReader;
use tiny_skia::{Pixmap, Transform};

/// Names tried when an icon is missing from every theme directory.
const FALLBACKS: &[(&str, &str)] = &[("preferences-desktop-theme", "preferences-color")];

const THEME_SUBDIRS: &[&str] = &[
    "hicolor/scalable/apps",
    "hicolor/48x48/apps",
    "hicolor/32x32/apps",
    "hicolor/64x64/apps",
    "hicolor/scalable/categories",
    "Adwaita/scalable/apps",
    "Adwaita/48x48/apps",
    "Adwaita/scalable/categories",
    "",
];

const EXTENSIONS: &[&str] = &["svg", "png", "xpm"];

/// Rasterised icons keyed by the name a row asked for. Lookups that miss are
/// queued to a loader thread whose answers come back over a calloop channel.
pub struct IconCache {
    size: u32,
    loaded: HashMap<String, Option<Pixmap>>,
    requested: HashSet<String>,
    requests: Sender<String>,
}

impl IconCache {
    pub fn new(size: u32, replies: calloop::channel::Sender<(String, Option<Pixmap>)>) -> Self {
        let (requests, incoming) = channel::<String>();
        let loader = IconLoader::new(size);

        thread::spawn(move || {
            while let Ok(name) = incoming.recv() {
                let pixmap = loader.load(&name);
                if replies.send((name, pixmap)).is_err() {
                    break;
                }
            }
        });

        Self {
            size,
            loaded: HashMap::new(),
            requested: HashSet::new(),
            requests,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn get(&mut self, name: &str) -> Option<&Pixmap> {
        if !self.loaded.contains_key(name) && self.requested.insert(name.to_string()) {
            let _ = self.requests.send(name.to_string());
        }
        self.loaded.get(name).and_then(Option::as_ref)
    }

    pub fn insert(&mut self, name: String, pixmap: Option<Pixmap>) {
        if pixmap.is_none() {
            log::debug!("No icon found for {:?}", name);
        }
        self.requested.remove(&name);
        self.loaded.insert(name, pixmap);
    }
}

struct IconLoader {
    size: u32,
    roots: Vec<PathBuf>,
}

impl IconLoader {
    fn new(size: u32) -> Self {
        let mut roots = Vec::new();
        if let Some(base_dirs) = directories::BaseDirs::new() {
            roots.push(base_dirs.data_dir().join("icons"));
            roots.push(base_dirs.home_dir().join(".icons"));
        }
        roots.push(PathBuf::from("/usr/share/icons"));
        roots.push(PathBuf::from("/usr/share/pixmaps"));
        Self { size, roots }
    }

    fn load(&self, name: &str) -> Option<Pixmap> {
        let fallback = FALLBACKS
            .iter()
            .find(|(primary, _)| *primary == name)
            .map(|(_, fallback)| *fallback);

        std::iter::once(name)
            .chain(fallback)
            .find_map(|candidate| self.locate(candidate))
            .and_then(|path| self.rasterise(&path))
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let path = Path::new(name);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        self.roots
            .iter()
            .filter(|root| root.exists())
            .flat_map(|root| THEME_SUBDIRS.iter().map(move |sub| root.join(sub)))
            .flat_map(|dir| EXTENSIONS.iter().map(move |ext| dir.join(format!("{name}.{ext}"))))
            .find(|candidate| candidate.exists())
    }

    fn rasterise(&self, path: &Path) -> Option<Pixmap> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("svg") => self.rasterise_svg(path),
            _ => self.rasterise_bitmap(path),
        }
    }

    fn rasterise_bitmap(&self, path: &Path) -> Option<Pixmap> {
        let img = ImageReader::open(path).ok()?.decode().ok()?;
        let img = img.resize(self.size, self.size, image::imageops::FilterType::Lanczos3);
        let mut rgba = img.into_rgba8();

        // tiny-skia expects premultiplied alpha.
        for pixel in rgba.chunks_exact_mut(4) {
            let a = pixel[3] as u16;
            for channel in &mut pixel[..3] {
                *channel = ((*channel as u16 * a) / 255) as u8;
            }
        }

        let (width, height) = (rgba.width(), rgba.height());
        Pixmap::from_vec(rgba.into_vec(), tiny_skia::IntSize::from_wh(width, height)?)
    }

    fn rasterise_svg(&self, path: &Path) -> Option<Pixmap> {
        let data = fs::read(path).ok()?;
        let tree = resvg::usvg::Tree::from_data(&data, &resvg::usvg::Options::default()).ok()?;

        let mut pixmap = Pixmap::new(self.size, self.size)?;
        let transform = Transform::from_scale(
            self.size as f32 / tree.size().width(),
            self.size as f32 / tree.size().height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Some(pixmap)
    }
}
