use tiny_skia::{Color, Paint, PathBuilder, PixmapMut, PixmapPaint, Rect, Stroke, Transform};
use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping, SwashCache};
use hotspot::config::WindowConfig;
use hotspot::input::Focus;
use hotspot::model::DisplayItem;
use hotspot::style::Style;
use crate::ui::icons::IconCache;
use crate::ui::App;

/// Everything a frame needs, resolved from the active style.
struct Palette {
    background: Color,
    border: Color,
    search_background: Color,
    text: Color,
    secondary_text: Color,
    placeholder: Color,
    selection_background: Color,
    selection_text: Color,
    marker: Color,
}

impl From<&Style> for Palette {
    fn from(style: &Style) -> Self {
        Self {
            background: Style::parse_color(&style.background),
            border: Style::parse_color(&style.border_color),
            search_background: Style::parse_color(&style.search_background),
            text: Style::parse_color(&style.text),
            secondary_text: Style::parse_color(&style.secondary_text),
            placeholder: Style::parse_color(&style.placeholder),
            selection_background: Style::parse_color(&style.selection_background),
            selection_text: Style::parse_color(&style.selection_text),
            marker: Style::parse_color(&style.marker),
        }
    }
}

pub struct Renderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    icon_cache: IconCache,
    layout: WindowConfig,
}

impl Renderer {
    pub fn new(icon_cache: IconCache, layout: WindowConfig) -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            icon_cache,
            layout,
        }
    }

    pub fn insert_icon(&mut self, name: String, pixmap: Option<tiny_skia::Pixmap>) {
        self.icon_cache.insert(name, pixmap);
    }

    pub fn draw(&mut self, pixmap: &mut PixmapMut, app: &App) {
        let layout = self.layout.clone();
        let palette = Palette::from(app.style());

        pixmap.fill(Color::TRANSPARENT);
        let width = pixmap.width() as f32;
        let height = pixmap.height() as f32;

        if let Some(rect) = Rect::from_xywh(0.0, 0.0, width, height) {
            self.draw_rounded_rect(pixmap, rect, layout.border_radius, palette.background, Some(palette.border));
        }

        // Search box
        let search_height = layout.font_size * 2.4;
        if let Some(rect) = Rect::from_xywh(layout.padding, layout.padding, width - layout.padding * 2.0, search_height) {
            self.draw_rounded_rect(pixmap, rect, search_height / 2.0, palette.search_background, None);
        }
        let (search_text, search_color) = if app.query().is_empty() {
            (app.placeholder().to_string(), palette.placeholder)
        } else {
            (app.query().to_string(), palette.text)
        };
        let search_text = if app.focus() == Focus::Filter {
            format!("{search_text}|")
        } else {
            search_text
        };
        let text_y = layout.padding + (search_height - layout.font_size) / 2.0;
        self.draw_text(pixmap, &search_text, layout.padding * 2.0, text_y, layout.font_size, search_color);

        // List
        let items = app.displayed();
        let list_start_y = layout.padding + search_height + layout.spacing;
        let visible = ((height - list_start_y - layout.padding) / layout.item_height).max(0.0) as usize;
        let selected = app.view().selected;
        let offset = scroll_offset(selected.unwrap_or(0), items.len(), visible);

        for (row, item) in items.iter().enumerate().skip(offset).take(visible) {
            let y = list_start_y + (row - offset) as f32 * layout.item_height;
            let is_selected = selected == Some(row);
            self.draw_item(pixmap, item, y, width, is_selected, &palette);
        }

        if items.is_empty() {
            self.draw_text(pixmap, "No results found", layout.padding * 2.0, list_start_y, layout.font_size, palette.secondary_text);
        }
    }

    fn draw_item(&mut self, pixmap: &mut PixmapMut, item: &DisplayItem, y: f32, width: f32, selected: bool, palette: &Palette) {
        let layout = self.layout.clone();
        let (text_color, secondary_color) = if selected {
            if let Some(rect) = Rect::from_xywh(layout.padding, y + 2.0, width - layout.padding * 2.0, layout.item_height - 4.0) {
                self.draw_rounded_rect(pixmap, rect, layout.border_radius, palette.selection_background, None);
            }
            (palette.selection_text, palette.selection_text)
        } else {
            (palette.text, palette.secondary_text)
        };

        let mut text_x = layout.padding * 2.0;
        if let Some(icon_name) = &item.icon {
            let size = self.icon_cache.size() as f32;
            if let Some(icon) = self.icon_cache.get(icon_name) {
                let icon_y = y + (layout.item_height - size) / 2.0;
                pixmap.draw_pixmap(text_x as i32, icon_y as i32, icon.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
            }
            text_x += size + layout.spacing;
        }

        let label_size = layout.font_size;
        let secondary_size = layout.font_size * 0.75;
        let (label_y, secondary_y) = match item.secondary {
            Some(_) => {
                let top = y + (layout.item_height - label_size - secondary_size - 2.0) / 2.0;
                (top, top + label_size + 2.0)
            }
            None => (y + (layout.item_height - label_size) / 2.0, 0.0),
        };

        let label_color = if item.active && !selected { palette.marker } else { text_color };
        self.draw_text(pixmap, &item.label, text_x, label_y, label_size, label_color);

        if let Some(secondary) = &item.secondary {
            self.draw_text(pixmap, secondary, text_x, secondary_y, secondary_size, secondary_color);
        }
    }

    fn draw_rounded_rect(&self, pixmap: &mut PixmapMut, rect: Rect, radius: f32, fill: Color, stroke: Option<Color>) {
        let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
        let (x, y, w, h) = (rect.left(), rect.top(), rect.width(), rect.height());

        let mut pb = PathBuilder::new();
        pb.move_to(x + radius, y);
        pb.line_to(x + w - radius, y);
        pb.quad_to(x + w, y, x + w, y + radius);
        pb.line_to(x + w, y + h - radius);
        pb.quad_to(x + w, y + h, x + w - radius, y + h);
        pb.line_to(x + radius, y + h);
        pb.quad_to(x, y + h, x, y + h - radius);
        pb.line_to(x, y + radius);
        pb.quad_to(x, y, x + radius, y);
        pb.close();

        let Some(path) = pb.finish() else { return };

        let mut paint = Paint::default();
        paint.set_color(fill);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, tiny_skia::FillRule::Winding, Transform::identity(), None);

        if let Some(color) = stroke {
            let mut stroke_paint = Paint::default();
            stroke_paint.set_color(color);
            stroke_paint.anti_alias = true;
            let stroke = Stroke { width: 1.5, ..Default::default() };
            pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);
        }
    }

    fn draw_text(&mut self, pixmap: &mut PixmapMut, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size, size * 1.2));
        buffer.set_size(&mut self.font_system, Some(pixmap.width() as f32 - x), None);
        buffer.set_text(&mut self.font_system, text, Attrs::new(), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let color = color.to_color_u8();
        let text_color = cosmic_text::Color::rgba(color.red(), color.green(), color.blue(), color.alpha());

        let (max_x, max_y) = (pixmap.width() as i32, pixmap.height() as i32);
        buffer.draw(&mut self.font_system, &mut self.swash_cache, text_color, |gx, gy, w, h, glyph| {
            let (px, py) = (gx + x as i32, gy + y as i32);
            if w == 0 || h == 0 || px < 0 || py < 0 || px >= max_x || py >= max_y {
                return;
            }
            let paint = Paint {
                shader: tiny_skia::Shader::SolidColor(Color::from_rgba8(glyph.r(), glyph.g(), glyph.b(), glyph.a())),
                ..Paint::default()
            };
            if let Some(rect) = Rect::from_xywh(px as f32, py as f32, w as f32, h as f32) {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        });
    }
}

/// First visible row so that `selected` stays roughly centred.
fn scroll_offset(selected: usize, total: usize, visible: usize) -> usize {
    if total <= visible || visible == 0 {
        0
    } else if selected < visible / 2 {
        0
    } else if selected >= total - visible / 2 {
        total - visible
    } else {
        selected - visible / 2
    }
}

#[cfg(test)]
mod tests {
    use super::scroll_offset;

    #[test]
    fn short_lists_never_scroll() {
        assert_eq!(scroll_offset(3, 5, 10), 0);
    }

    #[test]
    fn selection_is_kept_in_view() {
        assert_eq!(scroll_offset(0, 20, 6), 0);
        assert_eq!(scroll_offset(10, 20, 6), 7);
        assert_eq!(scroll_offset(19, 20, 6), 14);
    }
}
