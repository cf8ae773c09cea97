use crate::catalog::{Catalog, View};
use crate::input::{self, FilterEdit, Focus, Key, Route};
use crate::launcher::{Launcher, Spawner};
use crate::model::{ApplicationEntry, DisplayItem, ListEntry, ThemeEntry};
use crate::settings::{SettingsStore, CURRENT_THEME_KEY, DEFAULT_THEME};
use crate::sources::themes::{self, ThemeError};
use crate::style::Style;
use log::{info, warn};

pub const ACTIVE_THEME_MARKER: &str = "✓ ";
const THEME_ICON: &str = "preferences-desktop-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Applications,
    Themes,
}

/// What the shell should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// A program was started; the window should close.
    Launched,
    /// Cancelled from application mode; the window should close.
    Close,
}

impl Outcome {
    pub fn should_exit(self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

/// Owns both catalogs, the filter text and the mode, and dispatches
/// activation to the launcher or the theme applier.
pub struct SelectionController<S, P> {
    mode: Mode,
    query: String,
    focus: Focus,
    applications: Catalog<ApplicationEntry>,
    themes: Catalog<ThemeEntry>,
    view: View,
    active_theme: String,
    style: Style,
    settings: S,
    launcher: Launcher<P>,
}

impl<S: SettingsStore, P: Spawner> SelectionController<S, P> {
    /// `applications` should already be sorted; the theme selector entry is
    /// put in front. The persisted theme is applied right away.
    pub fn new(
        applications: Vec<ApplicationEntry>,
        themes: Vec<ThemeEntry>,
        settings: S,
        spawner: P,
    ) -> Self {
        let mut entries = Vec::with_capacity(applications.len() + 1);
        entries.push(ApplicationEntry::theme_selector());
        entries.extend(applications);

        let active_theme = settings.value_or(CURRENT_THEME_KEY, DEFAULT_THEME);
        let mut controller = Self {
            mode: Mode::Applications,
            query: String::new(),
            focus: Focus::Filter,
            applications: Catalog::new(entries),
            themes: Catalog::new(themes),
            view: View::default(),
            active_theme,
            style: Style::default(),
            settings,
            launcher: Launcher::new(spawner),
        };

        let saved = controller.active_theme.clone();
        if let Err(err) = controller.apply_theme(&saved) {
            warn!("Keeping built-in style: {}", err);
        }
        controller.refresh();
        controller
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn active_theme(&self) -> &str {
        &self.active_theme
    }

    pub fn applications(&self) -> &Catalog<ApplicationEntry> {
        &self.applications
    }

    pub fn themes(&self) -> &Catalog<ThemeEntry> {
        &self.themes
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn spawner(&self) -> &P {
        self.launcher.spawner()
    }

    pub fn placeholder(&self) -> &'static str {
        match self.mode {
            Mode::Applications => "Search applications...",
            Mode::Themes => "Search themes...",
        }
    }

    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
        self.refresh();
    }

    pub fn move_selection(&mut self, delta: i32) {
        self.view.move_selection(delta);
    }

    /// Rows of the current mode in display order. Theme rows carry the
    /// active marker.
    pub fn displayed(&self) -> Vec<DisplayItem> {
        match self.mode {
            Mode::Applications => self
                .view
                .items(self.applications.entries())
                .map(|app| DisplayItem {
                    label: app.name.clone(),
                    secondary: app.about.clone(),
                    icon: app.icon.clone(),
                    active: false,
                })
                .collect(),
            Mode::Themes => self
                .view
                .items(self.themes.entries())
                .map(|theme| {
                    let active = theme.name == self.active_theme;
                    let label = if active {
                        format!("{}{}", ACTIVE_THEME_MARKER, theme.label())
                    } else {
                        theme.label().to_string()
                    };
                    DisplayItem {
                        label,
                        secondary: Some(format!("Theme: {}", theme.name)),
                        icon: Some(THEME_ICON.to_string()),
                        active,
                    }
                })
                .collect(),
        }
    }

    pub fn activate(&mut self) -> Outcome {
        let Some(index) = self.view.selected_index() else {
            return Outcome::Continue;
        };

        match self.mode {
            Mode::Applications => {
                let Some(entry) = self.applications.get(index) else {
                    return Outcome::Continue;
                };
                if entry.is_theme_selector() {
                    self.enter_mode(Mode::Themes);
                    return Outcome::Continue;
                }

                let exec = entry.exec.clone();
                match self.launcher.launch(&exec) {
                    Ok(()) => Outcome::Launched,
                    Err(err) => {
                        warn!("{}", err);
                        Outcome::Continue
                    }
                }
            }
            Mode::Themes => {
                if let Some(name) = self.themes.get(index).map(|t| t.name.clone()) {
                    if let Err(err) = self.apply_theme(&name) {
                        warn!("{}", err);
                    }
                }
                self.enter_mode(Mode::Applications);
                Outcome::Continue
            }
        }
    }

    pub fn cancel(&mut self) -> Outcome {
        match self.mode {
            Mode::Themes => {
                self.enter_mode(Mode::Applications);
                Outcome::Continue
            }
            Mode::Applications => Outcome::Close,
        }
    }

    pub fn handle_key(&mut self, key: &Key) -> Outcome {
        let (focus, route) = input::route(self.focus, key);
        self.focus = focus;

        match route {
            Route::Activate => self.activate(),
            Route::Cancel => self.cancel(),
            Route::MoveSelection(delta) => {
                self.move_selection(delta);
                Outcome::Continue
            }
            Route::EditFilter(FilterEdit::Append(text)) => {
                self.query.push_str(&text);
                self.refresh();
                Outcome::Continue
            }
            Route::EditFilter(FilterEdit::Backspace) => {
                if self.query.pop().is_some() {
                    self.refresh();
                }
                Outcome::Continue
            }
            Route::Ignore => Outcome::Continue,
        }
    }

    /// Applies a theme by name (falling back to the first one) and makes it
    /// the active style. On failure style and setting stay as they were.
    pub fn apply_theme(&mut self, name: &str) -> Result<(), ThemeError> {
        let applied = themes::apply_theme(self.themes.entries(), name, &mut self.settings)?;
        self.active_theme = applied.name;
        self.style = applied.style;
        Ok(())
    }

    fn enter_mode(&mut self, mode: Mode) {
        info!("Switching to {:?}", mode);
        self.mode = mode;
        self.query.clear();
        self.focus = Focus::Filter;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.view = match self.mode {
            Mode::Applications => self.applications.filter(&self.query),
            Mode::Themes => self.themes.filter(&self.query),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::testing::RecordingSpawner;
    use crate::model::{BundledTheme, ThemeResource};
    use crate::settings::testing::MemorySettings;
    use std::path::PathBuf;

    type Controller = SelectionController<MemorySettings, RecordingSpawner>;

    fn app(name: &str, exec: &str) -> ApplicationEntry {
        ApplicationEntry::new(name, exec)
    }

    fn bundled(name: &'static str, file: &'static str, content: &'static str) -> ThemeEntry {
        ThemeEntry {
            name: name.to_string(),
            display_name: themes::display_name(name),
            resource: ThemeResource::Bundled(BundledTheme { file, content }),
        }
    }

    fn theme_catalog() -> Vec<ThemeEntry> {
        vec![
            bundled("dark", "dark.theme", "background = \"000000ff\""),
            bundled("light", "light.theme", "background = \"ffffffff\""),
        ]
    }

    fn controller_with(settings: MemorySettings) -> Controller {
        SelectionController::new(
            vec![app("Firefox", "firefox %u"), app("GIMP", "gimp")],
            theme_catalog(),
            settings,
            RecordingSpawner::default(),
        )
    }

    fn controller() -> Controller {
        controller_with(MemorySettings::with(CURRENT_THEME_KEY, "dark"))
    }

    fn labels(controller: &Controller) -> Vec<String> {
        controller.displayed().into_iter().map(|item| item.label).collect()
    }

    fn type_text(controller: &mut Controller, text: &str) {
        for ch in text.chars() {
            controller.handle_key(&Key::Text(ch.to_string()));
        }
    }

    #[test]
    fn starts_in_application_mode_with_selector_first() {
        let controller = controller();
        assert_eq!(controller.mode(), Mode::Applications);
        assert_eq!(labels(&controller), vec!["HotSpot: Select Theme", "Firefox", "GIMP"]);
        assert_eq!(controller.view().selected, Some(0));
        assert_eq!(controller.placeholder(), "Search applications...");
    }

    #[test]
    fn startup_applies_persisted_theme() {
        let controller = controller_with(MemorySettings::with(CURRENT_THEME_KEY, "light"));
        assert_eq!(controller.active_theme(), "light");
        assert_eq!(controller.style().background, "ffffffff");
    }

    #[test]
    fn startup_without_setting_falls_back_to_first_theme() {
        let controller = controller_with(MemorySettings::default());
        assert_eq!(controller.active_theme(), "dark");
        assert_eq!(
            controller.settings().value(CURRENT_THEME_KEY).as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn startup_without_themes_keeps_default_style() {
        let controller: Controller = SelectionController::new(
            vec![],
            vec![],
            MemorySettings::default(),
            RecordingSpawner::default(),
        );
        assert_eq!(controller.style(), &Style::default());
        assert_eq!(controller.active_theme(), DEFAULT_THEME);
        assert_eq!(labels(&controller), vec!["HotSpot: Select Theme"]);
    }

    #[test]
    fn typing_filters_and_selects_first_match() {
        let mut controller = controller();
        type_text(&mut controller, "fire");

        assert_eq!(controller.query(), "fire");
        assert_eq!(labels(&controller), vec!["Firefox"]);
        assert_eq!(controller.view().selected, Some(0));

        type_text(&mut controller, "zzz");
        assert!(controller.displayed().is_empty());
        assert_eq!(controller.view().selected, None);
        assert_eq!(controller.activate(), Outcome::Continue);
    }

    #[test]
    fn backspace_widens_the_filter() {
        let mut controller = controller();
        controller.set_query("gimpx");
        assert!(controller.displayed().is_empty());

        controller.handle_key(&Key::Backspace);
        assert_eq!(labels(&controller), vec!["GIMP"]);
    }

    #[test]
    fn activating_an_application_launches_it() {
        let mut controller = controller();
        controller.set_query("fire");

        assert_eq!(controller.handle_key(&Key::Enter), Outcome::Launched);
        assert_eq!(
            controller.spawner().calls,
            vec![("firefox".to_string(), Vec::<String>::new())]
        );
        assert_eq!(controller.mode(), Mode::Applications);
    }

    #[test]
    fn launch_failure_keeps_window_open() {
        let mut controller: Controller = SelectionController::new(
            vec![app("Broken", "does-not-exist")],
            theme_catalog(),
            MemorySettings::default(),
            RecordingSpawner {
                fail: true,
                ..Default::default()
            },
        );
        controller.set_query("broken");

        let outcome = controller.activate();
        assert_eq!(outcome, Outcome::Continue);
        assert!(!outcome.should_exit());
        assert_eq!(controller.spawner().calls.len(), 1);
    }

    #[test]
    fn selector_switches_to_themes_and_resets_filter() {
        let mut controller = controller();
        controller.set_query("select");
        controller.activate();

        assert_eq!(controller.mode(), Mode::Themes);
        assert_eq!(controller.query(), "");
        assert_eq!(labels(&controller), vec!["✓ dark", "light"]);
        assert_eq!(controller.view().selected, Some(0));
        assert_eq!(controller.placeholder(), "Search themes...");
        assert!(controller.spawner().calls.is_empty());
    }

    #[test]
    fn theme_rows_show_name_as_secondary_text() {
        let mut controller = controller();
        controller.activate();

        let items = controller.displayed();
        assert_eq!(items[1].secondary.as_deref(), Some("Theme: light"));
        assert_eq!(items[1].icon.as_deref(), Some(THEME_ICON));
        assert!(items[0].active);
        assert!(!items[1].active);
    }

    #[test]
    fn theme_filter_matches_name_and_display_name() {
        let mut controller = controller();
        controller.activate();
        controller.set_query("LIG");
        assert_eq!(labels(&controller), vec!["light"]);
    }

    #[test]
    fn activating_a_theme_applies_it_and_returns_to_applications() {
        let mut controller = controller();
        controller.activate();
        controller.handle_key(&Key::Down);
        assert_eq!(controller.focus(), Focus::List);

        assert_eq!(controller.handle_key(&Key::Enter), Outcome::Continue);

        assert_eq!(controller.mode(), Mode::Applications);
        assert_eq!(controller.active_theme(), "light");
        assert_eq!(controller.style().background, "ffffffff");
        assert_eq!(
            controller.settings().value(CURRENT_THEME_KEY).as_deref(),
            Some("light")
        );
        assert_eq!(controller.query(), "");
        assert_eq!(controller.view().selected, Some(0));
        assert_eq!(controller.focus(), Focus::Filter);
    }

    #[test]
    fn failed_theme_apply_still_returns_to_applications() {
        let missing = ThemeEntry {
            name: "missing".to_string(),
            display_name: "missing".to_string(),
            resource: ThemeResource::File(PathBuf::from("/nonexistent/missing.theme")),
        };
        let mut themes = theme_catalog();
        themes.push(missing);
        let mut controller: Controller = SelectionController::new(
            vec![],
            themes,
            MemorySettings::with(CURRENT_THEME_KEY, "dark"),
            RecordingSpawner::default(),
        );
        let syncs_after_startup = controller.settings().syncs;

        controller.activate();
        controller.set_query("missing");
        controller.activate();

        assert_eq!(controller.mode(), Mode::Applications);
        assert_eq!(controller.active_theme(), "dark");
        assert_eq!(controller.style().background, "000000ff");
        assert_eq!(controller.settings().syncs, syncs_after_startup);
    }

    #[test]
    fn escape_in_theme_mode_restores_full_application_list() {
        let mut controller = controller();
        controller.set_query("sel");
        controller.activate();
        type_text(&mut controller, "li");
        assert_eq!(labels(&controller), vec!["light"]);

        assert_eq!(controller.handle_key(&Key::Escape), Outcome::Continue);

        assert_eq!(controller.mode(), Mode::Applications);
        assert_eq!(controller.query(), "");
        assert_eq!(labels(&controller), vec!["HotSpot: Select Theme", "Firefox", "GIMP"]);
        assert_eq!(controller.view().selected, Some(0));
        assert_eq!(controller.active_theme(), "dark");
    }

    #[test]
    fn escape_in_application_mode_closes() {
        let mut controller = controller();
        let outcome = controller.handle_key(&Key::Escape);
        assert_eq!(outcome, Outcome::Close);
        assert!(outcome.should_exit());
    }

    #[test]
    fn arrows_wrap_the_selection() {
        let mut controller = controller();
        controller.handle_key(&Key::Up);
        assert_eq!(controller.view().selected, Some(2));
        controller.handle_key(&Key::Down);
        assert_eq!(controller.view().selected, Some(0));
    }

    #[test]
    fn typing_from_the_list_edits_the_filter() {
        let mut controller = controller();
        controller.handle_key(&Key::Down);
        assert_eq!(controller.focus(), Focus::List);

        controller.handle_key(&Key::Text(" ".to_string()));
        assert_eq!(controller.query(), "");
        assert_eq!(controller.view().selected, Some(1));

        controller.handle_key(&Key::Text("g".to_string()));
        assert_eq!(controller.focus(), Focus::Filter);
        assert_eq!(controller.query(), "g");
    }
}
