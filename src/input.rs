/// Keys the shell forwards to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
    Backspace,
    Text(String),
}

/// Which widget currently receives keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Filter,
    List,
}

/// What a key press should do once routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Activate,
    Cancel,
    MoveSelection(i32),
    EditFilter(FilterEdit),
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    Append(String),
    Backspace,
}

/// Navigation goes to the list, typing goes to the filter box. Enter and
/// Escape act the same wherever focus is. Returns the focus after the key.
pub fn route(focus: Focus, key: &Key) -> (Focus, Route) {
    match key {
        Key::Enter => (focus, Route::Activate),
        Key::Escape => (focus, Route::Cancel),
        Key::Up => (Focus::List, Route::MoveSelection(-1)),
        Key::Down => (Focus::List, Route::MoveSelection(1)),
        Key::Backspace => (Focus::Filter, Route::EditFilter(FilterEdit::Backspace)),
        Key::Text(text) => {
            if text.is_empty() || text.chars().any(char::is_control) {
                return (focus, Route::Ignore);
            }
            let starts_blank = text.chars().next().is_some_and(char::is_whitespace);
            if focus == Focus::List && starts_blank {
                // The list keeps whitespace.
                return (Focus::List, Route::Ignore);
            }
            (Focus::Filter, Route::EditFilter(FilterEdit::Append(text.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Key {
        Key::Text(s.to_string())
    }

    #[test]
    fn arrows_move_focus_to_list() {
        assert_eq!(route(Focus::Filter, &Key::Down), (Focus::List, Route::MoveSelection(1)));
        assert_eq!(route(Focus::List, &Key::Up), (Focus::List, Route::MoveSelection(-1)));
    }

    #[test]
    fn printable_text_returns_focus_to_filter() {
        assert_eq!(
            route(Focus::List, &text("f")),
            (Focus::Filter, Route::EditFilter(FilterEdit::Append("f".to_string())))
        );
        assert_eq!(
            route(Focus::List, &Key::Backspace),
            (Focus::Filter, Route::EditFilter(FilterEdit::Backspace))
        );
    }

    #[test]
    fn whitespace_stays_with_the_focused_widget() {
        assert_eq!(route(Focus::List, &text(" ")), (Focus::List, Route::Ignore));
        assert_eq!(
            route(Focus::Filter, &text(" ")),
            (Focus::Filter, Route::EditFilter(FilterEdit::Append(" ".to_string())))
        );
    }

    #[test]
    fn control_characters_are_ignored() {
        assert_eq!(route(Focus::Filter, &text("\u{7f}")), (Focus::Filter, Route::Ignore));
        assert_eq!(route(Focus::List, &text("")), (Focus::List, Route::Ignore));
    }

    #[test]
    fn enter_and_escape_keep_focus() {
        assert_eq!(route(Focus::List, &Key::Enter), (Focus::List, Route::Activate));
        assert_eq!(route(Focus::Filter, &Key::Escape), (Focus::Filter, Route::Cancel));
    }
}
