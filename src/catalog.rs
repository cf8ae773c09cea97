use crate::model::ListEntry;

/// Immutable snapshot of one mode's entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog<T> {
    entries: Vec<T>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: ListEntry> Catalog<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn filter(&self, query: &str) -> View {
        filter(&self.entries, query)
    }
}

/// Catalog positions passing the current filter, plus the selected row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub indices: Vec<usize>,
    pub selected: Option<usize>,
}

impl View {
    /// Catalog index of the selected row.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|row| self.indices.get(row).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Moves the selection by `delta` rows, wrapping at both ends.
    pub fn move_selection(&mut self, delta: i32) {
        if self.indices.is_empty() {
            self.selected = None;
            return;
        }

        let len = self.indices.len() as i64;
        let current = self.selected.unwrap_or(0) as i64;
        self.selected = Some((current + delta as i64).rem_euclid(len) as usize);
    }

    pub fn items<'e, T>(&self, entries: &'e [T]) -> impl Iterator<Item = &'e T> {
        self.indices.iter().filter_map(move |&i| entries.get(i))
    }
}

/// Case-insensitive substring filter over label and secondary text. The
/// first passing entry becomes selected.
pub fn filter<T: ListEntry>(entries: &[T], query: &str) -> View {
    let query = query.to_lowercase();
    let indices: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| query.is_empty() || entry.matches(&query))
        .map(|(i, _)| i)
        .collect();

    let selected = (!indices.is_empty()).then_some(0);
    log::debug!("filter: query='{}', filtered_count={}", query, indices.len());
    View { indices, selected }
}
