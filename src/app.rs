//! Application state: the one owned instance that ties the store, the view
//! state, navigation and feedback together.
//!
//! Each action mutates the store (or the view state), lets the store persist,
//! records exactly one notice and leaves the navigator on the screen that
//! should be drawn next. [`App::render`] draws it.

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::announce::{Announcer, Notice};
use crate::debounce::Debouncer;
use crate::error::{StorageError, StoreError, StoreResult};
use crate::export;
use crate::nav::{Navigator, Route, Screen};
use crate::note::{Category, Note, NoteInput, NotePatch};
use crate::query::{self, CategoryFilter};
use crate::render::{self, Page};
use crate::storage::{self, Storage};
use crate::store::NoteStore;
use crate::theme::Theme;

/// Yes/no gate asked before a note is deleted.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Raw values from the note form. An unknown or empty category falls back
/// to the default one.
#[derive(Debug, Clone, Default)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NoteForm {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self { title: title.into(), content: content.into(), category: category.into() }
    }

    /// The form as it appears when editing `note`.
    pub fn from_note(note: &Note) -> Self {
        Self::new(note.title.clone(), note.content.clone(), note.category.as_str())
    }

    fn category(&self) -> Category {
        Category::parse_or_default(&self.category)
    }
}

pub struct App<S: Storage> {
    store: NoteStore<S>,
    theme: Theme,
    nav: Navigator,
    announcer: Announcer,
    search: String,
    category: CategoryFilter,
    search_input: Debouncer<String>,
}

impl<S: Storage> App<S> {
    /// Load notes and theme from `storage` and open `route`. A damaged
    /// snapshot becomes an error notice, never a failed start.
    pub fn start(storage: S, route: Route) -> Self {
        let theme = storage::read_theme(&storage);
        let (store, problem) = NoteStore::load(storage);
        let mut app = Self {
            store,
            theme,
            nav: Navigator::new(Route::welcome()),
            announcer: Announcer::new(),
            search: String::new(),
            category: CategoryFilter::All,
            search_input: Debouncer::default(),
        };
        if let Some(problem) = problem {
            app.announcer.error(problem.to_string());
        }
        app.resolve_route(route, false);
        app
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn route(&self) -> &Route {
        self.nav.current()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.announcer.latest()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.announcer.drain()
    }

    /// Notes visible on the list screen, in store order.
    pub fn visible(&self) -> Vec<&Note> {
        query::filter_by(self.store.notes(), &self.search, self.category)
    }

    pub fn navigate(&mut self, route: Route) -> &Route {
        self.resolve_route(route, true);
        self.nav.current()
    }

    pub fn back(&mut self) -> Option<&Route> {
        self.nav.back()
    }

    pub fn forward(&mut self) -> Option<&Route> {
        self.nav.forward()
    }

    /// An edit route for a note that no longer exists falls back to the
    /// list with an error instead of showing an empty edit form.
    fn resolve_route(&mut self, route: Route, push: bool) {
        let route = match &route.edit {
            Some(id) if self.store.get(id).is_none() => {
                self.announcer.error(format!("Note {id} not found"));
                Route::view()
            }
            _ => route,
        };
        if push {
            self.nav.navigate(route);
        } else {
            self.nav.replace(route);
        }
    }

    /// Create or update depending on whether the current route edits a note.
    /// Validation failures keep the form open; everything else returns to
    /// the list.
    pub fn submit(&mut self, form: NoteForm) -> StoreResult<Note> {
        let editing = match self.nav.current() {
            Route { screen: Screen::Create, edit } => edit.clone(),
            _ => None,
        };
        let result = match &editing {
            Some(id) => self.store.update(
                id,
                NotePatch {
                    title: Some(form.title.clone()),
                    content: Some(form.content.clone()),
                    category: Some(form.category()),
                    is_pinned: None,
                },
            ),
            None => self.store.create(NoteInput {
                title: form.title.clone(),
                content: form.content.clone(),
                category: Some(form.category()),
            }),
        };

        match &result {
            Ok(note) if editing.is_some() => {
                self.announcer.success(format!("Updated note {}", note.id));
            }
            Ok(note) => {
                self.announcer.success(format!("Created note {} ({})", note.id, note.title));
            }
            Err(e) => self.announcer.error(e.to_string()),
        }
        if !matches!(result, Err(StoreError::Validation(_))) {
            self.nav.navigate(Route::view());
        }
        result
    }

    /// Ask `confirm` first; `Ok(None)` means the user kept the note.
    pub fn delete(&mut self, id: &str, confirm: &mut impl Confirm) -> StoreResult<Option<Note>> {
        let Some(note) = self.store.get(id) else {
            let err = StoreError::NotFound(id.to_string());
            self.announcer.error(err.to_string());
            return Err(err);
        };
        let prompt = format!("Delete \"{}\"?", note.title);
        if !confirm.confirm(&prompt) {
            self.announcer.info(format!("Kept note {id}"));
            return Ok(None);
        }
        match self.store.delete(id) {
            Ok(removed) => {
                self.announcer.success(format!("Deleted note {}", removed.id));
                Ok(Some(removed))
            }
            Err(e) => {
                self.announcer.error(e.to_string());
                Err(e)
            }
        }
    }

    pub fn toggle_pin(&mut self, id: &str) -> StoreResult<Note> {
        let result = self.store.toggle_pin(id);
        match &result {
            Ok(note) if note.is_pinned => self.announcer.success(format!("Pinned note {}", note.id)),
            Ok(note) => self.announcer.success(format!("Unpinned note {}", note.id)),
            Err(e) => self.announcer.error(e.to_string()),
        }
        result
    }

    /// Keystroke in the search box; applied by [`App::tick`] once typing pauses.
    pub fn search_input(&mut self, now: Instant, term: impl Into<String>) {
        self.search_input.call(now, term.into());
    }

    /// Apply a debounced search if its window has passed. Returns whether
    /// the list needs redrawing.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search_input.poll(now) {
            Some(term) => {
                self.apply_search(term);
                true
            }
            None => false,
        }
    }

    /// Apply a search immediately, dropping any pending keystrokes.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_input.cancel();
        self.apply_search(term.into());
    }

    fn apply_search(&mut self, term: String) {
        self.search = term.trim().to_string();
        let found = self.visible().len();
        self.announcer.info(match found {
            1 => "1 note found".to_string(),
            n => format!("{n} notes found"),
        });
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        let found = self.visible().len();
        self.announcer.info(format!("Showing {category} notes ({found})"));
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme, StorageError> {
        self.theme = theme;
        match storage::write_theme(self.store.storage_mut(), theme) {
            Ok(()) => {
                self.announcer.success(format!("Switched to {theme} theme"));
                Ok(theme)
            }
            Err(e) => {
                self.announcer.error(format!("Could not save theme: {e}"));
                Err(e)
            }
        }
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, StorageError> {
        self.set_theme(self.theme.toggled())
    }

    pub fn export(&mut self, dir: &Path, now: DateTime<Utc>) -> io::Result<PathBuf> {
        match export::write_export(dir, self.store.notes(), now) {
            Ok(path) => {
                let count = self.store.len();
                self.announcer.success(format!(
                    "Exported {count} note(s) to {}",
                    path.display()
                ));
                Ok(path)
            }
            Err(e) => {
                self.announcer.error(format!("Export failed: {e}"));
                Err(e)
            }
        }
    }

    /// Draw the current screen.
    pub fn render(&self) -> String {
        let visible = self.visible();
        let parts = query::partition(&visible);
        let route = self.nav.current();
        let editing = route.edit.as_deref().and_then(|id| self.store.get(id));
        render::render_document(&Page {
            route,
            theme: self.theme,
            search: &self.search,
            category: self.category,
            total_notes: self.store.len(),
            notes: &parts,
            editing,
            notice: self.announcer.latest(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::{Kind, Priority};
    use crate::storage::{MemoryStorage, NOTES_KEY, THEME_KEY};
    use std::time::Duration;

    fn app() -> App<MemoryStorage> {
        App::start(MemoryStorage::new(), Route::welcome())
    }

    fn add(app: &mut App<MemoryStorage>, title: &str, content: &str, category: &str) -> Note {
        app.navigate(Route::create());
        app.submit(NoteForm::new(title, content, category)).unwrap()
    }

    #[test]
    fn test_submit_creates_and_returns_to_list() {
        let mut app = app();
        let note = add(&mut app, "Meeting", "agenda", "Work");
        assert_eq!(app.route(), &Route::view());
        assert_eq!(note.category, Category::Work);
        let notices = app.take_notices();
        assert_eq!(notices.last().unwrap().kind, Kind::Success);
        assert!(app.render().contains("Meeting"));
    }

    #[test]
    fn test_invalid_submit_stays_on_form() {
        let mut app = app();
        app.navigate(Route::create());
        let err = app.submit(NoteForm::new("", "body", "")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(app.route(), &Route::create());
        let notice = app.latest_notice().unwrap();
        assert_eq!(notice.priority, Priority::Assertive);
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_submit_on_edit_route_updates() {
        let mut app = app();
        let note = add(&mut app, "Draft", "v1", "Study");
        app.navigate(Route::edit(note.id.clone()));
        assert!(app.render().contains("value=\"Draft\""));
        let updated = app.submit(NoteForm::new("Final", "v2", "bogus")).unwrap();
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.category, Category::Personal);
        assert_eq!(app.store().len(), 1);
    }

    #[test]
    fn test_edit_route_for_missing_note_falls_back() {
        let mut app = app();
        app.navigate(Route::edit("ghost"));
        assert_eq!(app.route(), &Route::view());
        assert_eq!(app.latest_notice().unwrap().kind, Kind::Error);
    }

    #[test]
    fn test_declined_delete_keeps_note() {
        let mut app = app();
        let note = add(&mut app, "Keep", "me", "");
        let mut asked = Vec::new();
        let kept = app
            .delete(&note.id, &mut |prompt: &str| {
                asked.push(prompt.to_string());
                false
            })
            .unwrap();
        assert!(kept.is_none());
        assert_eq!(asked, vec!["Delete \"Keep\"?".to_string()]);
        assert_eq!(app.store().len(), 1);

        let removed = app.delete(&note.id, &mut |_: &str| true).unwrap();
        assert_eq!(removed.unwrap().id, note.id);
        assert!(app.store().is_empty());
        assert!(app.render().contains("No notes yet"));
    }

    #[test]
    fn test_delete_missing_note_reports_error() {
        let mut app = app();
        let err = app.delete("nope", &mut |_: &str| true).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_debounced_search_applies_last_term() {
        let mut app = app();
        add(&mut app, "Meeting", "agenda", "Work");
        add(&mut app, "Groceries", "milk", "Personal");
        let start = Instant::now();
        app.search_input(start, "gro");
        app.search_input(start + Duration::from_millis(100), "meet");
        assert!(!app.tick(start + Duration::from_millis(200)));
        assert_eq!(app.search(), "");
        assert!(app.tick(start + Duration::from_millis(400)));
        assert_eq!(app.search(), "meet");
        let titles: Vec<&str> = app.visible().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Meeting"]);
    }

    #[test]
    fn test_category_filter_and_no_match_state() {
        let mut app = app();
        add(&mut app, "Exam", "ch 4", "Study");
        app.set_category(CategoryFilter::Only(Category::Work));
        assert!(app.visible().is_empty());
        assert!(app.render().contains("No notes match"));
        app.set_category(CategoryFilter::All);
        assert_eq!(app.visible().len(), 1);
    }

    #[test]
    fn test_theme_persists_across_start() {
        let mut app = app();
        assert_eq!(app.toggle_theme().unwrap(), Theme::Dark);
        let storage = app.store.into_storage();
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("\"dark\""));
        let restarted = App::start(storage, Route::welcome());
        assert_eq!(restarted.theme(), Theme::Dark);
        assert!(restarted.render().contains("data-theme=\"dark\""));
    }

    #[test]
    fn test_corrupt_storage_starts_with_error_notice() {
        let mut storage = MemoryStorage::new();
        storage.set(NOTES_KEY, "not json").unwrap();
        let mut app = App::start(storage, Route::view());
        assert!(app.store().is_empty());
        let notices = app.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, Kind::Error);
    }

    #[test]
    fn test_back_restores_previous_screen() {
        let mut app = app();
        app.navigate(Route::view());
        app.navigate(Route::create());
        assert_eq!(app.back(), Some(&Route::view()));
        assert_eq!(app.forward(), Some(&Route::create()));
    }
}
