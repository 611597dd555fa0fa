//! Screen routing and back/forward history.
//!
//! A [`Route`] is the screen plus its params. Routes serialize to a hash
//! address (`#/create?edit=<id>`) so any address in the history rebuilds the
//! same screen.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Welcome,
    Create,
    View,
}

/// Which renderer draws a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Welcome,
    NoteForm,
    NoteList,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::Create => "create",
            Screen::View => "view",
        }
    }

    pub fn parse(raw: &str) -> Option<Screen> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "welcome" | "" => Some(Screen::Welcome),
            "create" => Some(Screen::Create),
            "view" => Some(Screen::View),
            _ => None,
        }
    }

    pub fn renderer(self) -> Renderer {
        match self {
            Screen::Welcome => Renderer::Welcome,
            Screen::Create => Renderer::NoteForm,
            Screen::View => Renderer::NoteList,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub screen: Screen,
    /// Note being edited; only meaningful on the create screen.
    pub edit: Option<String>,
}

impl Route {
    pub fn welcome() -> Self {
        Self { screen: Screen::Welcome, edit: None }
    }

    pub fn create() -> Self {
        Self { screen: Screen::Create, edit: None }
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self { screen: Screen::Create, edit: Some(id.into()) }
    }

    pub fn view() -> Self {
        Self { screen: Screen::View, edit: None }
    }

    /// Parse an address such as `#/create?edit=abc`. Anything unrecognised
    /// lands on the welcome screen.
    pub fn from_address(address: &str) -> Self {
        let trimmed = address.trim().trim_start_matches('#').trim_start_matches('/');
        let (path, query) = trimmed.split_once('?').unwrap_or((trimmed, ""));
        let Some(screen) = Screen::parse(path) else {
            return Route::welcome();
        };
        let edit = if screen == Screen::Create {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == "edit")
                .map(|(_, v)| v.to_string())
                .filter(|v| !v.is_empty())
        } else {
            None
        };
        Route { screen, edit }
    }

    pub fn address(&self) -> String {
        match (&self.screen, &self.edit) {
            (Screen::Create, Some(id)) => format!("#/create?edit={id}"),
            (screen, _) => format!("#/{}", screen.as_str()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

/// Current route plus back/forward stacks, like a browser history.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Route,
    back: Vec<Route>,
    forward: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self { current: start, back: Vec::new(), forward: Vec::new() }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Push a new entry. Navigating to the current route is a no-op.
    pub fn navigate(&mut self, route: Route) -> &Route {
        if route != self.current {
            let previous = std::mem::replace(&mut self.current, route);
            self.back.push(previous);
            self.forward.clear();
        }
        &self.current
    }

    /// Swap the current entry without growing history.
    pub fn replace(&mut self, route: Route) -> &Route {
        self.current = route;
        &self.current
    }

    pub fn back(&mut self) -> Option<&Route> {
        let previous = self.back.pop()?;
        let current = std::mem::replace(&mut self.current, previous);
        self.forward.push(current);
        Some(&self.current)
    }

    pub fn forward(&mut self) -> Option<&Route> {
        let next = self.forward.pop()?;
        let current = std::mem::replace(&mut self.current, next);
        self.back.push(current);
        Some(&self.current)
    }
}
