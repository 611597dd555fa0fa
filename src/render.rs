//! HTML rendering for the three screens.
//!
//! Everything here is a pure function of its inputs. User text is always
//! passed through [`escape_html`] before it is embedded, and the inline
//! markup substitution in [`format_content`] only ever runs on escaped text.

use crate::announce::Notice;
use crate::nav::{Renderer, Route};
use crate::note::{Category, Note, TITLE_MAX_CHARS};
use crate::query::{CategoryFilter, Partitioned};
use crate::theme::Theme;

const DATE_FMT: &str = "%b %d, %Y %H:%M";

/// Everything a screen needs to draw itself.
pub struct Page<'a> {
    pub route: &'a Route,
    pub theme: Theme,
    pub search: &'a str,
    pub category: CategoryFilter,
    /// Size of the whole collection, used to tell "no notes" from "no matches".
    pub total_notes: usize,
    pub notes: &'a Partitioned<'a>,
    /// Note loaded into the form when the route carries an edit id.
    pub editing: Option<&'a Note>,
    pub notice: Option<&'a Notice>,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape, then apply `**bold**`, `*italic*`, `` `code` `` and line breaks.
pub fn format_content(input: &str) -> String {
    let escaped = escape_html(input);
    let bold = wrap_pairs(&escaped, "**", "<strong>", "</strong>");
    let italic = wrap_pairs(&bold, "*", "<em>", "</em>");
    let code = wrap_pairs(&italic, "`", "<code>", "</code>");
    code.replace("\r\n", "\n").replace('\n', "<br>")
}

/// Replace matched `delim` pairs; a trailing unmatched delimiter stays literal.
fn wrap_pairs(text: &str, delim: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(delim) {
        let after = &rest[start + delim.len()..];
        match after.find(delim) {
            Some(end) if end > 0 => {
                out.push_str(&rest[..start]);
                out.push_str(open);
                out.push_str(&after[..end]);
                out.push_str(close);
                rest = &after[end + delim.len()..];
            }
            _ => {
                out.push_str(&rest[..start + delim.len()]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn render_document(page: &Page<'_>) -> String {
    let body = match page.route.screen.renderer() {
        Renderer::Welcome => render_welcome(page.total_notes),
        Renderer::NoteForm => render_form(page.editing),
        Renderer::NoteList => render_list(page),
    };
    let (live_priority, live_text) = match page.notice {
        Some(notice) => (notice.priority.as_str(), escape_html(&notice.message)),
        None => ("polite", String::new()),
    };

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\" data-theme=\"{theme}\">\n\
<head>\n<meta charset=\"utf-8\">\n<title>Notes</title>\n</head>\n\
<body>\n\
<header class=\"app-header\">\n\
<nav aria-label=\"Main\">\
<a href=\"#/welcome\">Home</a> \
<a href=\"#/create\">New note</a> \
<a href=\"#/view\">All notes</a>\
</nav>\n\
<button type=\"button\" class=\"theme-toggle\" data-action=\"toggle-theme\" aria-label=\"Switch to {other} theme\">{other}</button>\n\
</header>\n\
<main id=\"app\" data-route=\"{route}\">\n{body}</main>\n\
<div id=\"announcer\" role=\"status\" aria-live=\"{live_priority}\">{live_text}</div>\n\
</body>\n</html>\n",
        theme = page.theme.as_str(),
        other = page.theme.toggled().as_str(),
        route = escape_html(&page.route.address()),
    )
}

pub fn render_welcome(total_notes: usize) -> String {
    let summary = match total_notes {
        0 => "You have no notes yet.".to_string(),
        1 => "You have 1 note.".to_string(),
        n => format!("You have {n} notes."),
    };
    format!(
        "<section class=\"welcome\">\n\
<h1>Welcome to Notes</h1>\n\
<p>Capture ideas, pin what matters, and find anything with search.</p>\n\
<p class=\"summary\">{summary}</p>\n\
<a class=\"button\" href=\"#/create\">Create a note</a> \
<a class=\"button\" href=\"#/view\">View notes</a>\n\
</section>\n"
    )
}

pub fn render_form(editing: Option<&Note>) -> String {
    let (heading, submit, title, content, selected, hidden_id) = match editing {
        Some(note) => (
            "Edit note",
            "Update note",
            escape_html(&note.title),
            escape_html(&note.content),
            note.category,
            format!(
                "<input type=\"hidden\" name=\"id\" value=\"{}\">\n",
                escape_html(&note.id)
            ),
        ),
        None => (
            "New note",
            "Save note",
            String::new(),
            String::new(),
            Category::default(),
            String::new(),
        ),
    };

    let mut options = String::new();
    for category in Category::ALL {
        let marker = if category == selected { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{name}\"{marker}>{name}</option>",
            name = category.as_str()
        ));
    }

    format!(
        "<section class=\"note-form\">\n\
<h1>{heading}</h1>\n\
<form data-action=\"submit-note\">\n\
{hidden_id}\
<label for=\"note-title\">Title</label>\n\
<input id=\"note-title\" name=\"title\" maxlength=\"{TITLE_MAX_CHARS}\" required value=\"{title}\">\n\
<label for=\"note-content\">Content</label>\n\
<textarea id=\"note-content\" name=\"content\" required>{content}</textarea>\n\
<label for=\"note-category\">Category</label>\n\
<select id=\"note-category\" name=\"category\">{options}</select>\n\
<button type=\"submit\">{submit}</button> \
<a href=\"#/view\">Cancel</a>\n\
</form>\n\
</section>\n"
    )
}

pub fn render_list(page: &Page<'_>) -> String {
    let mut out = String::from("<section class=\"notes\">\n<h1>Your notes</h1>\n");
    out.push_str(&format!(
        "<input type=\"search\" name=\"search\" aria-label=\"Search notes\" value=\"{}\">\n",
        escape_html(page.search)
    ));
    out.push_str(&render_category_filters(page.category));

    if page.total_notes == 0 {
        out.push_str(
            "<p class=\"empty\">No notes yet. <a href=\"#/create\">Create your first note</a>.</p>\n",
        );
    } else if page.notes.is_empty() {
        out.push_str("<p class=\"empty\">No notes match your search or filter.</p>\n");
    } else {
        if !page.notes.pinned.is_empty() {
            out.push_str("<h2>Pinned</h2>\n<div class=\"note-grid pinned\">\n");
            for note in &page.notes.pinned {
                out.push_str(&render_note_card(note));
            }
            out.push_str("</div>\n");
        }
        if !page.notes.others.is_empty() {
            if !page.notes.pinned.is_empty() {
                out.push_str("<h2>Other notes</h2>\n");
            }
            out.push_str("<div class=\"note-grid\">\n");
            for note in &page.notes.others {
                out.push_str(&render_note_card(note));
            }
            out.push_str("</div>\n");
        }
    }
    out.push_str("</section>\n");
    out
}

fn render_category_filters(current: CategoryFilter) -> String {
    let mut out = String::from("<div class=\"category-filters\" role=\"group\" aria-label=\"Filter by category\">");
    let choices = std::iter::once(CategoryFilter::All)
        .chain(Category::ALL.into_iter().map(CategoryFilter::Only));
    for choice in choices {
        let label = match choice {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.as_str(),
        };
        out.push_str(&format!(
            "<button type=\"button\" data-category=\"{}\" aria-pressed=\"{}\">{}</button>",
            choice.as_str().to_ascii_lowercase(),
            choice == current,
            label
        ));
    }
    out.push_str("</div>\n");
    out
}

fn render_note_card(note: &Note) -> String {
    let id = escape_html(&note.id);
    let (pin_label, pin_class) = if note.is_pinned {
        ("Unpin", " is-pinned")
    } else {
        ("Pin", "")
    };
    format!(
        "<article class=\"note-card category-{cat_class}{pin_class}\" data-id=\"{id}\">\n\
<h3>{title}</h3>\n\
<span class=\"category\">{category}</span>\n\
<div class=\"content\">{content}</div>\n\
<p class=\"dates\">Created {created} &middot; Updated {updated}</p>\n\
<button type=\"button\" data-action=\"toggle-pin\" data-id=\"{id}\" aria-pressed=\"{pinned}\">{pin_label}</button> \
<a href=\"#/create?edit={id}\">Edit</a> \
<button type=\"button\" data-action=\"delete\" data-id=\"{id}\">Delete</button>\n\
</article>\n",
        cat_class = note.category.as_str().to_ascii_lowercase(),
        title = escape_html(&note.title),
        category = note.category.as_str(),
        content = format_content(&note.content),
        created = note.created_at.format(DATE_FMT),
        updated = note.updated_at.format(DATE_FMT),
        pinned = note.is_pinned,
    )
}
