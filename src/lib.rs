pub mod announce;
pub mod app;
pub mod args;
pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod formatting;
pub mod nav;
pub mod note;
pub mod query;
pub mod render;
pub mod storage;
pub mod store;
pub mod theme;

mod shared {
    pub(crate) mod table;
}

use chrono::{SecondsFormat, Utc};
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::announce::Kind;
use crate::app::{App, Confirm, NoteForm};
use crate::args::{ArgParser, is_flag};
use crate::config::Config;
use crate::error::StoreError;
use crate::formatting::{FormatContext, TimeFormatter};
use crate::nav::{Route, Screen};
use crate::note::Note;
use crate::query::CategoryFilter;
use crate::shared::table::render_table;
use crate::storage::DirStorage;
use crate::theme::Theme;

type CliApp = App<DirStorage>;

pub fn entry() -> Result<(), Box<dyn Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    let cmd = args.remove(0);
    if matches!(cmd.as_str(), "help" | "-h" | "--help") {
        print_help();
        return Ok(());
    }

    let config = Config::from_env()?;
    let storage = DirStorage::open(&config.data_dir)?;
    let mut app = App::start(storage, Route::welcome());
    report_startup(&mut app);

    match cmd.as_str() {
        "new" => new_note(args, &mut app)?,
        "list" => list_notes(args, &mut app, &config)?,
        "view" => view_note(args, &app, &config)?,
        "edit" => edit_note(args, &mut app, &config)?,
        "delete" => delete_notes(args, &mut app)?,
        "pin" => pin_notes(args, &mut app)?,
        "export" => export_notes(args, &mut app)?,
        "theme" => theme_command(args, &mut app)?,
        "render" => render_page(args, &mut app)?,
        "path" => println!("{}", config.data_dir.display()),
        other => {
            eprintln!("Unknown command: {other}");
            print_help();
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "\
Noteboard
Usage:
  nb new <title> <content...> [-c <category>]
                                  Create a note (category: study|work|personal|others; default personal)
  nb list [-s|--search <text>] [-c|--category <category|all>] [--relative]
                                  List notes, pinned first, newest first
  nb view <id>                    Show a note
  nb edit <id> [--title <t>] [--content <c>] [-c <category>]
                                  Change fields; without flags opens the content in $EDITOR
  nb delete <ids...> [-y|--yes]   Delete notes after confirming each one
  nb pin <ids...>                 Toggle the pinned flag
  nb export [--out <dir>]         Write notes-export-<timestamp>.json (default: current directory)
  nb theme [light|dark|toggle]    Show or change the theme
  nb render [welcome|create|view] [--edit <id>] [-s <text>] [-c <category>] [--out <file>]
                                  Render a screen as an HTML page
  nb path                         Show the data directory
  nb help                         Show this message

Environment:
  NOTEBOARD_DIR                   Override the data directory (default: ~/.noteboard)
  NO_COLOR                        Disable coloured output
  EDITOR                          Editor used by `nb edit` (default: vi)
  RUST_LOG                        Log level, e.g. RUST_LOG=debug
"
    );
}

/// Problems found while loading are warnings; the command still runs.
fn report_startup(app: &mut CliApp) {
    for notice in app.take_notices() {
        if notice.kind == Kind::Error {
            eprintln!("Warning: {}", notice.message);
        }
    }
}

/// Print feedback for the last action. Errors travel back as `Err` instead.
fn print_notices(app: &mut CliApp) {
    for notice in app.take_notices() {
        if notice.kind != Kind::Error {
            println!("{}", notice.message);
        }
    }
}

fn new_note(args: Vec<String>, app: &mut CliApp) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "new");
    let mut category = String::new();
    let mut positional: Vec<String> = Vec::new();
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-c" | "--category" => category = parser.extract_value("-c/--category")?,
            other if is_flag(other) => return Err(parser.unknown_flag(other)),
            _ => positional.push(arg),
        }
    }
    if positional.is_empty() {
        return Err("Usage: nb new <title> <content...> [-c <category>]".into());
    }
    let title = positional.remove(0);
    let content = positional.join(" ");

    app.navigate(Route::create());
    app.submit(NoteForm::new(title, content, category))?;
    print_notices(app);
    Ok(())
}

fn list_notes(
    args: Vec<String>,
    app: &mut CliApp,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "list");
    let mut search: Option<String> = None;
    let mut category = CategoryFilter::All;
    let mut relative = false;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-s" | "--search" => search = Some(parser.extract_value("-s/--search")?),
            "-c" | "--category" => category = parser.extract_category()?,
            "--relative" => relative = true,
            other => return Err(parser.unknown_flag(other)),
        }
    }

    app.set_search(search.clone().unwrap_or_default());
    app.set_category(category);
    // Filter feedback only matters on the rendered page.
    app.take_notices();

    if app.store().is_empty() {
        println!("No notes yet. Try `nb new <title> <content>`.");
        return Ok(());
    }
    let visible = app.visible();
    if visible.is_empty() {
        println!("No notes match.");
        return Ok(());
    }

    let parts = query::partition(&visible);
    let ctx = FormatContext::new(config.use_color, app.theme());
    let times = TimeFormatter::new(relative, Utc::now());
    let headers: Vec<String> = ["ID", "Pin", "Category", "Updated", "Note"]
        .iter()
        .map(|h| ctx.format_header(h))
        .collect();
    let rows: Vec<Vec<String>> = parts
        .iter()
        .map(|note| {
            vec![
                ctx.format_id(&note.id),
                ctx.format_pin(note.is_pinned),
                ctx.format_category(note.category),
                ctx.format_timestamp(&times.format(note.updated_at)),
                ctx.highlight_match(&preview_line(note), search.as_deref()),
            ]
        })
        .collect();
    println!("{}", render_table(&headers, &rows, config.columns));
    Ok(())
}

fn preview_line(note: &Note) -> String {
    let first_line = note
        .content
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim();
    if first_line.is_empty() {
        note.title.clone()
    } else {
        format!("{}: {}", note.title, first_line)
    }
}

fn view_note(args: Vec<String>, app: &CliApp, config: &Config) -> Result<(), Box<dyn Error>> {
    let id = args.first().ok_or("Usage: nb view <id>")?;
    let note = app.store().get(id).ok_or_else(|| format!("Note {id} not found"))?;
    let ctx = FormatContext::new(config.use_color, app.theme());
    println!(
        "{} ({})\nCategory: {}\nPinned: {}\nCreated: {}\nUpdated: {}\n\n{}",
        ctx.format_header(&format!("# {}", note.title)),
        ctx.format_id(&note.id),
        ctx.format_category(note.category),
        if note.is_pinned { "yes" } else { "no" },
        ctx.format_timestamp(&note.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ctx.format_timestamp(&note.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        note.content
    );
    Ok(())
}

fn edit_note(
    args: Vec<String>,
    app: &mut CliApp,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "edit");
    let mut id: Option<String> = None;
    let mut title: Option<String> = None;
    let mut content: Option<String> = None;
    let mut category: Option<String> = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--title" => title = Some(parser.extract_value("--title")?),
            "--content" => content = Some(parser.extract_value("--content")?),
            "-c" | "--category" => category = Some(parser.extract_value("-c/--category")?),
            other if is_flag(other) => return Err(parser.unknown_flag(other)),
            _ => {
                if id.is_none() {
                    id = Some(arg);
                }
            }
        }
    }
    let id = id.ok_or("Usage: nb edit <id> [--title <t>] [--content <c>] [-c <category>]")?;
    let Some(note) = app.store().get(&id) else {
        return Err(format!("Note {id} not found").into());
    };

    let mut form = NoteForm::from_note(note);
    let use_editor = title.is_none() && content.is_none() && category.is_none();
    if let Some(t) = title {
        form.title = t;
    }
    if let Some(c) = content {
        form.content = c;
    }
    if let Some(c) = category {
        form.category = c;
    }
    if use_editor {
        form.content = edit_in_editor(config, &id, &form.content)?;
    }

    app.navigate(Route::edit(id));
    app.submit(form)?;
    print_notices(app);
    Ok(())
}

fn edit_in_editor(config: &Config, id: &str, content: &str) -> Result<String, Box<dyn Error>> {
    let path = config.data_dir.join(format!(".edit-{id}.md"));
    fs::write(&path, content)?;

    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = Command::new(&editor)
        .arg(&path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();
    let edited = fs::read_to_string(&path);
    let _ = fs::remove_file(&path);

    if !status?.success() {
        return Err("Editor exited with non-zero status".into());
    }
    Ok(edited?)
}

/// Asks on stdin unless `--yes` was given. Anything but y/yes keeps the note.
struct PromptConfirm {
    assume_yes: bool,
}

impl Confirm for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

fn delete_notes(args: Vec<String>, app: &mut CliApp) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "delete");
    let mut confirm = PromptConfirm { assume_yes: false };
    let mut ids: Vec<String> = Vec::new();
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-y" | "--yes" => confirm.assume_yes = true,
            other if is_flag(other) => return Err(parser.unknown_flag(other)),
            _ => ids.push(arg),
        }
    }
    if ids.is_empty() {
        return Err("Usage: nb delete <ids...> [-y|--yes]".into());
    }

    let mut deleted = 0;
    for id in ids {
        match app.delete(&id, &mut confirm) {
            Ok(Some(_)) => deleted += 1,
            Ok(None) => {}
            Err(StoreError::NotFound(_)) => println!("Note {id} not found"),
            Err(e) => return Err(e.into()),
        }
        print_notices(app);
    }
    if deleted == 0 {
        println!("No notes deleted.");
    }
    Ok(())
}

fn pin_notes(args: Vec<String>, app: &mut CliApp) -> Result<(), Box<dyn Error>> {
    if args.is_empty() {
        return Err("Usage: nb pin <ids...>".into());
    }
    for id in args {
        app.toggle_pin(&id)?;
        print_notices(app);
    }
    Ok(())
}

fn export_notes(args: Vec<String>, app: &mut CliApp) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "export");
    let mut out = PathBuf::from(".");
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--out" | "-o" => out = PathBuf::from(parser.extract_value("--out")?),
            other => return Err(parser.unknown_flag(other)),
        }
    }
    app.export(&out, note::now_millis())?;
    print_notices(app);
    Ok(())
}

fn theme_command(args: Vec<String>, app: &mut CliApp) -> Result<(), Box<dyn Error>> {
    match args.first().map(|s| s.as_str()) {
        None => {
            println!("{}", app.theme());
            return Ok(());
        }
        Some("toggle") => {
            app.toggle_theme()?;
        }
        Some(other) => {
            let theme = Theme::parse(other)
                .ok_or_else(|| format!("Unknown theme '{other}' (use light, dark or toggle)"))?;
            app.set_theme(theme)?;
        }
    }
    print_notices(app);
    Ok(())
}

fn render_page(args: Vec<String>, app: &mut CliApp) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "render");
    let mut screen = Screen::View;
    let mut edit: Option<String> = None;
    let mut search: Option<String> = None;
    let mut category: Option<CategoryFilter> = None;
    let mut out: Option<PathBuf> = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--edit" => edit = Some(parser.extract_value("--edit")?),
            "-s" | "--search" => search = Some(parser.extract_value("-s/--search")?),
            "-c" | "--category" => category = Some(parser.extract_category()?),
            "--out" | "-o" => out = Some(PathBuf::from(parser.extract_value("--out")?)),
            other if is_flag(other) => return Err(parser.unknown_flag(other)),
            other => {
                screen = Screen::parse(other)
                    .ok_or_else(|| format!("Unknown screen '{other}' (use welcome, create or view)"))?;
            }
        }
    }

    let route = match edit {
        Some(id) => {
            if app.store().get(&id).is_none() {
                return Err(format!("Note {id} not found").into());
            }
            Route::edit(id)
        }
        None => Route { screen, edit: None },
    };
    app.navigate(route);
    if let Some(term) = search {
        app.set_search(term);
    }
    if let Some(category) = category {
        app.set_category(category);
    }

    let html = app.render();
    match out {
        Some(path) => {
            fs::write(&path, html)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}
