#![allow(deprecated)]

#[allow(unused_imports)]
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd(temp: &TempDir) -> assert_cmd::Command {
    let mut c = assert_cmd::Command::cargo_bin("noteboard").unwrap();
    c.env("NOTEBOARD_DIR", temp.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    c
}

/// (id, full row) for each listed note, in display order.
fn list_rows(temp: &TempDir, extra: &[&str]) -> Vec<(String, String)> {
    let mut args = vec!["list"];
    args.extend_from_slice(extra);
    let out = cmd(temp).args(&args).assert().success().get_output().stdout.clone();
    String::from_utf8_lossy(&out)
        .lines()
        .skip(2)
        .map(|line| {
            let id = line.split_whitespace().next().unwrap_or_default().to_string();
            (id, line.to_string())
        })
        .collect()
}

fn create(temp: &TempDir, title: &str, content: &str, category: &str) -> String {
    let out = cmd(temp)
        .args(["new", title, content, "-c", category])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    // "Created note <id> (<title>)"
    String::from_utf8_lossy(&out)
        .split_whitespace()
        .nth(2)
        .unwrap()
        .to_string()
}

fn read_snapshot(temp: &TempDir) -> serde_json::Value {
    let raw = fs::read_to_string(temp.path().join("notes.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn new_trims_and_lists_newest_first() {
    let temp = TempDir::new().unwrap();
    let first = create(&temp, " Hi ", " there ", "work");
    let second = create(&temp, "Later", "second note", "study");

    let rows = list_rows(&temp, &[]);
    let ids: Vec<&str> = rows.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    let snapshot = read_snapshot(&temp);
    assert_eq!(snapshot[1]["title"], "Hi");
    assert_eq!(snapshot[1]["content"], "there");
    assert_eq!(snapshot[1]["category"], "Work");
    assert_eq!(snapshot[1]["createdAt"], snapshot[1]["updatedAt"]);

    cmd(&temp)
        .args(["view", &first])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Hi"))
        .stdout(predicate::str::contains("Category: Work"));
}

#[test]
fn new_rejects_blank_title() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .args(["new", "   ", "body"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title is required"));
    cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes yet"));
}

#[test]
fn unknown_category_defaults_to_personal() {
    let temp = TempDir::new().unwrap();
    create(&temp, "Misc", "stuff", "hobby");
    assert_eq!(read_snapshot(&temp)[0]["category"], "Personal");
}

#[test]
fn list_search_and_category_filters() {
    let temp = TempDir::new().unwrap();
    create(&temp, "Meeting", "quarterly plan", "work");
    create(&temp, "Groceries", "milk", "personal");

    let rows = list_rows(&temp, &["-s", "MEETING"]);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].1.contains("Meeting"));

    let rows = list_rows(&temp, &["-c", "personal"]);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].1.contains("Groceries"));

    cmd(&temp)
        .args(["list", "-c", "study"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes match."));

    cmd(&temp)
        .args(["list", "-c", "hobby"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn pin_moves_note_to_top_and_toggles_back() {
    let temp = TempDir::new().unwrap();
    let old = create(&temp, "Old", "first", "work");
    let new = create(&temp, "New", "second", "work");

    cmd(&temp)
        .args(["pin", &old])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Pinned note {old}")));
    let rows = list_rows(&temp, &[]);
    assert_eq!(rows[0].0, old);
    assert!(rows[0].1.contains(" * "));
    assert_eq!(rows[1].0, new);

    let stored = read_snapshot(&temp);
    assert_eq!(stored[1]["id"], old.as_str());
    assert_eq!(stored[1]["isPinned"], true);

    cmd(&temp)
        .args(["pin", &old])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Unpinned note {old}")));
    let rows = list_rows(&temp, &[]);
    assert_eq!(rows[0].0, new);
}

#[test]
fn edit_with_flags_and_editor() {
    let temp = TempDir::new().unwrap();
    let id = create(&temp, "Draft", "v1", "study");

    cmd(&temp)
        .args(["edit", &id, "--title", "Final", "-c", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Updated note {id}")));
    let stored = read_snapshot(&temp);
    assert_eq!(stored[0]["title"], "Final");
    assert_eq!(stored[0]["content"], "v1");
    assert_eq!(stored[0]["category"], "Work");

    cmd(&temp).env("EDITOR", "true").args(["edit", &id]).assert().success();
    assert_eq!(read_snapshot(&temp)[0]["content"], "v1");

    cmd(&temp)
        .args(["edit", "missing", "--title", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note missing not found"));

    cmd(&temp)
        .args(["edit", &id, "--content", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Content is required"));
}

#[test]
fn delete_requires_confirmation() {
    let temp = TempDir::new().unwrap();
    let id = create(&temp, "Keep", "me", "personal");

    cmd(&temp)
        .args(["delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete \"Keep\"? [y/N]"))
        .stdout(predicate::str::contains(format!("Kept note {id}")))
        .stdout(predicate::str::contains("No notes deleted."));
    assert_eq!(list_rows(&temp, &[]).len(), 1);

    cmd(&temp)
        .args(["delete", &id])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted note {id}")));
    assert_eq!(read_snapshot(&temp).as_array().unwrap().len(), 0);
}

#[test]
fn delete_with_yes_and_missing_ids() {
    let temp = TempDir::new().unwrap();
    let a = create(&temp, "A", "a", "work");
    let b = create(&temp, "B", "b", "work");

    cmd(&temp)
        .args(["delete", &a, "ghost", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted note {a}")))
        .stdout(predicate::str::contains("Note ghost not found"));

    let rows = list_rows(&temp, &[]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, b);
}

#[test]
fn export_omits_ids_and_names_file() {
    let temp = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let id = create(&temp, "Plan", "**ship** it", "work");

    cmd(&temp)
        .args(["export", "--out"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 note(s)"));

    let files: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.file_name().to_string_lossy().to_string()))
        .collect();
    assert_eq!(files.len(), 1);
    let name = &files[0];
    assert!(name.starts_with("notes-export-"));
    assert!(name.ends_with("Z.json"));
    assert!(!name.contains(':'));
    assert_eq!(name.matches('.').count(), 1);

    let raw = fs::read_to_string(out.path().join(name)).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["totalNotes"], 1);
    let exported_at = doc["exportedAt"].as_str().unwrap();
    assert_eq!(name, &format!("notes-export-{}.json", exported_at.replace([':', '.'], "-")));
    assert_eq!(doc["notes"][0]["title"], "Plan");
    assert!(doc["notes"][0].get("id").is_none());
    assert!(!raw.contains(&id));
}

#[test]
fn theme_toggle_persists() {
    let temp = TempDir::new().unwrap();
    cmd(&temp).args(["theme"]).assert().success().stdout("light\n");
    cmd(&temp)
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to dark theme"));
    let raw = fs::read_to_string(temp.path().join("theme.json")).unwrap();
    assert_eq!(serde_json::from_str::<String>(&raw).unwrap(), "dark");
    cmd(&temp).args(["theme"]).assert().success().stdout("dark\n");
    cmd(&temp).args(["theme", "sepia"]).assert().failure();
}

#[test]
fn render_escapes_and_prefills() {
    let temp = TempDir::new().unwrap();
    let id = create(&temp, "<b>bold</b>", "<script>x</script>", "work");

    cmd(&temp)
        .args(["render", "view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("&lt;b&gt;bold&lt;/b&gt;"))
        .stdout(predicate::str::contains("<script>").not())
        .stdout(predicate::str::contains("data-theme=\"light\""));

    cmd(&temp)
        .args(["render", "--edit", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Edit note"))
        .stdout(predicate::str::contains(format!("value=\"{id}\"")));

    cmd(&temp)
        .args(["render", "view", "-s", "nothing-here"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes match"));

    let page = temp.path().join("page.html");
    cmd(&temp)
        .args(["render", "welcome", "--out"])
        .arg(&page)
        .assert()
        .success();
    assert!(fs::read_to_string(page).unwrap().contains("Welcome to Notes"));
}

#[test]
fn corrupt_snapshot_warns_and_starts_empty() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.json"), "{broken").unwrap();
    cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: Saved notes were unreadable"))
        .stdout(predicate::str::contains("No notes yet"));
}
