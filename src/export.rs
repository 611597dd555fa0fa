use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Serialize, Serializer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::note::{Category, Note};

/// Downloadable snapshot. Ids are left out of exported notes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    #[serde(serialize_with = "iso_millis")]
    pub exported_at: DateTime<Utc>,
    pub total_notes: usize,
    pub notes: Vec<ExportedNote<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedNote<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub category: Category,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Note> for ExportedNote<'a> {
    fn from(note: &'a Note) -> Self {
        Self {
            title: &note.title,
            content: &note.content,
            category: note.category,
            is_pinned: note.is_pinned,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// `exportedAt` is kept to millisecond precision, matching the file name.
pub fn build_document(notes: &[Note], exported_at: DateTime<Utc>) -> ExportDocument<'_> {
    ExportDocument {
        exported_at: exported_at.trunc_subsecs(3),
        total_notes: notes.len(),
        notes: notes.iter().map(ExportedNote::from).collect(),
    }
}

fn iso_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// `notes-export-2024-05-01T09-30-00-123Z.json`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    let iso = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    format!("notes-export-{}.json", iso.replace([':', '.'], "-"))
}

pub fn write_export(dir: &Path, notes: &[Note], at: DateTime<Utc>) -> io::Result<PathBuf> {
    let doc = build_document(notes, at);
    let json = serde_json::to_string_pretty(&doc).map_err(io::Error::other)?;
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(export_file_name(at));
    fs::write(&path, json)?;
    Ok(path)
}
