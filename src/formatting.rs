use chrono::{DateTime, Utc};
use yansi::Paint;

use crate::note::Category;
use crate::theme::Theme;

/// Terminal colours for one theme.
pub struct ColorPalette {
    pub muted: (u8, u8, u8),     // ids, separators
    pub header: (u8, u8, u8),    // titles, table headers
    pub timestamp: (u8, u8, u8), // dates
    pub highlight: (u8, u8, u8), // search matches, pins
}

impl ColorPalette {
    pub const DARK: Self = Self {
        muted: (108, 112, 134),
        header: (148, 226, 213),
        timestamp: (137, 180, 250),
        highlight: (243, 139, 168),
    };

    pub const LIGHT: Self = Self {
        muted: (124, 127, 147),
        header: (23, 146, 153),
        timestamp: (30, 102, 245),
        highlight: (210, 15, 57),
    };

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::LIGHT,
            Theme::Dark => Self::DARK,
        }
    }
}

pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool, theme: Theme) -> Self {
        Self { use_color, palette: ColorPalette::for_theme(theme) }
    }

    fn paint(&self, text: &str, rgb: (u8, u8, u8), bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let (r, g, b) = rgb;
        if bold {
            Paint::rgb(text, r, g, b).bold().to_string()
        } else {
            Paint::rgb(text, r, g, b).to_string()
        }
    }

    pub fn format_id(&self, id: &str) -> String {
        self.paint(id, self.palette.muted, false)
    }

    pub fn format_header(&self, text: &str) -> String {
        self.paint(text, self.palette.header, true)
    }

    pub fn format_timestamp(&self, ts: &str) -> String {
        self.paint(ts, self.palette.timestamp, false)
    }

    pub fn format_category(&self, category: Category) -> String {
        self.paint(category.as_str(), category_color(category), true)
    }

    pub fn format_pin(&self, pinned: bool) -> String {
        if pinned {
            self.paint("*", self.palette.highlight, true)
        } else {
            " ".to_string()
        }
    }

    /// Colour case-insensitive matches of `query` inside `text`.
    pub fn highlight_match(&self, text: &str, query: Option<&str>) -> String {
        let Some(q) = query.map(str::trim) else { return text.to_string() };
        if q.is_empty() || !self.use_color {
            return text.to_string();
        }
        // Lowercasing can change a char's byte width, so every byte of
        // `lower` remembers the span of the char it came from in `text`.
        let mut lower = String::with_capacity(text.len());
        let mut spans: Vec<(usize, usize)> = Vec::with_capacity(text.len());
        for (start, ch) in text.char_indices() {
            let end = start + ch.len_utf8();
            for lc in ch.to_lowercase() {
                lower.push(lc);
                spans.extend(std::iter::repeat_n((start, end), lc.len_utf8()));
            }
        }

        let needle = q.to_lowercase();
        let mut out = String::new();
        let mut copied = 0;
        let mut from = 0;
        while let Some(pos) = lower[from..].find(&needle) {
            let hit = from + pos;
            from = hit + needle.len();
            let (start, _) = spans[hit];
            let (_, end) = spans[from - 1];
            if start < copied {
                continue;
            }
            out.push_str(&text[copied..start]);
            out.push_str(&self.paint(&text[start..end], self.palette.highlight, false));
            copied = end;
        }
        out.push_str(&text[copied..]);
        out
    }
}

fn category_color(category: Category) -> (u8, u8, u8) {
    match category {
        Category::Study => (137, 180, 250),
        Category::Work => (249, 226, 175),
        Category::Personal => (166, 227, 161),
        Category::Others => (198, 160, 246),
    }
}

/// Absolute or "3h ago" style timestamps.
pub struct TimeFormatter {
    relative_mode: bool,
    now: DateTime<Utc>,
}

impl TimeFormatter {
    pub fn new(relative_mode: bool, now: DateTime<Utc>) -> Self {
        Self { relative_mode, now }
    }

    pub fn format(&self, dt: DateTime<Utc>) -> String {
        if self.relative_mode {
            self.format_relative(dt)
        } else {
            dt.format("%d%b%y %H:%M").to_string()
        }
    }

    pub fn format_relative(&self, dt: DateTime<Utc>) -> String {
        let dur = self.now.signed_duration_since(dt);
        let total_minutes = dur.num_minutes().max(0);
        let total_hours = dur.num_hours().max(0);
        let total_days = dur.num_days().max(0);

        if total_hours == 0 {
            if total_minutes == 0 {
                "just now".to_string()
            } else {
                format!("{total_minutes}m ago")
            }
        } else if total_days == 0 {
            format!("{total_hours}h ago")
        } else if total_days < 30 {
            let hours = total_hours - total_days * 24;
            if hours > 0 {
                format!("{total_days}d {hours}h ago")
            } else {
                format!("{total_days}d ago")
            }
        } else if total_days < 365 {
            format!("{}mo ago", total_days / 30)
        } else {
            let years = total_days / 365;
            let months = (total_days % 365) / 30;
            if months > 0 {
                format!("{years}y {months}mo ago")
            } else {
                format!("{years}y ago")
            }
        }
    }
}
