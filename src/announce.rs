use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Success,
    Error,
    Info,
}

/// Screen-reader urgency, mirroring `aria-live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Polite,
    Assertive,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Polite => "polite",
            Priority::Assertive => "assertive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: Kind,
    pub message: String,
    pub priority: Priority,
}

/// Queue of transient feedback. Errors are always assertive.
#[derive(Debug, Default)]
pub struct Announcer {
    queue: VecDeque<Notice>,
    latest: Option<Notice>,
}

impl Announcer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Kind::Success, message.into(), Priority::Polite);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Kind::Info, message.into(), Priority::Polite);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Kind::Error, message.into(), Priority::Assertive);
    }

    fn push(&mut self, kind: Kind, message: String, priority: Priority) {
        match kind {
            Kind::Error => log::warn!("{message}"),
            _ => log::info!("{message}"),
        }
        let notice = Notice { kind, message, priority };
        self.latest = Some(notice.clone());
        self.queue.push_back(notice);
    }

    /// The most recent notice, kept for the live region after draining.
    pub fn latest(&self) -> Option<&Notice> {
        self.latest.as_ref()
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}
