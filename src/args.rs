use std::error::Error;

use crate::query::CategoryFilter;

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Value following a flag such as `--title`.
    pub fn extract_value(&mut self, flag: &str) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name).into()
        })
    }

    /// Category name following `-c/--category`; "all" is accepted.
    pub fn extract_category(&mut self) -> Result<CategoryFilter, Box<dyn Error>> {
        let raw = self.extract_value("-c/--category")?;
        CategoryFilter::parse(&raw).ok_or_else(|| {
            format!(
                "Unknown category '{}' for {} (use all, study, work, personal or others)",
                raw, self.command_name
            )
            .into()
        })
    }

    pub fn unknown_flag(&self, flag: &str) -> Box<dyn Error> {
        format!("Unknown flag for {}: {}", self.command_name, flag).into()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }
}

pub fn is_flag(arg: &str) -> bool {
    arg.starts_with('-') && arg.len() > 1
}
