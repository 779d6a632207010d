use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::core::{Env, Parser, Reply};
use crate::error::RunResult;

/// How a parser is run: where it starts and which text it skips.
///
/// Patterns are regular expressions, compiled when the options are used.
///
/// ```json
/// { "start": 0, "skip": "[ \\t]+", "follow": "[^A-Za-z0-9_]" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub start: usize,
    /// Text skipped before every primitive match.
    pub skip: Option<String>,
    /// What must follow a keyword for it to count as one.
    pub follow: Option<String>,
}

impl ParseOptions {
    pub fn from_json_str(s: &str) -> RunResult<Self> {
        from_str(s)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> RunResult<Self> {
        from_file(path)
    }

    pub fn with_skip(mut self, skip: impl Into<String>) -> Self {
        self.skip = Some(skip.into());
        self
    }

    pub fn with_follow(mut self, follow: impl Into<String>) -> Self {
        self.follow = Some(follow.into());
        self
    }

    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Builds the environment these options describe for `subject`.
    pub fn env(&self, subject: &str) -> RunResult<Env> {
        Env::with_patterns(subject, self.skip.as_deref(), self.follow.as_deref())
    }
}

impl<T: 'static> Parser<T> {
    /// Runs the parser over `subject` as configured by `options`.
    pub fn run_with(&self, subject: &str, options: &ParseOptions) -> RunResult<Reply<T>> {
        self.run_in(options.env(subject)?, options.start)
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> RunResult<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> RunResult<T> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}
