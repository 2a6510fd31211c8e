use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse diagram input: {details} (at line ~{line})")]
    Parse { line: usize, details: String },
}

impl Error {
    pub fn parse(line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            line,
            details: details.into(),
        }
    }

    /// Locates a TOML error in `text` and converts it to [`Error::Parse`].
    pub(crate) fn from_toml(text: &str, error: toml::de::Error) -> Self {
        let line = error
            .span()
            .map(|span| text[..span.start.min(text.len())].matches('\n').count() + 1)
            .unwrap_or(0);
        Self::parse(line, error.message())
    }
}
