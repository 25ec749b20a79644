//! Script sources.
//!
//! A `ScriptSource` names where script text comes from and is consumed once
//! to obtain it. Blank path-like input is rejected before any I/O is
//! attempted; unreadable sources map to [`Error::ScriptNotFound`] with the
//! underlying cause attached.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Where a script's text comes from. Consumed once by [`resolve`].
///
/// [`resolve`]: ScriptSource::resolve
pub enum ScriptSource {
    /// A filesystem path.
    Path(PathBuf),
    /// An already-open file handle.
    File(fs::File),
    /// A `file://` URL. Other schemes are rejected.
    Url(String),
    /// An already-open reader; read to end on resolution.
    Reader(Box<dyn Read + Send>),
    /// In-memory script text, no location semantics.
    Text(String),
}

impl ScriptSource {
    /// Consume the source and produce the raw script text.
    pub fn resolve(self) -> Result<String> {
        let text = match self {
            ScriptSource::Path(path) => {
                let display = path.display().to_string();
                if display.trim().is_empty() {
                    return Err(Error::script_not_found("(blank path)"));
                }
                fs::read_to_string(&path).map_err(|e| Error::script_unreadable(display, e))?
            }
            ScriptSource::Url(url) => {
                if url.trim().is_empty() {
                    return Err(Error::script_not_found("(blank url)"));
                }
                let Some(path) = url.strip_prefix("file://") else {
                    return Err(Error::script_not_found(format!(
                        "unsupported URL scheme: {url}"
                    )));
                };
                fs::read_to_string(path).map_err(|e| Error::script_unreadable(url.clone(), e))?
            }
            ScriptSource::File(mut file) => {
                let mut text = String::new();
                file.read_to_string(&mut text)
                    .map_err(|e| Error::script_unreadable("(file handle)", e))?;
                text
            }
            ScriptSource::Reader(mut reader) => {
                let mut text = String::new();
                reader
                    .read_to_string(&mut text)
                    .map_err(|e| Error::script_unreadable("(reader)", e))?;
                text
            }
            ScriptSource::Text(text) => text,
        };

        if text.trim().is_empty() {
            return Err(Error::script_not_found("(empty script)"));
        }

        Ok(text)
    }

    /// Best-effort name for diagnostics and compiled-unit labels.
    pub fn label(&self) -> String {
        match self {
            ScriptSource::Path(path) => path.display().to_string(),
            ScriptSource::File(_) => "(file handle)".to_string(),
            ScriptSource::Url(url) => url.clone(),
            ScriptSource::Reader(_) => "(reader)".to_string(),
            ScriptSource::Text(_) => "(inline)".to_string(),
        }
    }
}

impl From<PathBuf> for ScriptSource {
    fn from(path: PathBuf) -> Self {
        ScriptSource::Path(path)
    }
}

impl From<fs::File> for ScriptSource {
    fn from(file: fs::File) -> Self {
        ScriptSource::File(file)
    }
}

impl From<&std::path::Path> for ScriptSource {
    fn from(path: &std::path::Path) -> Self {
        ScriptSource::Path(path.to_path_buf())
    }
}
