use crate::error::{Result, SummitError};

/// Attach a lazily built message to any error convertible into [`SummitError`].
///
/// The wrapped error keeps its [`ErrorKind`](crate::error::ErrorKind), so a
/// config file that fails to parse still reports as a configuration failure.
pub trait ResultExt<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SummitError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SummitError::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}
