use std::{
    error::Error as StdError,
    fmt::{Debug, Display, Formatter},
    sync::Arc,
};
use tracing::debug;

/// Cloneable error for view messages that carry no domain taxonomy.
#[derive(Debug, Clone)]
pub struct Error {
    inner: Arc<anyhow::Error>,
}

impl Error {
    pub fn msg<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(anyhow::Error::msg(message)),
        }
    }
}

impl<E> From<E> for Error
where
    E: StdError + Send + Sync + 'static,
{
    #[cold]
    fn from(error: E) -> Self {
        debug!("`{error}`");
        Self {
            inner: Arc::new(error.into()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

#[macro_export]
macro_rules! fail {
    ($($tt:tt)*) => {
        $crate::utils::Error::msg(format!($($tt)*))
    };
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
