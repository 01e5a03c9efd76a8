//! Captured faults.
//!
//! A [`Fault`] is the value a boundary hands back after intercepting a panic.
//! Guard panics carry a ready-made `Fault` as their payload; any other panic
//! payload is normalized by [`Fault::from_panic`].

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::io;
use std::panic::Location;

/// Boxed error accepted by guards and stored in [`FaultKind::Error`].
///
/// `&str`, `String`, `anyhow::Error` and every `Error + Send + Sync` type
/// convert into it.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

const OPAQUE_PAYLOAD: &str = "unknown panic payload";

/// Source position of the guard call that raised a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaultLocation {
    file: &'static str,
    line: u32,
    column: u32,
}

impl FaultLocation {
    #[must_use]
    pub const fn new(file: &'static str, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }

    /// Location of the caller, following `#[track_caller]` frames.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl From<&'static Location<'static>> for FaultLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }
}

impl fmt::Display for FaultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// What the intercepted panic carried.
#[derive(Debug)]
pub enum FaultKind {
    /// The payload was an error value.
    Error(BoxError),
    /// The payload was text (`&'static str` or `String`).
    Message(String),
    /// The payload had a type that cannot be formatted.
    Opaque,
    /// The execution context for the unit of work could not be started.
    Spawn(io::Error),
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(err) => fmt::Display::fmt(err, f),
            Self::Message(message) => f.write_str(message),
            Self::Opaque => f.write_str(OPAQUE_PAYLOAD),
            Self::Spawn(err) => write!(f, "failed to start worker thread: {err}"),
        }
    }
}

/// An error produced by intercepting a panic at a boundary.
///
/// `{}` prints the payload message only. `{:#}` appends the guard location
/// on its own tab-indented line when one was recorded.
#[derive(Debug)]
pub struct Fault {
    kind: FaultKind,
    location: Option<FaultLocation>,
}

impl Fault {
    pub fn from_error(err: impl Into<BoxError>) -> Self {
        Self {
            kind: FaultKind::Error(err.into()),
            location: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Message(message.into()),
            location: None,
        }
    }

    #[must_use]
    pub fn spawn(err: io::Error) -> Self {
        Self {
            kind: FaultKind::Spawn(err),
            location: None,
        }
    }

    #[must_use]
    pub fn opaque() -> Self {
        Self {
            kind: FaultKind::Opaque,
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: FaultLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Normalize a panic payload as returned by `catch_unwind`.
    ///
    /// Payload types are tried in order: `Fault` (raised by a guard),
    /// `BoxError`, `io::Error`, `String`, `&'static str`. Anything else
    /// becomes [`FaultKind::Opaque`].
    ///
    /// A panic payload is `dyn Any`, which cannot be viewed as `dyn Error`
    /// without naming the concrete type. Other error types only keep their
    /// cause when raised through a guard or passed to `panic_any` already
    /// boxed as [`BoxError`].
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Self>() {
            Ok(fault) => return *fault,
            Err(other) => other,
        };
        let payload = match payload.downcast::<BoxError>() {
            Ok(err) => return Self::from_error(*err),
            Err(other) => other,
        };
        let payload = match payload.downcast::<io::Error>() {
            Ok(err) => return Self::from_error(*err),
            Err(other) => other,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::message(*message),
            Err(other) => other,
        };
        match payload.downcast::<&'static str>() {
            Ok(message) => Self::message(*message),
            Err(_) => Self::opaque(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &FaultKind {
        &self.kind
    }

    #[must_use]
    pub fn location(&self) -> Option<FaultLocation> {
        self.location
    }

    /// True when the payload was an error value rather than text.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.kind, FaultKind::Error(_))
    }

    /// Borrow the wrapped error as `E`, if that is what was raised.
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        match &self.kind {
            FaultKind::Error(err) => err.downcast_ref::<E>(),
            FaultKind::Spawn(err) => (err as &(dyn Error + 'static)).downcast_ref::<E>(),
            FaultKind::Message(_) | FaultKind::Opaque => None,
        }
    }

    /// Take the wrapped error back out as `E`.
    ///
    /// On a type mismatch the fault is returned unchanged.
    pub fn downcast<E: Error + 'static>(self) -> Result<E, Self> {
        let Self { kind, location } = self;
        match kind {
            FaultKind::Error(err) => match err.downcast::<E>() {
                Ok(err) => Ok(*err),
                Err(err) => Err(Self {
                    kind: FaultKind::Error(err),
                    location,
                }),
            },
            kind => Err(Self { kind, location }),
        }
    }

    /// Unwrap into the raised error, or box the fault itself when the
    /// payload was not an error.
    #[must_use]
    pub fn into_error(self) -> BoxError {
        match self.kind {
            FaultKind::Error(err) => err,
            FaultKind::Spawn(err) => Box::new(err),
            kind @ (FaultKind::Message(_) | FaultKind::Opaque) => Box::new(Self {
                kind,
                location: self.location,
            }),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)?;
        if f.alternate()
            && let Some(location) = self.location
        {
            write!(f, "\n\t{location}")?;
        }
        Ok(())
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            FaultKind::Error(err) => Some(err.as_ref()),
            FaultKind::Spawn(err) => Some(err),
            FaultKind::Message(_) | FaultKind::Opaque => None,
        }
    }
}
