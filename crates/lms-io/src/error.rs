use lms_core::component::{TransportId, TransportKind};
use lms_core::grid::GridError;
use lms_core::item::{Item, ItemError};
use lms_core::path::PathError;

/// Errors that can occur while loading a grid description.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The input does not describe a valid factory.
    ///
    /// `line` is the 1-based input line the problem was found on, or `None`
    /// for checks that run over the whole input once it is consumed.
    #[error("format error{}: {kind}", at_line(.line))]
    Format {
        line: Option<usize>,
        kind: FormatError,
    },
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {line}"),
        None => String::new(),
    }
}

impl LoadError {
    pub fn is_io(&self) -> bool {
        matches!(self, LoadError::Io(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, LoadError::Format { .. })
    }

    /// The format violation, if this is a format error.
    pub fn format_kind(&self) -> Option<&FormatError> {
        match self {
            LoadError::Format { kind, .. } => Some(kind),
            LoadError::Io(_) => None,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Format { line, .. } => *line,
            LoadError::Io(_) => None,
        }
    }
}

/// Every way a grid description can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unexpected end of input, expected {expected}")]
    MissingLine { expected: &'static str },

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid grid range '{0}'")]
    InvalidRange(String),

    #[error("grid range {range} exceeds the maximum of {max}")]
    RangeTooLarge { range: u32, max: u32 },

    #[error("expected a separator line, found '{0}'")]
    MissingSeparator(String),

    #[error("invalid {what} count '{value}'")]
    InvalidCount { what: &'static str, value: String },

    #[error("invalid item key: {0}")]
    InvalidKey(ItemError),

    #[error("grid row {row} has {found} tiles, expected {expected}")]
    RowWidth {
        row: usize,
        expected: u32,
        found: usize,
    },

    #[error("unknown tile '{0}'")]
    UnknownTile(String),

    #[error("more producer tiles than the {0} declared producer keys")]
    ProducerKeysExhausted(usize),

    #[error("more receiver tiles than the {0} declared receiver keys")]
    ReceiverKeysExhausted(usize),

    #[error("{producers} producer and {receivers} receiver keys were never placed")]
    UnclaimedKeys { producers: usize, receivers: usize },

    #[error("malformed link '{0}'")]
    MalformedLink(String),

    #[error("link index {index} is outside 1..={count}")]
    IndexOutOfRange { index: u32, count: usize },

    #[error("{0}")]
    Network(PathError),

    #[error("tile outside the grid: {0}")]
    OutsideGrid(GridError),

    #[error("the chain through {0} loops back on itself")]
    CyclicChain(TransportId),

    #[error("receiver {receiver} wants '{expected}' but producer {producer} makes '{found}'")]
    KeyMismatch {
        receiver: TransportId,
        producer: TransportId,
        expected: Item,
        found: Item,
    },

    #[error("{kind} {id} is not on a complete producer-to-receiver chain")]
    IncompleteChain { id: TransportId, kind: TransportKind },
}
