use std::fmt::Display;

/// Where an unparseable piece of schedule text was found.
/// Rows are 1-based data rows (0 is the header row), columns are 1-based date columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
    pub restaurant: Option<String>,
}

impl Display for CellPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.restaurant {
            Some(name) => write!(f, "row {} ({name}), column {}", self.row, self.column),
            None => write!(f, "row {}, column {}", self.row, self.column),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// The page does not match the expected table layout.
    HtmlParse(String),
    TextNodeParse(String),
    /// A date or time cell could not be read.
    ScheduleData {
        position: CellPosition,
        text: String,
        reason: String,
    },
}

impl Error {
    pub fn schedule_data_error(position: CellPosition, text: &str, reason: &str) -> Self {
        Self::ScheduleData {
            position,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    #[cfg(test)]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::HtmlParse(_) | Self::TextNodeParse(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "Unexpected page structure: {msg}"),
            Self::TextNodeParse(msg) => write!(f, "Text Node Parse Error: {msg}"),
            Self::ScheduleData {
                position,
                text,
                reason,
            } => write!(
                f,
                "Unparseable schedule data at {position}: {reason} (found {text:?})"
            ),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
