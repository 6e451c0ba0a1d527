mod error;
pub use error::Error;
mod hours_page;
mod remove_excess_whitespace;
mod static_selector;
mod text_from_selection;

pub use hours_page::Schedules;
pub use remove_excess_whitespace::remove_excess_whitespace;
