mod availability;
mod header_date;
mod layout;
mod schedule;
mod schedules;

pub use schedules::Schedules;
