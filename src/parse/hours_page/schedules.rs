use chrono::{NaiveDate, NaiveDateTime};
use juniper::graphql_object;
use scraper::Html;
use tracing::{instrument, Level};
use url::Url;

use super::header_date::parse_header_date;
use super::layout::{TableLayout, DUKE_DINING_V1};
use super::schedule::Schedule;
use crate::fetch::hours_page;
use crate::parse::error::CellPosition;
use crate::parse::text_from_selection::text_fragments;
use crate::parse::Error;

/// Every schedule listed on one scrape of the hours page, in table order.
#[derive(Debug, serde::Serialize, serde::Deserialize, Default, PartialEq, Eq, Clone)]
pub struct Schedules {
    schedules: Vec<Schedule>,
}

#[graphql_object]
impl Schedules {
    #[allow(clippy::needless_pass_by_value)] // ignored because graphql doesn't support pass by reference
    pub fn schedules(&self, names: Option<Vec<String>>) -> Vec<&Schedule> {
        names.map_or_else(
            || self.schedules.iter().collect(),
            |names| {
                self.schedules
                    .iter()
                    .filter(|schedule| {
                        names
                            .iter()
                            .any(|name| name.eq_ignore_ascii_case(schedule.name()))
                    })
                    .collect()
            },
        )
    }

    /// Restaurants with a window containing `time`.
    pub fn open_at(&self, time: NaiveDateTime) -> Vec<&Schedule> {
        self.schedules
            .iter()
            .filter(|schedule| schedule.is_open_at(time))
            .collect()
    }
}

impl Schedules {
    pub fn from_html_element(element: scraper::ElementRef, today: NaiveDate) -> Result<Self, Error> {
        Self::from_layout(&DUKE_DINING_V1, element, today)
    }

    #[instrument(skip_all, fields(layout = layout.version, %today), level = Level::TRACE)]
    pub fn from_layout(
        layout: &TableLayout,
        element: scraper::ElementRef,
        today: NaiveDate,
    ) -> Result<Self, Error> {
        let table = layout.locate(element)?;

        let dates = table
            .date_cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                let fragments: Vec<&str> = text_fragments(*cell).collect();
                parse_header_date(&fragments, today).map_err(|reason| {
                    let position = CellPosition {
                        row: 0,
                        column: column + 1,
                        restaurant: None,
                    };
                    Error::schedule_data_error(position, &fragments.join(" "), &reason)
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let schedules = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| Schedule::from_located_row(row, i + 1, &dates))
            .collect::<Result<_, Error>>()?;

        Ok(Self { schedules })
    }

    /// Downloads the hours page and extracts its schedules.
    pub async fn load(client: &reqwest::Client, url: &Url, today: NaiveDate) -> crate::Result<Self> {
        let page = hours_page(client, url).await?;
        let start = std::time::Instant::now();
        let schedules = Self {
            schedules: extract(&page, today)?,
        };
        log::debug!(
            "Parsed {} schedules in \t {:?}",
            schedules.len(),
            start.elapsed()
        );
        Ok(schedules)
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    pub fn into_inner(self) -> Vec<Schedule> {
        self.schedules
    }
}

/// Reads every restaurant schedule out of the raw markup of the hours page.
/// `today` decides which year the month/day headers belong to.
pub fn extract(page_html: &str, today: NaiveDate) -> Result<Vec<Schedule>, Error> {
    let document = Html::parse_document(page_html);
    Schedules::from_html_element(document.root_element(), today).map(Schedules::into_inner)
}
