use chrono::{NaiveDate, NaiveDateTime};
use juniper::{graphql_object, GraphQLInputObject};

use super::availability::Availability;
use super::layout::LocatedRow;
use crate::parse::error::CellPosition;
use crate::parse::remove_excess_whitespace;
use crate::parse::text_from_selection::{get_inner_text, own_text_fragments, text_fragments};
use crate::parse::Error;

/// A restaurant and every window it is open across the dates listed on the page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Schedule {
    name: String,
    availabilities: Vec<Availability>,
}

#[derive(GraphQLInputObject, Debug)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

#[graphql_object]
impl Schedule {
    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(clippy::needless_pass_by_value)] // ignored because graphql doesn't support pass by reference
    pub fn availabilities(&self, date_range: Option<DateRange>) -> Vec<&Availability> {
        if let Some(DateRange { start, end }) = date_range {
            self.availabilities
                .iter()
                .filter(|x| {
                    let mut incl = true;
                    incl &= start.map_or(true, |start_date| x.date() >= start_date);
                    incl &= end.map_or(true, |end_date| x.date() <= end_date);
                    incl
                })
                .collect()
        } else {
            self.availabilities.iter().collect()
        }
    }

    pub fn is_open_at(&self, time: NaiveDateTime) -> bool {
        self.availabilities.iter().any(|x| x.contains(time))
    }
}

impl Schedule {
    /// `row_number` is 1-based and only used to point at the offending cell in errors.
    pub(super) fn from_located_row(
        row: &LocatedRow<'_>,
        row_number: usize,
        dates: &[NaiveDate],
    ) -> Result<Self, Error> {
        let name = get_inner_text(row.name_cell, "restaurant name")?;
        let name = remove_excess_whitespace(name).into_owned();

        let mut availabilities = Vec::with_capacity(dates.len());
        for (column, (cell, date)) in row.time_cells.iter().zip(dates).enumerate() {
            let fragments: Vec<&str> = own_text_fragments(*cell).collect();
            let parsed = if fragments.is_empty() && text_fragments(*cell).next().is_some() {
                // hours wrapped in a tag would otherwise read as a day without data
                Err("the cell's text is nested inside another tag".to_string())
            } else {
                Availability::from_cell_text(fragments, *date)
            };
            let cell_availabilities = parsed.map_err(|reason| {
                let position = CellPosition {
                    row: row_number,
                    column: column + 1,
                    restaurant: Some(name.clone()),
                };
                Error::schedule_data_error(position, &cell.text().collect::<String>(), &reason)
            })?;
            availabilities.extend(cell_availabilities);
        }

        Ok(Self {
            name,
            availabilities,
        })
    }

    #[cfg(test)]
    pub fn availability_list(&self) -> &[Availability] {
        &self.availabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::hours_page::layout::DUKE_DINING_V1;
    use juniper::{EmptyMutation, EmptySubscription, RootNode};
    use scraper::Html;
    use serde_json::json;

    const ROW: &str = r#"
        <table id="schedule_table">
            <tr id="schedule_header_row">
                <td id="schedule_time_data">Monday<br>September 9</td>
                <td id="schedule_time_data">Tuesday<br>September 10</td>
            </tr>
            <tr id="schedule_zebra_row">
                <td id="schedule_place_data"><a> Cafe
                    Edens </a></td>
                <td id="schedule_time_data">7:30am-10:30am<br>5:00pm-1:00am</td>
                <td id="schedule_time_data">Closed</td>
            </tr>
        </table>"#;

    fn dates() -> [NaiveDate; 2] {
        [
            NaiveDate::from_ymd_opt(2024, 9, 9).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 10).unwrap(),
        ]
    }

    fn schedule_from(html: &str) -> Result<Schedule, Error> {
        let document = Html::parse_document(html);
        let table = DUKE_DINING_V1.locate(document.root_element()).unwrap();
        Schedule::from_located_row(&table.rows[0], 1, &dates())
    }

    #[test]
    fn test_from_located_row() {
        let schedule = schedule_from(ROW).unwrap();
        assert_eq!(schedule.name, "Cafe Edens");
        let availabilities = schedule.availability_list();
        assert_eq!(availabilities.len(), 3);
        assert_eq!(availabilities[0].date(), dates()[0]);
        assert_eq!(availabilities[1].date(), dates()[0]);
        assert_eq!(availabilities[2], Availability::closed(dates()[1]));
        assert!(schedule.is_open_at(dates()[1].and_hms_opt(0, 30, 0).unwrap()));
        assert!(!schedule.is_open_at(dates()[1].and_hms_opt(12, 0, 0).unwrap()));
    }

    #[test]
    fn test_bad_time_points_at_cell() {
        let html = ROW.replace("5:00pm-1:00am", "5pm-1am");
        let err = schedule_from(&html).unwrap_err();
        match err {
            Error::ScheduleData { position, text, .. } => {
                assert_eq!(position.row, 1);
                assert_eq!(position.column, 1);
                assert_eq!(position.restaurant.as_deref(), Some("Cafe Edens"));
                assert!(text.contains("5pm-1am"));
            }
            other => panic!("expected a schedule data error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_hours_are_not_closed() {
        let html = ROW.replace("<td id=\"schedule_time_data\">Closed</td>", "<td id=\"schedule_time_data\"><strong>11:00am-2:00pm</strong></td>");
        let err = schedule_from(&html).unwrap_err();
        assert!(matches!(
            err,
            Error::ScheduleData { position: CellPosition { row: 1, column: 2, .. }, .. }
        ));

        // notes beside the hours are still skipped
        let html = ROW.replace("<td id=\"schedule_time_data\">Closed</td>", "<td id=\"schedule_time_data\">11:00am-2:00pm<br><em>brunch</em></td>");
        let schedule = schedule_from(&html).unwrap();
        assert_eq!(schedule.availability_list().len(), 3);
        assert!(!schedule.availability_list()[2].is_closed());

        let html = ROW.replace("<td id=\"schedule_time_data\">Closed</td>", "<td id=\"schedule_time_data\"><br></td>");
        let schedule = schedule_from(&html).unwrap();
        assert_eq!(schedule.availability_list()[2], Availability::closed(dates()[1]));
    }

    #[tokio::test]
    async fn test_schema() {
        let schedule = schedule_from(ROW).unwrap();
        let schema = RootNode::new(
            schedule,
            EmptyMutation::<()>::new(),
            EmptySubscription::<()>::new(),
        );
        let query = r#"
            {
                name
                isOpenAt(time: "2024-09-09 08:00:00")
                availabilities(dateRange: {start: "2024-09-10"}) {
                    date
                    opensAt
                    closesAt
                    isClosed
                }
            }
        "#;
        let binding = juniper::Variables::default();
        let res = juniper::execute(query, None, &schema, &binding, &())
            .await
            .unwrap()
            .0;
        assert_eq!(
            serde_json::to_value(res).expect("json should be valid"),
            json!({
                "name": "Cafe Edens",
                "isOpenAt": true,
                "availabilities": [
                    {
                        "date": "2024-09-10",
                        "opensAt": null,
                        "closesAt": null,
                        "isClosed": true
                    }
                ]
            })
        );
    }
}
