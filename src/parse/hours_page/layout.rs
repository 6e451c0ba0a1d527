use scraper::ElementRef;

use crate::parse::{static_selector::StaticSelector, Error};

/// Describes the markup of the hours table. Every structural assumption the extractor
/// makes about the page lives here, so a redesign of the page only touches this file.
#[derive(Debug)]
pub struct TableLayout {
    pub version: u32,
    pub table: StaticSelector<'static>,
    /// Relative to the table.
    pub header_row: StaticSelector<'static>,
    /// Relative to the header row.
    pub date_cell: StaticSelector<'static>,
    /// Relative to the table. Rows of the first style come before rows of the second style.
    pub row_styles: [StaticSelector<'static>; 2],
    /// Relative to a row. The restaurant name is its only text.
    pub name_cell: StaticSelector<'static>,
    /// Relative to a row. One per date column.
    pub time_cell: StaticSelector<'static>,
}

/// The table layout used by the Duke dining menus & hours page.
pub static DUKE_DINING_V1: TableLayout = TableLayout {
    version: 1,
    table: StaticSelector::new("[id=schedule_table]"),
    header_row: StaticSelector::new("[id=schedule_header_row]"),
    date_cell: StaticSelector::new("[id=schedule_time_data]"),
    row_styles: [
        StaticSelector::new("[id=schedule_zebra_row]"),
        StaticSelector::new("[id=schedule_no_zebra_row]"),
    ],
    name_cell: StaticSelector::new("[id=schedule_place_data] a"),
    time_cell: StaticSelector::new("[id=schedule_time_data]"),
};

/// The elements of an hours table after it has been checked against a [`TableLayout`].
#[derive(Debug)]
pub struct LocatedTable<'a> {
    pub date_cells: Vec<ElementRef<'a>>,
    pub rows: Vec<LocatedRow<'a>>,
}

#[derive(Debug)]
pub struct LocatedRow<'a> {
    pub name_cell: ElementRef<'a>,
    /// Same length and order as [`LocatedTable::date_cells`].
    pub time_cells: Vec<ElementRef<'a>>,
}

impl TableLayout {
    /// Finds the table inside `element` and checks it has the shape this layout describes.
    pub fn locate<'a>(&self, element: ElementRef<'a>) -> Result<LocatedTable<'a>, Error> {
        let table = element.select(&self.table).next().ok_or_else(|| {
            self.structure_error(&format!("no table matching `{}`", self.table.as_str()))
        })?;

        let header = table.select(&self.header_row).next().ok_or_else(|| {
            self.structure_error(&format!(
                "no header row matching `{}`",
                self.header_row.as_str()
            ))
        })?;
        let date_cells: Vec<_> = header.select(&self.date_cell).collect();
        if date_cells.is_empty() {
            return Err(self.structure_error("the header row has no date cells"));
        }

        let mut rows = Vec::new();
        for style in &self.row_styles {
            for row in table.select(style) {
                rows.push(self.locate_row(row, rows.len() + 1, date_cells.len())?);
            }
        }

        Ok(LocatedTable { date_cells, rows })
    }

    fn locate_row<'a>(
        &self,
        row: ElementRef<'a>,
        row_number: usize,
        column_count: usize,
    ) -> Result<LocatedRow<'a>, Error> {
        let name_cell = row.select(&self.name_cell).next().ok_or_else(|| {
            self.structure_error(&format!("row {row_number} has no restaurant name cell"))
        })?;
        let time_cells: Vec<_> = row.select(&self.time_cell).collect();
        if time_cells.len() != column_count {
            return Err(self.structure_error(&format!(
                "row {row_number} has {} time cells but the header lists {column_count} dates",
                time_cells.len()
            )));
        }
        Ok(LocatedRow {
            name_cell,
            time_cells,
        })
    }

    fn structure_error(&self, msg: &str) -> Error {
        Error::HtmlParse(format!("hours table layout v{}: {msg}", self.version))
    }
}
