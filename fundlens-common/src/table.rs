//! Display-ready table rendering
//!
//! Turns a computed report into the structure the interactive front-end
//! tables consume: a caption, an ordered column set, and rows as JSON
//! objects. Numeric formatting is left to the client.

use crate::criteria::Criteria;
use crate::reports::{Report, TableType};
use serde::Serialize;
use serde_json::Value;

/// One table column
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    /// Row object key this column reads
    pub key: String,
    /// Human-readable header
    pub label: String,
}

/// Display-ready table structure
#[derive(Debug, Serialize)]
pub struct DataTable {
    pub table_type: String,
    pub caption: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Value>,
}

fn column(key: &str, label: &str) -> Column {
    Column {
        key: key.to_string(),
        label: label.to_string(),
    }
}

/// Render a report as a display-ready table
pub fn render_table(report: &Report, criteria: &Criteria) -> DataTable {
    let table_type = report.table_type();

    let columns = match report {
        Report::SingleThinkTank(_) => vec![
            column("donor_name", "Donor"),
            column("donor_type", "Donor Type"),
            column("amount_calc", "Amount"),
            column("source", "Source"),
        ],
        Report::SingleDonor(_) => vec![
            column("think_tank_name", "Think Tank"),
            column("donor_type", "Donor Type"),
            column("amount_calc", "Amount"),
            column("source", "Source"),
        ],
        Report::ThinkTankArchive(rows) => {
            let mut columns = vec![column("think_tank_name", "Think Tank")];
            // Every row carries the unioned donor type keys; read them off
            // the first row
            if let Some(first) = rows.first() {
                for type_name in first.donor_types.keys() {
                    columns.push(Column {
                        key: format!("donor_types.{}", type_name),
                        label: type_name.clone(),
                    });
                }
            }
            columns.push(column("transparency_score", "Transparency Score"));
            columns
        }
        Report::DonorArchive(_) => vec![
            column("donor_name", "Donor"),
            column("donor_type", "Donor Type"),
            column("year", "Year"),
            column("amount_calc", "Amount"),
        ],
        Report::TopTen(_) => vec![
            column("think_tank_name", "Think Tank"),
            column("amount_calc", "Amount"),
        ],
    };

    let caption = caption_for(table_type, criteria);

    let rows = match serde_json::to_value(report) {
        Ok(Value::Array(rows)) => rows,
        _ => Vec::new(),
    };

    DataTable {
        table_type: table_type.as_str().to_string(),
        caption,
        columns,
        rows,
    }
}

fn caption_for(table_type: TableType, criteria: &Criteria) -> String {
    let year_suffix = criteria
        .donation_year
        .as_deref()
        .map(|y| format!(" in {}", y))
        .unwrap_or_default();

    match table_type {
        TableType::SingleThinkTank => match &criteria.think_tank {
            Some(slug) => format!("Donations to {}{}", slug, year_suffix),
            None => format!("Donations by donor{}", year_suffix),
        },
        TableType::SingleDonor => match &criteria.donor {
            Some(slug) => format!("Donations from {}{}", slug, year_suffix),
            None => format!("Donations by think tank{}", year_suffix),
        },
        TableType::ThinkTankArchive => format!("Think tank funding by donor type{}", year_suffix),
        TableType::DonorArchive => format!("Donor totals{}", year_suffix),
        TableType::TopTen => format!("Top think tanks by funding{}", year_suffix),
    }
}
