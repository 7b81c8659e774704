use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, settings::Style, Table};

use super::{cell, columns, row_cells, Shape};

/// Render the output as terminal tables.
pub fn print_table(value: &Value) {
    match Shape::of(value) {
        Some(Shape::Envelope {
            result,
            rows,
            warnings,
            methodology,
        }) => {
            let skip = rows.map(|(key, _)| key);
            println!("{}", fields_table(result, skip));
            if let Some((key, rows)) = rows {
                println!("\n{}", key.bold());
                println!("{}", rows_table(rows));
            }
            for w in warnings {
                println!("{} {}", "warning:".yellow(), w);
            }
            if let Some(m) = methodology {
                println!("{} {}", "methodology:".dimmed(), m);
            }
        }
        Some(Shape::Fields(map)) => println!("{}", fields_table(map, None)),
        Some(Shape::Rows(rows)) => println!("{}", rows_table(rows)),
        None => println!("{value}"),
    }
}

fn fields_table(map: &Map<String, Value>, skip: Option<&str>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["field", "value"]);
    for (key, val) in map.iter().filter(|(k, _)| Some(k.as_str()) != skip) {
        builder.push_record([key.clone(), cell(val)]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

fn rows_table(rows: &[Value]) -> Table {
    let cols = columns(rows);
    let mut builder = Builder::default();
    builder.push_record(cols.iter().copied());
    for row in rows {
        builder.push_record(row_cells(row, &cols));
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table
}
