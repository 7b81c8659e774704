use colored::Colorize;
use serde_json::{Map, Value};
use std::io::{self, Write};

use super::{cell, columns, row_cells, Shape};

/// Write the output as CSV to stdout: the row set when there is one,
/// otherwise `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let written = write_csv(&mut wtr, value).and_then(|_| wtr.flush().map_err(csv::Error::from));
    if let Err(e) = written {
        eprintln!("{}: {}", "output error".red(), e);
    }
}

fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    match Shape::of(value) {
        Some(Shape::Envelope {
            rows: Some((_, rows)),
            ..
        })
        | Some(Shape::Rows(rows)) => write_rows(wtr, rows),
        Some(Shape::Envelope { result, .. }) | Some(Shape::Fields(result)) => {
            write_fields(wtr, result)
        }
        None => wtr.write_record([cell(value)]),
    }
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let cols = columns(rows);
    if cols.is_empty() {
        return Ok(());
    }
    wtr.write_record(&cols)?;
    for row in rows {
        wtr.write_record(row_cells(row, &cols))?;
    }
    Ok(())
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.clone(), cell(val)])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_envelope_with_series_writes_one_line_per_period() {
        let out = json!({
            "result": {
                "final_nominal_value": "1210",
                "series": [
                    {"nominal_value": "1000", "period": 0},
                    {"nominal_value": "1100", "period": 1, "real_value": "1000"},
                ],
            },
            "warnings": [],
            "methodology": "Compound Growth Projection",
        });
        // real_value is only known from the second row on
        assert_eq!(
            render(&out),
            "nominal_value,period,real_value\n1000,0,\n1100,1,1000\n"
        );
    }

    #[test]
    fn test_reference_object_writes_field_value_pairs() {
        let out = json!({"as_of": "2024-01-01", "title": "Auto Loan"});
        assert_eq!(render(&out), "field,value\nas_of,2024-01-01\ntitle,Auto Loan\n");
    }
}
