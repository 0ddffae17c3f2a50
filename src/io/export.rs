//! CSV export for financial projections.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::projection::FinancialProjection;

/// Column header for the yearly CSV export.
const HEADER: &str = "year,production_kwh,self_consumed_kwh,surplus_kwh,\
                      self_consumption_savings,resale_revenue,subscription_cost,\
                      battery_service_cost,total_gain,cumulative_gain";

/// Exports the yearly rows of a projection to a CSV file at the given path.
///
/// Writes a header row followed by one data row per projected year.
/// Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `projection` - Complete financial projection
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(projection: &FinancialProjection, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(projection, buf)
}

/// Writes the yearly rows of a projection as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(projection: &FinancialProjection, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let cumulative = projection.cumulative_gains();
    for (y, cumulative_gain) in projection.yearly.iter().zip(cumulative) {
        wtr.write_record(&[
            y.year.to_string(),
            format!("{:.2}", y.production_kwh),
            format!("{:.2}", y.self_consumed_kwh),
            format!("{:.2}", y.surplus_kwh),
            format!("{:.2}", y.self_consumption_savings),
            format!("{:.2}", y.resale_revenue),
            format!("{:.2}", y.subscription_cost),
            format!("{:.2}", y.battery_service_cost),
            format!("{:.2}", y.total_gain),
            format!("{cumulative_gain:.2}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceCatalog;
    use crate::projection::{FinancialParameters, Projector, QuoteRequest};

    fn projection() -> FinancialProjection {
        let catalog = PriceCatalog::default();
        let request = QuoteRequest {
            parameters: FinancialParameters::default(),
            base_production_kwh: 5000.0,
            peak_power_kwc: 6.0,
            micro_inverters: false,
        };
        Projector::new(&catalog)
            .project(&request)
            .expect("6 kWc is in the catalog")
    }

    fn render(projection: &FinancialProjection) -> String {
        let mut buf = Vec::new();
        write_csv(projection, &mut buf).expect("writing to a Vec cannot fail");
        String::from_utf8(buf).expect("csv output is utf-8")
    }

    #[test]
    fn header_lists_yearly_columns() {
        let output = render(&projection());
        assert_eq!(
            output.lines().next(),
            Some(
                "year,production_kwh,self_consumed_kwh,surplus_kwh,\
                 self_consumption_savings,resale_revenue,subscription_cost,\
                 battery_service_cost,total_gain,cumulative_gain"
            )
        );
    }

    #[test]
    fn one_row_per_year() {
        let output = render(&projection());
        // 1 header + 30 years
        assert_eq!(output.lines().count(), 31);
    }

    #[test]
    fn deterministic_output() {
        let p = projection();
        assert_eq!(render(&p), render(&p));
    }

    #[test]
    fn last_cumulative_matches_total_gain() {
        let p = projection();
        let buf = render(&p);
        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_bytes());
        let last = rdr
            .records()
            .filter_map(Result::ok)
            .last()
            .expect("at least one row");
        assert_eq!(&last[0], "30");
        let cumulative: f64 = last[9].parse().expect("numeric column");
        assert!((cumulative - p.totals.total_gain).abs() < 0.01);
    }
}
