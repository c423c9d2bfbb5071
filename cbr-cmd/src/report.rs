//! Survey-table and profile writers: CSV (UTF-8 with BOM for the survey
//! export, so spreadsheet tools pick up the encoding) and an HTML table for
//! print-to-PDF.

use anyhow::Context;
use cbr_data::profile::ProfilePoint;
use chrono::Local;

/// UTF-8 byte-order mark prepended to survey CSV files.
const UTF8_BOM: &str = "\u{FEFF}";

const COLUMNS: [&str; 8] = [
    "No.",
    "Location",
    "Z (m)",
    "BOD5 sample 1",
    "BOD5 sample 0",
    "NH4+ sample 1",
    "NH4+ sample 0",
    "NO3- sample 1",
];

fn value_row(index: usize, point: &ProfilePoint) -> Vec<String> {
    let c = &point.concentrations;
    vec![
        (index + 1).to_string(),
        point
            .label
            .clone()
            .unwrap_or_else(|| format!("{:.0}", point.position)),
        format!("{:.0}", point.position),
        format!("{:.2}", c.bod5_a),
        format!("{:.2}", c.bod5_b),
        format!("{:.2}", c.nh4_a),
        format!("{:.2}", c.nh4_b),
        format!("{:.2}", c.no3),
    ]
}

/// Render the survey table as CSV: a two-line preamble (title, then the
/// rainfall/temperature header, which contains a comma and therefore gets
/// quoted), a blank line, the column header, one row per position.
pub fn survey_csv(points: &[ProfilePoint], rainfall: f64, temperature: f64) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(["Cau Bay river water quality results"])?;
    writer.write_record([format!(
        "Rainfall (X): {rainfall} mm/hr, Temperature (Y): {temperature} C"
    )])?;
    writer.write_record([""])?;
    writer.write_record(COLUMNS)?;
    for (i, point) in points.iter().enumerate() {
        writer.write_record(value_row(i, point))?;
    }

    let bytes = writer.into_inner().context("flushing survey CSV")?;
    Ok(String::from_utf8(bytes)?)
}

/// The survey CSV with the UTF-8 BOM prepended, ready to write to disk.
pub fn survey_csv_with_bom(
    points: &[ProfilePoint],
    rainfall: f64,
    temperature: f64,
) -> anyhow::Result<String> {
    Ok(format!("{UTF8_BOM}{}", survey_csv(points, rainfall, temperature)?))
}

/// Render the survey table as a standalone HTML page for print-to-PDF.
pub fn survey_html(points: &[ProfilePoint], rainfall: f64, temperature: f64) -> String {
    let mut rows = String::new();
    for (i, point) in points.iter().enumerate() {
        rows.push_str("      <tr>");
        for cell in value_row(i, point) {
            rows.push_str(&format!("<td>{cell}</td>"));
        }
        rows.push_str("</tr>\n");
    }

    let header_cells: String = COLUMNS.iter().map(|c| format!("<th>{c}</th>")).collect();
    format!(
        r#"<html>
  <head>
    <title>Cau Bay river water quality results</title>
    <style>
      body {{ font-family: Arial, sans-serif; margin: 20px; }}
      h1 {{ text-align: center; }}
      .info {{ text-align: center; color: #666; }}
      table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
      th, td {{ border: 1px solid #ddd; padding: 6px; text-align: center; }}
      th {{ background-color: #f2f2f2; }}
    </style>
  </head>
  <body>
    <h1>Cau Bay river water quality results</h1>
    <div class="info">
      <p>Rainfall (X): {rainfall} mm/hr | Temperature (Y): {temperature} C</p>
      <p>Positions: {count} | Generated: {generated}</p>
    </div>
    <table>
      <thead><tr>{header_cells}</tr></thead>
      <tbody>
{rows}      </tbody>
    </table>
  </body>
</html>
"#,
        count = points.len(),
        generated = Local::now().format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Render a chart/heatmap profile as plain CSV: position plus the five
/// concentration columns.
pub fn profile_csv(points: &[ProfilePoint]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "position_m",
        "bod5_sample1",
        "bod5_sample0",
        "nh4_sample1",
        "nh4_sample0",
        "no3_sample1",
    ])?;
    for point in points {
        let c = &point.concentrations;
        writer.write_record([
            format!("{}", point.position),
            format!("{:.2}", c.bod5_a),
            format!("{:.2}", c.bod5_b),
            format!("{:.2}", c.nh4_a),
            format!("{:.2}", c.nh4_b),
            format!("{:.2}", c.no3),
        ])?;
    }
    let bytes = writer.into_inner().context("flushing profile CSV")?;
    Ok(String::from_utf8(bytes)?)
}
