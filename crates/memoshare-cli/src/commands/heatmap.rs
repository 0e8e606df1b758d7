use std::fmt::Write as _;

use chrono::Local;
use memoshare_core::client::HttpConnector;
use memoshare_core::credentials::CredentialSource;
use memoshare_core::usage::{initial_matrix_at, refresh_usage_matrix, DailyUsageStat, UsageWindow};

use crate::error::CliError;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub async fn run_heatmap<C: CredentialSource>(
    source: &C,
    weeks: u32,
    json: bool,
) -> Result<(), CliError> {
    let window = UsageWindow::weeks(weeks);
    let matrix = if let Some(matrix) =
        refresh_usage_matrix(source, &HttpConnector::default(), window).await?
    {
        matrix
    } else {
        eprintln!("No memos host configured; showing an empty heatmap.");
        initial_matrix_at(Local::now().date_naive(), window)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
    } else {
        print!("{}", render_heatmap(&matrix));
    }
    Ok(())
}

/// One glyph per activity level.
pub const fn intensity_glyph(count: u32) -> char {
    match count {
        0 => '·',
        1 => '░',
        2..=3 => '▒',
        4..=5 => '▓',
        _ => '█',
    }
}

/// Render a Sunday-aligned matrix as weekday rows by week columns.
pub fn render_heatmap(matrix: &[DailyUsageStat]) -> String {
    let mut output = String::new();
    let (Some(first), Some(last)) = (matrix.first(), matrix.last()) else {
        return output;
    };

    let total: u32 = matrix.iter().map(|stat| stat.count).sum();
    let _ = writeln!(
        output,
        "{total} memo(s) from {} to {}",
        first.date, last.date
    );

    let columns = matrix.len().div_ceil(7);
    for (row, label) in WEEKDAY_LABELS.iter().enumerate() {
        output.push_str(label);
        output.push(' ');
        for column in 0..columns {
            let glyph = matrix
                .get(column * 7 + row)
                .map_or(' ', |stat| intensity_glyph(stat.count));
            output.push(glyph);
        }
        let trimmed = output.trim_end_matches(' ').len();
        output.truncate(trimmed);
        output.push('\n');
    }
    output
}
