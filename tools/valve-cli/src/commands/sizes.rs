//! Size ordering command.

use anyhow::Result;
use serde::Serialize;
use valve_catalog::catalog::{format_size, parse_size, sort_sizes};

use super::SizesArgs;
use crate::context::Context;

#[derive(Serialize)]
struct SizeRow {
    label: String,
    display: String,
    value: Option<f64>,
}

/// Run the sizes command.
pub async fn run(args: SizesArgs, ctx: &Context) -> Result<()> {
    let rows: Vec<SizeRow> = sort_sizes(&args.labels)
        .into_iter()
        .map(|label| SizeRow {
            display: format_size(&label),
            value: parse_size(&label),
            label,
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    let widths = [12, 12, 10];
    ctx.output.table_row(&["LABEL", "DISPLAY", "VALUE"], &widths);
    for row in &rows {
        let value = row
            .value
            .map(|v| format!("{:.4}", v))
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[row.label.as_str(), row.display.as_str(), value.as_str()],
            &widths,
        );
    }

    let unorderable = rows.iter().filter(|r| r.value.is_none()).count();
    if unorderable > 0 {
        ctx.output.warn(&format!(
            "{} label(s) have no number and were placed last",
            unorderable
        ));
    }

    Ok(())
}
