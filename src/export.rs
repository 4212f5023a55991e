use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::experiment::ExperimentReport;

/// Write a flat numeric series as CSV, one `index,value` row per entry.
pub fn export_series_csv(values: &[f32], name: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "episode,{}", name)?;
    for (i, value) in values.iter().enumerate() {
        writeln!(file, "{},{}", i, value)?;
    }
    Ok(())
}

/// Persist an experiment's outputs under `dir`: per-run cumulative reward
/// and training loss arrays, the across-run reward average, and the full
/// report as JSON.
pub fn export_report(report: &ExperimentReport, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    for (i, run) in report.runs.iter().enumerate() {
        export_series_csv(
            &run.rewards,
            "cumulative_reward",
            &dir.join(format!("cumulative_reward_run{}.csv", i)),
        )?;
        export_series_csv(
            &run.losses,
            "value_function_loss",
            &dir.join(format!("value_function_loss_run{}.csv", i)),
        )?;
    }

    export_series_csv(
        &report.average_rewards,
        "average_cumulative_reward",
        &dir.join("average_cumulative_reward.csv"),
    )?;

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(dir.join("report.json"), json)?;

    Ok(())
}
