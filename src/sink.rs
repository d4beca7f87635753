use std::fs;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::scraper::RunState;

/// Flush a completed run to disk: one CSV of event rows and one JSON array
/// per failure list. Always called exactly once, even for an empty run.
pub fn write_outputs(state: &RunState, cfg: &Config) -> Result<()> {
    write_rows_csv(state, &cfg.csv_path)?;
    write_failed_urls(&state.failed_archive_urls, &cfg.failed_archive_path)?;
    write_failed_urls(&state.failed_detail_urls, &cfg.failed_detail_path)?;

    info!("wrote {} event rows to {}", state.rows.len(), cfg.csv_path);
    info!(
        "failed archive URLs: {} ({})",
        state.failed_archive_urls.len(),
        cfg.failed_archive_path
    );
    info!(
        "failed detail URLs: {} ({})",
        state.failed_detail_urls.len(),
        cfg.failed_detail_path
    );
    Ok(())
}

const CSV_HEADER: [&str; 7] = [
    "jackpotId",
    "eventNumber",
    "kickoffTime",
    "competitorHome",
    "competitorAway",
    "resultPick",
    "score",
];

fn write_rows_csv(state: &RunState, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    // serialize() emits the header before the first row; an empty run needs
    // it written explicitly so the output is still a well-formed table.
    if state.rows.is_empty() {
        writer.write_record(CSV_HEADER)?;
    }
    for row in &state.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_failed_urls(urls: &[String], path: &str) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(urls)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JackpotEventRecord;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            base_url: "http://test".to_string(),
            log_level: "info".to_string(),
            start_year: 2023,
            end_year: 2023,
            start_month: 3,
            end_month: 3,
            http_timeout_secs: 30,
            csv_path: dir.join("rows.csv").to_string_lossy().into_owned(),
            failed_archive_path: dir.join("fa.json").to_string_lossy().into_owned(),
            failed_detail_path: dir.join("fd.json").to_string_lossy().into_owned(),
        }
    }

    #[test]
    fn writes_rows_and_failure_lists() {
        let dir = std::env::temp_dir().join("jackpot-sink-test-full");
        fs::create_dir_all(&dir).unwrap();
        let cfg = test_config(&dir);

        let mut state = RunState::default();
        state.rows.push(JackpotEventRecord {
            jackpot_id: "A1".to_string(),
            event_number: 1,
            kickoff_time: "t".to_string(),
            competitor_home: "H".to_string(),
            competitor_away: "W".to_string(),
            result_pick: String::new(),
            score: "1:1".to_string(),
        });
        state
            .failed_detail_urls
            .push("http://test/api/jackpots/history/A2/details".to_string());

        write_outputs(&state, &cfg).unwrap();

        let csv = fs::read_to_string(&cfg.csv_path).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "jackpotId,eventNumber,kickoffTime,competitorHome,competitorAway,resultPick,score"
        );
        assert_eq!(lines.next().unwrap(), "A1,1,t,H,W,,1:1");

        let fa: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&cfg.failed_archive_path).unwrap()).unwrap();
        assert!(fa.is_empty());
        let fd: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&cfg.failed_detail_path).unwrap()).unwrap();
        assert_eq!(fd.len(), 1);
    }

    #[test]
    fn empty_run_still_produces_valid_outputs() {
        let dir = std::env::temp_dir().join("jackpot-sink-test-empty");
        fs::create_dir_all(&dir).unwrap();
        let cfg = test_config(&dir);

        write_outputs(&RunState::default(), &cfg).unwrap();

        let fa: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&cfg.failed_archive_path).unwrap()).unwrap();
        assert!(fa.is_empty());

        let csv = fs::read_to_string(&cfg.csv_path).unwrap();
        assert_eq!(
            csv.trim_end(),
            "jackpotId,eventNumber,kickoffTime,competitorHome,competitorAway,resultPick,score"
        );
    }
}
