use serde::Serialize;

/// One row per match within a jackpot round, flattened from the detail
/// response. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JackpotEventRecord {
    pub jackpot_id: String,
    pub event_number: i64,
    pub kickoff_time: String,
    pub competitor_home: String,
    pub competitor_away: String,
    pub result_pick: String,
    pub score: String,
}

/// Flatten a detail response's `events` array into rows for one jackpot.
/// `resultPick` and `score` default to empty when absent; events missing any
/// mandatory field are dropped rather than aborting the round.
pub fn flatten_events(jackpot_id: &str, events: &[serde_json::Value]) -> Vec<JackpotEventRecord> {
    events
        .iter()
        .filter_map(|event| {
            let event_number = event.get("eventNumber").and_then(|n| n.as_i64())?;
            let kickoff_time = json_str(event, "kickoffTime")?;
            let competitor_home = json_str(event, "competitorHome")?;
            let competitor_away = json_str(event, "competitorAway")?;

            Some(JackpotEventRecord {
                jackpot_id: jackpot_id.to_string(),
                event_number,
                kickoff_time,
                competitor_home,
                competitor_away,
                result_pick: json_str(event, "resultPick").unwrap_or_default(),
                score: json_str(event, "score").unwrap_or_default(),
            })
        })
        .collect()
}

fn json_str(v: &serde_json::Value, key: &str) -> Option<String> {
    v.get(key).and_then(|s| s.as_str()).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_with_defaults() {
        let events = vec![json!({
            "eventNumber": 1,
            "kickoffTime": "t",
            "competitorHome": "H",
            "competitorAway": "W",
        })];
        let rows = flatten_events("A1", &events);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].jackpot_id, "A1");
        assert_eq!(rows[0].event_number, 1);
        assert_eq!(rows[0].result_pick, "");
        assert_eq!(rows[0].score, "");
    }

    #[test]
    fn keeps_optional_fields_when_present() {
        let events = vec![json!({
            "eventNumber": 7,
            "kickoffTime": "2023-03-04T15:00:00Z",
            "competitorHome": "Gor Mahia",
            "competitorAway": "AFC Leopards",
            "resultPick": "1",
            "score": "2:0",
        })];
        let rows = flatten_events("J9", &events);
        assert_eq!(rows[0].result_pick, "1");
        assert_eq!(rows[0].score, "2:0");
    }

    #[test]
    fn drops_events_missing_mandatory_fields() {
        let events = vec![
            json!({"eventNumber": 1, "kickoffTime": "t", "competitorHome": "H"}),
            json!({
                "eventNumber": 2,
                "kickoffTime": "t",
                "competitorHome": "H",
                "competitorAway": "W",
            }),
        ];
        let rows = flatten_events("A1", &events);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_number, 2);
    }
}
