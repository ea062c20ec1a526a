//! Report rendering for upload.
//!
//! The payload is a JSON array of `{ts, values: {distance, speed, rsrp}}`
//! objects, one per measurement record, with the signal power queried once
//! per report and repeated in every entry.

use serde::Serialize;

use crate::log::MeasurementRecord;

#[derive(Serialize)]
struct ReportEntry<'a> {
    ts: u64,
    values: ReportValues<'a>,
}

#[derive(Serialize)]
struct ReportValues<'a> {
    distance: u16,
    speed: u16,
    rsrp: &'a str,
}

/// Render the drained records into the upload payload.
pub fn render(records: &[MeasurementRecord], rsrp: &str) -> String {
    let entries: Vec<ReportEntry<'_>> = records
        .iter()
        .map(|rec| ReportEntry {
            ts: rec.timestamp_ms,
            values: ReportValues {
                distance: rec.distance,
                speed: rec.speed,
                rsrp,
            },
        })
        .collect();
    // Serialization of these plain structs cannot fail; fall back to an
    // empty report rather than poisoning the upload path.
    serde_json::to_string(&entries).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "report serialization failed");
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_entries_in_record_order() {
        let records = [
            MeasurementRecord {
                timestamp_ms: 1000,
                distance: 150,
                speed: 12,
            },
            MeasurementRecord {
                timestamp_ms: 2000,
                distance: 1,
                speed: 1,
            },
        ];
        let json = render(&records, "-97dbm");
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 2);
        assert_eq!(v[0]["ts"], 1000);
        assert_eq!(v[0]["values"]["distance"], 150);
        assert_eq!(v[0]["values"]["speed"], 12);
        assert_eq!(v[0]["values"]["rsrp"], "-97dbm");
        assert_eq!(v[1]["values"]["distance"], 1);
    }

    #[test]
    fn empty_log_renders_empty_array() {
        assert_eq!(render(&[], "-97dbm"), "[]");
    }
}
