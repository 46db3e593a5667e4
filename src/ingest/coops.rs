/// NOAA CO-OPS predictions: response parsing and serialisation.
///
/// Decodes datagetter bodies (JSON or CSV) into an `ObservationSet`, and
/// renders an `ObservationSet` back into either wire format. See
/// `fixtures.rs` for annotated examples of both response shapes.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ingest::query::ResponseFormat;
use crate::model::{DataOrigin, Observation, ObservationSet, StationMetadata, TideError};

/// Timestamp layouts accepted for the `t` field / first CSV column.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Column names a CSV payload is canonicalised to, whatever its header says.
pub const CANONICAL_COLUMNS: [&str; 2] = ["datetime", "height"];

/// Header written by `to_csv_payload`.
const WIRE_CSV_HEADER: [&str; 2] = ["time", "prediction"];

// ---------------------------------------------------------------------------
// Serde structures for the JSON envelope
// ---------------------------------------------------------------------------

/// CO-OPS sends coordinates and heights as strings, but numbers turn up in
/// hand-made payloads too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

#[derive(Deserialize)]
struct PredictionsResponse {
    metadata: Option<RawMetadata>,
    predictions: Option<Vec<RawPrediction>>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct RawMetadata {
    id: Option<String>,
    name: Option<String>,
    lat: Option<Scalar>,
    lon: Option<Scalar>,
}

#[derive(Deserialize)]
struct RawPrediction {
    t: Option<String>,
    v: Option<Scalar>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Serialize)]
struct WireResponse<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<WireMetadata<'a>>,
    predictions: Vec<WirePrediction>,
}

#[derive(Serialize)]
struct WireMetadata<'a> {
    id: &'a str,
    name: &'a str,
    lat: String,
    lon: String,
}

#[derive(Serialize)]
struct WirePrediction {
    t: String,
    v: String,
}

// ---------------------------------------------------------------------------
// Row coercion
// ---------------------------------------------------------------------------

/// Why a single payload row was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum RowError {
    /// Timestamp or height absent / blank.
    MissingField(&'static str),
    BadTimestamp(String),
    BadHeight(String),
    /// Parsed, but NaN or infinite.
    NonFinite(String),
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::MissingField(field) => write!(f, "missing {}", field),
            RowError::BadTimestamp(t) => write!(f, "unparseable timestamp '{}'", t),
            RowError::BadHeight(v) => write!(f, "non-numeric height '{}'", v),
            RowError::NonFinite(v) => write!(f, "non-finite height '{}'", v),
        }
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Converts one raw `(timestamp, height)` pair into an `Observation`.
pub fn coerce_row(t: &str, v: &str) -> Result<Observation, RowError> {
    let t = t.trim();
    let v = v.trim();

    if t.is_empty() {
        return Err(RowError::MissingField("timestamp"));
    }
    if v.is_empty() {
        return Err(RowError::MissingField("height"));
    }

    let timestamp = parse_timestamp(t).ok_or_else(|| RowError::BadTimestamp(t.to_string()))?;
    let height_ft: f64 = v.parse().map_err(|_| RowError::BadHeight(v.to_string()))?;

    if !height_ft.is_finite() {
        return Err(RowError::NonFinite(v.to_string()));
    }

    Ok(Observation { timestamp, height_ft })
}

/// Collects coerced rows, logging and counting the ones that fail.
fn collect_rows<I>(rows: I) -> (Vec<Observation>, usize)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut observations = Vec::new();
    let mut skipped = 0;

    for (index, (t, v)) in rows.into_iter().enumerate() {
        match coerce_row(&t, &v) {
            Ok(obs) => observations.push(obs),
            Err(e) => {
                debug!(row = index, reason = %e, "dropping row");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = observations.len(), "dropped rows that failed coercion");
    }

    (observations, skipped)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a body in the declared format.
pub fn parse_payload(body: &str, format: ResponseFormat) -> Result<ObservationSet, TideError> {
    match format {
        ResponseFormat::Json => parse_json(body),
        ResponseFormat::Csv => parse_csv(body),
    }
}

/// Parses a JSON predictions response.
///
/// # Errors
/// - `TideError::Parse`: not a JSON object of the expected shape.
/// - `TideError::Api`: the body is a CO-OPS error envelope.
/// - `TideError::NoData`: `predictions` absent, empty, or every row rejected.
pub fn parse_json(body: &str) -> Result<ObservationSet, TideError> {
    let response: PredictionsResponse = serde_json::from_str(body)
        .map_err(|e| TideError::Parse(format!("JSON deserialization failed: {}", e)))?;

    if let Some(err) = response.error {
        return Err(TideError::Api(err.message));
    }

    let predictions = match response.predictions {
        Some(p) if !p.is_empty() => p,
        Some(_) => return Err(TideError::NoData("predictions array is empty".to_string())),
        None => return Err(TideError::NoData("response has no predictions array".to_string())),
    };

    let rows = predictions.into_iter().map(|p| {
        (
            p.t.unwrap_or_default(),
            p.v.map(|v| v.as_text()).unwrap_or_default(),
        )
    });
    let (observations, skipped_rows) = collect_rows(rows);

    if observations.is_empty() {
        return Err(TideError::NoData(format!(
            "all {} predictions were unusable",
            skipped_rows
        )));
    }

    Ok(ObservationSet {
        metadata: response.metadata.and_then(convert_metadata),
        observations,
        origin: DataOrigin::Live,
        skipped_rows,
    })
}

fn convert_metadata(raw: RawMetadata) -> Option<StationMetadata> {
    let id = raw.id.filter(|id| !id.trim().is_empty())?;
    let latitude = raw.lat.and_then(|s| s.as_text().trim().parse::<f64>().ok());
    let longitude = raw.lon.and_then(|s| s.as_text().trim().parse::<f64>().ok());

    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(StationMetadata {
            id,
            name: raw.name.unwrap_or_default(),
            latitude,
            longitude,
        }),
        _ => {
            warn!(station = %id, "ignoring station metadata with unusable coordinates");
            None
        }
    }
}

/// Parses a CSV predictions response.
///
/// The header row is required but its names are ignored: the first column
/// is read as `datetime`, the second as `height`. Rows with either field
/// missing or unparseable are dropped.
///
/// # Errors
/// - `TideError::Api`: the body is a CO-OPS `Error: ...` line.
/// - `TideError::NoData`: no data rows survive.
pub fn parse_csv(body: &str) -> Result<ObservationSet, TideError> {
    let trimmed = body.trim_start();
    if let Some(message) = trimmed.strip_prefix("Error:") {
        return Err(TideError::Api(message.trim().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(trimmed.as_bytes());

    let headers = reader.headers()?.clone();
    debug!(?headers, canonical = ?CANONICAL_COLUMNS, "CSV header");

    let mut unreadable = 0;
    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => rows.push((
                record.get(0).unwrap_or_default().to_string(),
                record.get(1).unwrap_or_default().to_string(),
            )),
            Err(e) => {
                debug!(error = %e, "skipping unreadable CSV record");
                unreadable += 1;
            }
        }
    }

    let (observations, skipped) = collect_rows(rows);
    let skipped_rows = skipped + unreadable;

    if observations.is_empty() {
        return Err(TideError::NoData(format!(
            "no usable CSV rows ({} dropped)",
            skipped_rows
        )));
    }

    Ok(ObservationSet {
        metadata: None,
        observations,
        origin: DataOrigin::Live,
        skipped_rows,
    })
}

// ---------------------------------------------------------------------------
// Serialisation
// ---------------------------------------------------------------------------

/// Minute resolution like the API, with seconds only when the input had them.
fn wire_timestamp(ts: &NaiveDateTime) -> String {
    if ts.second() == 0 {
        ts.format("%Y-%m-%d %H:%M").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Renders a set as a CO-OPS style JSON body (heights to 3 decimals).
pub fn to_json_payload(set: &ObservationSet) -> Result<String, TideError> {
    let response = WireResponse {
        metadata: set.metadata.as_ref().map(|m| WireMetadata {
            id: &m.id,
            name: &m.name,
            lat: m.latitude.to_string(),
            lon: m.longitude.to_string(),
        }),
        predictions: set
            .observations
            .iter()
            .map(|o| WirePrediction {
                t: wire_timestamp(&o.timestamp),
                v: format!("{:.3}", o.height_ft),
            })
            .collect(),
    };

    serde_json::to_string(&response).map_err(|e| TideError::Parse(format!("JSON serialization failed: {}", e)))
}

/// Renders a set as a CSV body with a `time,prediction` header.
pub fn to_csv_payload(set: &ObservationSet) -> Result<String, TideError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(WIRE_CSV_HEADER)?;
    for obs in &set.observations {
        writer.write_record([wire_timestamp(&obs.timestamp), format!("{:.3}", obs.height_ft)])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TideError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| TideError::Parse(format!("CSV output was not UTF-8: {}", e)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use chrono::NaiveDate;

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    // --- JSON: happy path ---------------------------------------------------

    #[test]
    fn test_parse_two_predictions_values_and_metadata() {
        let set = parse_json(fixture_two_predictions_json()).expect("fixture should parse");

        assert_eq!(set.len(), 2);
        assert_eq!(set.observations[0].timestamp, ts(7, 0));
        assert!((set.observations[0].height_ft - 5.63).abs() < 1e-9);
        assert_eq!(set.observations[1].timestamp, ts(7, 3));
        assert!((set.observations[1].height_ft - 6.88).abs() < 1e-9);
        assert_eq!(set.origin, DataOrigin::Live);
        assert_eq!(set.skipped_rows, 0);

        let meta = set.metadata.expect("metadata block should be kept");
        assert_eq!(meta.id, "8665530");
        assert_eq!(meta.name, "Charleston, Cooper River Entrance");
        assert!((meta.latitude - 32.7808).abs() < 1e-9);
        assert!((meta.longitude + 79.9236).abs() < 1e-9);
    }

    #[test]
    fn test_parse_without_metadata_block() {
        let set = parse_json(fixture_two_day_json()).expect("fixture should parse");
        assert!(set.metadata.is_none());
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let a = parse_json(fixture_two_day_json()).unwrap();
        let b = parse_json(fixture_two_day_json()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_values_and_coordinates_are_accepted() {
        let json = r#"{
          "metadata": { "id": "9414290", "name": "San Francisco", "lat": 37.8063, "lon": -122.4659 },
          "predictions": [ { "t": "2024-09-07 00:00", "v": 4.5 } ]
        }"#;
        let set = parse_json(json).expect("numbers should be accepted");
        assert!((set.observations[0].height_ft - 4.5).abs() < 1e-9);
        assert!(set.metadata.is_some());
    }

    #[test]
    fn test_metadata_with_bad_coordinates_is_dropped_not_fatal() {
        let json = r#"{
          "metadata": { "id": "9414290", "name": "San Francisco", "lat": "north", "lon": "" },
          "predictions": [ { "t": "2024-09-07 00:00", "v": "4.5" } ]
        }"#;
        let set = parse_json(json).expect("data should still parse");
        assert!(set.metadata.is_none());
        assert_eq!(set.len(), 1);
    }

    // --- JSON: error and edge cases -----------------------------------------

    #[test]
    fn test_empty_predictions_is_no_data() {
        let result = parse_json(fixture_empty_predictions_json());
        assert!(matches!(result, Err(TideError::NoData(_))), "got {:?}", result);
    }

    #[test]
    fn test_missing_predictions_is_no_data() {
        let result = parse_json(r#"{ "metadata": { "id": "8665530" } }"#);
        assert!(matches!(result, Err(TideError::NoData(_))), "got {:?}", result);
    }

    #[test]
    fn test_api_error_envelope() {
        match parse_json(fixture_api_error_json()) {
            Err(TideError::Api(msg)) => assert!(msg.contains("No Predictions data")),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(parse_json("{ not json }}}"), Err(TideError::Parse(_))));
        assert!(matches!(parse_json(""), Err(TideError::Parse(_))));
        assert!(matches!(parse_json("[1, 2, 3]"), Err(TideError::Parse(_))));
    }

    #[test]
    fn test_dirty_rows_are_dropped_and_counted() {
        let set = parse_json(fixture_dirty_rows_json()).expect("clean rows should survive");
        assert_eq!(set.len(), 2);
        assert_eq!(set.skipped_rows, 3);
        assert_eq!(set.heights(), vec![5.63, 6.88]);
    }

    #[test]
    fn test_all_rows_bad_is_no_data() {
        let json = r#"{ "predictions": [ { "t": "2024-09-07 00:00", "v": "x" }, { "v": "1.0" } ] }"#;
        assert!(matches!(parse_json(json), Err(TideError::NoData(_))));
    }

    // --- Row coercion -------------------------------------------------------

    #[test]
    fn test_coerce_row_errors_are_typed() {
        assert_eq!(coerce_row("", "1.0"), Err(RowError::MissingField("timestamp")));
        assert_eq!(coerce_row("2024-09-07 00:00", "  "), Err(RowError::MissingField("height")));
        assert!(matches!(coerce_row("yesterday", "1.0"), Err(RowError::BadTimestamp(_))));
        assert!(matches!(coerce_row("2024-09-07 00:00", "high"), Err(RowError::BadHeight(_))));
        assert!(matches!(coerce_row("2024-09-07 00:00", "NaN"), Err(RowError::NonFinite(_))));
        assert!(matches!(coerce_row("2024-09-07 00:00", "inf"), Err(RowError::NonFinite(_))));
    }

    #[test]
    fn test_timestamp_variants() {
        assert_eq!(parse_timestamp("2024-09-07 03:00"), Some(ts(7, 3)));
        assert_eq!(parse_timestamp("2024-09-07 03:00:00"), Some(ts(7, 3)));
        assert_eq!(parse_timestamp("2024-09-07T03:00"), Some(ts(7, 3)));
        assert_eq!(parse_timestamp("2024-09-07T03:00:00"), Some(ts(7, 3)));
        assert_eq!(parse_timestamp("09/07/2024 03:00"), None);
    }

    #[test]
    fn test_negative_heights_are_valid() {
        let obs = coerce_row("2024-09-07 00:00", "-0.42").expect("below-datum tides are real");
        assert!((obs.height_ft + 0.42).abs() < 1e-9);
    }

    // --- CSV ----------------------------------------------------------------

    #[test]
    fn test_parse_csv_reads_positional_columns() {
        let set = parse_csv(fixture_predictions_csv()).expect("CSV fixture should parse");
        assert_eq!(set.len(), 4);
        assert!(set.metadata.is_none());
        assert_eq!(set.observations[3].timestamp, ts(7, 3));
        assert!((set.observations[3].height_ft - 6.88).abs() < 1e-9);
    }

    #[test]
    fn test_parse_csv_drops_non_numeric_height() {
        let set = parse_csv(fixture_bad_height_csv()).expect("two rows should survive");
        assert_eq!(set.heights(), vec![5.63, 6.88]);
        assert_eq!(set.skipped_rows, 1);
    }

    #[test]
    fn test_parse_csv_with_no_usable_rows_is_no_data() {
        assert!(matches!(parse_csv(fixture_header_only_csv()), Err(TideError::NoData(_))));
        assert!(matches!(parse_csv("time,prediction\n"), Err(TideError::NoData(_))));
        assert!(matches!(parse_csv(""), Err(TideError::NoData(_))));
    }

    #[test]
    fn test_parse_csv_error_line() {
        let result = parse_csv("\nError: No data was found. This product may not be offered at this station.\n");
        assert!(matches!(result, Err(TideError::Api(_))), "got {:?}", result);
    }

    #[test]
    fn test_parse_payload_dispatches_on_format() {
        assert_eq!(parse_payload(fixture_two_predictions_json(), ResponseFormat::Json).unwrap().len(), 2);
        assert_eq!(parse_payload(fixture_predictions_csv(), ResponseFormat::Csv).unwrap().len(), 4);
    }

    // --- Serialisation ------------------------------------------------------

    #[test]
    fn test_json_round_trip_preserves_pairs_and_metadata() {
        let original = parse_json(fixture_two_predictions_json()).unwrap();
        let body = to_json_payload(&original).unwrap();
        let reparsed = parse_json(&body).unwrap();

        assert_eq!(reparsed.metadata, original.metadata);
        assert_eq!(reparsed.len(), original.len());
        for (a, b) in original.observations.iter().zip(&reparsed.observations) {
            assert_eq!(a.timestamp, b.timestamp);
            assert!((a.height_ft - b.height_ft).abs() < 0.005);
        }
    }

    #[test]
    fn test_round_trip_keeps_seconds_and_full_coordinates() {
        let body = r#"{
          "metadata": { "id": "9414290", "name": "San Francisco", "lat": "37.806349", "lon": "-122.465912" },
          "predictions": [
            { "t": "2024-09-07 00:00:30", "v": "5.63" },
            { "t": "2024-09-07 01:00", "v": "6.10" }
          ]
        }"#;
        let original = parse_json(body).unwrap();

        let json = to_json_payload(&original).unwrap();
        assert!(json.contains("\"2024-09-07 00:00:30\""), "got {}", json);
        assert!(json.contains("\"2024-09-07 01:00\""), "got {}", json);
        let reparsed = parse_json(&json).unwrap();
        assert_eq!(reparsed.metadata, original.metadata);
        assert_eq!(reparsed.observations, original.observations);

        let csv = to_csv_payload(&original).unwrap();
        let reparsed = parse_csv(&csv).unwrap();
        assert_eq!(reparsed.observations, original.observations);
    }

    #[test]
    fn test_csv_round_trip_preserves_pairs() {
        let original = parse_json(fixture_two_day_json()).unwrap();
        let body = to_csv_payload(&original).unwrap();
        assert!(body.starts_with("time,prediction\n"), "got {}", body);

        let reparsed = parse_csv(&body).unwrap();
        assert_eq!(reparsed.len(), original.len());
        for (a, b) in original.observations.iter().zip(&reparsed.observations) {
            assert_eq!(a.timestamp, b.timestamp);
            assert!((a.height_ft - b.height_ft).abs() < 0.005);
        }
    }
}
