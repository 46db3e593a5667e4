/// Test fixtures: representative payloads from the CO-OPS datagetter.
///
/// These are truncated to the minimum needed to exercise the parser but
/// keep the real envelope returned by:
///   https://api.tidesandcurrents.noaa.gov/api/prod/datagetter?product=predictions&...
///
/// JSON response shape:
///   metadata (optional)  — { id, name, lat, lon }, coordinates as STRINGS
///   predictions[]
///     .t — local timestamp "YYYY-MM-DD HH:MM"
///     .v — predicted height as a STRING, feet above MLLW
///
/// CSV responses carry a `Date Time, Prediction` header and one row per hour.
/// Errors come back as `{ "error": { "message": ... } }` (JSON) or a bare
/// `Error: ...` line (CSV), still with HTTP 200.

/// Two predictions on the same day at Charleston, with station metadata.
#[cfg(test)]
pub(crate) fn fixture_two_predictions_json() -> &'static str {
    r#"{
      "metadata": {
        "id": "8665530",
        "name": "Charleston, Cooper River Entrance",
        "lat": "32.7808",
        "lon": "-79.9236"
      },
      "predictions": [
        { "t": "2024-09-07 00:00", "v": "5.63" },
        { "t": "2024-09-07 03:00", "v": "6.88" }
      ]
    }"#
}

/// Predictions spanning midnight, no metadata block (the usual shape for
/// the predictions product).
#[cfg(test)]
pub(crate) fn fixture_two_day_json() -> &'static str {
    r#"{
      "predictions": [
        { "t": "2024-09-07 22:00", "v": "3.104" },
        { "t": "2024-09-07 23:00", "v": "4.212" },
        { "t": "2024-09-08 00:00", "v": "5.018" },
        { "t": "2024-09-08 01:00", "v": "5.533" },
        { "t": "2024-09-08 02:00", "v": "5.601" }
      ]
    }"#
}

/// Well-formed response with nothing in it.
#[cfg(test)]
pub(crate) fn fixture_empty_predictions_json() -> &'static str {
    r#"{ "predictions": [] }"#
}

/// One entry has a blank height, one a non-numeric height, one a garbled timestamp.
#[cfg(test)]
pub(crate) fn fixture_dirty_rows_json() -> &'static str {
    r#"{
      "predictions": [
        { "t": "2024-09-07 00:00", "v": "5.63" },
        { "t": "2024-09-07 01:00", "v": "" },
        { "t": "2024-09-07 02:00", "v": "n/a" },
        { "t": "07/09/2024 3am", "v": "6.10" },
        { "t": "2024-09-07 04:00", "v": "6.88" }
      ]
    }"#
}

/// CO-OPS error envelope for an unknown station.
#[cfg(test)]
pub(crate) fn fixture_api_error_json() -> &'static str {
    r#"{ "error": { "message": "No Predictions data was found. Please make sure the Datum input is valid." } }"#
}

/// CSV response as returned with `format=csv`.
#[cfg(test)]
pub(crate) fn fixture_predictions_csv() -> &'static str {
    "Date Time, Prediction\n\
     2024-09-07 00:00,5.630\n\
     2024-09-07 01:00,6.012\n\
     2024-09-07 02:00,6.455\n\
     2024-09-07 03:00,6.880\n"
}

/// CSV response where one row carries a non-numeric height.
#[cfg(test)]
pub(crate) fn fixture_bad_height_csv() -> &'static str {
    "time,prediction\n\
     2024-09-07 00:00,5.63\n\
     2024-09-07 01:00,bogus\n\
     2024-09-07 02:00,6.88\n"
}

/// CSV with a header and nothing usable below it.
#[cfg(test)]
pub(crate) fn fixture_header_only_csv() -> &'static str {
    "time,prediction\n2024-09-07 00:00,\n,5.5\n"
}
