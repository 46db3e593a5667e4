/// Bird survey CSV loader and summary.
///
/// Reads a static survey export with one row per sighting tally:
///
/// ```text
/// date,site,species,count
/// 2024-09-07,North Jetty,Brown Pelican,12
/// ```
///
/// Rows that fail to deserialize (missing fields, non-numeric counts,
/// malformed dates) are skipped and counted, the same way tide rows are.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::analysis::summary::{round2, SummaryStats};
use crate::model::TideError;
use crate::report::NO_DATA_MESSAGE;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurveyRecord {
    pub date: NaiveDate,
    pub site: String,
    pub species: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyData {
    pub records: Vec<SurveyRecord>,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveySummary {
    pub rows: usize,
    pub skipped_rows: usize,
    pub sites: BTreeSet<String>,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Total individuals per species, alphabetical.
    pub species_totals: BTreeMap<String, u64>,
    /// Statistics over the per-row counts.
    pub count_stats: SummaryStats,
}

impl SurveySummary {
    pub fn total_individuals(&self) -> u64 {
        self.species_totals.values().sum()
    }

    /// Species ordered by total, largest first; ties alphabetical.
    pub fn ranked_species(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .species_totals
            .iter()
            .map(|(name, total)| (name.as_str(), *total))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

pub fn parse_survey<R: Read>(reader: R) -> Result<SurveyData, TideError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for (index, result) in csv_reader.deserialize::<SurveyRecord>().enumerate() {
        match result {
            Ok(record) if record.species.is_empty() || record.site.is_empty() => {
                debug!(row = index, "skipping survey row with blank site or species");
                skipped_rows += 1;
            }
            Ok(record) => records.push(record),
            Err(e) => {
                debug!(row = index, error = %e, "skipping survey row");
                skipped_rows += 1;
            }
        }
    }

    if skipped_rows > 0 {
        warn!(skipped = skipped_rows, kept = records.len(), "dropped unusable survey rows");
    }

    Ok(SurveyData { records, skipped_rows })
}

pub fn load_survey(path: &Path) -> Result<SurveyData, TideError> {
    let file = File::open(path)?;
    parse_survey(file)
}

/// `None` when no usable rows remain.
pub fn summarize_survey(data: &SurveyData) -> Option<SurveySummary> {
    let counts: Vec<f64> = data.records.iter().map(|r| r.count as f64).collect();
    let count_stats = SummaryStats::from_values(&counts)?;

    let mut species_totals: BTreeMap<String, u64> = BTreeMap::new();
    let mut sites = BTreeSet::new();
    for record in &data.records {
        *species_totals.entry(record.species.clone()).or_insert(0) += record.count as u64;
        sites.insert(record.site.clone());
    }

    let first_date = data.records.iter().map(|r| r.date).min()?;
    let last_date = data.records.iter().map(|r| r.date).max()?;

    Some(SurveySummary {
        rows: data.records.len(),
        skipped_rows: data.skipped_rows,
        sites,
        first_date,
        last_date,
        species_totals,
        count_stats,
    })
}

pub fn write_survey_report<W: Write>(data: &SurveyData, out: &mut W) -> io::Result<Option<SurveySummary>> {
    let Some(summary) = summarize_survey(data) else {
        writeln!(out, "{}", NO_DATA_MESSAGE)?;
        return Ok(None);
    };

    writeln!(out, "Bird survey: {} rows ({} skipped)", summary.rows, summary.skipped_rows)?;
    writeln!(out, "Period: {} to {}", summary.first_date, summary.last_date)?;
    writeln!(out, "Sites: {}", summary.sites.len())?;
    writeln!(out, "Species: {}", summary.species_totals.len())?;
    writeln!(out, "Individuals counted: {}", summary.total_individuals())?;
    writeln!(out)?;

    writeln!(out, "Totals by species")?;
    for (species, total) in summary.ranked_species() {
        writeln!(out, "  {:<30} {:>6}", species, total)?;
    }
    writeln!(out)?;

    let stats = &summary.count_stats;
    let sd = stats
        .std_dev
        .map(|sd| format!("{:.2}", round2(sd)))
        .unwrap_or_else(|| "n/a".to_string());
    writeln!(out, "Count per row")?;
    writeln!(
        out,
        "  max={:.2}, min={:.2}, mean={:.2}, sd={}",
        round2(stats.max),
        round2(stats.min),
        round2(stats.mean),
        sd
    )?;

    Ok(Some(summary))
}
