use log::{info, warn};

use booth_tally::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::pipeline::config_reader::{DivisionConfig, MapConfig};

pub mod absentee;
pub mod io_common;
pub mod io_gazette;
pub mod io_places;
pub mod io_votes;
pub mod map_common;
pub mod map_markers;
pub mod map_pies;

#[derive(Debug, Snafu)]
pub enum PipelineError {
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading a CSV record in {path}"))]
    CsvRecordParse { source: csv::Error, path: String },
    #[snafu(display("Missing title row in {path}"))]
    MissingTitleRow { path: String },
    #[snafu(display("Error opening the JSON file"))]
    OpeningJson { source: std::io::Error },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("No neighbouring divisions known for {division}"))]
    UnknownNeighbours { division: String },
    #[snafu(display("Division {division} is not present in the configuration"))]
    UnknownDivision { division: String },
    #[snafu(display("No valid locations found for {division}"))]
    NoLocations { division: String },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Tabulation failed for {division}"))]
    Tally {
        source: TallyErrors,
        division: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

pub mod config_reader {
    use crate::pipeline::{OpeningJsonSnafu, ParsingJsonSnafu, PipelineResult};

    use log::debug;
    use serde::{Deserialize, Serialize};
    use serde_json::Value as JSValue;
    use snafu::ResultExt;
    use std::fs;

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputSettings {
        #[serde(rename = "outputDirectory")]
        pub output_directory: Option<String>,
        #[serde(rename = "generateSummaryJson")]
        pub generate_summary_json: Option<bool>,
    }

    /// The three AEC exports feeding a run.
    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct DataFiles {
        #[serde(rename = "expectedPlaces")]
        pub expected_places: String,
        #[serde(rename = "lastPlaces")]
        pub last_places: String,
        /// The default first-preferences file. Divisions in another state
        /// override it with their own file.
        pub votes: String,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct DivisionConfig {
        pub name: String,
        /// The divisions whose booths may serve this division's premises.
        /// When absent, the built-in table is consulted.
        pub neighbours: Option<Vec<String>>,
        #[serde(rename = "votesFile")]
        pub votes_file: Option<String>,
        #[serde(rename = "absenteePremises")]
        pub absentee_premises: Option<Vec<String>>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct MapConfig {
        #[serde(rename = "outputSettings")]
        pub output_settings: OutputSettings,
        #[serde(rename = "dataFiles")]
        pub data_files: DataFiles,
        pub divisions: Vec<DivisionConfig>,
    }

    pub fn read_config(path: &str) -> PipelineResult<MapConfig> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        debug!("read content: {:?}", contents);
        let config: MapConfig =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(config)
    }

    pub fn read_summary(path: &str) -> PipelineResult<JSValue> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(js)
    }

    /// Neighbouring divisions for the divisions this tool has been run on so
    /// far. Booths near a boundary serve voters from both sides, so the
    /// previous election's list is searched across all of them.
    pub fn default_neighbours(division: &str) -> Option<Vec<String>> {
        let names: &[&str] = match division {
            "Sydney" => &["Sydney", "Grayndler"],
            "Wentworth" => &["Sydney", "Wentworth", "Kingsford Smith"],
            "Bennelong" => &["Bennelong", "North Sydney"],
            "Ryan" => &["Ryan"],
            "Moreton" => &["Moreton"],
            _ => return None,
        };
        Some(names.iter().map(|s| s.to_string()).collect())
    }
}

/// A booth ready to plot: a located place with any vote data attached.
#[derive(PartialEq, Debug, Clone)]
pub struct BoothMarker {
    pub premises: String,
    pub latitude: f64,
    pub longitude: f64,
    pub wheelchair: Option<WheelchairAccess>,
    pub ord_vote_est: Option<u64>,
    pub dec_vote_est: Option<u64>,
    pub totals: Option<CategoryTotals>,
}

impl BoothMarker {
    /// The vote volume driving the marker size: the gazette estimate when
    /// present, otherwise the tallied total.
    pub fn total_votes(&self) -> u64 {
        match (self.ord_vote_est, self.dec_vote_est) {
            (None, None) => self.totals.as_ref().map(|t| t.total().0).unwrap_or(0),
            (o, d) => o.unwrap_or(0) + d.unwrap_or(0),
        }
    }

    pub fn radius(&self) -> f64 {
        self.total_votes() as f64 / 100.0
    }
}

fn merge_expected(expected: &[ExpectedPlace], tally: &DivisionTally) -> Vec<BoothMarker> {
    let totals_by_premises: HashMap<&str, &CategoryTotals> = tally
        .booths
        .iter()
        .map(|b| (b.premises.as_str(), &b.totals))
        .collect();
    let mut dropped = 0usize;
    let mut markers: Vec<BoothMarker> = Vec::new();
    for e in expected.iter() {
        let (latitude, longitude) = match (e.latitude, e.longitude) {
            (Some(lat), Some(long)) => (lat, long),
            _ => {
                dropped += 1;
                continue;
            }
        };
        markers.push(BoothMarker {
            premises: e.premises.clone(),
            latitude,
            longitude,
            wheelchair: Some(e.wheelchair),
            ord_vote_est: e.ord_vote_est,
            dec_vote_est: e.dec_vote_est,
            totals: totals_by_premises
                .get(e.premises.as_str())
                .map(|t| (*t).clone()),
        });
    }
    if dropped > 0 {
        warn!("merge_expected: dropped {} places without coordinates", dropped);
    }
    markers
}

fn merge_pre_poll(places: &[PollingPlace], tally: &DivisionTally) -> Vec<BoothMarker> {
    let totals_by_premises: HashMap<&str, &CategoryTotals> = tally
        .booths
        .iter()
        .map(|b| (b.premises.as_str(), &b.totals))
        .collect();
    let mut dropped = 0usize;
    let mut markers: Vec<BoothMarker> = Vec::new();
    for p in places.iter() {
        let (latitude, longitude) = match (p.latitude, p.longitude) {
            (Some(lat), Some(long)) => (lat, long),
            _ => {
                dropped += 1;
                continue;
            }
        };
        markers.push(BoothMarker {
            premises: p.premises.clone(),
            latitude,
            longitude,
            wheelchair: None,
            ord_vote_est: None,
            dec_vote_est: None,
            totals: totals_by_premises
                .get(p.premises.as_str())
                .map(|t| (*t).clone()),
        });
    }
    if dropped > 0 {
        warn!(
            "merge_pre_poll: dropped {} places without coordinates",
            dropped
        );
    }
    markers
}

fn tally_to_json(tally: &DivisionTally) -> JSValue {
    let mut booths: Vec<JSValue> = Vec::new();
    for b in tally.booths.iter() {
        let mut per_category: JSMap<String, JSValue> = JSMap::new();
        for (category, count) in b.totals.iter() {
            per_category.insert(category.label().to_string(), json!(count.0));
        }
        booths.push(json!({"premises": b.premises, "tally": per_category}));
    }
    json!({"totalVotes": tally.total_votes.0, "booths": booths})
}

fn build_summary_js(
    division: &str,
    polling_day: &DivisionTally,
    pre_poll: &DivisionTally,
) -> JSValue {
    json!({
        "division": division,
        "pollingDay": tally_to_json(polling_day),
        "prePoll": tally_to_json(pre_poll),
    })
}

fn tally_or_empty(division: &str, records: &[VoteRecord]) -> PipelineResult<DivisionTally> {
    if records.is_empty() {
        warn!("{}: no primary votes matched, the map will degrade to plain markers", division);
        return Ok(DivisionTally::empty());
    }
    run_booth_stats(records).context(TallySnafu {
        division: division.to_string(),
    })
}

fn run_division(
    config: &MapConfig,
    div: &DivisionConfig,
    out_dir: &Path,
    reference: Option<&str>,
) -> PipelineResult<()> {
    info!("Processing division {}", div.name);

    let expected = io_gazette::read_expected_places(&config.data_files.expected_places, &div.name)?;
    info!("{}: {} expected polling places", div.name, expected.len());

    let last_places = io_places::read_last_places(&config.data_files.last_places)?;
    let neighbours = div
        .neighbours
        .clone()
        .or_else(|| config_reader::default_neighbours(&div.name))
        .context(UnknownNeighboursSnafu {
            division: div.name.clone(),
        })?;
    let matched = match_expected(&last_places, &expected, &neighbours, true);
    let pre_poll = division_pre_poll(&last_places, &div.name);

    let votes_path = div
        .votes_file
        .clone()
        .unwrap_or_else(|| config.data_files.votes.clone());
    let vote_rows = io_votes::read_first_prefs(&votes_path)?;
    let day_records = join_votes(&vote_rows, &matched);
    let pre_poll_records = join_votes(&vote_rows, &pre_poll);

    let day_tally = tally_or_empty(&div.name, &day_records)?;
    let pre_poll_tally = tally_or_empty(&div.name, &pre_poll_records)?;

    map_markers::create_map_with_markers(&expected, &div.name, out_dir)?;
    let day_markers = merge_expected(&expected, &day_tally);
    map_pies::create_map_with_pie_charts(
        &day_markers,
        &div.name,
        &map_pies::pie_file_name(&div.name),
        out_dir,
    )?;
    let pre_poll_markers = merge_pre_poll(&pre_poll, &pre_poll_tally);
    map_pies::create_map_with_pie_charts(
        &pre_poll_markers,
        &div.name,
        &map_pies::pre_poll_file_name(&div.name),
        out_dir,
    )?;

    // Assemble the final json
    let summary = build_summary_js(&div.name, &day_tally, &pre_poll_tally);
    let pretty_js_summary = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;

    if config
        .output_settings
        .generate_summary_json
        .unwrap_or(false)
    {
        let path = out_dir.join(format!("Division_of_{}_primary_vote_summary.json", div.name));
        fs::write(&path, &pretty_js_summary).context(WritingOutputSnafu {
            path: path.display().to_string(),
        })?;
        info!("Summary has been saved to {}", path.display());
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = reference {
        let summary_ref = config_reader::read_summary(reference_path)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_summary {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_summary.as_str(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary");
        }
    }

    Ok(())
}

pub fn run(args: &Args) -> PipelineResult<()> {
    let config = config_reader::read_config(&args.config)?;
    info!("config: {:?}", config);

    if args.reference.is_some() && args.division.is_none() {
        whatever!("--reference requires --division to select a single summary");
    }

    let out_dir: PathBuf = args
        .out
        .clone()
        .or_else(|| config.output_settings.output_directory.clone())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut processed = 0usize;
    for div in config.divisions.iter() {
        if let Some(only) = args.division.as_deref() {
            if div.name != only {
                continue;
            }
        }
        processed += 1;
        if args.absentee_report {
            absentee::run_report(&config, div)?;
        } else {
            run_division(&config, div, &out_dir, args.reference.as_deref())?;
        }
    }
    if processed == 0 {
        if let Some(only) = args.division.as_deref() {
            return UnknownDivisionSnafu { division: only }.fail();
        }
        whatever!("the configuration lists no divisions");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(labor: u64, liberal: u64) -> CategoryTotals {
        let mut t = CategoryTotals::new();
        t.add(PartyCategory::Labor, VoteCount(labor));
        t.add(PartyCategory::Liberal, VoteCount(liberal));
        t
    }

    fn tally_with(premises: &str, labor: u64, liberal: u64) -> DivisionTally {
        DivisionTally {
            booths: vec![PremisesTally {
                premises: premises.to_string(),
                totals: totals(labor, liberal),
            }],
            total_votes: VoteCount(labor + liberal),
        }
    }

    #[test]
    fn config_round_trip() {
        let raw = r#"{
            "outputSettings": {"outputDirectory": "maps", "generateSummaryJson": true},
            "dataFiles": {
                "expectedPlaces": "prdelms.gaz.statics.csv",
                "lastPlaces": "GeneralPollingPlacesDownload.csv",
                "votes": "HouseStateFirstPrefsByPollingPlaceDownload-NSW.csv"
            },
            "divisions": [
                {"name": "Sydney"},
                {"name": "Moreton", "votesFile": "HouseStateFirstPrefsByPollingPlaceDownload-QLD.csv"}
            ]
        }"#;
        let config: MapConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.divisions.len(), 2);
        assert_eq!(config.output_settings.generate_summary_json, Some(true));
        assert_eq!(config.divisions[0].name, "Sydney");
        assert_eq!(config.divisions[0].neighbours, None);
        assert_eq!(
            config.divisions[1].votes_file.as_deref(),
            Some("HouseStateFirstPrefsByPollingPlaceDownload-QLD.csv")
        );
    }

    #[test]
    fn default_neighbours_table() {
        let sydney = config_reader::default_neighbours("Sydney").unwrap();
        assert!(sydney.contains(&"Grayndler".to_string()));
        assert_eq!(config_reader::default_neighbours("Ryan").unwrap().len(), 1);
        assert_eq!(config_reader::default_neighbours("Durack"), None);
    }

    #[test]
    fn merge_expected_drops_unlocated_places() {
        let expected = vec![
            ExpectedPlace {
                division: "Sydney".to_string(),
                premises: "Town Hall".to_string(),
                latitude: Some(-33.87),
                longitude: Some(151.21),
                wheelchair: WheelchairAccess::Full,
                ord_vote_est: Some(2000),
                dec_vote_est: Some(300),
            },
            ExpectedPlace {
                division: "Sydney".to_string(),
                premises: "New Hall".to_string(),
                latitude: None,
                longitude: None,
                wheelchair: WheelchairAccess::None,
                ord_vote_est: None,
                dec_vote_est: None,
            },
        ];
        let markers = merge_expected(&expected, &tally_with("Town Hall", 100, 50));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].premises, "Town Hall");
        let totals = markers[0].totals.as_ref().unwrap();
        assert_eq!(totals.get(PartyCategory::Labor), VoteCount(100));
        // The gazette estimate drives the size, not the tallied votes.
        assert_eq!(markers[0].total_votes(), 2300);
        assert!((markers[0].radius() - 23.0).abs() < 1e-9);
    }

    #[test]
    fn merge_pre_poll_marks_new_booths() {
        let places = vec![PollingPlace {
            id: 1,
            division: "Sydney".to_string(),
            name: "Sydney PP".to_string(),
            premises: "Masonic Centre".to_string(),
            latitude: Some(-33.875),
            longitude: Some(151.207),
        }];
        let markers = merge_pre_poll(&places, &DivisionTally::empty());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].totals, None);
        assert_eq!(markers[0].total_votes(), 0);
    }

    #[test]
    fn summary_json_shape() {
        let summary = build_summary_js(
            "Sydney",
            &tally_with("Town Hall", 120, 80),
            &DivisionTally::empty(),
        );
        assert_eq!(summary["division"], json!("Sydney"));
        assert_eq!(summary["pollingDay"]["totalVotes"], json!(200));
        assert_eq!(
            summary["pollingDay"]["booths"][0]["premises"],
            json!("Town Hall")
        );
        assert_eq!(
            summary["pollingDay"]["booths"][0]["tally"]["Labor"],
            json!(120)
        );
        assert_eq!(
            summary["pollingDay"]["booths"][0]["tally"]["Other"],
            json!(0)
        );
        assert_eq!(summary["prePoll"]["booths"], json!([]));
    }
}
