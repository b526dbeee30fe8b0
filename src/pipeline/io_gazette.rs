// Reader for the expected polling places gazette (prdelms.gaz extract).

use log::debug;
use serde::Deserialize;
use snafu::ResultExt;

use booth_tally::{ExpectedPlace, WheelchairAccess};

use crate::pipeline::{
    io_common::{csv_reader, read_csv_text},
    CsvRecordParseSnafu, PipelineResult,
};

#[derive(Debug, Clone, Deserialize)]
struct GazetteRow {
    #[serde(rename = "DivName")]
    div_name: String,
    #[serde(rename = "PremisesName")]
    premises_name: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Lat")]
    lat: Option<f64>,
    #[serde(rename = "Long")]
    long: Option<f64>,
    #[serde(rename = "OrdVoteEst")]
    ord_vote_est: Option<u64>,
    #[serde(rename = "DecVoteEst")]
    dec_vote_est: Option<u64>,
    #[serde(rename = "WheelchairAccess")]
    wheelchair_access: Option<String>,
}

/// Premises recorded in the gazette under a different name than in the
/// previous election's polling place list.
fn correct_premises(name: &str) -> &str {
    match name {
        "TAFE NSW (Ultimo Campus)" => "TAFE NSW Ultimo Campus",
        x => x,
    }
}

/// Loads the gazette and keeps the entries for one division.
///
/// The division field is matched as a substring, and entries whose status is
/// `Abolition` are dropped.
pub fn read_expected_places(path: &str, division: &str) -> PipelineResult<Vec<ExpectedPlace>> {
    let text = read_csv_text(path)?;
    parse_expected_places(csv_reader(&text), division, path)
}

fn parse_expected_places<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
    division: &str,
    path: &str,
) -> PipelineResult<Vec<ExpectedPlace>> {
    let mut places: Vec<ExpectedPlace> = Vec::new();
    for result in rdr.deserialize() {
        let row: GazetteRow = result.context(CsvRecordParseSnafu { path })?;
        if !row.div_name.contains(division) || row.status == "Abolition" {
            continue;
        }
        let premises = correct_premises(row.premises_name.trim()).to_string();
        debug!("parse_expected_places: {:?}", premises);
        places.push(ExpectedPlace {
            division: row.div_name,
            premises,
            latitude: row.lat,
            longitude: row.long,
            wheelchair: WheelchairAccess::from_label(
                row.wheelchair_access.as_deref().unwrap_or(""),
            ),
            ord_vote_est: row.ord_vote_est,
            dec_vote_est: row.dec_vote_est,
        });
    }
    Ok(places)
}
