// Reader for the previous election's polling place list
// (GeneralPollingPlacesDownload).

use log::warn;
use serde::Deserialize;
use snafu::ResultExt;

use booth_tally::PollingPlace;

use crate::pipeline::{
    io_common::{csv_reader, read_csv_text, strip_title_line},
    CsvRecordParseSnafu, PipelineResult,
};

#[derive(Debug, Clone, Deserialize)]
struct PlaceRow {
    #[serde(rename = "DivisionNm")]
    division_nm: String,
    #[serde(rename = "PollingPlaceID")]
    polling_place_id: Option<u32>,
    #[serde(rename = "PollingPlaceNm")]
    polling_place_nm: String,
    #[serde(rename = "PremisesNm")]
    premises_nm: String,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
}

/// Premises recorded in the previous election's list under a name that does
/// not line up with the gazette.
fn correct_premises(name: &str) -> &str {
    match name {
        "3A Joynton Avenue Creative Centre" => "Joynton Avenue Creative Centre",
        x => x,
    }
}

/// Loads the full polling place list of the previous election.
pub fn read_last_places(path: &str) -> PipelineResult<Vec<PollingPlace>> {
    let text = read_csv_text(path)?;
    let body = strip_title_line(&text, path)?;
    parse_last_places(csv_reader(body), path)
}

fn parse_last_places<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
    path: &str,
) -> PipelineResult<Vec<PollingPlace>> {
    let mut places: Vec<PollingPlace> = Vec::new();
    for result in rdr.deserialize() {
        let row: PlaceRow = result.context(CsvRecordParseSnafu { path })?;
        let id = match row.polling_place_id {
            Some(id) => id,
            None => {
                warn!(
                    "parse_last_places: skipping {:?} without a polling place id",
                    row.polling_place_nm
                );
                continue;
            }
        };
        places.push(PollingPlace {
            id,
            division: row.division_nm,
            name: row.polling_place_nm,
            premises: correct_premises(&row.premises_nm).to_string(),
            latitude: row.latitude,
            longitude: row.longitude,
        });
    }
    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACES: &str = "\
Federal general election polling places as at the close of rolls
State,DivisionID,DivisionNm,PollingPlaceID,PollingPlaceTypeID,PollingPlaceNm,PremisesNm,Latitude,Longitude
NSW,104,Sydney,1,1,Glebe,Glebe Public School,-33.8790,151.1860
NSW,104,Sydney,2,5,Sydney PP,Sydney Masonic Centre,-33.8750,151.2070
NSW,104,Sydney,3,1,Zetland,3A Joynton Avenue Creative Centre,,
NSW,104,Sydney,,1,Multiple sites,Town Hall,,
NSW,103,Grayndler,4,1,Annandale,Annandale Public School,-33.8810,151.1700
";

    fn parsed() -> Vec<PollingPlace> {
        let body = strip_title_line(PLACES, "test.csv").unwrap();
        parse_last_places(csv_reader(body), "test.csv").unwrap()
    }

    #[test]
    fn rows_without_an_id_are_skipped() {
        let places = parsed();
        assert_eq!(places.len(), 4);
        assert!(places.iter().all(|p| p.name != "Multiple sites"));
    }

    #[test]
    fn premises_names_are_corrected() {
        let places = parsed();
        assert_eq!(places[2].premises, "Joynton Avenue Creative Centre");
        assert_eq!(places[2].latitude, None);
    }

    #[test]
    fn pre_poll_marker_is_carried_by_the_name() {
        let places = parsed();
        assert!(places[1].is_pre_poll());
        assert!(!places[0].is_pre_poll());
    }
}
