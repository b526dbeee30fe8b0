// Reader for the first preferences by polling place download
// (HouseStateFirstPrefsByPollingPlace).

use serde::Deserialize;
use snafu::ResultExt;

use booth_tally::{FirstPrefRecord, VoteCount};

use crate::pipeline::{
    io_common::{csv_reader, read_csv_text, strip_title_line},
    CsvRecordParseSnafu, PipelineResult,
};

#[derive(Debug, Clone, Deserialize)]
struct FirstPrefRow {
    #[serde(rename = "PollingPlaceID")]
    polling_place_id: u32,
    #[serde(rename = "PartyNm")]
    party_nm: String,
    #[serde(rename = "OrdinaryVotes")]
    ordinary_votes: u64,
}

/// Loads the first-preference counts of the previous election, one record
/// per candidate per booth.
pub fn read_first_prefs(path: &str) -> PipelineResult<Vec<FirstPrefRecord>> {
    let text = read_csv_text(path)?;
    let body = strip_title_line(&text, path)?;
    parse_first_prefs(csv_reader(body), path)
}

fn parse_first_prefs<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
    path: &str,
) -> PipelineResult<Vec<FirstPrefRecord>> {
    let mut records: Vec<FirstPrefRecord> = Vec::new();
    for result in rdr.deserialize() {
        let row: FirstPrefRow = result.context(CsvRecordParseSnafu { path })?;
        records.push(FirstPrefRecord {
            polling_place_id: row.polling_place_id,
            party: row.party_nm,
            ordinary_votes: VoteCount(row.ordinary_votes),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOTES: &str = "\
House of Representatives first preferences by polling place
StateAb,DivisionID,DivisionNm,PollingPlaceID,PollingPlaceNm,CandidateID,Surname,GivenNm,BallotPosition,Elected,HistoricElected,PartyAb,PartyNm,OrdinaryVotes,Swing
NSW,104,Sydney,1,Glebe,101,SMITH,ANNA,1,Y,Y,ALP,Australian Labor Party,812,1.2
NSW,104,Sydney,1,Glebe,102,JONES,BOB,2,N,N,GRN,The Greens,455,0.4
NSW,104,Sydney,1,Glebe,103,LEE,CARA,3,N,N,,Independent,120,-0.1
NSW,104,Sydney,1,Glebe,999,,,,N,N,,Informal,61,0.0
";

    #[test]
    fn rows_parse_into_records() {
        let body = strip_title_line(VOTES, "test.csv").unwrap();
        let records = parse_first_prefs(csv_reader(body), "test.csv").unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].polling_place_id, 1);
        assert_eq!(records[0].party, "Australian Labor Party");
        assert_eq!(records[0].ordinary_votes, VoteCount(812));
        assert_eq!(records[3].party, "Informal");
    }

    #[test]
    fn non_numeric_votes_are_an_error() {
        let bad = "PollingPlaceID,PartyNm,OrdinaryVotes\n1,The Greens,abc\n";
        assert!(parse_first_prefs(csv_reader(bad), "test.csv").is_err());
    }
}
