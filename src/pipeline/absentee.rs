// Absentee pre-poll analysis for early-voting premises shared between
// divisions.

use std::collections::HashMap;

use log::info;
use snafu::whatever;

use booth_tally::{FirstPrefRecord, PollingPlace, VoteCount};

use crate::pipeline::config_reader::{DivisionConfig, MapConfig};
use crate::pipeline::{io_places, io_votes, PipelineResult};

/// Pre-poll vote volumes at one shared premises.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AbsenteeSummary {
    pub premises: String,
    /// Votes cast at this premises at pre-poll booths of other divisions.
    pub absentee_votes: VoteCount,
    /// Votes cast at the division's own pre-poll booths at this premises.
    pub home_votes: VoteCount,
}

/// Splits the pre-poll votes cast at a premises between the division's own
/// booths and the booths that other divisions run at the same address.
pub fn premises_summary(
    premises: &str,
    division: &str,
    last_places: &[PollingPlace],
    rows: &[FirstPrefRecord],
) -> AbsenteeSummary {
    let mut votes_by_id: HashMap<u32, VoteCount> = HashMap::new();
    for r in rows.iter() {
        *votes_by_id
            .entry(r.polling_place_id)
            .or_insert(VoteCount::EMPTY) += r.ordinary_votes;
    }

    let mut absentee_votes = VoteCount::EMPTY;
    let mut home_votes = VoteCount::EMPTY;
    for p in last_places.iter() {
        if p.premises != premises || !p.is_pre_poll() {
            continue;
        }
        let votes = votes_by_id.get(&p.id).cloned().unwrap_or(VoteCount::EMPTY);
        if p.division == division {
            home_votes += votes;
        } else {
            absentee_votes += votes;
        }
    }
    AbsenteeSummary {
        premises: premises.to_string(),
        absentee_votes,
        home_votes,
    }
}

pub fn run_report(config: &MapConfig, div: &DivisionConfig) -> PipelineResult<()> {
    let premises_list = match div.absentee_premises.as_ref() {
        Some(list) if !list.is_empty() => list,
        _ => whatever!("no absenteePremises configured for division {}", div.name),
    };

    // The full table: absentee booths belong to other divisions by definition.
    let last_places = io_places::read_last_places(&config.data_files.last_places)?;
    let votes_path = div
        .votes_file
        .clone()
        .unwrap_or_else(|| config.data_files.votes.clone());
    let rows = io_votes::read_first_prefs(&votes_path)?;

    for premises in premises_list.iter() {
        let summary = premises_summary(premises, &div.name, &last_places, &rows);
        info!("run_report: {:?}", summary);
        println!("{}", summary.premises);
        println!(
            "    Total absentee pre-poll votes: {}",
            summary.absentee_votes.0
        );
        println!(
            "    Total division of {} pre-poll votes: {}",
            div.name, summary.home_votes.0
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: u32, division: &str, name: &str, premises: &str) -> PollingPlace {
        PollingPlace {
            id,
            division: division.to_string(),
            name: name.to_string(),
            premises: premises.to_string(),
            latitude: None,
            longitude: None,
        }
    }

    fn row(id: u32, votes: u64) -> FirstPrefRecord {
        FirstPrefRecord {
            polling_place_id: id,
            party: "Australian Labor Party".to_string(),
            ordinary_votes: VoteCount(votes),
        }
    }

    #[test]
    fn splits_votes_between_home_and_absentee_booths() {
        let places = vec![
            place(1, "Sydney", "Sydney PP", "Sydney Masonic Centre"),
            place(2, "Grayndler", "Grayndler PP", "Sydney Masonic Centre"),
            place(3, "Wentworth", "Wentworth PP", "Sydney Masonic Centre"),
            // Polling day booth at the same premises: not part of the report.
            place(4, "Sydney", "Haymarket", "Sydney Masonic Centre"),
        ];
        let rows = vec![row(1, 1000), row(2, 150), row(3, 250), row(4, 9999)];

        let summary = premises_summary("Sydney Masonic Centre", "Sydney", &places, &rows);
        assert_eq!(summary.home_votes, VoteCount(1000));
        assert_eq!(summary.absentee_votes, VoteCount(400));
    }

    #[test]
    fn other_premises_are_ignored() {
        let places = vec![place(1, "Sydney", "Sydney PP", "York Events")];
        let rows = vec![row(1, 500)];
        let summary = premises_summary("Sydney Masonic Centre", "Sydney", &places, &rows);
        assert_eq!(summary.home_votes, VoteCount(0));
        assert_eq!(summary.absentee_votes, VoteCount(0));
    }
}
