mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::collections::{BTreeMap, HashMap, HashSet};

pub use crate::config::*;

/// Classifies a party name into its category.
///
/// The rules are substring matches, evaluated in a fixed priority order; the
/// first matching rule wins. Any party matching none of the named rules
/// collapses to [PartyCategory::Other], so the classification is total.
pub fn classify_party(party: &str) -> PartyCategory {
    match party {
        p if p.contains("Labor") => PartyCategory::Labor,
        p if p.contains("Greens") => PartyCategory::Greens,
        // "Liberal Democrats" is a distinct party and must not count as Liberal.
        p if p.contains("Liberal") && !p.contains("Democrats") => PartyCategory::Liberal,
        p if p.contains("Independent") => PartyCategory::Independent,
        p if p.contains("One Nation") => PartyCategory::OneNation,
        p if p.contains("United Australia") => PartyCategory::UnitedAustralia,
        _ => PartyCategory::Other,
    }
}

/// Selects the polling places from the previous election that correspond to
/// an expected premises, restricted to the given neighbouring divisions.
///
/// Matching is by exact premises name membership. A place from a division
/// outside `neighbours` is never returned.
pub fn match_expected(
    last_places: &[PollingPlace],
    expected: &[ExpectedPlace],
    neighbours: &[String],
    exclude_pre_poll: bool,
) -> Vec<PollingPlace> {
    let premises: HashSet<&str> = expected.iter().map(|e| e.premises.as_str()).collect();
    let divisions: HashSet<&str> = neighbours.iter().map(|d| d.as_str()).collect();
    let matched: Vec<PollingPlace> = last_places
        .iter()
        .filter(|p| premises.contains(p.premises.as_str()))
        .filter(|p| divisions.contains(p.division.as_str()))
        .filter(|p| !(exclude_pre_poll && p.is_pre_poll()))
        .cloned()
        .collect();
    info!(
        "match_expected: {} of {} places matched {} expected premises across {:?}",
        matched.len(),
        last_places.len(),
        premises.len(),
        neighbours
    );
    matched
}

/// The pre-poll booths that belong to the division itself.
pub fn division_pre_poll(last_places: &[PollingPlace], division: &str) -> Vec<PollingPlace> {
    last_places
        .iter()
        .filter(|p| p.division == division && p.is_pre_poll())
        .cloned()
        .collect()
}

/// Splits a set of polling places into (pre-poll, polling day) booths.
///
/// The two parts are disjoint and their union is the input.
pub fn partition_pre_poll(places: Vec<PollingPlace>) -> (Vec<PollingPlace>, Vec<PollingPlace>) {
    places.into_iter().partition(|p| p.is_pre_poll())
}

/// Keeps the vote rows cast at one of the given polling places and attaches
/// the premises name of the booth to each of them.
pub fn join_votes(rows: &[FirstPrefRecord], places: &[PollingPlace]) -> Vec<VoteRecord> {
    let premises_by_id: HashMap<u32, &str> = places
        .iter()
        .map(|p| (p.id, p.premises.as_str()))
        .collect();
    let records: Vec<VoteRecord> = rows
        .iter()
        .filter_map(|r| {
            premises_by_id.get(&r.polling_place_id).map(|premises| VoteRecord {
                premises: premises.to_string(),
                party: r.party.clone(),
                ordinary_votes: r.ordinary_votes,
            })
        })
        .collect();
    debug!(
        "join_votes: kept {} of {} vote rows for {} places",
        records.len(),
        rows.len(),
        places.len()
    );
    records
}

/// Tabulates vote records into per-premises category totals.
///
/// Records are grouped by premises name: booths that share a premises name
/// are merged into a single tally. For each premises, the sum of the
/// category totals equals the sum of the input ordinary votes.
pub fn run_booth_stats(records: &[VoteRecord]) -> Result<DivisionTally, TallyErrors> {
    info!("run_booth_stats: processing {} vote records", records.len());
    if records.is_empty() {
        return Err(TallyErrors::EmptyDivision);
    }

    let mut by_premises: BTreeMap<&str, CategoryTotals> = BTreeMap::new();
    for r in records.iter() {
        let totals = by_premises.entry(r.premises.as_str()).or_default();
        totals.add(classify_party(&r.party), r.ordinary_votes);
    }

    let booths: Vec<PremisesTally> = by_premises
        .into_iter()
        .map(|(premises, totals)| PremisesTally {
            premises: premises.to_string(),
            totals,
        })
        .collect();
    let total_votes: VoteCount = booths.iter().map(|b| b.totals.total()).sum();
    for b in booths.iter() {
        debug!("run_booth_stats: {}: {:?}", b.premises, b.totals);
    }
    info!(
        "run_booth_stats: {} booths, {} ordinary votes",
        booths.len(),
        total_votes.0
    );
    Ok(DivisionTally { booths, total_votes })
}
