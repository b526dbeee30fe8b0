/*!

This is the long-form manual for `booth_tally` and `boothmap`.

## Input files

A run consumes three CSV exports:

### Expected polling places gazette

The AEC gazette of premises expected to operate at the coming election
(`prdelms.gaz.statics.*.csv`). The header is on the first line. The columns
used are `DivName`, `PremisesName`, `Status`, `Lat`, `Long`, `OrdVoteEst`,
`DecVoteEst` and `WheelchairAccess`. Rows whose status is `Abolition` are
ignored, and the division field is matched as a substring so that entries
such as `Sydney (NSW)` select the division `Sydney`.

Premises names are whitespace-trimmed, and a small set of known naming
variants is corrected so that gazette entries line up with the previous
election's list (for example `TAFE NSW (Ultimo Campus)` is recorded elsewhere
as `TAFE NSW Ultimo Campus`).

### General polling places download

The polling place list from the previous election
(`GeneralPollingPlacesDownload-<event>.csv`). The first line of the file is a
title banner and is skipped; the header is on the second line. The columns
used are `DivisionNm`, `PollingPlaceID`, `PollingPlaceNm`, `PremisesNm`,
`Latitude` and `Longitude`.

Pre-poll (early voting) booths are recognised by the marker `PP` in the
polling place name.

### House first preferences by polling place

The first-preference counts from the previous election
(`HouseStateFirstPrefsByPollingPlaceDownload-<event>-<state>.csv`), one row
per candidate per booth. The first line is a title banner and is skipped. The
columns used are `PollingPlaceID`, `PartyNm` and `OrdinaryVotes`.

## Party categories

Party names are free text. They are classified into a fixed set of
categories (Labor, Liberal, Greens, Independent, One Nation, United
Australia, Other) by substring rules evaluated in priority order; the first
matching rule wins and anything else counts as Other. See
[classify_party](crate::classify_party).

## Output files

For each division, up to three HTML maps are written, named by convention:

* `Division_of_<division>_expected_polling_day_locations.html`: circle
  markers for the expected polling day booths, coloured by wheelchair access
  and sized by the voter estimate.
* `Division_of_<division>_expected_polling_day_locations_primary_vote_last_election.html`:
  a pie chart of primary votes at the previous election per expected booth.
* `Division_of_<division>_pre_polling_primary_vote_last_election.html`: the
  same pie charts for the division's pre-poll booths.

A JSON summary of the tallies can also be written and checked against a
reference file; see the `--reference` option of `boothmap`.

*/
