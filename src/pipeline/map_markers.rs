// Map of the expected polling day locations, coded by wheelchair access.

use std::path::{Path, PathBuf};

use log::warn;
use snafu::ensure;

use booth_tally::{ExpectedPlace, WheelchairAccess};

use crate::pipeline::{
    map_common::{js_str, leaflet_document, legend_block, legend_row, median, size_legend_rows, write_map},
    NoLocationsSnafu, PipelineResult,
};

pub fn wheelchair_colour(access: WheelchairAccess) -> &'static str {
    match access {
        WheelchairAccess::Full => "blue",
        WheelchairAccess::Assisted => "grey",
        WheelchairAccess::None => "red",
    }
}

pub fn marker_file_name(division: &str) -> String {
    format!("Division_of_{}_expected_polling_day_locations.html", division)
}

fn marker_popup(place: &ExpectedPlace) -> String {
    format!(
        r#"<div style="font-family: Arial; font-size: 14px;">
<b style="font-size: 16px; color: darkblue;">{}</b><br>
<b>Estimated Ordinary Votes:</b> {}<br>
<b>Estimated Declaration Votes:</b> {}<br>
<b>Wheelchair Access:</b> {}
</div>"#,
        place.premises,
        place.ord_vote_est.unwrap_or(0),
        place.dec_vote_est.unwrap_or(0),
        place.wheelchair.label(),
    )
}

fn markers_legend() -> String {
    let mut body = String::from("<b>Circle Color:</b><br>\n");
    body.push_str(&legend_row("blue", 15, "Full Wheelchair Access"));
    body.push_str(&legend_row("grey", 15, "Assisted Wheelchair Access"));
    body.push_str(&legend_row("red", 15, "No Wheelchair Access/No information"));
    body.push_str(&size_legend_rows());
    legend_block(&body)
}

/// The marker map document for the expected polling day locations.
pub fn marker_map_document(
    expected: &[ExpectedPlace],
    division: &str,
) -> PipelineResult<String> {
    let located: Vec<&ExpectedPlace> = expected
        .iter()
        .filter(|p| p.latitude.is_some() && p.longitude.is_some())
        .collect();
    if located.len() < expected.len() {
        warn!(
            "marker_map_document: {} of {} places have no coordinates",
            expected.len() - located.len(),
            expected.len()
        );
    }
    ensure!(!located.is_empty(), NoLocationsSnafu { division });

    let centre = (
        median(located.iter().map(|p| p.latitude.unwrap_or(0.0)).collect()),
        median(located.iter().map(|p| p.longitude.unwrap_or(0.0)).collect()),
    );

    let mut markers_js = String::new();
    for place in located.iter() {
        let total_votes = place.ord_vote_est.unwrap_or(0) + place.dec_vote_est.unwrap_or(0);
        let radius = total_votes as f64 / 100.0;
        let colour = wheelchair_colour(place.wheelchair);
        markers_js.push_str(&format!(
            "L.circleMarker([{lat:.6}, {long:.6}], {{ radius: {radius:.1}, color: \"{colour}\", fillColor: \"{colour}\", fill: true, fillOpacity: 0.6 }}).addTo(map).bindPopup({popup}, {{ maxWidth: 300 }});\n",
            lat = place.latitude.unwrap_or(0.0),
            long = place.longitude.unwrap_or(0.0),
            radius = radius,
            colour = colour,
            popup = js_str(&marker_popup(place)),
        ));
    }

    let title = format!("Division of {}: expected polling day locations", division);
    Ok(leaflet_document(&title, centre, &markers_js, &markers_legend()))
}

pub fn create_map_with_markers(
    expected: &[ExpectedPlace],
    division: &str,
    out_dir: &Path,
) -> PipelineResult<PathBuf> {
    let document = marker_map_document(expected, division)?;
    write_map(out_dir, &marker_file_name(division), &document)
}
