// Maps with one pie chart of primary votes per polling place.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use snafu::ensure;

use booth_tally::{CategoryTotals, PartyCategory};

use crate::pipeline::{
    map_common::{js_str, leaflet_document, legend_block, legend_row, median, size_legend_rows, write_map},
    BoothMarker, NoLocationsSnafu, PipelineResult,
};

pub fn pie_file_name(division: &str) -> String {
    format!(
        "Division_of_{}_expected_polling_day_locations_primary_vote_last_election.html",
        division
    )
}

pub fn pre_poll_file_name(division: &str) -> String {
    format!(
        "Division_of_{}_pre_polling_primary_vote_last_election.html",
        division
    )
}

/// An inline SVG pie of the category shares. The caller must make sure the
/// totals are not empty.
pub fn pie_svg(totals: &CategoryTotals, radius: f64) -> String {
    let total = totals.total().0;
    let diameter = radius * 2.0;
    let centre = radius;
    let mut slices = String::new();
    let mut start = -PI / 2.0;
    for (category, count) in totals.iter() {
        if count.0 == 0 {
            continue;
        }
        let fraction = count.0 as f64 / total as f64;
        if fraction >= 1.0 {
            // A single category fills the disc; the arc would degenerate.
            slices.push_str(&format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
                centre,
                centre,
                radius,
                category.colour()
            ));
            break;
        }
        let end = start + fraction * 2.0 * PI;
        let (x1, y1) = (centre + radius * start.cos(), centre + radius * start.sin());
        let (x2, y2) = (centre + radius * end.cos(), centre + radius * end.sin());
        let large_arc = if end - start > PI { 1 } else { 0 };
        slices.push_str(&format!(
            r#"<path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{colour}"/>"#,
            cx = centre,
            cy = centre,
            x1 = x1,
            y1 = y1,
            r = radius,
            large_arc = large_arc,
            x2 = x2,
            y2 = y2,
            colour = category.colour(),
        ));
        start = end;
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{d:.0}" height="{d:.0}" viewBox="0 0 {d:.2} {d:.2}">{slices}</svg>"#,
        d = diameter,
        slices = slices,
    )
}

fn pie_popup(marker: &BoothMarker) -> String {
    let mut popup = format!(
        r#"<div style="font-family: Arial; font-size: 14px;">
<b style="font-size: 16px; color: darkblue;">{}</b><br>
"#,
        marker.premises
    );
    match (marker.ord_vote_est, marker.dec_vote_est) {
        (None, None) => {
            popup.push_str(&format!("<b>Total votes:</b> {}<br>\n", marker.total_votes()));
        }
        (o, d) => {
            popup.push_str(&format!(
                "<b>Estimated Ordinary Votes:</b> {}<br>\n<b>Estimated Declaration Votes:</b> {}<br>\n",
                o.unwrap_or(0),
                d.unwrap_or(0)
            ));
            if let Some(access) = marker.wheelchair {
                popup.push_str(&format!("<b>Wheelchair Access:</b> {}<br>\n", access.label()));
            }
        }
    }
    match marker.totals.as_ref() {
        Some(totals) => {
            for (category, count) in totals.iter() {
                popup.push_str(&format!(
                    "<b>Last election {} primary:</b> {}<br>\n",
                    category.label(),
                    count.0
                ));
            }
        }
        None => {
            popup.push_str("New booth/No primary votes recorded<br>\n");
        }
    }
    popup.push_str("</div>");
    popup
}

fn pies_legend() -> String {
    let mut body = size_legend_rows();
    body.push_str("<b>Party primary votes at last election:</b><br>\n");
    for category in PartyCategory::ALL.iter() {
        body.push_str(&legend_row(category.colour(), 15, category.label()));
    }
    body.push_str(
        r#"<div style="display: flex; align-items: center;">
    <div style="background:grey; border: 2px solid black; width: 15px; height: 15px; border-radius: 50%; margin-right: 5px;"></div>
    New booth/No primary votes recorded
</div>
"#,
    );
    legend_block(&body)
}

/// The pie map document. Booths with vote data become pie icons, the others
/// degrade to a plain grey circle with a black outline.
pub fn pie_map_document(markers: &[BoothMarker], division: &str) -> PipelineResult<String> {
    ensure!(!markers.is_empty(), NoLocationsSnafu { division });

    let centre = (
        median(markers.iter().map(|m| m.latitude).collect()),
        median(markers.iter().map(|m| m.longitude).collect()),
    );

    let mut markers_js = String::new();
    for marker in markers.iter() {
        let radius = marker.radius();
        let popup = js_str(&pie_popup(marker));
        match marker.totals.as_ref() {
            Some(totals) if !totals.is_empty() => {
                let diameter = radius * 2.0;
                markers_js.push_str(&format!(
                    "L.marker([{lat:.6}, {long:.6}], {{ icon: L.divIcon({{ html: {svg}, className: \"\", iconSize: [{d:.0}, {d:.0}], iconAnchor: [{r:.0}, {r:.0}] }}) }}).addTo(map).bindPopup({popup}, {{ maxWidth: 300 }});\n",
                    lat = marker.latitude,
                    long = marker.longitude,
                    svg = js_str(&pie_svg(totals, radius)),
                    d = diameter,
                    r = radius,
                    popup = popup,
                ));
            }
            _ => {
                markers_js.push_str(&format!(
                    "L.circleMarker([{lat:.6}, {long:.6}], {{ radius: {radius:.1}, color: \"black\", fillColor: \"grey\", fill: true, fillOpacity: 0.6 }}).addTo(map).bindPopup({popup}, {{ maxWidth: 300 }});\n",
                    lat = marker.latitude,
                    long = marker.longitude,
                    radius = radius,
                    popup = popup,
                ));
            }
        }
    }

    let title = format!("Division of {}: primary vote at the last election", division);
    Ok(leaflet_document(&title, centre, &markers_js, &pies_legend()))
}

pub fn create_map_with_pie_charts(
    markers: &[BoothMarker],
    division: &str,
    file_name: &str,
    out_dir: &Path,
) -> PipelineResult<PathBuf> {
    let document = pie_map_document(markers, division)?;
    write_map(out_dir, file_name, &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use booth_tally::VoteCount;

    fn totals(labor: u64, liberal: u64) -> CategoryTotals {
        let mut t = CategoryTotals::new();
        t.add(PartyCategory::Labor, VoteCount(labor));
        t.add(PartyCategory::Liberal, VoteCount(liberal));
        t
    }

    fn marker(premises: &str, totals: Option<CategoryTotals>) -> BoothMarker {
        BoothMarker {
            premises: premises.to_string(),
            latitude: -33.8732,
            longitude: 151.2065,
            wheelchair: None,
            ord_vote_est: None,
            dec_vote_est: None,
            totals,
        }
    }

    #[test]
    fn pie_has_one_slice_per_nonzero_category() {
        let svg = pie_svg(&totals(120, 80), 10.0);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("fill=\"red\""));
        assert!(svg.contains("fill=\"blue\""));
        assert!(!svg.contains("fill=\"green\""));
    }

    #[test]
    fn pie_with_a_single_category_is_a_full_disc() {
        let svg = pie_svg(&totals(100, 0), 10.0);
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.contains("<circle"));
        assert!(svg.contains("fill=\"red\""));
    }

    #[test]
    fn booths_without_votes_degrade_to_grey_circles() {
        let markers = vec![
            marker("Town Hall", Some(totals(120, 80))),
            marker("New Hall", None),
        ];
        let doc = pie_map_document(&markers, "Sydney").unwrap();
        assert!(doc.contains("L.divIcon"));
        assert!(doc.contains("fillColor: \"grey\""));
        assert!(doc.contains("New booth/No primary votes recorded"));
    }

    #[test]
    fn empty_marker_set_is_an_error() {
        assert!(pie_map_document(&[], "Sydney").is_err());
    }

    #[test]
    fn file_name_conventions() {
        assert_eq!(
            pie_file_name("Wentworth"),
            "Division_of_Wentworth_expected_polling_day_locations_primary_vote_last_election.html"
        );
        assert_eq!(
            pre_poll_file_name("Wentworth"),
            "Division_of_Wentworth_pre_polling_primary_vote_last_election.html"
        );
    }
}
