// Shared scaffolding for the Leaflet map documents.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use snafu::ResultExt;

use crate::pipeline::{PipelineResult, WritingOutputSnafu};

pub const MAP_ZOOM: f64 = 13.5;

/// The median of the plotted coordinates, used to centre the map.
pub fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Quotes a string as a JavaScript string literal. `<` is escaped so that
/// popup content cannot terminate the surrounding script element.
pub fn js_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '<' => out.push_str("\\u003c"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// One colour swatch line of a legend.
pub fn legend_row(colour: &str, size_px: u32, text: &str) -> String {
    format!(
        r#"<div style="display: flex; align-items: center;">
    <div style="background:{colour}; width: {size_px}px; height: {size_px}px; border-radius: 50%; margin-right: 5px;"></div>
    {text}
</div>
"#
    )
}

/// The circle-size scale shared by all the maps.
pub fn size_legend_rows() -> String {
    let mut rows = String::from("<b>Circle Size (Voter Estimate):</b><br>\n");
    rows.push_str(&legend_row("gray", 10, "~500 votes"));
    rows.push_str(&legend_row("gray", 20, "~1,000 votes"));
    rows.push_str(&legend_row("gray", 40, "~2,000 votes"));
    rows
}

/// The fixed legend box in the lower left corner of a map.
pub fn legend_block(body: &str) -> String {
    format!(
        r#"<div style="position: fixed;
            bottom: 40px; left: 40px; width: 280px; height: auto;
            background-color: white; z-index: 9999;
            font-size: 14px; padding: 10px;
            border-radius: 8px; box-shadow: 2px 2px 5px rgba(0,0,0,0.3);">
<b>Polling Booth Legend</b><br>
{body}</div>
"#
    )
}

/// Assembles a self-contained Leaflet map document.
pub fn leaflet_document(
    title: &str,
    centre: (f64, f64),
    markers_js: &str,
    legend_html: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
{legend_html}<script>
var map = L.map("map", {{ zoomSnap: 0.5 }}).setView([{lat:.6}, {long:.6}], {zoom});
L.tileLayer("https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
    maxZoom: 19,
    attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
{markers_js}</script>
</body>
</html>
"#,
        title = title,
        legend_html = legend_html,
        lat = centre.0,
        long = centre.1,
        zoom = MAP_ZOOM,
        markers_js = markers_js,
    )
}

pub fn write_map(out_dir: &Path, file_name: &str, contents: &str) -> PipelineResult<PathBuf> {
    let path = out_dir.join(file_name);
    fs::write(&path, contents).context(WritingOutputSnafu {
        path: path.display().to_string(),
    })?;
    info!("Map has been saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_odd_and_even_sets() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(median(vec![5.0]), 5.0);
    }

    #[test]
    fn js_str_escapes_quotes_and_tags() {
        assert_eq!(js_str(r#"St Mary's "Hall""#), r#""St Mary's \"Hall\"""#);
        assert_eq!(js_str("</script>"), "\"\\u003c/script>\"");
        assert_eq!(js_str("a\\b"), r#""a\\b""#);
    }

    #[test]
    fn document_contains_centre_and_markers() {
        let doc = leaflet_document(
            "Test map",
            (-33.87, 151.21),
            "L.circleMarker([0, 0]).addTo(map);\n",
            &legend_block("legend body"),
        );
        assert!(doc.contains("setView([-33.870000, 151.210000], 13.5)"));
        assert!(doc.contains("L.circleMarker([0, 0])"));
        assert!(doc.contains("Polling Booth Legend"));
        assert!(doc.contains("legend body"));
    }
}
