// Primitives for reading the AEC CSV exports.

use std::fs;

use snafu::ResultExt;

use crate::pipeline::{MissingTitleRowSnafu, OpeningCsvSnafu, PipelineResult};

/// Reads the whole CSV file. A missing input file halts the run.
pub fn read_csv_text(path: &str) -> PipelineResult<String> {
    fs::read_to_string(path).context(OpeningCsvSnafu { path })
}

/// Drops the title banner that the AEC downloads carry above the header row.
pub fn strip_title_line<'a>(text: &'a str, path: &str) -> PipelineResult<&'a str> {
    match text.split_once('\n') {
        Some((_, rest)) => Ok(rest),
        None => MissingTitleRowSnafu { path }.fail(),
    }
}

pub fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_line_is_dropped() {
        let text = "Some title banner\na,b\n1,2\n";
        let body = strip_title_line(text, "test.csv").unwrap();
        assert_eq!(body, "a,b\n1,2\n");
    }

    #[test]
    fn missing_title_line_is_an_error() {
        assert!(strip_title_line("no newline at all", "test.csv").is_err());
    }
}
