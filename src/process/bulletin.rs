use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Leading lines of every bulletin page that carry column headings and
/// boilerplate rather than data.
pub const HEADER_LINES: usize = 6;

/// A data row carries at least date, time, lat, lon, depth, three magnitude
/// columns and a location.
pub const MIN_TOKENS: usize = 9;

/// Years the listing endpoints cover; rows outside these are stale entries
/// the site keeps at the bottom of the page.
pub const ACCEPTED_YEARS: [i32; 2] = [2023, 2024];

const DATE_FORMAT: &str = "%Y.%m.%d";

/// One earthquake event parsed from a bulletin row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeRecord {
    pub date: NaiveDate,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    /// The ML column. The listing publishes MD/ML/Mw side by side; ML is
    /// the one the observatory headlines.
    pub magnitude: f64,
    pub location: String,
}

/// Parse a raw bulletin listing into records.
///
/// The first [`HEADER_LINES`] lines are dropped positionally; every
/// remaining line is parsed independently and rows that do not yield a
/// valid record are skipped. Output order follows input order, which is
/// the published reverse-chronological order.
pub fn parse_bulletin(raw: &str) -> Vec<EarthquakeRecord> {
    raw.lines()
        .skip(HEADER_LINES)
        .filter_map(parse_line)
        .collect()
}

/// Parse a single bulletin row, or `None` if the row is malformed.
///
/// Token layout of a data row:
/// `date time lat lon depth MD ML Mw location... [quality]`
/// Everything from the ninth token onward is free-text location; the
/// trailing solution-quality tag stays part of it.
fn parse_line(line: &str) -> Option<EarthquakeRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_TOKENS {
        return None;
    }

    let date = NaiveDate::parse_from_str(tokens[0], DATE_FORMAT).ok()?;
    if !ACCEPTED_YEARS.contains(&date.year()) {
        return None;
    }

    let latitude: f64 = tokens[2].parse().ok()?;
    let longitude: f64 = tokens[3].parse().ok()?;
    let depth_km: f64 = tokens[4].parse().ok()?;
    let magnitude: f64 = tokens[6].parse().ok()?;

    Some(EarthquakeRecord {
        date,
        time: tokens[1].to_string(),
        latitude,
        longitude,
        depth_km,
        magnitude,
        location: tokens[8..].join(" "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "KANDILLI RASATHANESI VE DEPREM ARASTIRMA ENSTITUSU\n\
        BOLGESEL DEPREM-TSUNAMI IZLEME VE DEGERLENDIRME MERKEZI\n\
        \n\
        SON DEPREMLER\n\
        \n\
        Tarih      Saat      Enlem(N)  Boylam(E) Derinlik(km)  MD   ML   Mw    Yer\n";

    fn bulletin_with_rows(rows: &[&str]) -> String {
        format!("{}{}", HEADER, rows.join("\n"))
    }

    #[test]
    fn header_only_input_yields_nothing() {
        assert!(parse_bulletin(HEADER).is_empty());
    }

    #[test]
    fn input_shorter_than_header_yields_nothing() {
        assert!(parse_bulletin("one\ntwo\nthree").is_empty());
        assert!(parse_bulletin("").is_empty());
    }

    #[test]
    fn parses_valid_row_at_stated_positions() {
        let raw = bulletin_with_rows(&[
            "2024.01.05 10:15:32  38.2083   27.1045        7.0      -.-  2.8  -.-   TURGUTLU (MANISA) Ilksel",
        ]);
        let records = parse_bulletin(&raw);
        assert_eq!(records.len(), 1);

        let rec = &records[0];
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(rec.time, "10:15:32");
        assert_eq!(rec.latitude, 38.2083);
        assert_eq!(rec.longitude, 27.1045);
        assert_eq!(rec.depth_km, 7.0);
        assert_eq!(rec.magnitude, 2.8);
        assert_eq!(rec.location, "TURGUTLU (MANISA) Ilksel");
    }

    #[test]
    fn exactly_nine_tokens_is_enough() {
        let raw = bulletin_with_rows(&["2023.11.20 03:04:05 39.1 28.2 5.4 2.1 2.3 1.9 SIMAV"]);
        let records = parse_bulletin(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].magnitude, 2.3);
        assert_eq!(records[0].location, "SIMAV");
    }

    #[test]
    fn skips_rows_with_too_few_tokens() {
        let raw = bulletin_with_rows(&["2024.01.05 10:15:32 38.2 27.1 7.0 2.8"]);
        assert!(parse_bulletin(&raw).is_empty());
    }

    #[test]
    fn skips_rows_outside_accepted_years() {
        let raw = bulletin_with_rows(&[
            "2022.05.01 00:00:00 38.0 27.0 5.0 2.0 2.2 1.8 OLD EVENT",
            "2023.05.01 00:00:00 38.0 27.0 5.0 2.0 2.2 1.8 KEPT EVENT",
        ]);
        let records = parse_bulletin(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "KEPT EVENT");
    }

    #[test]
    fn skips_rows_with_non_numeric_fields() {
        let raw = bulletin_with_rows(&[
            "2024.01.05 10:15:32 abc 27.1 7.0 2.5 2.8 2.6 BAD LATITUDE",
            "2024.01.05 10:15:32 38.2 27.1 deep 2.5 2.8 2.6 BAD DEPTH",
            "2024.01.05 10:15:32 38.2 27.1 7.0 2.5 -.- 2.6 BAD MAGNITUDE",
        ]);
        assert!(parse_bulletin(&raw).is_empty());
    }

    #[test]
    fn skips_rows_with_unparseable_dates() {
        let raw = bulletin_with_rows(&[
            "2024-01-05 10:15:32 38.2 27.1 7.0 2.5 2.8 2.6 WRONG SEPARATOR",
            "2024.13.05 10:15:32 38.2 27.1 7.0 2.5 2.8 2.6 BAD MONTH",
        ]);
        assert!(parse_bulletin(&raw).is_empty());
    }

    #[test]
    fn keeps_input_order() {
        let raw = bulletin_with_rows(&[
            "2024.03.02 10:00:00 38.0 27.0 5.0 2.0 3.1 1.8 FIRST",
            "2024.03.01 09:00:00 38.0 27.0 5.0 2.0 3.2 1.8 SECOND",
            "2023.12.31 08:00:00 38.0 27.0 5.0 2.0 3.3 1.8 THIRD",
        ]);
        let locations: Vec<_> = parse_bulletin(&raw)
            .into_iter()
            .map(|r| r.location)
            .collect();
        assert_eq!(locations, vec!["FIRST", "SECOND", "THIRD"]);
    }
}
