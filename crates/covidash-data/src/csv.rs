//! Plain comma-split parsing of the case-data CSV.
//!
//! The provider never quotes fields, so a full CSV reader buys nothing here;
//! every function below works on fixed column offsets.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Column offsets in a raw line (date still present).
pub const COL_AREA_CODE: usize = 0;
pub const COL_AREA_NAME: usize = 1;
pub const COL_AREA_TYPE: usize = 2;
pub const COL_DATE: usize = 3;
pub const COL_CUM_DEATHS: usize = 4;
pub const COL_HOSPITAL_CASES: usize = 5;
pub const COL_NEW_CASES: usize = 6;

/// One reporting date's fields with the date column removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    fields: Vec<String>,
}

impl CaseRecord {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn area_code(&self) -> Option<&str> {
        self.get(COL_AREA_CODE)
    }

    pub fn area_name(&self) -> Option<&str> {
        self.get(COL_AREA_NAME)
    }

    pub fn area_type(&self) -> Option<&str> {
        self.get(COL_AREA_TYPE)
    }

    // Offsets below shift left by one because the date column is gone.
    pub fn cumulative_deaths(&self) -> Option<u64> {
        self.number(COL_CUM_DEATHS - 1)
    }

    pub fn hospital_cases(&self) -> Option<u64> {
        self.number(COL_HOSPITAL_CASES - 1)
    }

    pub fn new_cases(&self) -> Option<u64> {
        self.number(COL_NEW_CASES - 1)
    }

    fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    fn number(&self, idx: usize) -> Option<u64> {
        self.get(idx).and_then(|f| f.trim().parse().ok())
    }
}

/// Split a response body into lines, keeping blank ones so row offsets match
/// the provider's layout.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|l| l.trim_end_matches('\r').to_string()).collect()
}

/// Build a date-keyed map from raw CSV text.
///
/// Blank lines, the header row and lines too short to carry a date are skipped.
pub fn convert_csv_to_dict(text: &str) -> BTreeMap<String, CaseRecord> {
    let mut out = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let mut fields: Vec<String> = line.split(',').map(str::to_string).collect();
        if fields.len() <= COL_DATE {
            debug!(line = %line, "skipping short CSV line");
            continue;
        }
        let date = fields.remove(COL_DATE);
        if date == "date" {
            continue;
        }
        out.insert(date, CaseRecord { fields });
    }
    out
}

/// Read a CSV file into lines.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; older
/// exports of the file were written in a Windows code page.
pub async fn parse_csv_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    Ok(split_lines(&String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
areaCode,areaName,areaType,date,cumDailyNsoDeathsByDeathDate,hospitalCases,newCasesBySpecimenDate
E07000041,Exeter,ltla,2021-10-28,,,120

E07000041,Exeter,ltla,2021-10-27,210,14,98
short,line
";

    #[test]
    fn keys_by_date_and_drops_date_column() {
        let map = convert_csv_to_dict(SAMPLE);
        assert_eq!(map.len(), 2);

        let rec = &map["2021-10-27"];
        assert_eq!(rec.fields().len(), 6);
        assert_eq!(rec.area_name(), Some("Exeter"));
        assert_eq!(rec.area_type(), Some("ltla"));
        assert_eq!(rec.cumulative_deaths(), Some(210));
        assert_eq!(rec.hospital_cases(), Some(14));
        assert_eq!(rec.new_cases(), Some(98));
    }

    #[test]
    fn empty_fields_read_as_none() {
        let map = convert_csv_to_dict(SAMPLE);
        let rec = &map["2021-10-28"];
        assert_eq!(rec.area_code(), Some("E07000041"));
        assert_eq!(rec.cumulative_deaths(), None);
        assert_eq!(rec.hospital_cases(), None);
        assert_eq!(rec.new_cases(), Some(120));
    }

    #[test]
    fn split_lines_keeps_blank_rows() {
        let lines = split_lines(SAMPLE);
        assert_eq!(lines.len(), 5);
        assert!(lines[2].is_empty());
    }

    #[test]
    fn split_lines_strips_carriage_returns() {
        let lines = split_lines("a,b\r\nc,d\r\n");
        assert_eq!(lines, vec!["a,b", "c,d"]);
    }

    #[tokio::test]
    async fn parse_csv_file_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let lines = parse_csv_file(&path).await.unwrap();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("areaCode"));
    }
}
