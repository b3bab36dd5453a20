//! Attendee roster reader.
//!
//! The roster is a CSV file with a header row, one attendee per line:
//!
//! ```text
//! ,RegDate,first_Name,last_Name,Email_Address,HomePhone,Street,City,State,Zipcode
//! 1,11/12/08 10:47,Allison,Nguyen,arannon@jumpstartlab.com,6154385000,...,20010
//! ```
//!
//! Headers are matched after normalization (`RegDate` → `regdate`,
//! `first_Name` → `first_name`), so capitalization and stray punctuation in
//! exported files do not matter. The attendee id is always column 0,
//! whatever its header says.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::logging::targets;
use crate::model::{AttendeeRecord, RosterError};

const COL_FIRST_NAME: &str = "first_name";
const COL_ZIPCODE: &str = "zipcode";
const COL_REGDATE: &str = "regdate";
const COL_PHONE: [&str; 2] = ["home_phone", "homephone"];

/// Normalizes a header cell: lower-case, punctuation dropped, whitespace
/// runs collapsed to `_`.
pub fn normalize_header(header: &str) -> String {
    let kept: String = header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Positions of the columns the processor reads.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Columns {
    first_name: Option<usize>,
    zipcode: Option<usize>,
    phone: Option<usize>,
    regdate: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, RosterError> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (normalize_header(h), i))
            .collect();

        let regdate = *index.get(COL_REGDATE).ok_or(RosterError::MissingColumn {
            column: COL_REGDATE,
        })?;

        let columns = Columns {
            first_name: index.get(COL_FIRST_NAME).copied(),
            zipcode: index.get(COL_ZIPCODE).copied(),
            phone: COL_PHONE.iter().find_map(|c| index.get(*c).copied()),
            regdate,
        };

        if columns.first_name.is_none() {
            log::warn!(target: targets::ROSTER, "roster has no '{}' column", COL_FIRST_NAME);
        }
        if columns.zipcode.is_none() {
            log::warn!(target: targets::ROSTER, "roster has no '{}' column", COL_ZIPCODE);
        }
        Ok(columns)
    }
}

/// Streaming iterator over roster rows, in file order.
pub struct Roster<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    columns: Columns,
    /// Line of the most recently read record, for error messages.
    lineno: u64,
}

impl Roster<File> {
    pub fn open(path: &Path) -> Result<Self, RosterError> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|source| RosterError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_csv(reader)
    }
}

impl<R: Read> Roster<R> {
    pub fn from_reader(rdr: R) -> Result<Self, RosterError> {
        Self::from_csv(csv::ReaderBuilder::new().flexible(true).from_reader(rdr))
    }

    fn from_csv(mut reader: csv::Reader<R>) -> Result<Self, RosterError> {
        let headers = reader
            .headers()
            .map_err(|source| RosterError::Read { lineno: 1, source })?;
        let columns = Columns::from_headers(headers)?;
        log::debug!(target: targets::ROSTER, "roster columns: {:?}", columns);

        Ok(Roster {
            records: reader.into_records(),
            columns,
            lineno: 1,
        })
    }

    fn to_attendee(&self, record: &StringRecord, lineno: u64) -> Result<AttendeeRecord, RosterError> {
        let raw = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or_default();
        let trimmed = |idx: Option<usize>| raw(idx).trim().to_string();

        let registration = trimmed(Some(self.columns.regdate));
        if registration.is_empty() {
            return Err(RosterError::MissingField {
                lineno,
                column: COL_REGDATE,
            });
        }

        // Contact cells go to the normalizers untouched.
        Ok(AttendeeRecord {
            id: trimmed(Some(0)),
            first_name: trimmed(self.columns.first_name),
            raw_zipcode: raw(self.columns.zipcode).to_string(),
            raw_phone: self.columns.phone.map(|i| raw(Some(i)).to_string()),
            registration,
        })
    }
}

impl<R: Read> Iterator for Roster<R> {
    type Item = Result<AttendeeRecord, RosterError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.records.next()?;
        self.lineno += 1;
        let record = match next {
            Ok(record) => record,
            Err(source) => {
                return Some(Err(RosterError::Read {
                    lineno: self.lineno,
                    source,
                }));
            }
        };
        let lineno = record.position().map(|p| p.line()).unwrap_or(self.lineno);
        self.lineno = lineno;
        Some(self.to_attendee(&record, lineno))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
,RegDate,first_Name,last_Name,Email_Address,HomePhone,Street,City,State,Zipcode
1,11/12/08 10:47,Allison,Nguyen,arannon@jumpstartlab.com,6154385000,3155 19th St NW,Washington,DC,20010
2,11/12/08 13:23,SArah,Hankins,pinalevitsky@jumpstartlab.com,414-520-5000,2022 15th Street NW,Washington,DC,20009
3,11/12/08 13:30,Sarah,Xx,lqrm4462@jumpstartlab.com,(941)979-2000,4175 3rd Street North,Saint Petersburg,FL,33703
";

    fn read_all(text: &str) -> Vec<AttendeeRecord> {
        Roster::from_reader(text.as_bytes())
            .expect("headers should parse")
            .collect::<Result<Vec<_>, _>>()
            .expect("rows should parse")
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("RegDate"), "regdate");
        assert_eq!(normalize_header("first_Name"), "first_name");
        assert_eq!(normalize_header(" Home Phone "), "home_phone");
        assert_eq!(normalize_header("Zip-code!"), "zipcode");
        assert_eq!(normalize_header(""), "");
    }

    #[test]
    fn test_reads_rows_in_file_order() {
        let rows = read_all(SAMPLE);
        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_maps_columns_by_normalized_header() {
        let first = &read_all(SAMPLE)[0];
        assert_eq!(first.first_name, "Allison");
        assert_eq!(first.raw_zipcode, "20010");
        assert_eq!(first.raw_phone.as_deref(), Some("6154385000"));
        assert_eq!(first.registration, "11/12/08 10:47");
    }

    #[test]
    fn test_fields_are_kept_raw() {
        let second = &read_all(SAMPLE)[1];
        assert_eq!(second.first_name, "SArah", "names are not re-cased");
        assert_eq!(second.raw_phone.as_deref(), Some("414-520-5000"));
    }

    #[test]
    fn test_contact_cells_are_not_trimmed() {
        let text = "id,regdate,first_name,zipcode,homephone\n 1 ,1/1/20 9:00, Eli , 8401,615 438 5000 \n";
        let row = &read_all(text)[0];
        assert_eq!(row.id, "1");
        assert_eq!(row.first_name, "Eli");
        assert_eq!(row.raw_zipcode, " 8401", "zipcode reaches the normalizer as read");
        assert_eq!(row.raw_phone.as_deref(), Some("615 438 5000 "));
        assert_eq!(crate::clean::clean_zipcode(&row.raw_zipcode), " 8401");
    }

    #[test]
    fn test_missing_zipcode_cell_is_empty_string() {
        let text = ",RegDate,first_Name,Zipcode\n7,2/2/09 11:03,Eli,\n8,2/2/09 11:04,Ann\n";
        let rows = read_all(text);
        assert_eq!(rows[0].raw_zipcode, "");
        assert_eq!(rows[1].raw_zipcode, "", "short rows are tolerated");
    }

    #[test]
    fn test_roster_without_phone_column() {
        let text = "id,regdate,first_name,zipcode\n1,2/2/09 11:03,Eli,84044\n";
        assert_eq!(read_all(text)[0].raw_phone, None);
    }

    #[test]
    fn test_roster_without_regdate_column_is_rejected() {
        let result = Roster::from_reader("id,first_name,zipcode\n1,Eli,84044\n".as_bytes());
        assert!(matches!(
            result,
            Err(RosterError::MissingColumn { column: "regdate" })
        ));
    }

    #[test]
    fn test_row_without_regdate_reports_its_line() {
        let text = "id,regdate,first_name\n1,2/2/09 11:03,Eli\n2,,Ann\n";
        let rows: Vec<_> = Roster::from_reader(text.as_bytes()).unwrap().collect();
        assert!(rows[0].is_ok());
        match &rows[1] {
            Err(RosterError::MissingField { lineno, column }) => {
                assert_eq!(*lineno, 3);
                assert_eq!(*column, "regdate");
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_open_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Roster::open(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(RosterError::Open { .. })));
    }
}
