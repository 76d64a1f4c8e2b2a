use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::warn;
use num_bigint::BigInt;

use crate::error::{Error, Result, Side};

/// One input record: the coefficients before and after the transform.
/// The separator line that follows them is consumed and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based position in the input.
    pub index: usize,
    pub old: Vec<BigInt>,
    pub new: Vec<BigInt>,
}

pub struct RecordIterator<R: BufRead> {
    reader: R,
    line: String,
    next_index: usize,
}

impl<R: BufRead> RecordIterator<R> {
    pub fn new(reader: R) -> Self {
        RecordIterator {
            reader,
            line: String::new(),
            next_index: 1,
        }
    }

    /// Reads the next line into the internal buffer. Returns false at end of input.
    fn read_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        Ok(self.reader.read_line(&mut self.line)? != 0)
    }

    fn read_coefficients(&mut self, record: usize, side: Side) -> Result<Vec<BigInt>> {
        if !self.read_line()? {
            let line = match side {
                Side::Old => "old",
                Side::New => "new",
            };
            return Err(Error::UnexpectedEof { record, line });
        }
        parse_coefficients(&self.line, record, side)
    }

    fn read_record(&mut self, record: usize) -> Result<Record> {
        let old = self.read_coefficients(record, Side::Old)?;
        let new = self.read_coefficients(record, Side::New)?;
        if !self.read_line()? {
            return Err(Error::UnexpectedEof {
                record,
                line: "separator",
            });
        }
        Ok(Record {
            index: record,
            old,
            new,
        })
    }
}

impl<R: BufRead> Iterator for RecordIterator<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        // A clean end of input is only possible on a record boundary.
        match self.reader.fill_buf() {
            Ok([]) => return None,
            Ok(_) => {}
            Err(e) => return Some(Err(e.into())),
        }
        let record = self.next_index;
        self.next_index += 1;
        Some(self.read_record(record))
    }
}

/// Splits a comma-separated line and parses every token but the last one,
/// which for a comma-terminated line is the empty artifact after the final comma.
pub fn parse_coefficients(line: &str, record: usize, side: Side) -> Result<Vec<BigInt>> {
    let mut tokens: Vec<&str> = line.split(',').collect();
    if let Some(dropped) = tokens.pop() {
        if !dropped.trim().is_empty() {
            warn!("record {record}: dropping trailing {side} token {dropped:?}, line has no terminating comma");
        }
    }

    tokens
        .into_iter()
        .map(|token| {
            let token = token.trim();
            token
                .parse::<BigInt>()
                .map_err(|source| Error::ParseCoefficient {
                    record,
                    side,
                    token: token.to_string(),
                    source,
                })
        })
        .collect()
}

/// Opens the given file and returns an iterator over its records.
pub fn iter_file_records<P: AsRef<Path>>(path: P) -> Result<RecordIterator<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(RecordIterator::new(BufReader::new(file)))
}
