//! # Record Framing
//!
//! Helper đọc file record dạng line-oriented: dòng đầu là số record,
//! sau đó mỗi giá trị một dòng. LineReader đếm dòng để lỗi Malformed
//! chỉ đúng vị trí hỏng.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, Utc};
use std::io::BufRead;
use std::str::FromStr;

pub(crate) struct LineReader<R> {
    lines: std::io::Lines<R>,
    file: String,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R, file: &str) -> Self {
        Self {
            lines: reader.lines(),
            file: file.to_string(),
            line_no: 0,
        }
    }

    /// Dòng kế tiếp; hết file giữa record là lỗi format.
    ///
    /// trim_end để file CRLF vẫn đọc được.
    pub fn next_line(&mut self) -> PersistenceResult<String> {
        self.line_no += 1;
        match self.lines.next() {
            Some(line) => Ok(line?.trim_end().to_string()),
            None => Err(PersistenceError::malformed(
                &self.file,
                self.line_no,
                "unexpected end of file",
            )),
        }
    }

    /// Đọc một dòng rồi parse thành `T`
    pub fn parse<T: FromStr>(&mut self, field: &str) -> PersistenceResult<T> {
        let raw = self.next_line()?;
        raw.parse::<T>().map_err(|_| {
            PersistenceError::malformed(
                &self.file,
                self.line_no,
                format!("invalid {}: {}", field, raw),
            )
        })
    }

    /// Đọc một dòng epoch seconds thành `DateTime<Utc>`
    pub fn epoch(&mut self, field: &str) -> PersistenceResult<DateTime<Utc>> {
        let secs: i64 = self.parse(field)?;
        DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            PersistenceError::malformed(
                &self.file,
                self.line_no,
                format!("invalid {}: {}", field, secs),
            )
        })
    }

    /// Số dòng vừa đọc
    pub fn line(&self) -> usize {
        self.line_no
    }

    /// Tên file đang đọc
    pub fn file(&self) -> &str {
        &self.file
    }
}
