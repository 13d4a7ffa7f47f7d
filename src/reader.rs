use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::rc::Rc;
use std::str;

use crate::error::{Error, RecordError, Result};
use crate::record::VariantRecord;
use crate::types::{Header, FILE_SIGNATURE};

/// Iterator over the data lines of a VCF file.
///
/// Construction consumes everything up to and including the `#CHROM` line;
/// afterwards each item is one parsed data line. Record-level problems are
/// yielded as [`Error::Record`] and iteration may continue past them.
pub struct VcfRecords<R: BufRead> {
    header: Rc<Header>,
    line_buf: Vec<u8>,
    line_number: usize,
    inner: R,
}

impl<R: BufRead> VcfRecords<R> {
    pub fn header(&self) -> &Header {
        self.header.as_ref()
    }

    /// Line number of the most recently read line, 1-based.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl VcfRecords<BufReader<Box<dyn Read>>> {
    /// Opens a plain, gzip or bzip2 compressed VCF file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (reader, _format) = niffler::from_path(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        let reader: Box<dyn Read> = reader;
        Self::new(BufReader::new(reader))
    }
}

impl<R: BufRead> VcfRecords<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let mut line = String::new();
        let mut line_number = 0;

        // the first non-empty line has to identify the file as VCF
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(Error::MissingSignature);
            }
            line_number += 1;
            if !line.trim().is_empty() {
                break;
            }
        }
        if !line.contains(FILE_SIGNATURE) {
            return Err(Error::MissingSignature);
        }
        let mut meta = vec![line.trim_end().to_owned()];

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(Error::MissingHeader);
            }
            line_number += 1;
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            } else if trimmed.starts_with("##") {
                meta.push(trimmed.to_owned());
            } else if trimmed.starts_with('#') {
                let header = Header::from_line(trimmed, meta)?;
                return Ok(Self {
                    header: Rc::new(header),
                    line_buf: Vec::new(),
                    line_number,
                    inner: reader,
                });
            } else {
                return Err(Error::MalformedHeader {
                    line_number,
                    line: trimmed.to_owned(),
                });
            }
        }
    }
}

impl<R: BufRead> Iterator for VcfRecords<R> {
    type Item = Result<VariantRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_buf.clear();
            match self.inner.read_until(b'\n', &mut self.line_buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;
            if self.line_buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let line_number = self.line_number;
            let record = str::from_utf8(&self.line_buf)
                .map_err(RecordError::from)
                .and_then(|line| VariantRecord::parse(self.header.clone(), line));
            return Some(record.map_err(|source| Error::Record {
                line_number,
                source,
            }));
        }
    }
}
