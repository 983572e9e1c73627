use crate::error::{AlignError, AlignResult};
use crate::seq::record::DEFAULT_ID;
use crate::seq::Sequence;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

/// How a record begins: a `>` header, or residues with no header at all.
enum Start {
    Header(String),
    Residues,
}

/// Streaming FASTA reader.
///
/// Blank lines are skipped and sequence lines are concatenated. Residues that
/// appear before any header form one record named `seq`. Input without a single
/// non-blank line yields one [`AlignError::FastaFormat`].
pub struct FastaRecords<R> {
    reader: R,
    line_no: usize,
    pending_header: Option<String>,
    buf_line: String,
    seq_buf: Vec<u8>,
    seen_content: bool,
    done: bool,
}

impl<R: BufRead> FastaRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            pending_header: None,
            buf_line: String::new(),
            seq_buf: Vec::new(),
            seen_content: false,
            done: false,
        }
    }

    /// Read one line into `buf_line`; `false` at end of input.
    fn read_line(&mut self) -> AlignResult<bool> {
        self.buf_line.clear();
        if self.reader.read_line(&mut self.buf_line)? == 0 {
            return Ok(false);
        }
        self.line_no += 1;
        Ok(true)
    }

    fn next_start(&mut self) -> AlignResult<Option<Start>> {
        if let Some(header) = self.pending_header.take() {
            return Ok(Some(Start::Header(header)));
        }

        while self.read_line()? {
            let line = self.buf_line.trim();
            if line.is_empty() {
                continue;
            }
            self.seen_content = true;
            if line.starts_with('>') {
                return Ok(Some(Start::Header(line.to_string())));
            }
            push_residues(&mut self.seq_buf, line);
            return Ok(Some(Start::Residues));
        }
        Ok(None)
    }

    fn read_record(&mut self) -> AlignResult<Option<Sequence>> {
        self.seq_buf.clear();
        let (id, desc) = match self.next_start()? {
            Some(Start::Header(line)) => parse_header(&line),
            Some(Start::Residues) => (DEFAULT_ID.into(), None),
            None if self.seen_content => return Ok(None),
            None => {
                return Err(AlignError::FastaFormat {
                    msg: "fasta input is empty",
                    line: self.line_no.max(1),
                })
            }
        };

        while self.read_line()? {
            let line = self.buf_line.trim();
            if line.starts_with('>') {
                self.pending_header = Some(line.to_string());
                break;
            }
            push_residues(&mut self.seq_buf, line);
        }

        let record = Sequence::new(id, &self.seq_buf);
        Ok(Some(match desc {
            Some(desc) => record.with_desc(desc),
            None => record,
        }))
    }
}

impl<R: BufRead> Iterator for FastaRecords<R> {
    type Item = AlignResult<Sequence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn push_residues(buf: &mut Vec<u8>, line: &str) {
    buf.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
}

/// Split `>id description`; a header with no id is named `seq`.
fn parse_header(line: &str) -> (Box<str>, Option<Box<str>>) {
    let header = line.strip_prefix('>').unwrap_or(line).trim();
    if header.is_empty() {
        return (DEFAULT_ID.into(), None);
    }
    match header.find(char::is_whitespace) {
        Some(idx) => {
            let desc = header[idx..].trim();
            let desc = if desc.is_empty() { None } else { Some(Box::from(desc)) };
            (Box::from(&header[..idx]), desc)
        }
        None => (header.into(), None),
    }
}

pub fn fasta_records_from_reader<R: BufRead>(reader: R) -> FastaRecords<R> {
    FastaRecords::new(reader)
}

pub fn read_fasta_from_reader<R: BufRead>(reader: R) -> AlignResult<Vec<Sequence>> {
    fasta_records_from_reader(reader).collect()
}

pub fn read_fasta_from_path(path: impl AsRef<Path>) -> AlignResult<Vec<Sequence>> {
    let file = File::open(path)?;
    read_fasta_from_reader(BufReader::new(file))
}

pub fn read_fasta_from_bytes(data: &[u8]) -> AlignResult<Vec<Sequence>> {
    read_fasta_from_reader(BufReader::new(Cursor::new(data)))
}

/// First record only; the rest of the input is not read.
pub fn read_first_from_reader<R: BufRead>(reader: R) -> AlignResult<Sequence> {
    match fasta_records_from_reader(reader).next() {
        Some(record) => record,
        None => Err(AlignError::FastaFormat {
            msg: "fasta input is empty",
            line: 1,
        }),
    }
}

pub fn read_first_from_path(path: impl AsRef<Path>) -> AlignResult<Sequence> {
    let file = File::open(path)?;
    read_first_from_reader(BufReader::new(file))
}

pub fn read_first_from_bytes(data: &[u8]) -> AlignResult<Sequence> {
    read_first_from_reader(BufReader::new(Cursor::new(data)))
}
