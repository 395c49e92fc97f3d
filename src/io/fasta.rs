use anyhow::Result;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        // Find header line
        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                self.buf.clear();
                let n = self.reader.read_line(&mut self.buf)?;
                if n == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if self.buf.starts_with('>') {
                    let h = self.buf[1..].trim().to_string();
                    break h;
                }
            }
        };

        // Parse id and description
        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // Read sequence lines
        let mut seq: Vec<u8> = Vec::new();
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if self.buf.starts_with('>') {
                let h = self.buf[1..].trim().to_string();
                self.peek_header = Some(h);
                break;
            }
            // case is kept: the index alphabet decides which symbols are legal
            seq.extend(
                self.buf
                    .bytes()
                    .filter(|&b| !matches!(b, b'\n' | b'\r' | b' ' | b'\t')),
            );
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }
}

/// Read the first record of a FASTA file as the index reference.
/// Further records are ignored with a warning; the index holds one sequence.
pub fn read_reference<P: AsRef<Path>>(path: P) -> Result<FastaRecord> {
    let path = path.as_ref();
    let fh = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("cannot open reference FASTA '{}': {}", path.display(), e))?;
    let mut reader = FastaReader::new(std::io::BufReader::new(fh));

    let Some(rec) = reader.next_record()? else {
        anyhow::bail!("FASTA file '{}' contains no sequences", path.display());
    };
    if rec.seq.is_empty() {
        anyhow::bail!("first FASTA record '{}' in '{}' is empty", rec.id, path.display());
    }
    let mut skipped = 0usize;
    while reader.next_record()?.is_some() {
        skipped += 1;
    }
    if skipped > 0 {
        log::warn!(
            "'{}' holds {} more record(s); only '{}' is indexed",
            path.display(),
            skipped,
            rec.id
        );
    }
    Ok(rec)
}
