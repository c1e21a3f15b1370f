//! Batch input: `;`-delimited CSV rows of `role;payload`.

/// Field separator of the batch CSV.
pub const DELIMITER: u8 = b';';

/// One usable CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// One-based physical line in the input where the row starts, blank
    /// lines included. Used in error messages.
    pub line: u64,
    /// First field, trimmed. Selects the colour and output directory.
    pub role: String,
    /// Second field, trimmed. The text to encode.
    pub payload: String,
}

impl Record {
    /// Build a record from a CSV row, or `None` if the row has fewer
    /// than two fields. Extra fields are ignored.
    fn from_row(row: &csv::StringRecord, lines: &mut LineCounter<'_>) -> Option<Self> {
        let (Some(role), Some(payload)) = (row.get(0), row.get(1)) else {
            return None;
        };
        Some(Self {
            line: row.position().map_or(0, |pos| lines.line_at(pos.byte())),
            role: role.trim().to_owned(),
            payload: payload.trim().to_owned(),
        })
    }
}

/// Maps byte offsets to physical line numbers.
///
/// The CSV reader skips blank lines without counting them, so lines are
/// counted from the raw input instead. Offsets must be queried in
/// increasing order.
struct LineCounter<'a> {
    input: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
        }
    }

    /// Line of the first row byte at or after `byte`.
    ///
    /// The reader reports a row's position before any blank lines it
    /// skipped, and a row never starts with a line break, so those are
    /// stepped over first.
    fn line_at(&mut self, byte: u64) -> u64 {
        let byte = usize::try_from(byte)
            .unwrap_or(usize::MAX)
            .min(self.input.len());
        let start = byte
            + self.input[byte..]
                .iter()
                .take_while(|&&b| b == b'\r' || b == b'\n')
                .count();
        if start > self.offset {
            let newlines = self.input[self.offset..start]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += u64::try_from(newlines).unwrap_or(u64::MAX);
            self.offset = start;
        }
        self.line
    }
}

/// Iterate over the usable rows of a batch CSV.
///
/// The first row is a header and is skipped. Blank lines are skipped.
/// Rows may have any number of fields; those with fewer than two are
/// skipped.
pub fn records(input: &[u8]) -> impl Iterator<Item = Result<Record, csv::Error>> {
    let mut lines = LineCounter::new(input);
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
        .into_records()
        .filter_map(move |row| match row {
            Ok(row) => Record::from_row(&row, &mut lines).map(Ok),
            Err(e) => Some(Err(e)),
        })
}
