use super::lines::{classify, clean_data, clean_name, LineKind};

/// Name/line1/line2 triple before the catalog number is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTle {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

/// Partially assembled record between lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pending {
    pub name: Option<String>,
    pub line1: Option<String>,
}

/// Line-at-a-time state machine. Every non-continuing line resets `pending`.
#[derive(Debug, Default)]
pub struct Assembler {
    pending: Pending,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    /// Feed one raw line; returns a record when a line 2 completes one.
    pub fn push(&mut self, line: &str) -> Option<RawTle> {
        match classify(line) {
            LineKind::Data1 => {
                self.pending.line1 = Some(clean_data(line).to_string());
                None
            }
            LineKind::Data2 => {
                let Pending { name, line1 } = std::mem::take(&mut self.pending);
                line1.map(|line1| RawTle {
                    name,
                    line1,
                    line2: clean_data(line).to_string(),
                })
            }
            LineKind::Name => {
                self.pending = Pending {
                    name: Some(clean_name(line).to_string()),
                    line1: None,
                };
                None
            }
        }
    }
}

/// Lazy record stream over feed lines. Incomplete records are dropped.
pub struct RawTles<I> {
    lines: I,
    assembler: Assembler,
}

impl<'a, I> Iterator for RawTles<I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = RawTle;

    fn next(&mut self) -> Option<RawTle> {
        for line in self.lines.by_ref() {
            if let Some(raw) = self.assembler.push(line) {
                return Some(raw);
            }
        }
        None
    }
}

pub fn split_records(raw: &str) -> RawTles<std::str::Lines<'_>> {
    assemble(raw.lines())
}

pub fn assemble<'a, I>(lines: I) -> RawTles<I>
where
    I: Iterator<Item = &'a str>,
{
    RawTles {
        lines,
        assembler: Assembler::new(),
    }
}
