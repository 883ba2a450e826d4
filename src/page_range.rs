use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Inclusive, 1-based page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start == 0 {
            return Err(Error::InvalidRange("page numbers start at 1".into()));
        }
        if end < start {
            return Err(Error::InvalidRange(format!("{start}-{end} is reversed")));
        }
        Ok(Self { start, end })
    }

    pub fn single(page: u32) -> Result<Self> {
        Self::new(page, page)
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PageRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let number = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| Error::InvalidRange(format!("\"{}\" is not a page number", part.trim())))
        };
        match s.split_once('-') {
            Some((start, end)) => Self::new(number(start)?, number(end)?),
            None => Self::single(number(s)?),
        }
    }
}

/// Parses `start-end[,start-end...]` or single page numbers.
pub fn parse_ranges(input: &str) -> Result<Vec<PageRange>> {
    if input.trim().is_empty() {
        return Err(Error::InvalidRange("no pages given".into()));
    }
    input.split(',').map(str::parse).collect()
}

/// Like [`parse_ranges`], but also rejects pages past `page_count`.
pub fn parse_ranges_for(input: &str, page_count: usize) -> Result<Vec<PageRange>> {
    let ranges = parse_ranges(input)?;
    if let Some(range) = ranges.iter().find(|r| r.end as usize > page_count) {
        return Err(Error::PageOutOfRange {
            page: range.end as usize,
            total: page_count,
        });
    }
    Ok(ranges)
}
