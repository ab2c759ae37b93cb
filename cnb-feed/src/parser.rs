//! Text-feed parser.
//!
//! Feed layout:
//! ```text
//! 25.12.2023 #249
//! Country|Currency|Amount|Code|Rate
//! Australia|dollar|1|AUD|15.123
//! ```
//! Line 0 is a free-text label, line 1 a `|`-delimited header naming the
//! columns in any order, every further line a data row. Malformed rows are
//! skipped; a bad structure or a feed without a single usable row is fatal.

use serde::Serialize;

use crate::rate::{ExchangeRate, FeedSnapshot};

const HEADER_PREVIEW_CHARS: usize = 100;

/// Feed-level failures. No partial snapshot is returned alongside any of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty response from CNB server")]
    EmptyFeed,

    #[error(
        "Invalid CNB response format. Expected at least 3 lines (date, header, data), received {lines} lines"
    )]
    TooShort { lines: usize },

    #[error(
        "Invalid CNB header. Expected columns: Country, Currency, Amount, Code, Rate. Got: {header}"
    )]
    BadHeader { header: String },

    #[error("No valid exchange rates found in CNB response")]
    NoValidRates,
}

/// Why a data row was left out of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooFewColumns,
    InvalidNumber,
}

/// A data row the parser dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// Zero-based position among the non-blank data rows
    pub row: usize,
    pub reason: SkipReason,
    pub content: String,
}

/// Parses a feed body into a snapshot.
pub fn parse(text: &str) -> Result<FeedSnapshot, ParseError> {
    parse_with_report(text).map(|(snapshot, _)| snapshot)
}

/// Parses a feed body and also returns the rows that were skipped.
pub fn parse_with_report(text: &str) -> Result<(FeedSnapshot, Vec<SkippedLine>), ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyFeed);
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let (date, header, rows) = match lines.as_slice() {
        [date, header, rows @ ..] if !rows.is_empty() => (*date, *header, rows),
        _ => {
            tracing::error!(lines = lines.len(), "Feed too short");
            return Err(ParseError::TooShort { lines: lines.len() });
        }
    };

    let columns = Columns::resolve(header)?;

    let mut skipped = Vec::new();
    let rates: Vec<ExchangeRate> = rows
        .iter()
        .enumerate()
        .filter_map(|(row, line)| match columns.parse_row(line) {
            Ok(rate) => Some(rate),
            Err(reason) => {
                tracing::warn!(row, ?reason, line = %line, "Skipping invalid feed line");
                skipped.push(SkippedLine {
                    row,
                    reason,
                    content: (*line).to_string(),
                });
                None
            }
        })
        .collect();

    if rates.is_empty() {
        return Err(ParseError::NoValidRates);
    }

    tracing::debug!(
        date,
        rates = rates.len(),
        skipped = skipped.len(),
        "Parsed exchange-rate feed"
    );

    Ok((
        FeedSnapshot {
            date: date.to_string(),
            rates,
        },
        skipped,
    ))
}

/// Column positions resolved from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    country: usize,
    currency: usize,
    amount: usize,
    code: usize,
    rate: usize,
}

impl Columns {
    fn resolve(header: &str) -> Result<Self, ParseError> {
        let bad_header = || ParseError::BadHeader {
            header: header.chars().take(HEADER_PREVIEW_CHARS).collect(),
        };

        if !header.contains('|') {
            return Err(bad_header());
        }

        let names: Vec<String> = header
            .split('|')
            .map(|name| name.trim().to_lowercase())
            .collect();
        let find = |wanted: &str| names.iter().position(|name| name == wanted);

        match (
            find("country"),
            find("currency"),
            find("amount"),
            find("code"),
            find("rate"),
        ) {
            (Some(country), Some(currency), Some(amount), Some(code), Some(rate)) => Ok(Self {
                country,
                currency,
                amount,
                code,
                rate,
            }),
            _ => Err(bad_header()),
        }
    }

    fn min_fields(&self) -> usize {
        [self.country, self.currency, self.amount, self.code, self.rate]
            .into_iter()
            .max()
            .unwrap_or_default()
            + 1
    }

    fn parse_row(&self, line: &str) -> Result<ExchangeRate, SkipReason> {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < self.min_fields() {
            return Err(SkipReason::TooFewColumns);
        }

        let amount = fields[self.amount]
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|amount| *amount > 0);
        let rate = fields[self.rate]
            .trim()
            .replacen(',', ".", 1)
            .parse::<f64>()
            .ok()
            .filter(|rate| rate.is_finite() && *rate > 0.0);

        let (Some(amount), Some(rate)) = (amount, rate) else {
            return Err(SkipReason::InvalidNumber);
        };

        Ok(ExchangeRate {
            country: fields[self.country].trim().to_string(),
            currency: fields[self.currency].trim().to_string(),
            amount,
            code: fields[self.code].trim().to_string(),
            rate,
        })
    }
}
