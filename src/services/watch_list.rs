use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::DataError;
use crate::models::{Code, Direction, Threshold, WatchEntry};

/// Source of watch targets and the messages built from them.
pub trait WatchList {
    /// Distinct codes in first-occurrence order.
    fn distinct_codes(&self) -> Result<Vec<Code>, DataError>;

    /// Distinct codes partitioned into notification groups. Every code
    /// appears in exactly one group.
    fn grouped_codes(&self) -> Result<Vec<Vec<Code>>, DataError>;

    fn threshold_predicate(&self, code: Code) -> Result<Threshold, DataError>;

    fn build_success_message(&self, code: Code) -> Result<String, DataError>;

    fn build_failure_message(&self, code: Code) -> String;
}

#[derive(Debug, Clone, Deserialize)]
struct WatchRow {
    // everything is validated on use, not on load
    description: String,
    price: String,
    trigger: String,
    #[serde(default)]
    group: Option<String>,
}

impl WatchRow {
    fn code(&self) -> Option<Code> {
        self.description.parse().ok()
    }
}

/// Watch list backed by a CSV file with `description,price,trigger[,group]`.
///
/// The file is read once on construction and only a missing file fails
/// there. Listing codes fails if any row is unreadable or has a
/// non-integer code; per-code checks happen when a code is looked up, so
/// a malformed row for a code nobody asks about never surfaces.
#[derive(Debug, Clone)]
pub struct CsvWatchList {
    rows: Vec<WatchRow>,
    load_error: Option<String>,
}

impl CsvWatchList {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DataError::Unreadable(format!("{}: {e}", path.display())))?;
        let list = Self::from_reader(file);
        tracing::debug!(path = %path.display(), rows = list.rows.len(), "watch list loaded");
        if let Some(e) = &list.load_error {
            tracing::warn!(path = %path.display(), error = %e, "watch list is malformed");
        }
        Ok(list)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Self {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut load_error = None;
        for record in rdr.deserialize::<WatchRow>() {
            match record {
                Ok(row) => rows.push(row),
                Err(e) => {
                    load_error = Some(e.to_string());
                    break;
                }
            }
        }

        Self { rows, load_error }
    }

    fn ensure_readable(&self) -> Result<(), DataError> {
        match &self.load_error {
            Some(e) => Err(DataError::Unreadable(e.clone())),
            None => Ok(()),
        }
    }

    fn entry(&self, code: Code) -> Result<WatchEntry, DataError> {
        self.ensure_readable()?;

        let mut matches = self.rows.iter().filter(|r| r.code() == Some(code));
        let row = matches.next().ok_or(DataError::NotFound(code))?;
        if matches.next().is_some() {
            return Err(DataError::Duplicate(code));
        }

        let direction =
            Direction::from_literal(&row.trigger).ok_or_else(|| DataError::InvalidTrigger {
                code,
                trigger: row.trigger.clone(),
            })?;

        let threshold_price = parse_threshold(&row.price).ok_or_else(|| DataError::InvalidPrice {
            code,
            price: row.price.clone(),
        })?;

        Ok(WatchEntry {
            code,
            threshold_price,
            direction,
        })
    }

    /// First row of every distinct code.
    fn first_rows(&self) -> Result<Vec<(Code, &WatchRow)>, DataError> {
        self.ensure_readable()?;

        let mut seen = HashSet::new();
        let mut firsts = Vec::new();
        for row in &self.rows {
            let code = row
                .code()
                .ok_or_else(|| DataError::InvalidCode(row.description.clone()))?;
            if seen.insert(code) {
                firsts.push((code, row));
            }
        }
        Ok(firsts)
    }

    fn has_group_labels(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.group.as_deref().is_some_and(|g| !g.is_empty()))
    }
}

impl WatchList for CsvWatchList {
    fn distinct_codes(&self) -> Result<Vec<Code>, DataError> {
        Ok(self.first_rows()?.into_iter().map(|(code, _)| code).collect())
    }

    fn grouped_codes(&self) -> Result<Vec<Vec<Code>>, DataError> {
        let rows = self.first_rows()?;

        if self.has_group_labels() {
            let mut labels: Vec<&str> = Vec::new();
            let mut groups: Vec<Vec<Code>> = Vec::new();
            for (code, row) in rows {
                let label = row.group.as_deref().unwrap_or("");
                match labels.iter().position(|l| *l == label) {
                    Some(i) => groups[i].push(code),
                    None => {
                        labels.push(label);
                        groups.push(vec![code]);
                    }
                }
            }
            return Ok(groups);
        }

        // anything that is not "over" lands with the at-or-below codes
        let (over, under): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .partition(|(_, r)| Direction::from_literal(&r.trigger) == Some(Direction::AtOrAbove));

        Ok(vec![
            over.into_iter().map(|(code, _)| code).collect(),
            under.into_iter().map(|(code, _)| code).collect(),
        ])
    }

    fn threshold_predicate(&self, code: Code) -> Result<Threshold, DataError> {
        Ok(self.entry(code)?.threshold())
    }

    fn build_success_message(&self, code: Code) -> Result<String, DataError> {
        let entry = self.entry(code)?;
        let verb = match entry.direction {
            Direction::AtOrAbove => "rose above",
            Direction::AtOrBelow => "fell below",
        };
        Ok(format!(
            "Code {code} {verb} {} yen.",
            format_yen(entry.threshold_price)
        ))
    }

    fn build_failure_message(&self, code: Code) -> String {
        format!("Code {code}: could not check the price (fetch failed or watch-list entry unusable).")
    }
}

fn parse_threshold(raw: &str) -> Option<Decimal> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(raw).ok()
}

/// `2700` -> `2,700.0`
pub fn format_yen(price: Decimal) -> String {
    let fixed = format!("{:.1}", price.round_dp(1));
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac}")
}
