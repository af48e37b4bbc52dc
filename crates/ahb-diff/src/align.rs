//! Sequential two-cursor alignment of previous and subsequent rows.
//!
//! The walk is greedy and forward-only: once the subsequent cursor moves it
//! never rewinds, and a previous row that finds no partner ahead of the
//! cursor is final as REMOVED. With duplicate section names in a different
//! relative order this yields REMOVED/ADDED pairs where a reader might see a
//! reorder; that output is expected.

use ahb_model::{AhbRow, RowComparison, RowDiff};
use tracing::{debug, trace};

use crate::fields::compare_rows;
use crate::normalize::normalize;

/// Aligns two ordered row lists into one ordered list of comparisons.
///
/// Every input row appears exactly once on its side of the output; the
/// opposite side of an ADDED or REMOVED row is an empty placeholder tagged
/// with the present row's format version. Inputs are not modified.
pub fn align(previous_rows: &[AhbRow], subsequent_rows: &[AhbRow]) -> Vec<RowComparison> {
    let previous_keys: Vec<String> = previous_rows
        .iter()
        .map(|row| normalize(&row.section_name))
        .collect();
    let subsequent_keys: Vec<String> = subsequent_rows
        .iter()
        .map(|row| normalize(&row.section_name))
        .collect();

    let mut result = Vec::with_capacity(previous_rows.len().max(subsequent_rows.len()));
    let mut i = 0;
    let mut j = 0;

    while i < previous_rows.len() || j < subsequent_rows.len() {
        if i >= previous_rows.len() {
            result.push(added(&subsequent_rows[j]));
            j += 1;
            continue;
        }
        if j >= subsequent_rows.len() {
            result.push(removed(&previous_rows[i]));
            i += 1;
            continue;
        }

        let previous = &previous_rows[i];
        if previous_keys[i] == subsequent_keys[j] {
            let subsequent = &subsequent_rows[j];
            result.push(RowComparison {
                previous: previous.clone(),
                diff: compare_rows(previous, subsequent),
                subsequent: subsequent.clone(),
            });
            i += 1;
            j += 1;
            continue;
        }

        match find_forward(&subsequent_keys, j, &previous_keys[i]) {
            Some(k) => {
                trace!(
                    section = %previous.section_name,
                    skipped = k - j,
                    "resynchronised on later subsequent row"
                );
                result.extend(subsequent_rows[j..k].iter().map(added));
                // `i` stays put: the next iteration pairs it with row `k`.
                j = k;
            }
            None => {
                result.push(removed(previous));
                i += 1;
            }
        }
    }

    debug!(
        previous = previous_rows.len(),
        subsequent = subsequent_rows.len(),
        comparisons = result.len(),
        "aligned rows"
    );
    result
}

/// First index `k >= start` whose key equals `key`.
fn find_forward(keys: &[String], start: usize, key: &str) -> Option<usize> {
    keys[start..]
        .iter()
        .position(|candidate| candidate == key)
        .map(|offset| start + offset)
}

fn added(row: &AhbRow) -> RowComparison {
    RowComparison {
        previous: AhbRow::empty(row.format_version.clone()),
        diff: RowDiff::added(),
        subsequent: row.clone(),
    }
}

fn removed(row: &AhbRow) -> RowComparison {
    RowComparison {
        previous: row.clone(),
        diff: RowDiff::removed(),
        subsequent: AhbRow::empty(row.format_version.clone()),
    }
}
