//! Statistics aggregation module
//!
//! Folds one observed value into the statistics payload of a
//! [`TypeEntry`](crate::schema::TypeEntry).
//!
//! | Tag                                     | Statistics            |
//! |-----------------------------------------|-----------------------|
//! | `string`, `binary`                      | min/max length        |
//! | `int32`, `long`, `double`, `decimal128` | min/max value (`f64`) |
//! | `boolean`                               | true/false counts     |
//! | `date`                                  | min/max epoch millis  |
//! | everything else                         | none                  |
//!
//! Object and array bounds (property counts, array lengths) are maintained
//! by the merge engine, which owns the traversal of those values.

mod types;

pub use types::{BooleanStats, CountStats, DateStats, LengthStats, NumericStats};

use crate::classify::wrappers::{date_millis, length_value, numeric_value};
use crate::classify::TypeTag;
use crate::schema::{TypeEntry, TypeStats};
use serde_json::Value;

/// A single measurement taken from a value
#[derive(Debug, Clone, Copy, PartialEq)]
enum Measurement {
    Length(usize),
    Numeric(f64),
    Boolean(bool),
    Date(i64),
}

/// Measure `value` according to `tag`
///
/// Returns `None` for tags without statistics and for payloads that cannot
/// be measured (unparsable numbers, NaN, invalid dates).
fn measure(value: &Value, tag: TypeTag) -> Option<Measurement> {
    match tag {
        TypeTag::String | TypeTag::Binary => length_value(value, tag).map(Measurement::Length),
        TypeTag::Int32 | TypeTag::Long | TypeTag::Double | TypeTag::Decimal128 => {
            numeric_value(value, tag).map(Measurement::Numeric)
        }
        TypeTag::Boolean => value.as_bool().map(Measurement::Boolean),
        TypeTag::Date => date_millis(value).map(Measurement::Date),
        _ => None,
    }
}

/// Record the first observation of `tag` for `entry`
///
/// Sets both bounds to the single observed measurement. When the entry
/// already carries statistics (an `items` entry revisited by a later array),
/// the observation is folded into them instead, so bounds never narrow.
pub fn initialize(value: &Value, tag: TypeTag, entry: &mut TypeEntry) {
    let Some(measurement) = measure(value, tag) else {
        return;
    };

    let stats = entry.stats_mut();
    if stats.is_none() {
        *stats = match measurement {
            Measurement::Length(n) => TypeStats::Length(LengthStats::new(n)),
            Measurement::Numeric(n) => TypeStats::Numeric(NumericStats::new(n)),
            Measurement::Boolean(b) => TypeStats::Boolean(BooleanStats::new(b)),
            Measurement::Date(ms) => TypeStats::Date(DateStats::new(ms)),
        };
    } else {
        fold(stats, measurement);
    }
}

/// Fold a subsequent observation of `tag` into `entry`, widening bounds
pub fn aggregate(value: &Value, tag: TypeTag, entry: &mut TypeEntry) {
    let Some(measurement) = measure(value, tag) else {
        return;
    };

    if entry.stats().is_none() {
        // Earlier observations were unmeasurable
        initialize(value, tag, entry);
    } else {
        fold(entry.stats_mut(), measurement);
    }
}

fn fold(stats: &mut TypeStats, measurement: Measurement) {
    match (stats, measurement) {
        (TypeStats::Length(s), Measurement::Length(n)) => s.widen(n),
        (TypeStats::Numeric(s), Measurement::Numeric(n)) => s.widen(n),
        (TypeStats::Boolean(s), Measurement::Boolean(b)) => s.record(b),
        (TypeStats::Date(s), Measurement::Date(ms)) => s.widen(ms),
        (stats, measurement) => {
            tracing::trace!(
                ?stats,
                ?measurement,
                "statistics payload does not match measurement"
            );
        }
    }
}
