//! Gap-fill policy applied after every indicator has been computed.

/// Fill undefined positions in place.
///
/// Back-fill first: every position before the first defined value takes
/// that value. Then forward-fill: every remaining undefined position takes
/// the last defined value before it. A series with no defined value at all
/// is left untouched.
pub fn fill_gaps(values: &mut [Option<f64>]) {
    let Some(first) = values.iter().position(Option::is_some) else {
        return;
    };

    let seed = values[first];
    for slot in &mut values[..first] {
        *slot = seed;
    }

    let mut last = seed;
    for slot in &mut values[first..] {
        match slot {
            Some(_) => last = *slot,
            None => *slot = last,
        }
    }
}
