//! Run-length coding of a symbol sequence into `(symbol, count)` pairs.
//!
//! Runs are maximal: no two adjacent pairs produced by [`encode`] share a
//! symbol, and every count is at least 1. The pair list serializes as a JSON
//! array of `[symbol, count]` arrays.

use crate::error::TransformError;

pub type RunLengthSequence<T> = Vec<(T, usize)>;

pub fn encode<T: PartialEq + Clone>(symbols: &[T]) -> RunLengthSequence<T> {
    let mut runs = Vec::new();

    let Some((first, rest)) = symbols.split_first() else {
        return runs;
    };

    let mut current = first;
    let mut count = 1usize;
    for symbol in rest {
        if symbol == current {
            count += 1;
        } else {
            runs.push((current.clone(), count));
            current = symbol;
            count = 1;
        }
    }
    runs.push((current.clone(), count));

    runs
}

/// Expands every pair back into `count` copies of its symbol.
///
/// Counts are validated before anything is allocated. A zero count, a total
/// that overflows `usize`, or a total that cannot be allocated is rejected
/// with [`TransformError::InvalidRunLength`].
pub fn decode<T: Clone>(runs: &[(T, usize)]) -> Result<Vec<T>, TransformError> {
    let total = expanded_len(runs)?;

    let mut symbols = Vec::new();
    symbols
        .try_reserve_exact(total)
        .map_err(|_| TransformError::InvalidRunLength)?;
    for (symbol, count) in runs {
        symbols.extend(std::iter::repeat_n(symbol.clone(), *count));
    }
    Ok(symbols)
}

/// Length of the decoded sequence.
pub fn expanded_len<T>(runs: &[(T, usize)]) -> Result<usize, TransformError> {
    runs.iter().try_fold(0usize, |total, &(_, count)| {
        if count == 0 {
            return Err(TransformError::InvalidRunLength);
        }
        total
            .checked_add(count)
            .ok_or(TransformError::InvalidRunLength)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_maximal<T: PartialEq>(runs: &[(T, usize)]) -> bool {
        runs.windows(2).all(|w| w[0].0 != w[1].0) && runs.iter().all(|(_, c)| *c >= 1)
    }

    #[test]
    fn test_rle_letters() {
        let data = ['A', 'A', 'A', 'B', 'B', 'C'];
        let runs = encode(&data);
        assert_eq!(runs, vec![('A', 3), ('B', 2), ('C', 1)]);
        assert_eq!(decode(&runs).unwrap(), data.to_vec());
    }

    #[test]
    fn test_rle_empty_and_single() {
        let empty: [u8; 0] = [];
        assert!(encode(&empty).is_empty());
        assert!(decode::<u8>(&[]).unwrap().is_empty());

        assert_eq!(encode(&[7u8]), vec![(7, 1)]);
        assert_eq!(decode(&encode(&[7u8])).unwrap(), vec![7]);
    }

    #[test]
    fn test_rle_run_reaches_end() {
        let data = [1u8, 2, 2, 2, 2];
        assert_eq!(encode(&data), vec![(1, 1), (2, 4)]);

        let long = vec![42u8; 1000];
        assert_eq!(encode(&long), vec![(42, 1000)]);
        assert_eq!(decode(&encode(&long)).unwrap(), long);
    }

    #[test]
    fn test_rle_roundtrip_and_maximality() {
        let inputs: Vec<Vec<i32>> = vec![
            vec![5, 5, 5, 5, 8, 8, 8, 2, 9, 9, 9, 9, 9],
            vec![1, 2, 3, 4],
            vec![0, 0, 1, 0, 0, 1, 1],
            (0..200).map(|i| (i / 7) % 3).collect(),
        ];
        for input in inputs {
            let runs = encode(&input);
            assert!(is_maximal(&runs), "{:?}", runs);
            assert_eq!(expanded_len(&runs).unwrap(), input.len());
            assert_eq!(decode(&runs).unwrap(), input);
        }
    }

    #[test]
    fn test_rle_zero_count_rejected() {
        let runs = vec![(3u8, 2), (4, 0)];
        assert_eq!(decode(&runs).unwrap_err(), TransformError::InvalidRunLength);
    }

    #[test]
    fn test_rle_oversized_counts_rejected() {
        assert_eq!(
            decode(&[(1u8, usize::MAX)]).unwrap_err(),
            TransformError::InvalidRunLength
        );

        let half = usize::MAX / 2 + 1;
        let runs = vec![(1u8, half), (2, half)];
        assert_eq!(expanded_len(&runs).unwrap_err(), TransformError::InvalidRunLength);
        assert_eq!(decode(&runs).unwrap_err(), TransformError::InvalidRunLength);

        // Zero count is caught even when it follows a huge run.
        let runs = vec![(1u8, usize::MAX), (2, 0)];
        assert_eq!(expanded_len(&runs).unwrap_err(), TransformError::InvalidRunLength);
    }

    #[test]
    fn test_rle_json_pairs() {
        let runs = encode(&["a", "a", "b"]);
        assert_eq!(serde_json::to_string(&runs).unwrap(), r#"[["a",2],["b",1]]"#);

        let back: RunLengthSequence<String> = serde_json::from_str(r#"[["x",3]]"#).unwrap();
        assert_eq!(decode(&back).unwrap(), vec!["x", "x", "x"]);
    }
}
