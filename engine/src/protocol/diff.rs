//! Run-length diff decoding.
//!
//! The server never resends the whole board. Each tick it sends a diff
//! against the previous flat buffer, encoded as repeated blocks of
//! `skip, n, v_0 .. v_{n-1}`: advance the cursor by `skip`, overwrite `n`
//! values, advance past them. A single trailing integer instead of a full
//! block truncates the buffer to `cursor + trailing`.
//!
//! Decoding must consume the diff exactly. A run that overruns the end of
//! the diff means the client is out of sync with the server and the
//! session cannot continue.

/// Errors that can occur while applying a diff.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error("negative run length {value} at diff offset {offset}")]
    NegativeRun { offset: usize, value: i32 },

    #[error("run of {len} values at diff offset {offset} overruns diff length {diff_len}")]
    TruncatedRun {
        offset: usize,
        len: usize,
        diff_len: usize,
    },

    #[error("run at diff offset {offset} starts at {cursor}, past the buffer end {len}")]
    GapBeforeRun {
        offset: usize,
        cursor: usize,
        len: usize,
    },
}

/// Converts a run length from the wire into a `usize`.
fn run_length(value: i32, offset: usize) -> Result<usize, DiffError> {
    usize::try_from(value).map_err(|_| DiffError::NegativeRun { offset, value })
}

/// Applies `diff` to `cache` in place.
///
/// A run may extend `cache` only if it starts at or before the current end,
/// so growth is bounded by the diff itself. On error `cache` may be partially
/// updated and must be discarded along with the session.
pub fn apply_diff(cache: &mut Vec<i32>, diff: &[i32]) -> Result<(), DiffError> {
    let mut i = 0usize;
    let mut cursor = 0usize;

    while i + 1 < diff.len() {
        cursor = cursor.saturating_add(run_length(diff[i], i)?);
        let n = run_length(diff[i + 1], i + 1)?;

        let start = i + 2;
        let end = start + n;
        if end > diff.len() {
            return Err(DiffError::TruncatedRun {
                offset: i,
                len: n,
                diff_len: diff.len(),
            });
        }

        if cache.len() < cursor.saturating_add(n) {
            if cursor > cache.len() {
                return Err(DiffError::GapBeforeRun {
                    offset: i,
                    cursor,
                    len: cache.len(),
                });
            }
            cache.resize(cursor + n, 0);
        }
        cache[cursor..cursor + n].copy_from_slice(&diff[start..end]);

        cursor += n;
        i = end;
    }

    if i + 1 == diff.len() {
        let keep = cursor.saturating_add(run_length(diff[i], i)?);
        cache.truncate(keep);
        i += 1;
    }

    debug_assert_eq!(i, diff.len());
    Ok(())
}

/// Produces a diff that turns `old` into `new`.
///
/// Used by tests and benchmarks to generate realistic server traffic; the
/// server's own encoder emits the same block layout.
pub fn encode_diff(old: &[i32], new: &[i32]) -> Vec<i32> {
    let mut diff = Vec::new();
    let mut i = 0usize;
    let mut skip = 0i32;

    while i < new.len() {
        if i < old.len() && old[i] == new[i] {
            skip += 1;
            i += 1;
            continue;
        }
        let start = i;
        while i < new.len() && (i >= old.len() || old[i] != new[i]) {
            i += 1;
        }
        diff.push(skip);
        diff.push((i - start) as i32);
        diff.extend_from_slice(&new[start..i]);
        skip = 0;
    }

    if skip > 0 || new.len() < old.len() || diff.is_empty() {
        diff.push(skip);
    }
    diff
}
