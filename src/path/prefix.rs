//! Byte-prefix helpers shared by the trie.

/// Length of the longest shared leading byte run of `a` and `b`.
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Compare `a` and `b` past their shared prefix.
///
/// Returns `(0, shorter)` when one is a byte-prefix of the other. Otherwise
/// returns the signed difference of the first differing byte pair together
/// with the prefix that precedes it.
pub fn compare_ignoring_shared_prefix<'a>(a: &'a [u8], b: &'a [u8]) -> (i32, &'a [u8]) {
    let n = common_prefix_len(a, b);
    if n == a.len() {
        return (0, a);
    }
    if n == b.len() {
        return (0, b);
    }
    (i32::from(a[n]) - i32::from(b[n]), &a[..n])
}
