use std::cmp::Ordering;

/// Ratcliff/Obershelp similarity in `[0, 1]`: `2 * M / (len(a) + len(b))`
/// where `M` counts characters in recursively found longest common blocks.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    let total = a.len() + b.len();
    if total == 0 { return 1.0 }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total length of the matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 { return 0 }
    size
        + matching_chars(&a[..i], &b[..j])
        + matching_chars(&a[i + size..], &b[j + size..])
}

/// Longest common substring as `(start_a, start_b, len)`, earliest in `a`
/// then earliest in `b` on ties.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    // lengths[j + 1] = length of the common suffix of a[..=i] and b[..=j].
    let mut lengths = vec![0usize; b.len() + 1];
    let mut best = (0, 0, 0);

    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = 0;
        for (j, cb) in b.iter().enumerate() {
            let above = lengths[j + 1];
            lengths[j + 1] = if ca == cb { diagonal + 1 } else { 0 };
            diagonal = above;

            let len = lengths[j + 1];
            if len > best.2 { best = (i + 1 - len, j + 1 - len, len) }
        }
    }
    best
}

/// Up to `n` candidates scoring at least `cutoff` against `query`, best
/// first, ties in name order.
pub fn close_matches<'a>(query: &str, candidates: impl IntoIterator<Item = &'a str>, n: usize, cutoff: f64) -> Vec<String> {
    let mut scored = candidates.into_iter()
        .map(|candidate| (similarity(query, candidate), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect::<Vec<_>>();

    scored.sort_by(|(sa, na), (sb, nb)| sb.partial_cmp(sa).unwrap_or(Ordering::Equal).then_with(|| na.cmp(nb)));
    scored.into_iter().take(n).map(|(_, name)| name.to_string()).collect()
}
