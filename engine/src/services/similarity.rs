//! Name similarity scoring for duplicate-retailer screening
//!
//! Comparisons run on normalized text (see [`shared::normalize_text`]) with a
//! classic dynamic-programming edit distance. Cheap enough to call on every
//! keystroke over a full roster.

pub use shared::normalize_text as normalize;

/// Similarity between two strings in `[0, 1]`.
///
/// 1.0 when the normalized forms are identical (including both empty);
/// otherwise `1 - distance / len(longer)` on the normalized forms.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 1.0;
    }

    let (longer, shorter) = if a.chars().count() >= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let longer_len = longer.chars().count();
    let distance = levenshtein(&longer, &shorter);
    1.0 - distance as f64 / longer_len as f64
}

/// Edit distance with unit cost for insert, delete, and substitute
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row DP over the (a.len + 1) x (b.len + 1) matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ca != cb);
            let delete = prev[j + 1] + 1;
            let insert = curr[j] + 1;
            curr[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
