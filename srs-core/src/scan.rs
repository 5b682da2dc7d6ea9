//! Точный поиск подстроки в байтовом буфере.

/// Находит все вхождения `needle` в `haystack`, включая перекрывающиеся.
///
/// Поиск возобновляется с `match_start + 1`, а не с `match_start +
/// needle.len()`: для самоподобных шаблонов (`00 00 80 08 ...`) это меняет
/// набор найденных позиций. Возвращает не больше `max_hits` смещений в
/// порядке возрастания. Пустой шаблон не совпадает ни с чем.
pub fn find_all(
    haystack: &[u8],
    needle: &[u8],
    max_hits: usize,
) -> Vec<usize> {
    let mut out = Vec::new();

    if needle.is_empty() || needle.len() > haystack.len() || max_hits == 0 {
        return out;
    }

    let first = needle[0];
    let last_start = haystack.len() - needle.len();
    let mut st = 0;

    while st <= last_start {
        let rel = match haystack[st..=last_start].iter().position(|&b| b == first) {
            Some(rel) => rel,
            None => break,
        };
        let i = st + rel;

        if &haystack[i..i + needle.len()] == needle {
            out.push(i);

            if out.len() >= max_hits {
                break;
            }
        }

        st = i + 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_all_basic() {
        let hay = b"abcXYZabcXYabc";
        assert_eq!(find_all(hay, b"abc", 100), vec![0, 6, 11]);
        assert_eq!(find_all(hay, b"XYZ", 100), vec![3]);
        assert!(find_all(hay, b"nope", 100).is_empty());
    }

    #[test]
    fn test_find_all_reports_overlapping_matches() {
        // "aaaa" содержит "aa" в позициях 0, 1, 2
        assert_eq!(find_all(b"aaaa", b"aa", 100), vec![0, 1, 2]);

        let hay = [0u8, 0, 0, 0, 0];
        assert_eq!(find_all(&hay, &[0, 0, 0], 100), vec![0, 1, 2]);
    }

    #[test]
    fn test_find_all_respects_max_hits() {
        let hay = vec![7u8; 1000];
        let hits = find_all(&hay, &[7, 7], 10);

        assert_eq!(hits.len(), 10);
        assert_eq!(hits, (0..10).collect::<Vec<_>>());
        assert!(find_all(&hay, &[7], 0).is_empty());
    }

    #[test]
    fn test_find_all_edges() {
        assert!(find_all(b"abc", b"", 10).is_empty());
        assert!(find_all(b"ab", b"abc", 10).is_empty());
        assert_eq!(find_all(b"abc", b"abc", 10), vec![0]);
        assert_eq!(find_all(b"xxabc", b"abc", 10), vec![2]);
    }
}
