//! Поиск фоновых спектров голосованием нескольких маркеров.
//!
//! Каждый маркер — 8-байтовое окно одной и той же строки заголовка фона,
//! поэтому настоящая позиция payload получает голоса от нескольких
//! шаблонов, а случайные совпадения одного шаблона в данных — нет.

use std::collections::BTreeMap;

use log::{debug, info};
use srs_types::{
    Marker, BG_CLUSTER_TOLERANCE, BG_MAX_RESULTS, BG_MIN_SEPARATION, DEFAULT_MARKER_MAX_HITS,
};

use super::shifted;
use crate::scan::find_all;

/// Параметры голосования.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingConfig {
    /// Набор маркеров с их смещениями до payload
    pub markers: Vec<Marker>,
    /// Допуск слияния соседних кандидатов (байт)
    pub tolerance: usize,
    /// Минимальное расстояние между принятыми позициями (байт)
    pub min_sep: usize,
    /// Максимум принятых позиций
    pub max_results: usize,
    /// Предел совпадений одного маркера
    pub max_hits_per_marker: usize,
}

/// Кандидат: позиция payload и число голосов за неё.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub position: usize,
    pub votes: u32,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            markers: Marker::reference_set(),
            tolerance: BG_CLUSTER_TOLERANCE,
            min_sep: BG_MIN_SEPARATION,
            max_results: BG_MAX_RESULTS,
            max_hits_per_marker: DEFAULT_MARKER_MAX_HITS,
        }
    }
}

/// Каждое совпадение маркера в `h` голосует за позицию `h + delta`.
///
/// Позиции вне буфера не учитываются. Результат упорядочен по позиции.
pub fn collect_votes(
    buffer: &[u8],
    markers: &[Marker],
    max_hits_per_marker: usize,
) -> Vec<Candidate> {
    let mut votes: BTreeMap<usize, u32> = BTreeMap::new();

    for m in markers {
        let hits = find_all(buffer, &m.pattern, max_hits_per_marker);
        debug!(
            "Background marker {:02x?}: {} hit(s)",
            m.pattern,
            hits.len()
        );

        for h in hits {
            if let Some(pos) = shifted(h, m.delta_to_payload, buffer.len()) {
                *votes.entry(pos).or_insert(0) += 1;
            }
        }
    }

    votes
        .into_iter()
        .map(|(position, votes)| Candidate { position, votes })
        .collect()
}

/// Сливает упорядоченных по позиции кандидатов в кластеры.
///
/// Один проход слева направо: кандидат в пределах `tolerance` от текущего
/// кластера сдвигает его позицию к средневзвешенной (по голосам, с
/// отбрасыванием дробной части) и добавляет свои голоса; иначе кластер
/// закрывается. Повторное слияние результата ничего не меняет.
pub fn merge_candidates(
    sorted: &[Candidate],
    tolerance: usize,
) -> Vec<Candidate> {
    let mut merged = Vec::new();
    let mut iter = sorted.iter();

    let mut cur = match iter.next() {
        Some(c) => *c,
        None => return merged,
    };

    for c in iter {
        if c.position.abs_diff(cur.position) <= tolerance {
            let total = cur.votes as u128 + c.votes as u128;
            let weighted =
                cur.position as u128 * cur.votes as u128 + c.position as u128 * c.votes as u128;

            cur = Candidate {
                position: (weighted / total) as usize,
                votes: cur.votes + c.votes,
            };
        } else {
            merged.push(cur);
            cur = *c;
        }
    }

    merged.push(cur);
    merged
}

/// Жадно выбирает кластеры: больше голосов — раньше, при равенстве —
/// меньшая позиция. Кластер принимается, только если он не ближе `min_sep`
/// ни к одному уже принятому. Результат упорядочен по возрастанию.
pub fn select_clusters(
    clusters: &[Candidate],
    min_sep: usize,
    max_results: usize,
) -> Vec<usize> {
    let mut ranked = clusters.to_vec();
    ranked.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.position.cmp(&b.position)));

    let mut picks: Vec<usize> = Vec::new();

    for c in ranked {
        if picks.len() >= max_results {
            break;
        }

        if picks.iter().all(|&p| c.position.abs_diff(p) >= min_sep) {
            picks.push(c.position);
        }
    }

    picks.sort_unstable();
    picks
}

/// Полный поиск: голоса → слияние → выбор.
pub fn locate_by_votes(
    buffer: &[u8],
    cfg: &VotingConfig,
) -> Vec<usize> {
    let candidates = collect_votes(buffer, &cfg.markers, cfg.max_hits_per_marker);

    if candidates.is_empty() {
        info!("No background marker hits");
        return Vec::new();
    }

    let clusters = merge_candidates(&candidates, cfg.tolerance);
    let picks = select_clusters(&clusters, cfg.min_sep, cfg.max_results);

    info!(
        "Background voting: {} candidate(s) -> {} cluster(s) -> {} offset(s) {:?}",
        candidates.len(),
        clusters.len(),
        picks.len(),
        picks
    );

    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::put_bytes_at;

    fn cand(
        position: usize,
        votes: u32,
    ) -> Candidate {
        Candidate { position, votes }
    }

    #[test]
    fn test_extreme_deltas_cast_no_votes() {
        let mut buf = vec![0u8; 64];
        buf[10] = 0x77;

        for delta in [i64::MAX, i64::MIN] {
            assert!(collect_votes(&buf, &[Marker::new(vec![0x77], delta).unwrap()], 10).is_empty());
        }

        let votes = collect_votes(&buf, &[Marker::new(vec![0x77], -10).unwrap()], 10);
        assert_eq!(votes, vec![cand(0, 1)]);
    }

    #[test]
    fn test_merge_three_close_candidates() {
        let merged = merge_candidates(&[cand(1_000, 1), cand(1_010, 1), cand(1_040, 1)], 64);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].votes, 3);
        // (1000 + 1010) / 2 = 1005; (1005*2 + 1040) / 3 = 1016
        assert_eq!(merged[0].position, 1_016);
    }

    #[test]
    fn test_merge_uses_vote_weights() {
        let merged = merge_candidates(&[cand(100, 3), cand(140, 1)], 64);
        assert_eq!(merged, vec![cand(110, 4)]);
    }

    #[test]
    fn test_merge_closes_distant_clusters() {
        let merged = merge_candidates(&[cand(0, 2), cand(65, 1), cand(10_000, 5)], 64);

        assert_eq!(merged, vec![cand(0, 2), cand(65, 1), cand(10_000, 5)]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let input = [
            cand(10, 1),
            cand(40, 2),
            cand(90, 1),
            cand(120, 4),
            cand(300, 1),
            cand(330, 1),
            cand(9_000, 5),
        ];
        let once = merge_candidates(&input, 64);
        let twice = merge_candidates(&once, 64);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_candidates(&[], 64).is_empty());
    }

    #[test]
    fn test_select_respects_min_sep_and_rank() {
        let clusters = [
            cand(1_000, 5),
            cand(5_000, 4),  // ближе 8000 к 1000 → отклонён
            cand(10_000, 4), // принят
            cand(30_000, 1),
            cand(50_000, 1),
            cand(70_000, 1),
        ];
        let picks = select_clusters(&clusters, 8_000, 4);

        assert_eq!(picks, vec![1_000, 10_000, 30_000, 50_000]);
        for (i, a) in picks.iter().enumerate() {
            for b in &picks[i + 1..] {
                assert!(a.abs_diff(*b) >= 8_000);
            }
        }
    }

    #[test]
    fn test_select_ties_prefer_lower_position() {
        let picks = select_clusters(&[cand(20_000, 2), cand(9_000, 2), cand(14_000, 2)], 8_000, 4);
        // 9000 принят первым, 14000 слишком близко, 20000 принят
        assert_eq!(picks, vec![9_000, 20_000]);
    }

    #[test]
    fn test_collect_votes_applies_delta_and_bounds() {
        let mut buf = vec![0u8; 2_000];
        put_bytes_at(&mut buf, 100, &[0xAB, 0xCD]);
        put_bytes_at(&mut buf, 1_990, &[0xAB, 0xCD]);

        let markers = vec![
            Marker::new(vec![0xAB, 0xCD], 50).unwrap(),
            Marker::new(vec![0xCD], 49).unwrap(),
        ];
        let votes = collect_votes(&buf, &markers, 100);

        // совпадение у 1990 + 50 выходит за буфер
        assert_eq!(votes, vec![cand(150, 2)]);
    }

    #[test]
    fn test_negative_delta_before_start_ignored() {
        let mut buf = vec![0u8; 100];
        put_bytes_at(&mut buf, 2, &[0x77]);

        let markers = vec![Marker::new(vec![0x77], -10).unwrap()];
        assert!(collect_votes(&buf, &markers, 100).is_empty());
    }

    #[test]
    fn test_locate_with_reference_markers() {
        let header = [0x01, 0, 0, 0, 0x80, 0x08, 0, 0, 0x02, 0, 0, 0];
        let mut buf = vec![0u8; 40_000];
        put_bytes_at(&mut buf, 1_000, &header);
        put_bytes_at(&mut buf, 20_000, &header);

        let picks = locate_by_votes(&buf, &VotingConfig::default());
        assert_eq!(picks, vec![1_336, 20_336]);
    }
}
