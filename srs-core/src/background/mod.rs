//! Локализация фоновых спектров.
//!
//! Две стратегии: голосование маркеров ([`voting`]) и линейное сканирование
//! с проверкой правдоподобия ([`interval`]). Выбор и порядок применения
//! задаёт [`crate::pipeline`].

pub mod interval;
pub mod voting;

pub use interval::*;
pub use voting::*;

/// `base + delta`, если результат лежит в `[0, len)`; переполнение — `None`.
pub(crate) fn shifted(
    base: usize,
    delta: i64,
    len: usize,
) -> Option<usize> {
    let pos = i64::try_from(base).ok()?.checked_add(delta)?;
    usize::try_from(pos).ok().filter(|&p| p < len)
}
