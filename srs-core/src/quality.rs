//! Проверка «похоже на спектр».

use srs_types::{AcceptPolicy, QUALITY_STD_MIN};

/// Предикат правдоподобия окна значений.
///
/// Реализован для замыканий `Fn(&[f32]) -> bool`, поэтому сканеру можно
/// передать собственный критерий под другой прибор или уровень шума.
pub trait SpectrumCheck {
    fn is_plausible(
        &self,
        values: &[f32],
    ) -> bool;
}

/// Все значения конечны и стандартное отклонение выше порога.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarianceFloor {
    pub min_std: f64,
}

impl Default for VarianceFloor {
    fn default() -> Self {
        Self {
            min_std: QUALITY_STD_MIN,
        }
    }
}

impl SpectrumCheck for VarianceFloor {
    fn is_plausible(
        &self,
        values: &[f32],
    ) -> bool {
        all_finite(values) && std_dev(values) > self.min_std
    }
}

impl<F> SpectrumCheck for F
where
    F: Fn(&[f32]) -> bool,
{
    fn is_plausible(
        &self,
        values: &[f32],
    ) -> bool {
        self(values)
    }
}

pub fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Стандартное отклонение генеральной совокупности (ddof = 0).
///
/// Для пустого среза — NaN.
pub fn std_dev(values: &[f32]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    var.sqrt()
}

/// Применяет правило приёма строки.
pub fn accepts(
    policy: AcceptPolicy,
    values: &[f32],
) -> bool {
    match policy {
        AcceptPolicy::NonEmpty => !values.is_empty(),
        AcceptPolicy::AnyFinite => values.iter().any(|v| v.is_finite()),
        AcceptPolicy::Plausible { min_std } => VarianceFloor { min_std }.is_plausible(values),
    }
}
