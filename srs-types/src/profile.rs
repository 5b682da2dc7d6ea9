use crate::{SrsError, SrsResult, QUALITY_STD_MIN};

/// Вариант раскладки, определяемый по первому межкадровому интервалу.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVariant {
    /// Первый интервал не превышает порог: ложного кадра нет
    Standard,
    /// Первый интервал больше порога: кадр #0 ложный и отброшен
    PseudoFramed,
}

/// Сколько точек оставлять в каждой декодированной строке.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCount {
    /// Весь payload межкадрового интервала
    Full,
    /// Обрезать до фиксированного числа точек
    Fixed(usize),
    /// Оценить по медианному межкадровому интервалу
    Estimated,
}

/// Правило приёма декодированной строки.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcceptPolicy {
    /// Любой непустой массив
    NonEmpty,
    /// Хотя бы одно конечное значение
    AnyFinite,
    /// Все значения конечны и std > `min_std`
    Plausible { min_std: f64 },
}

/// Профиль формата: где начинается payload и какие строки принимать.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatProfile {
    /// Имя профиля (используется в CLI и логах)
    pub name: &'static str,
    /// Смещение payload от начала кадра (байт)
    pub payload_offset: usize,
    /// Ограничение длины строки
    pub point_count: PointCount,
    /// Правило приёма строки
    pub accept: AcceptPolicy,
}

////////////////////////////////////////////////////////////////////////////////
// Именованные профили
////////////////////////////////////////////////////////////////////////////////

impl FormatProfile {
    /// Rapid Scan: payload с 80-го байта, вся длина, любой непустой кадр.
    pub const RAPID: FormatProfile = FormatProfile {
        name: "rapid",
        payload_offset: 80,
        point_count: PointCount::Full,
        accept: AcceptPolicy::NonEmpty,
    };

    /// Rapid Scan, 600 точек, только правдоподобные кадры.
    pub const RAPID_600: FormatProfile = FormatProfile {
        name: "rapid-600",
        payload_offset: 80,
        point_count: PointCount::Fixed(600),
        accept: AcceptPolicy::Plausible {
            min_std: QUALITY_STD_MIN,
        },
    };

    /// Новая версия Rapid Scan: payload с 27854-го байта, 1024 точки.
    pub const RAPID_V2: FormatProfile = FormatProfile {
        name: "rapid-v2",
        payload_offset: 27_854,
        point_count: PointCount::Fixed(1024),
        accept: AcceptPolicy::Plausible {
            min_std: QUALITY_STD_MIN,
        },
    };

    /// Rapid Scan, число точек оценивается по межкадровому интервалу.
    pub const RAPID_ESTIMATED: FormatProfile = FormatProfile {
        name: "rapid-estimated",
        payload_offset: 80,
        point_count: PointCount::Estimated,
        accept: AcceptPolicy::AnyFinite,
    };

    /// Realtime: payload с 84-го байта.
    pub const REALTIME: FormatProfile = FormatProfile {
        name: "realtime",
        payload_offset: 84,
        point_count: PointCount::Full,
        accept: AcceptPolicy::NonEmpty,
    };

    /// Все известные профили.
    pub const ALL: [FormatProfile; 5] = [
        Self::RAPID,
        Self::RAPID_600,
        Self::RAPID_V2,
        Self::RAPID_ESTIMATED,
        Self::REALTIME,
    ];

    /// Профили-кандидаты для файлов с ложным кадром #0. Между ними нет
    /// согласия, поэтому выбор всегда явный.
    pub const PSEUDO_FRAMED_CANDIDATES: [&'static str; 2] = ["rapid-600", "rapid-v2"];

    /// Ищет профиль по имени.
    pub fn by_name(name: &str) -> SrsResult<FormatProfile> {
        let lower = name.trim().to_lowercase();

        Self::ALL
            .iter()
            .find(|p| p.name == lower)
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name).collect();
                SrsError::config(format!(
                    "Unknown profile '{name}'. Use: {}",
                    names.join(", ")
                ))
            })
    }
}

impl std::fmt::Display for FormatProfile {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{} (payload @{}", self.name, self.payload_offset)?;
        match self.point_count {
            PointCount::Full => {}
            PointCount::Fixed(n) => write!(f, ", {n} pts")?,
            PointCount::Estimated => write!(f, ", estimated pts")?,
        }
        write!(f, ")")
    }
}

impl std::str::FromStr for FormatProfile {
    type Err = SrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatProfile::by_name(s)
    }
}

impl std::fmt::Display for FormatVariant {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            FormatVariant::Standard => write!(f, "standard"),
            FormatVariant::PseudoFramed => write!(f, "pseudo-framed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_by_name() {
        assert_eq!(FormatProfile::by_name("rapid").unwrap(), FormatProfile::RAPID);
        assert_eq!("RAPID-V2".parse::<FormatProfile>().unwrap(), FormatProfile::RAPID_V2);
        assert_eq!(FormatProfile::by_name(" realtime ").unwrap().payload_offset, 84);
        assert!(FormatProfile::by_name("fast").is_err());
    }

    #[test]
    fn test_pseudo_framed_candidates_disagree() {
        let a = FormatProfile::by_name(FormatProfile::PSEUDO_FRAMED_CANDIDATES[0]).unwrap();
        let b = FormatProfile::by_name(FormatProfile::PSEUDO_FRAMED_CANDIDATES[1]).unwrap();

        assert_eq!(a, FormatProfile::RAPID_600);
        assert_ne!(a.payload_offset, b.payload_offset);
        assert_eq!(a.point_count, PointCount::Fixed(600));
        assert_eq!(b.point_count, PointCount::Fixed(1024));
    }

    #[test]
    fn test_profile_names_unique() {
        for (i, a) in FormatProfile::ALL.iter().enumerate() {
            for b in &FormatProfile::ALL[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_profile_display() {
        assert_eq!(FormatProfile::RAPID_V2.to_string(), "rapid-v2 (payload @27854, 1024 pts)");
        assert_eq!(FormatProfile::RAPID.to_string(), "rapid (payload @80)");
    }
}
