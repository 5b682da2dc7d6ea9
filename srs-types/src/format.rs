//! Константы формата SRS (FTIR, режимы Rapid Scan / Realtime)
//!
//! Формат не документирован. Все значения ниже получены наблюдением за
//! реальными файлами и используются как значения по умолчанию для
//! конфигураций локаторов; ни один локатор не читает их напрямую.
//!
//! Раскладка кадра:
//! ```text
//! [0..8]      FRAME_MARKER   C6 D7 CD BC B2 C9 D3 DA
//! [8..16]     TIME_FIELD     ASCII: время или потенциал
//! [16..P]     заголовок кадра (P = payload_offset профиля)
//! [P..N-16]   PAYLOAD        f32 little-endian
//! [N-16..N]   TRAILER        16 байт, всегда отбрасываются
//! ```

/// Маркер начала кадра.
pub const FRAME_MARKER: [u8; 8] = [0xC6, 0xD7, 0xCD, 0xBC, 0xB2, 0xC9, 0xD3, 0xDA];

/// Длина маркера кадра.
pub const FRAME_MARKER_LEN: usize = FRAME_MARKER.len();

/// Длина ASCII-поля времени/потенциала сразу после маркера.
pub const TIME_FIELD_LEN: usize = 8;

/// Хвост каждого межкадрового интервала (байт).
pub const FRAME_TRAILER_SIZE: usize = 16;

/// Порог первого межкадрового интервала: больше — значит кадр #0 ложный.
pub const PSEUDO_FRAME_GAP_THRESHOLD: usize = 20_000;

/// Предел совпадений для одного поиска (защита от вырожденных входов).
pub const DEFAULT_MAX_HITS: usize = 200_000;

/// Предел совпадений одного фонового маркера.
pub const DEFAULT_MARKER_MAX_HITS: usize = 50_000;

/// Допуск слияния кандидатов фона (байт).
pub const BG_CLUSTER_TOLERANCE: usize = 64;

/// Минимальное расстояние между принятыми смещениями фона (байт).
pub const BG_MIN_SEPARATION: usize = 8_000;

/// Максимум фоновых спектров в режиме голосования.
pub const BG_MAX_RESULTS: usize = 4;

/// Шаг между соседними фоновыми блоками (байт).
pub const BG_INTERVAL_BYTES: usize = 9_040;

/// Поправка начала фона для Realtime-файлов (байт).
pub const BG_REALTIME_OFFSET_ADJUST: i64 = -404;

/// Шаг линейного сканирования (байт).
pub const BG_SCAN_STEP: usize = 512;

/// Число точек пробного окна при проверке «похоже на спектр».
pub const DEFAULT_PROBE_POINTS: usize = 1024;

/// Минимальное стандартное отклонение правдоподобного спектра.
pub const QUALITY_STD_MIN: f64 = 1e-6;

/// Межкадровый интервал по умолчанию, если кадров слишком мало для медианы.
pub const DEFAULT_FRAME_SPACING: usize = 3_572;

/// Размер одного значения спектра (f32).
pub const POINT_SIZE: usize = 4;

/// Сколько смещений выводится из первого найденного в пакетном режиме
/// сканирования (помимо него самого).
pub const BG_BURST_EXTRA: usize = 3;
