//! Запрос диапазона волновых чисел у пользователя.

use std::io::{BufRead, Write};

use crate::{ExtractError, ExtractResult};

/// Спрашивает начало и конец диапазона (см⁻¹), по одному числу на строку.
///
/// Приглашения пишутся в `prompt_out`. Пустой или нечисловой ответ, как и
/// конец ввода, — ошибка [`ExtractError::InvalidInput`].
pub fn prompt_wavenumber_range<R: BufRead, W: Write>(
    input: &mut R,
    prompt_out: &mut W,
) -> ExtractResult<(f64, f64)> {
    let start = ask(input, prompt_out, "Wavenumber start (cm⁻¹): ")?;
    let end = ask(input, prompt_out, "Wavenumber end (cm⁻¹): ")?;

    Ok((start, end))
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    prompt_out: &mut W,
    question: &str,
) -> ExtractResult<f64> {
    write!(prompt_out, "{question}")?;
    prompt_out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ExtractError::invalid_input(
            "no wavenumber given (end of input)",
        ));
    }

    parse_wavenumber(&line)
}

/// Разбирает одно значение волнового числа.
pub fn parse_wavenumber(s: &str) -> ExtractResult<f64> {
    let trimmed = s.trim();

    let v: f64 = trimmed
        .parse()
        .map_err(|e| ExtractError::invalid_input(format!("wavenumber '{trimmed}': {e}")))?;

    if !v.is_finite() {
        return Err(ExtractError::invalid_input(format!(
            "wavenumber '{trimmed}' is not finite"
        )));
    }

    Ok(v)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_prompt_reads_two_lines() {
        let mut input = Cursor::new("4000\n  399.5 \n");
        let mut shown = Vec::new();

        let range = prompt_wavenumber_range(&mut input, &mut shown).unwrap();

        assert_eq!(range, (4000.0, 399.5));
        let shown = String::from_utf8(shown).unwrap();
        assert!(shown.contains("start"));
        assert!(shown.contains("end"));
    }

    #[test]
    fn test_prompt_rejects_bad_input() {
        let mut sink = Vec::new();

        assert!(prompt_wavenumber_range(&mut Cursor::new("abc\n100\n"), &mut sink).is_err());
        assert!(prompt_wavenumber_range(&mut Cursor::new("100\n"), &mut sink).is_err());
        assert!(prompt_wavenumber_range(&mut Cursor::new(""), &mut sink).is_err());
        assert!(parse_wavenumber("inf").is_err());
    }
}
