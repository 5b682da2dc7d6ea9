use crate::{SrsError, SrsResult};

/// Прямоугольная матрица f32 в построчной раскладке.
///
/// Строка — один спектр (кадр во времени или фоновый спектр), столбец —
/// спектральный канал.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Собирает матрицу из строк одинаковой длины.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> SrsResult<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);

        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(SrsError::config(format!(
                "Row {i} has {} values, expected {cols}",
                r.len()
            )));
        }

        let n_rows = rows.len();
        let data = rows.into_iter().flatten().collect();

        Ok(Self {
            rows: n_rows,
            cols,
            data,
        })
    }

    /// Обрезает все строки до минимальной длины и собирает матрицу.
    ///
    /// Дополнение не выполняется никогда.
    pub fn from_rows_truncated(rows: Vec<Vec<f32>>) -> Self {
        let cols = rows.iter().map(Vec::len).min().unwrap_or(0);
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);

        for r in &rows {
            data.extend_from_slice(&r[..cols]);
        }

        Self {
            rows: n_rows,
            cols,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (строки, столбцы)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Строка `i`, если она существует.
    pub fn row(
        &self,
        i: usize,
    ) -> Option<&[f32]> {
        if i >= self.rows {
            return None;
        }

        Some(&self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Итератор по строкам.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |i| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Значение в ячейке (`row`, `col`).
    pub fn get(
        &self,
        row: usize,
        col: usize,
    ) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }

        Some(self.data[row * self.cols + col])
    }

    /// Все данные построчно.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_uniform() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();

        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.row(1).unwrap(), &[3.0, 4.0]);
        assert_eq!(m.get(2, 1), Some(6.0));
        assert_eq!(m.get(3, 0), None);
        assert!(m.row(3).is_none());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_truncated_to_shortest_row() {
        let m = Matrix::from_rows_truncated(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0], vec![
            6.0, 7.0, 8.0, 9.0,
        ]]);

        assert_eq!(m.shape(), (3, 2));
        let rows: Vec<&[f32]> = m.iter_rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0][..], &[4.0, 5.0][..], &[6.0, 7.0][..]]);
    }

    #[test]
    fn test_empty_matrix() {
        let m = Matrix::from_rows_truncated(Vec::new());
        assert!(m.is_empty());
        assert_eq!(m.shape(), (0, 0));
    }
}
