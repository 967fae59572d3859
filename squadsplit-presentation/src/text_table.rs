use std::borrow::Cow;

const COLUMN_SEPARATOR: &str = " | ";
const MIN_COLUMN_WIDTH: usize = 2;

/// Fixed-width text table for terminal output.
#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| display_width(h).max(MIN_COLUMN_WIDTH))
            .collect();

        for row in &self.rows {
            for (i, cell) in row.as_ref().iter().enumerate().take(col_count) {
                col_widths[i] = col_widths[i].max(display_width(cell));
            }
        }

        let mut table = String::with_capacity(
            (col_widths.iter().sum::<usize>() + col_count * COLUMN_SEPARATOR.len() + 1)
                * (self.rows.len() + 2),
        );

        self.push_line(&mut table, &col_widths, self.headers);

        let separator: Vec<String> = col_widths.iter().map(|width| "-".repeat(*width)).collect();
        table.push_str(&separator.join("-+-"));
        table.push('\n');

        for row in &self.rows {
            self.push_line(&mut table, &col_widths, row.as_ref());
        }

        table
    }

    fn push_line(&self, table: &mut String, col_widths: &[usize], cells: &[Cow<'a, str>]) {
        let mut line = String::new();
        for (i, width) in col_widths.iter().enumerate() {
            if i > 0 {
                line.push_str(COLUMN_SEPARATOR);
            }
            let cell = cells.get(i).map_or("", |cell| &**cell);
            let alignment = self.alignments.get(i).copied().unwrap_or_default();
            pad_cell(&mut line, cell, *width, alignment);
        }
        table.push_str(line.trim_end());
        table.push('\n');
    }
}

/// Terminal columns taken by `text`; non-ASCII characters count as wide.
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

fn pad_cell(line: &mut String, cell: &str, width: usize, alignment: Alignment) {
    let padding = width.saturating_sub(display_width(cell));
    let (left, right) = match alignment {
        Alignment::Left => (0, padding),
        Alignment::Center => (padding / 2, padding - padding / 2),
        Alignment::Right => (padding, 0),
    };
    line.extend(std::iter::repeat_n(' ', left));
    line.push_str(cell);
    line.extend(std::iter::repeat_n(' ', right));
}
