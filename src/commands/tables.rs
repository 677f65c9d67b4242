//! Layout for the tables the commands print. Column tables (note, section, and segment
//! listings) declare their columns up front and are then filled a row at a time. Field
//! tables (the ELF header, the ABI tag) are name/value pairs. Both can append a legend
//! explaining each column or field.
use crate::utils::{Styling, uwriteln};
use std::fmt::Display;
use std::io::Write;
use tabled::builder::Builder;
use tabled::settings::{Alignment, Padding, Style, object::Columns};

#[derive(Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Commands declare their columns as consts, e.g. `const NOTE_COLUMNS: [Column; 5]`.
pub struct Column {
    pub title: &'static str,
    pub align: Align,
    pub help: &'static str,
}

impl Column {
    pub const fn left(title: &'static str, help: &'static str) -> Column {
        Column {
            title,
            align: Align::Left,
            help,
        }
    }

    pub const fn right(title: &'static str, help: &'static str) -> Column {
        Column {
            title,
            align: Align::Right,
            help,
        }
    }
}

/// Rows of cells under a fixed set of columns:
/// name  type     raw type  size  summary               if titles
/// ----  ----     --------  ----  -------
/// GNU   AbiTag          1    16  Linux 3.2.0
/// GNU   BuildId         3    20  3b2f1e1100...
///
/// name: the owner of the note                        if explain
pub struct Table {
    columns: &'static [Column],
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &'static [Column]) -> Table {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Cells are in column order.
    pub fn push(&mut self, cells: Vec<String>) {
        debug_assert_eq!(cells.len(), self.columns.len(), "row doesn't match the columns");
        let row = cells
            .into_iter()
            .map(|cell| {
                // tabled mangles the layout of empty cells
                let cell = if cell.is_empty() { " ".to_string() } else { cell };
                cell.table_field().to_string()
            })
            .collect();
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Nothing is printed for an empty table unless titles were asked for.
    pub fn write(&self, out: &mut impl Write, titles: bool, explain: bool) {
        if !self.is_empty() || titles {
            let mut records: Vec<Vec<String>> = Vec::with_capacity(self.rows.len() + 2);
            if titles {
                records.push(
                    self.columns
                        .iter()
                        .map(|c| c.title.table_header().to_string())
                        .collect(),
                );
                records.push(
                    self.columns
                        .iter()
                        .map(|c| "-".repeat(c.title.len()).table_sep().to_string())
                        .collect(),
                );
            }
            records.extend(self.rows.iter().cloned());
            let aligns: Vec<Align> = self.columns.iter().map(|c| c.align).collect();
            uwriteln!(out, "{}", render(records, &aligns));
        }

        if explain {
            uwriteln!(out);
            write_legend(out, self.columns.iter().map(|c| (c.title, c.help)));
        }
    }
}

/// Untitled name/value pairs:
/// os      Linux
/// kernel  3.2.0
pub struct Fields {
    rows: Vec<(&'static str, String, &'static str)>,
}

impl Fields {
    pub fn new() -> Fields {
        Fields { rows: Vec::new() }
    }

    pub fn add(&mut self, name: &'static str, value: impl Display, help: &'static str) {
        let value = value.to_string().table_field().to_string();
        self.rows.push((name, value, help));
    }

    pub fn write(&self, out: &mut impl Write, explain: bool) {
        let records: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|(name, value, _)| vec![name.to_string(), value.clone()])
            .collect();
        uwriteln!(out, "{}", render(records, &[Align::Left, Align::Left]));

        if explain {
            uwriteln!(out);
            write_legend(out, self.rows.iter().map(|(name, _, help)| (*name, *help)));
        }
    }
}

fn render(records: Vec<Vec<String>>, aligns: &[Align]) -> String {
    let mut builder = Builder::with_capacity(records.len(), aligns.len());
    for record in records {
        builder.push_record(record);
    }

    let mut table = builder.build();
    for (i, align) in aligns.iter().enumerate() {
        let alignment = match align {
            Align::Left => Alignment::left(),
            Align::Right => Alignment::right(),
        };
        table.modify(Columns::one(i), alignment);
    }
    table.modify(Columns::first(), Padding::new(0, 1, 0, 0));
    table.with(Style::empty());
    table.to_string()
}

fn write_legend<'a>(out: &mut impl Write, entries: impl Iterator<Item = (&'a str, &'a str)>) {
    for (title, help) in entries {
        uwriteln!(out, "{}: {}", title.explain_title(), help.explain_text());
    }
}
