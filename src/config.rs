//! Run configuration: which period to report, where to find it in each
//! workbook, and which rows make up each category.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{RowInterval, Taxonomy};

pub const DEFAULT_PERIOD: &str = "2018/2019";
pub const DEFAULT_SHEET: &str = "Grupo";
pub const DEFAULT_HEADER_ROW: u32 = 5;
pub const DEFAULT_MAX_COLUMNS: u32 = 100;
pub const DEFAULT_OUTPUT: &str = "producao_grupos_de_pesquisa.xlsx";

const fn iv(start: u32, end: u32) -> RowInterval {
    RowInterval::half_open(start, end)
}

const SUMMARY_CATEGORIES: &[(&str, &[RowInterval])] = &[
    ("Artigos completos publicados em periódicos", &[iv(8, 15), iv(17, 24)]),
    ("Livros publicados/organizados ou edições", &[iv(35, 37)]),
    ("Capítulos de livros publicados", &[iv(38, 39)]),
    ("Trabalhos completos publicados em anais de congressos", &[iv(26, 28)]),
    ("Resumos expandidos publicados em anais de congressos", &[iv(30, 30)]),
    ("Resumos publicados em anais de congressos", &[iv(29, 29)]),
];

const DETAIL_CATEGORIES: &[(&str, &[RowInterval])] = &[
    ("Artigos publicados em periódicos com Qualis Restrito", &[iv(8, 15), iv(17, 24)]),
    ("Artigos publicados em periódicos com Qualis Irrestrito", &[iv(8, 15), iv(17, 24)]),
    ("Artigos apresentados em eventos com Qualis Restrito", &[iv(8, 15), iv(17, 24)]),
    ("Artigos apresentados em eventos com Qualis Irrestrito", &[iv(8, 15), iv(17, 24)]),
    ("Resumos apresentados em eventos", &[iv(8, 15), iv(17, 24)]),
    ("Livros publicados ou organizados ou editados", &[iv(35, 37)]),
    ("Capítulos de livros publicados", &[iv(38, 39)]),
    ("Patente registrada", &[iv(38, 39)]),
    ("Projetos externos", &[iv(38, 39)]),
];

/// What to do when two sources resolve to the same group identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The later source replaces the earlier detail entry.
    #[default]
    Overwrite,
    /// Abort the batch.
    Reject,
    /// Add the later totals into the earlier entry.
    Merge,
}

/// Settings consumed by the batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Header label of the column holding the reported period.
    pub period_label: String,
    /// Name of the sheet read from every input workbook.
    pub sheet_name: String,
    /// Row holding the period labels.
    pub header_row: u32,
    /// Exclusive upper bound of the header column search.
    pub max_columns: u32,
    /// Coarse categories merged across every group.
    pub summary: Taxonomy,
    /// Fine categories reported per group.
    pub detail: Taxonomy,
    pub duplicate_groups: DuplicatePolicy,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            period_label: DEFAULT_PERIOD.to_string(),
            sheet_name: DEFAULT_SHEET.to_string(),
            header_row: DEFAULT_HEADER_ROW,
            max_columns: DEFAULT_MAX_COLUMNS,
            summary: default_summary(),
            detail: default_detail(),
            duplicate_groups: DuplicatePolicy::default(),
        }
    }
}

impl ReportConfig {
    /// Loads a configuration file. Omitted fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Key under which the merged summary is reported.
    pub fn period_key(&self) -> String {
        format!("Ano: {}", self.period_label)
    }
}

/// Built-in summary taxonomy.
pub fn default_summary() -> Taxonomy {
    builtin(SUMMARY_CATEGORIES)
}

/// Built-in per-group detail taxonomy.
pub fn default_detail() -> Taxonomy {
    builtin(DETAIL_CATEGORIES)
}

fn builtin(categories: &[(&str, &[RowInterval])]) -> Taxonomy {
    let mut taxonomy = Taxonomy::new();
    for (name, rows) in categories {
        taxonomy.insert(name, rows.to_vec());
    }
    taxonomy
}
