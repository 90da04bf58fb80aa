//! Admin panel model
//!
//! Four CRUD tabs over the reference data, each an [`AdminTable`] behind the
//! [`TableView`] trait:
//!
//! | Tab      | Paging   | Search  |
//! |----------|----------|---------|
//! | CPU      | backend  | `ilike` |
//! | GPU      | backend  | `ilike` |
//! | Programs | memory   | name substring |
//! | Laptops  | memory   | name substring |

mod describe;
mod form;
mod table;

pub use describe::{
    CellValue, ColumnSpec, Describable, FieldKind, FieldSpec, OptionSource, build_payload,
    infer_columns, parse_number,
};
pub use form::{AddForm, EditState, MIN_FILTER_CHARS, SelectFilter, SelectOption, is_editable};
pub use table::{AdminTable, SortState, TableMode, TableView};

use crate::datasource::source_for;
use crate::error::Result;
use crate::model::{CpuRow, GpuRow, LaptopRow, ProgramRow};
use crate::repository::Repository;
use crate::types::{AdminTab, PagingMode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// Admin panel settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSettings {
    pub page_size: usize,
    pub search_debounce: Duration,
    /// Per-tab paging override; tabs not listed use [`AdminTab::default_paging`].
    pub paging: HashMap<AdminTab, PagingMode>,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_debounce: Duration::from_millis(300),
            paging: HashMap::new(),
        }
    }
}

impl AdminSettings {
    pub fn paging_for(&self, tab: AdminTab) -> PagingMode {
        self.paging
            .get(&tab)
            .copied()
            .unwrap_or_else(|| tab.default_paging())
    }
}

pub struct AdminPanel {
    repository: Repository,
    tables: Vec<Box<dyn TableView>>,
    active: AdminTab,
    options: HashMap<OptionSource, Vec<SelectOption>>,
}

impl AdminPanel {
    pub fn new(repository: Repository, settings: &AdminSettings) -> Self {
        let tables: Vec<Box<dyn TableView>> = vec![
            Self::table::<CpuRow>(&repository, settings),
            Self::table::<GpuRow>(&repository, settings),
            Self::table::<ProgramRow>(&repository, settings),
            Self::table::<LaptopRow>(&repository, settings),
        ];
        Self {
            repository,
            tables,
            active: AdminTab::default(),
            options: HashMap::new(),
        }
    }

    fn table<T: Describable>(repository: &Repository, settings: &AdminSettings) -> Box<dyn TableView> {
        let mode = settings.paging_for(T::TAB);
        Box::new(AdminTable::<T>::new(
            repository.clone(),
            source_for::<T>(mode, repository.clone()),
            settings.page_size,
            settings.search_debounce,
        ))
    }

    /// Fetch the select-field option lists and the first tab's rows.
    pub fn load(&mut self) -> Result<()> {
        self.load_options()?;
        self.active_table_mut().refresh()
    }

    /// All CPUs and GPUs for select fields; fetched once.
    pub fn load_options(&mut self) -> Result<()> {
        let cpus = self.repository.all_cpus()?;
        let gpus = self.repository.all_gpus()?;
        info!("Loaded {} CPU and {} GPU options", cpus.len(), gpus.len());
        self.options.insert(
            OptionSource::Cpus,
            cpus.into_iter()
                .filter_map(|cpu| Some(SelectOption { id: cpu.id?, name: cpu.name }))
                .collect(),
        );
        self.options.insert(
            OptionSource::Gpus,
            gpus.into_iter()
                .filter_map(|gpu| Some(SelectOption { id: gpu.id?, name: gpu.name }))
                .collect(),
        );
        Ok(())
    }

    pub fn options(&self) -> &HashMap<OptionSource, Vec<SelectOption>> {
        &self.options
    }

    pub fn active_tab(&self) -> AdminTab {
        self.active
    }

    pub fn active_table(&self) -> &dyn TableView {
        self.tables[self.active.index()].as_ref()
    }

    pub fn active_table_mut(&mut self) -> &mut dyn TableView {
        self.tables[self.active.index()].as_mut()
    }

    /// Switch tabs and load the new tab's current page.
    pub fn switch_to(&mut self, tab: AdminTab) -> Result<()> {
        self.active_table_mut().cancel();
        self.active = tab;
        self.active_table_mut().refresh()
    }

    /// Move the dropdown highlight of the focused select field.
    pub fn move_option(&mut self, delta: isize) {
        let index = self.active.index();
        self.tables[index].form_mut().move_option(delta, &self.options);
    }

    /// Pick the highlighted option of the focused select field.
    pub fn pick_option(&mut self) -> bool {
        let index = self.active.index();
        self.tables[index].pick_option(&self.options)
    }
}
