//! Generic CRUD table.
//!
//! [`AdminTable`] is written once against [`Describable`] and used for every
//! admin entity. [`TableView`] erases the row type so the panel can hold the
//! four tables side by side.

use super::describe::{CellValue, ColumnSpec, Describable, FieldSpec, OptionSource, infer_columns};
use super::form::{AddForm, EditState, SelectOption};
use crate::datasource::{DataSource, page_count};
use crate::error::{PickerError, Result};
use crate::repository::Repository;
use crate::types::{AdminTab, PagingMode, SortDirection};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What the table is doing right now.
#[derive(Debug, Clone, PartialEq)]
pub enum TableMode {
    Browse,
    /// Typing into the search box.
    Search,
    /// Filling in the add form.
    Adding,
    Editing(EditState),
    /// Waiting for the user to confirm deleting a row.
    ConfirmDelete { id: i64, name: String },
}

/// Current sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

pub struct AdminTable<T: Describable> {
    repository: Repository,
    source: Box<dyn DataSource<T>>,
    page_size: usize,
    page_index: usize,
    search: String,
    /// Rows of the current page as fetched.
    fetched: Vec<T>,
    /// Rows of the current page in display order.
    rows: Vec<T>,
    total_count: usize,
    columns: Vec<ColumnSpec>,
    sort: Option<SortState>,
    selected: usize,
    mode: TableMode,
    form: AddForm,
}

impl<T: Describable> AdminTable<T> {
    pub fn new(
        repository: Repository,
        source: Box<dyn DataSource<T>>,
        page_size: usize,
        debounce: Duration,
    ) -> Self {
        Self {
            repository,
            source,
            page_size: page_size.max(1),
            page_index: 0,
            search: String::new(),
            fetched: Vec::new(),
            rows: Vec::new(),
            total_count: 0,
            columns: T::columns(),
            sort: None,
            selected: 0,
            mode: TableMode::Browse,
            form: AddForm::new(T::fields(), debounce),
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }

    /// Fetch the current page and re-apply the sort.
    ///
    /// On failure the rows already shown stay as they were.
    pub fn refresh(&mut self) -> Result<()> {
        let page = self
            .source
            .fetch_page(self.page_index, self.page_size, &self.search)
            .inspect_err(|e| warn!("Failed to load {}: {}", T::COLLECTION, e))?;

        // A delete can empty the last page; step back to the new last page.
        let last = page_count(page.total_count, self.page_size) - 1;
        if page.rows.is_empty() && self.page_index > last {
            self.page_index = last;
            return self.refresh();
        }

        if T::columns().is_empty() {
            if let Some(first) = page.rows.first() {
                self.columns = infer_columns(&first.to_json());
            }
        }

        self.total_count = page.total_count;
        self.fetched = page.rows;
        self.apply_sort();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        Ok(())
    }

    fn apply_sort(&mut self) {
        let mut rows = self.fetched.clone();
        if let Some(sort) = &self.sort {
            let descending = sort.direction == SortDirection::Descending;
            rows.sort_by(|a, b| {
                let (x, y) = (a.cell(&sort.key), b.cell(&sort.key));
                match (x.is_null(), y.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    _ if descending => x.compare(&y).reverse(),
                    _ => x.compare(&y),
                }
            });
        }
        self.rows = rows;
    }

    /// Re-fetch the page after a successful write.
    fn after_write(&mut self, action: &str) -> Result<()> {
        info!("{} {} row", action, T::COLLECTION);
        self.source.invalidate();
        self.refresh()
    }

    pub fn submit_add_typed(&mut self) -> Result<T> {
        // Validation happens before any request is made.
        let payload = T::build_payload(&self.form.values)?;
        let stored: T = self
            .repository
            .insert(T::COLLECTION, &payload)
            .inspect_err(|e| warn!("Insert into {} failed: {}", T::COLLECTION, e))?;
        self.form.clear();
        self.mode = TableMode::Browse;
        self.after_write("Added")?;
        Ok(stored)
    }
}

/// Row-type-erased view of an [`AdminTable`].
pub trait TableView: Send {
    fn tab(&self) -> AdminTab;
    fn paging(&self) -> PagingMode;
    fn columns(&self) -> &[ColumnSpec];
    /// Rendered cells of the current page, one `Vec` per row in column order.
    fn cells(&self) -> Vec<Vec<String>>;
    fn row_count(&self) -> usize;
    fn selected(&self) -> usize;
    fn select_next(&mut self);
    fn select_previous(&mut self);
    fn total_count(&self) -> usize;
    fn page_index(&self) -> usize;
    fn page_count(&self) -> usize;
    fn search(&self) -> &str;
    fn mode(&self) -> &TableMode;
    fn mode_mut(&mut self) -> &mut TableMode;
    fn sort(&self) -> Option<&SortState>;
    fn form(&self) -> &AddForm;
    fn form_mut(&mut self) -> &mut AddForm;
    fn fields(&self) -> Vec<FieldSpec>;

    fn refresh(&mut self) -> Result<()>;
    fn next_page(&mut self) -> Result<()>;
    fn previous_page(&mut self) -> Result<()>;

    /// Enter search mode.
    fn begin_search(&mut self);
    /// Edit the search term; server sources re-query, memory sources re-filter.
    fn set_search(&mut self, term: &str) -> Result<()>;

    /// Cycle ascending, descending, unsorted on a column.
    fn toggle_sort(&mut self, column: usize);

    fn begin_add(&mut self);
    fn submit_add(&mut self) -> Result<()>;
    fn pick_option(&mut self, options: &HashMap<OptionSource, Vec<SelectOption>>) -> bool;
    fn tick(&mut self, now: Instant) -> bool;

    fn begin_edit(&mut self) -> Result<()>;
    fn submit_edit(&mut self) -> Result<()>;

    fn request_delete(&mut self) -> Result<()>;
    fn confirm_delete(&mut self) -> Result<()>;

    /// Leave whatever sub-mode the table is in.
    fn cancel(&mut self);
}

impl<T: Describable> TableView for AdminTable<T> {
    fn tab(&self) -> AdminTab {
        T::TAB
    }

    fn paging(&self) -> PagingMode {
        self.source.mode()
    }

    fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| row.cell(&column.key).to_string())
                    .collect()
            })
            .collect()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn selected(&self) -> usize {
        self.selected
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn total_count(&self) -> usize {
        self.total_count
    }

    fn page_index(&self) -> usize {
        self.page_index
    }

    fn page_count(&self) -> usize {
        page_count(self.total_count, self.page_size)
    }

    fn search(&self) -> &str {
        &self.search
    }

    fn mode(&self) -> &TableMode {
        &self.mode
    }

    fn mode_mut(&mut self) -> &mut TableMode {
        &mut self.mode
    }

    fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    fn form(&self) -> &AddForm {
        &self.form
    }

    fn form_mut(&mut self) -> &mut AddForm {
        &mut self.form
    }

    fn fields(&self) -> Vec<FieldSpec> {
        T::fields()
    }

    fn refresh(&mut self) -> Result<()> {
        AdminTable::refresh(self)
    }

    fn next_page(&mut self) -> Result<()> {
        if self.page_index + 1 >= TableView::page_count(self) {
            return Ok(());
        }
        self.page_index += 1;
        self.selected = 0;
        if let Err(e) = AdminTable::refresh(self) {
            self.page_index -= 1;
            return Err(e);
        }
        Ok(())
    }

    fn previous_page(&mut self) -> Result<()> {
        if self.page_index == 0 {
            return Ok(());
        }
        self.page_index -= 1;
        self.selected = 0;
        if let Err(e) = AdminTable::refresh(self) {
            self.page_index += 1;
            return Err(e);
        }
        Ok(())
    }

    fn begin_search(&mut self) {
        self.mode = TableMode::Search;
    }

    fn set_search(&mut self, term: &str) -> Result<()> {
        if self.search == term {
            return Ok(());
        }
        self.search = term.to_string();
        self.page_index = 0;
        self.selected = 0;
        AdminTable::refresh(self)
    }

    fn toggle_sort(&mut self, column: usize) {
        let Some(key) = self.columns.get(column).map(|c| c.key.clone()) else {
            return;
        };
        self.sort = match self.sort.take() {
            Some(SortState {
                key: current,
                direction: SortDirection::Ascending,
            }) if current == key => Some(SortState {
                key,
                direction: SortDirection::Descending,
            }),
            Some(SortState {
                key: current,
                direction: SortDirection::Descending,
            }) if current == key => None,
            _ => Some(SortState {
                key,
                direction: SortDirection::Ascending,
            }),
        };
        self.apply_sort();
    }

    fn begin_add(&mut self) {
        self.mode = TableMode::Adding;
    }

    fn submit_add(&mut self) -> Result<()> {
        self.submit_add_typed().map(|_| ())
    }

    fn pick_option(&mut self, options: &HashMap<OptionSource, Vec<SelectOption>>) -> bool {
        self.form.pick_option(options)
    }

    fn tick(&mut self, now: Instant) -> bool {
        self.form.tick(now)
    }

    fn begin_edit(&mut self) -> Result<()> {
        let row = self
            .selected_row()
            .ok_or_else(|| PickerError::validation("No row selected"))?;
        let id = row
            .id()
            .ok_or_else(|| PickerError::validation("This row has no id and cannot be edited"))?;
        let cells: Vec<(String, CellValue)> = self
            .columns
            .iter()
            .map(|column| (column.key.clone(), row.cell(&column.key)))
            .collect();
        self.mode = TableMode::Editing(EditState::new(id, &self.columns, cells));
        Ok(())
    }

    fn submit_edit(&mut self) -> Result<()> {
        let TableMode::Editing(edit) = &self.mode else {
            return Err(PickerError::state("Not editing a row"));
        };
        let id = edit.id;
        let patch = edit.to_patch(&T::fields())?;
        let _: T = self
            .repository
            .update(T::COLLECTION, id, &patch)
            .inspect_err(|e| warn!("Update of {} {} failed: {}", T::COLLECTION, id, e))?;
        self.mode = TableMode::Browse;
        self.after_write("Updated")
    }

    fn request_delete(&mut self) -> Result<()> {
        let row = self
            .selected_row()
            .ok_or_else(|| PickerError::validation("No row selected"))?;
        let id = row
            .id()
            .ok_or_else(|| PickerError::validation("This row has no id and cannot be deleted"))?;
        self.mode = TableMode::ConfirmDelete {
            id,
            name: row.name().to_string(),
        };
        Ok(())
    }

    fn confirm_delete(&mut self) -> Result<()> {
        let TableMode::ConfirmDelete { id, .. } = self.mode else {
            return Err(PickerError::state("No delete pending"));
        };
        self.mode = TableMode::Browse;
        self.repository
            .delete(T::COLLECTION, id)
            .inspect_err(|e| warn!("Delete of {} {} failed: {}", T::COLLECTION, id, e))?;
        self.after_write("Deleted")
    }

    fn cancel(&mut self) {
        self.mode = TableMode::Browse;
    }
}
