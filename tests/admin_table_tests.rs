//! Tests for the admin CRUD tables
//!
//! These tests verify:
//! - Backend and in-memory paging producing the same pages
//! - Search resetting to the first page
//! - Add-form validation before any request
//! - Insert, edit and delete followed by a re-fetch
//! - Select fields picking an option by filtering

use laptop_picker::admin::{AdminPanel, AdminSettings, AdminTable, TableMode, TableView};
use laptop_picker::datasource::source_for;
use laptop_picker::model::CpuRow;
use laptop_picker::{AdminTab, MemoryGateway, PagingMode, Repository};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

const PAGE_SIZE: usize = 20;

fn cpu_rows(count: i64) -> Value {
    let rows: Vec<Value> = (1..=count)
        .map(|id| {
            let family = if id % 3 == 0 { "Core i7" } else { "Ryzen 7" };
            json!({"id": id, "name": format!("{} {}", family, id), "benchmark_cpu": id * 100})
        })
        .collect();
    Value::Array(rows)
}

fn gateway(cpu_count: i64) -> Arc<MemoryGateway> {
    let snapshot = json!({
        "cpus": cpu_rows(cpu_count),
        "gpus": [
            {"id": 1, "name": "Radeon 780M"},
            {"id": 2, "name": "GeForce RTX 4060"}
        ],
        "laptops": [
            {"id": 1, "name": "ThinkPad T14", "url": "https://example.com/t14", "cpu_min": 2, "gpu_min": 1}
        ],
        "programs": []
    });
    Arc::new(MemoryGateway::from_snapshot(&snapshot).unwrap())
}

fn cpu_table(gateway: &Arc<MemoryGateway>, mode: PagingMode) -> AdminTable<CpuRow> {
    let repository = Repository::new(gateway.clone());
    let source = source_for::<CpuRow>(mode, repository.clone());
    AdminTable::new(repository, source, PAGE_SIZE, Duration::ZERO)
}

fn panel(gateway: &Arc<MemoryGateway>) -> AdminPanel {
    let settings = AdminSettings {
        page_size: PAGE_SIZE,
        search_debounce: Duration::ZERO,
        paging: HashMap::new(),
    };
    let mut panel = AdminPanel::new(Repository::new(gateway.clone()), &settings);
    panel.load().unwrap();
    panel
}

fn column(table: &dyn TableView, key: &str) -> usize {
    table.columns().iter().position(|c| c.key == key).unwrap()
}

fn first_ids(table: &dyn TableView) -> Vec<String> {
    let id = column(table, "id");
    table.cells().into_iter().map(|row| row[id].clone()).collect()
}

// =============================================================================
// Paging and search
// =============================================================================

#[test]
fn test_both_paging_modes_agree() {
    for mode in [PagingMode::Server, PagingMode::Client] {
        let gateway = gateway(45);
        let mut table = cpu_table(&gateway, mode);
        table.refresh().unwrap();

        assert_eq!(table.paging(), mode);
        assert_eq!(table.total_count(), 45, "{:?}", mode);
        assert_eq!(TableView::page_count(&table), 3);
        assert_eq!(table.row_count(), 20);

        table.next_page().unwrap();
        table.next_page().unwrap();
        assert_eq!(table.page_index(), 2);
        assert_eq!(table.row_count(), 5);
        assert_eq!(first_ids(&table)[0], "41");

        // Past the last page nothing changes
        table.next_page().unwrap();
        assert_eq!(table.page_index(), 2);

        table.previous_page().unwrap();
        assert_eq!(table.page_index(), 1);
        assert_eq!(first_ids(&table)[0], "21");
    }
}

#[test]
fn test_search_resets_to_first_page() {
    for mode in [PagingMode::Server, PagingMode::Client] {
        let gateway = gateway(45);
        let mut table = cpu_table(&gateway, mode);
        table.refresh().unwrap();
        table.next_page().unwrap();

        table.set_search("core").unwrap();
        assert_eq!(table.page_index(), 0);
        assert_eq!(table.total_count(), 15, "{:?}", mode);
        assert_eq!(TableView::page_count(&table), 1);

        table.set_search("").unwrap();
        assert_eq!(table.total_count(), 45);
    }
}

#[test]
fn test_memory_paging_fetches_once() {
    let gateway = gateway(45);
    let mut table = cpu_table(&gateway, PagingMode::Client);
    table.refresh().unwrap();
    let after_load = gateway.request_count();

    table.next_page().unwrap();
    table.set_search("ryzen").unwrap();
    assert_eq!(gateway.request_count(), after_load);
}

#[test]
fn test_server_paging_fetches_every_page() {
    let gateway = gateway(45);
    let mut table = cpu_table(&gateway, PagingMode::Server);
    table.refresh().unwrap();
    let after_load = gateway.request_count();

    table.next_page().unwrap();
    assert_eq!(gateway.request_count(), after_load + 1);
}

#[test]
fn test_empty_catalog_has_one_page() {
    let gateway = gateway(0);
    let mut table = cpu_table(&gateway, PagingMode::Server);
    table.refresh().unwrap();
    assert_eq!(table.total_count(), 0);
    assert_eq!(TableView::page_count(&table), 1);
    assert!(table.request_delete().is_err());
}

#[test]
fn test_failed_page_change_stays_put() {
    let gateway = gateway(45);
    let mut table = cpu_table(&gateway, PagingMode::Server);
    table.refresh().unwrap();
    gateway.set_failure(Some("timeout"));

    assert!(table.next_page().is_err());
    assert_eq!(table.page_index(), 0);
    assert_eq!(table.row_count(), 20);
}

// =============================================================================
// Writes
// =============================================================================

#[test]
fn test_empty_add_sends_nothing() {
    let gateway = gateway(3);
    let mut table = cpu_table(&gateway, PagingMode::Server);
    table.refresh().unwrap();
    table.begin_add();
    let before = gateway.request_count();

    let err = table.submit_add().unwrap_err();
    assert!(err.is_validation());
    assert_eq!(gateway.request_count(), before);
    assert_eq!(table.mode(), &TableMode::Adding);
}

#[test]
fn test_added_row_shows_after_refetch() {
    let gateway = gateway(3);
    let mut table = cpu_table(&gateway, PagingMode::Client);
    table.refresh().unwrap();
    table.begin_add();
    table.form_mut().values.insert("name".into(), "Core Ultra 7 155H".into());
    table.form_mut().values.insert("benchmark_cpu".into(), "2500.5".into());

    let stored = table.submit_add_typed().unwrap();
    assert_eq!(stored.id, Some(4));
    assert_eq!(table.mode(), &TableMode::Browse);
    assert!(table.form().values.is_empty());

    assert_eq!(table.total_count(), 4);
    let added = table.rows().iter().find(|r| r.id == Some(4)).unwrap();
    assert_eq!(added.name, "Core Ultra 7 155H");
    assert_eq!(added.benchmark_cpu, Some(2500.5));
    assert_eq!(added.rank_cpu, None);
}

#[test]
fn test_deleting_last_row_of_last_page_steps_back() {
    let gateway = gateway(21);
    let mut table = cpu_table(&gateway, PagingMode::Server);
    table.refresh().unwrap();
    table.next_page().unwrap();
    assert_eq!(table.row_count(), 1);

    table.request_delete().unwrap();
    table.confirm_delete().unwrap();
    assert_eq!(table.page_index(), 0);
    assert_eq!(table.total_count(), 20);
    assert_eq!(table.row_count(), 20);
}

#[test]
fn test_edit_keeps_untouched_fields() {
    let gateway = gateway(3);
    let mut table = cpu_table(&gateway, PagingMode::Client);
    table.refresh().unwrap();
    table.select_next();
    table.begin_edit().unwrap();
    match table.mode_mut() {
        TableMode::Editing(edit) => {
            assert_eq!(edit.id, 2);
            edit.values.insert("benchmark_cpu".into(), "999".into());
        }
        other => panic!("expected edit mode, got {:?}", other),
    }
    table.submit_edit().unwrap();

    let row = &table.rows()[1];
    assert_eq!(row.name, "Ryzen 7 2");
    assert_eq!(row.benchmark_cpu, Some(999.0));
}

// =============================================================================
// Panel
// =============================================================================

#[test]
fn test_panel_opens_on_cpus() {
    let gateway = gateway(5);
    let panel = panel(&gateway);
    assert_eq!(panel.active_tab(), AdminTab::Cpus);
    assert_eq!(panel.active_table().total_count(), 5);
    assert_eq!(panel.options().values().map(Vec::len).sum::<usize>(), 7);
}

#[test]
fn test_laptop_add_picks_cpu_by_filter() {
    let gateway = gateway(5);
    let mut panel = panel(&gateway);
    panel.switch_to(AdminTab::Laptops).unwrap();
    assert_eq!(panel.active_table().paging(), PagingMode::Client);

    let now = Instant::now();
    let table = panel.active_table_mut();
    table.begin_add();
    {
        let form = table.form_mut();
        form.values.insert("name".into(), "Zenbook 14".into());
        form.values.insert("url".into(), "https://example.com/zenbook".into());
        form.focus = 2;
        for c in "core".chars() {
            form.type_char(c, now);
        }
    }
    assert!(table.tick(now));

    // Only "Core i7 3" matches among five CPUs
    assert!(panel.pick_option());
    let table = panel.active_table_mut();
    assert_eq!(table.form().values.get("cpu_min").map(String::as_str), Some("3"));

    table.submit_add().unwrap();
    assert_eq!(table.total_count(), 2);
    let cells = table.cells();
    let name = column(table, "name");
    let cpu = column(table, "cpu_min");
    let added = cells.iter().find(|row| row[name] == "Zenbook 14").unwrap();
    assert_eq!(added[cpu], "3");
}

#[test]
fn test_switching_tab_cancels_pending_delete() {
    let gateway = gateway(5);
    let mut panel = panel(&gateway);
    panel.active_table_mut().request_delete().unwrap();

    panel.switch_to(AdminTab::Gpus).unwrap();
    panel.switch_to(AdminTab::Cpus).unwrap();
    assert_eq!(panel.active_table().mode(), &TableMode::Browse);
    assert_eq!(panel.active_table().total_count(), 5);
}
