//! Tests for the questionnaire flow
//!
//! These tests verify:
//! - Step navigation and the forward/back rules
//! - Category changes clearing software and re-fetching programs
//! - Budget filtering of the ranked list
//! - Comparison and details transitions
//! - Failed re-fetches keeping the previous data

use laptop_picker::questionnaire::{
    QuestionnaireController, QuestionnaireState, SelectionKind, SubKey, WizardStep,
};
use laptop_picker::{MemoryGateway, PickerError, Repository};
use serde_json::json;
use std::sync::Arc;

fn gateway() -> Arc<MemoryGateway> {
    let snapshot = json!({
        "categories": [
            {"id": 1, "name": "office"},
            {"id": 2, "name": "gaming", "fa_name": "Gaming"}
        ],
        "programs_latest": [
            {"id": 1, "name": "LibreOffice", "category": "office"},
            {"id": 2, "name": "Cyberpunk 2077", "category": ["gaming"], "gpu_min": 20},
            {"id": 3, "name": "Discord", "category": ["gaming", "office"]}
        ],
        "features": [{"id": 10, "name": "Backlit keyboard"}],
        "ports": [{"id": 20, "name": "HDMI"}, {"id": 21, "name": "Thunderbolt 4"}],
        "laptop_full_info": [
            {"id": 100, "laptop_name": "Budget Book"},
            {"id": 101, "laptop_name": "Gaming Beast"},
            {"id": 102, "laptop_name": "No Listing"}
        ],
        "laptop_component_scores": [
            {"laptop_id": 100, "cpu_score": 40.0, "ram_score": 40.0, "gpu_score": 20.0},
            {"laptop_id": 101, "cpu_score": 90.0, "ram_score": 80.0, "gpu_score": 95.0},
            {"laptop_id": 102, "cpu_score": 60.0, "ram_score": 60.0, "gpu_score": 60.0}
        ],
        "laptop_min_price": [
            {"laptop_id": 100, "min_price": 24600000},
            {"laptop_id": 101, "min_price": 95000000}
        ]
    });
    Arc::new(MemoryGateway::from_snapshot(&snapshot).unwrap())
}

fn controller() -> (Arc<MemoryGateway>, QuestionnaireController) {
    let gateway = gateway();
    let mut controller = QuestionnaireController::new(Repository::new(gateway.clone()));
    controller.load().unwrap();
    (gateway, controller)
}

fn program_names(controller: &QuestionnaireController) -> Vec<&str> {
    controller.programs().iter().map(|p| p.name.as_str()).collect()
}

fn result_ids(controller: &QuestionnaireController) -> Vec<i64> {
    controller.results().iter().map(|item| item.id).collect()
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_starts_on_category_with_everything_ranked() {
    let (_, controller) = controller();
    assert_eq!(controller.step(), WizardStep::Category);
    assert_eq!(result_ids(&controller), vec![101, 102, 100]);
    assert!(controller.programs().is_empty());
}

#[test]
fn test_category_must_be_answered() {
    let (_, mut controller) = controller();
    assert!(!controller.can_advance());
    assert!(!controller.next());
    assert_eq!(controller.step(), WizardStep::Category);

    controller
        .select(WizardStep::Category, "1", SelectionKind::Radio, None)
        .unwrap();
    assert!(controller.next());
    assert_eq!(controller.step(), WizardStep::Software);
}

#[test]
fn test_software_step_is_optional() {
    let mut state = QuestionnaireState::new();
    state.step = WizardStep::Software;
    assert!(state.can_advance());
}

#[test]
fn test_features_step_accepts_either_list() {
    let mut state = QuestionnaireState::new();
    state.step = WizardStep::Features;
    assert!(!state.can_advance());

    let (with_port, _) = state
        .select(WizardStep::Features, "21", SelectionKind::Checkbox, Some(SubKey::Ports))
        .unwrap();
    assert!(with_port.can_advance());
    assert!(with_port.selections.features.is_empty());
}

#[test]
fn test_back_from_first_step_stays() {
    let (_, mut controller) = controller();
    controller.back();
    assert_eq!(controller.step(), WizardStep::Category);
}

#[test]
fn test_finish_needs_budget_step() {
    let (_, mut controller) = controller();
    let err = controller.finish().unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_wrong_selection_kind_is_rejected() {
    let (_, mut controller) = controller();
    let err = controller
        .select(WizardStep::Category, "1", SelectionKind::Checkbox, None)
        .unwrap_err();
    assert!(matches!(err, PickerError::State(_)), "{:?}", err);
    assert!(controller.state().selections.category.is_none());
}

// =============================================================================
// Programs
// =============================================================================

#[test]
fn test_programs_follow_category() {
    let (_, mut controller) = controller();
    controller
        .select(WizardStep::Category, "1", SelectionKind::Radio, None)
        .unwrap();
    assert_eq!(program_names(&controller), vec!["LibreOffice", "Discord"]);

    controller
        .select(WizardStep::Category, "2", SelectionKind::Radio, None)
        .unwrap();
    assert_eq!(program_names(&controller), vec!["Cyberpunk 2077", "Discord"]);
}

#[test]
fn test_changing_category_clears_software() {
    let (_, mut controller) = controller();
    controller
        .select(WizardStep::Category, "2", SelectionKind::Radio, None)
        .unwrap();
    controller
        .select(WizardStep::Software, "2", SelectionKind::Checkbox, None)
        .unwrap();
    controller
        .select(WizardStep::Software, "3", SelectionKind::Checkbox, None)
        .unwrap();
    assert_eq!(controller.state().selections.software, vec!["2", "3"]);

    controller
        .select(WizardStep::Category, "1", SelectionKind::Radio, None)
        .unwrap();
    assert!(controller.state().selections.software.is_empty());
}

#[test]
fn test_checkbox_toggles_off() {
    let (_, mut controller) = controller();
    for _ in 0..2 {
        controller
            .select(WizardStep::Features, "10", SelectionKind::Checkbox, Some(SubKey::Features))
            .unwrap();
    }
    assert!(controller.state().selections.features.is_empty());
}

// =============================================================================
// Budget and results
// =============================================================================

#[test]
fn test_budget_filters_priced_laptops_only() {
    let (_, mut controller) = controller();
    controller
        .select(WizardStep::Budget, "p1", SelectionKind::Radio, None)
        .unwrap();
    // 24.6 million rounds to 25, inside p1; the unlisted laptop is kept
    assert_eq!(result_ids(&controller), vec![102, 100]);
    assert_eq!(controller.results()[1].price_million, Some(25));

    controller
        .select(WizardStep::Budget, "p4", SelectionKind::Radio, None)
        .unwrap();
    assert_eq!(result_ids(&controller), vec![101, 102]);
}

#[test]
fn test_summary_text_on_question_steps() {
    let (_, mut controller) = controller();
    assert_eq!(
        controller.summary_text().as_deref(),
        Some("Usage: ...  |  Budget: ...")
    );
    controller
        .select(WizardStep::Category, "2", SelectionKind::Radio, None)
        .unwrap();
    controller
        .select(WizardStep::Budget, "p2", SelectionKind::Radio, None)
        .unwrap();
    assert_eq!(
        controller.summary_text().as_deref(),
        Some("Usage: Gaming  |  Budget: 30 to 50 million")
    );
}

#[test]
fn test_walk_to_results_then_compare() {
    let (_, mut controller) = controller();
    controller
        .select(WizardStep::Category, "1", SelectionKind::Radio, None)
        .unwrap();
    assert!(controller.next());
    assert!(controller.next());
    controller
        .select(WizardStep::Features, "10", SelectionKind::Checkbox, Some(SubKey::Features))
        .unwrap();
    assert!(controller.next());
    controller
        .select(WizardStep::Budget, "p5", SelectionKind::Radio, None)
        .unwrap();
    controller.finish().unwrap();
    assert_eq!(controller.step(), WizardStep::Results);
    assert!(controller.summary_text().is_none());

    controller.toggle_compare(100);
    assert!(controller.open_comparison().unwrap_err().is_validation());
    controller.toggle_compare(101);
    controller.open_comparison().unwrap();
    assert_eq!(controller.step(), WizardStep::Comparison);
    let compared: Vec<i64> = controller.compared_items().iter().map(|i| i.id).collect();
    assert_eq!(compared, vec![100, 101]);

    controller.back();
    assert_eq!(controller.step(), WizardStep::Results);
}

#[test]
fn test_budget_change_drops_marks_for_hidden_laptops() {
    let (_, mut controller) = controller();
    controller.toggle_compare(100);
    controller.toggle_compare(101);
    controller.show_details(101).unwrap();
    controller.back();

    // 95 million is outside p1, so laptop 101 leaves the list
    controller
        .select(WizardStep::Budget, "p1", SelectionKind::Radio, None)
        .unwrap();
    assert_eq!(result_ids(&controller), vec![102, 100]);
    assert_eq!(controller.state().compare, vec![100]);
    assert_eq!(controller.state().active_laptop, None);
    assert!(controller.open_comparison().unwrap_err().is_validation());

    controller.toggle_compare(102);
    controller.open_comparison().unwrap();
    assert_eq!(controller.compared_items().len(), 2);
}

#[test]
fn test_details_and_back() {
    let (_, mut controller) = controller();
    assert!(controller.show_details(999).is_err());

    controller.show_details(102).unwrap();
    assert_eq!(controller.step(), WizardStep::Details);
    assert_eq!(controller.active_item().map(|i| i.name.as_str()), Some("No Listing"));

    controller.back();
    assert_eq!(controller.step(), WizardStep::Results);
}

#[test]
fn test_reset_clears_everything() {
    let (_, mut controller) = controller();
    controller
        .select(WizardStep::Category, "2", SelectionKind::Radio, None)
        .unwrap();
    controller
        .select(WizardStep::Budget, "p4", SelectionKind::Radio, None)
        .unwrap();
    controller.toggle_compare(101);

    controller.reset().unwrap();
    assert_eq!(controller.state(), &QuestionnaireState::new());
    assert!(controller.programs().is_empty());
    assert_eq!(result_ids(&controller).len(), 3);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_failed_refetch_keeps_previous_results() {
    let (gateway, mut controller) = controller();
    gateway.set_failure(Some("connection reset"));

    let err = controller
        .select(WizardStep::Budget, "p1", SelectionKind::Radio, None)
        .unwrap_err();
    assert!(matches!(err, PickerError::Transport(_)), "{:?}", err);
    // The choice is committed even though the list is stale
    assert_eq!(controller.state().selections.budget.as_deref(), Some("p1"));
    assert_eq!(result_ids(&controller), vec![101, 102, 100]);

    gateway.set_failure(None);
    controller.refresh_results().unwrap();
    assert_eq!(result_ids(&controller), vec![102, 100]);
}

#[test]
fn test_failed_load_reports_error() {
    let gateway = gateway();
    gateway.set_failure(Some("offline"));
    let mut controller = QuestionnaireController::new(Repository::new(gateway));
    assert!(controller.load().is_err());
    assert!(controller.categories().is_empty());
}
