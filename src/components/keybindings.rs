//! Keybinding system for context-aware keyboard shortcuts
//!
//! One registry maps key presses to [`KeyAction`]s per [`Screen`]. The same
//! table drives key dispatch, the navigation bar and the help overlay, so
//! what the bar shows is what the keys do.

use crate::app::Screen;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    /// Choose or toggle the highlighted answer
    Select,
    /// Switch between the feature and port lists
    SwitchList,
    Next,
    Back,
    Finish,
    Reset,
    ToggleCompare,
    Compare,
    Details,
    NextTab,
    PreviousTab,
    NextPage,
    PreviousPage,
    ColumnLeft,
    ColumnRight,
    Sort,
    Search,
    Add,
    Edit,
    Delete,
    Refresh,
    NextField,
    PreviousField,
    Submit,
    Cancel,
    Confirm,
    Dismiss,
    SwitchMode,
    Help,
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Whether `event` triggers this binding. Shift is implied by characters and BackTab.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let modifiers = match event.code {
            KeyCode::Char(_) | KeyCode::BackTab => event.modifiers.difference(KeyModifiers::SHIFT),
            _ => event.modifiers,
        };
        let code = match event.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        code == self.key && modifiers == self.modifiers
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    screen_bindings: HashMap<Screen, Vec<Keybinding>>,
    /// Available on every screen that does not take text input
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            screen_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    fn register_defaults(&mut self) {
        use KeyAction as A;
        use KeyCode as K;

        self.global_bindings = vec![
            Keybinding::new(K::Char('?'), A::Help, "?", "Help"),
            Keybinding::new(K::F(2), A::SwitchMode, "F2", "Questionnaire / admin"),
            Keybinding::new(K::Char('q'), A::Quit, "Q", "Quit"),
            Keybinding::with_modifiers(K::Char('c'), KeyModifiers::CONTROL, A::Quit, "Ctrl+C", "Quit"),
        ];

        let list_nav = || {
            vec![
                Keybinding::new(K::Up, A::NavigateUp, "Up", "Previous item"),
                Keybinding::new(K::Down, A::NavigateDown, "Down", "Next item"),
            ]
        };

        let mut question = list_nav();
        question.extend([
            Keybinding::new(K::Char(' '), A::Select, "Space", "Choose / toggle"),
            Keybinding::new(K::Tab, A::SwitchList, "Tab", "Features / ports"),
            Keybinding::new(K::Enter, A::Next, "Enter", "Next step"),
            Keybinding::new(K::Char('f'), A::Finish, "F", "Show results"),
            Keybinding::new(K::Backspace, A::Back, "Bksp", "Previous step"),
            Keybinding::new(K::Char('r'), A::Reset, "R", "Start over"),
        ]);
        self.screen_bindings.insert(Screen::Question, question);

        let mut results = list_nav();
        results.extend([
            Keybinding::new(K::Char(' '), A::ToggleCompare, "Space", "Mark for comparison"),
            Keybinding::new(K::Enter, A::Details, "Enter", "Details"),
            Keybinding::new(K::Char('c'), A::Compare, "C", "Compare marked"),
            Keybinding::new(K::Backspace, A::Back, "Bksp", "Back to budget"),
            Keybinding::new(K::Char('r'), A::Reset, "R", "Start over"),
        ]);
        self.screen_bindings.insert(Screen::Results, results);

        let result_view = vec![
            Keybinding::new(K::Backspace, A::Back, "Bksp", "Back to results"),
            Keybinding::new(K::Esc, A::Back, "Esc", "Back to results"),
            Keybinding::new(K::Char('r'), A::Reset, "R", "Start over"),
        ];
        self.screen_bindings
            .insert(Screen::Comparison, result_view.clone());
        self.screen_bindings.insert(Screen::Details, result_view);

        let mut browse = list_nav();
        browse.extend([
            Keybinding::new(K::Right, A::ColumnRight, "Right", "Next column"),
            Keybinding::new(K::Left, A::ColumnLeft, "Left", "Previous column"),
            Keybinding::new(K::Char('s'), A::Sort, "S", "Sort column"),
            Keybinding::new(K::Tab, A::NextTab, "Tab", "Next tab"),
            Keybinding::new(K::BackTab, A::PreviousTab, "S-Tab", "Previous tab"),
            Keybinding::new(K::PageDown, A::NextPage, "PgDn", "Next page"),
            Keybinding::new(K::PageUp, A::PreviousPage, "PgUp", "Previous page"),
            Keybinding::new(K::Char('/'), A::Search, "/", "Search"),
            Keybinding::new(K::Char('a'), A::Add, "A", "Add row"),
            Keybinding::new(K::Char('e'), A::Edit, "E", "Edit row"),
            Keybinding::new(K::Char('d'), A::Delete, "D", "Delete row"),
            Keybinding::new(K::Char('g'), A::Refresh, "G", "Reload"),
        ]);
        self.screen_bindings.insert(Screen::AdminBrowse, browse);

        self.screen_bindings.insert(
            Screen::AdminSearch,
            vec![
                Keybinding::new(K::Enter, A::Submit, "Enter", "Apply search"),
                Keybinding::new(K::Esc, A::Cancel, "Esc", "Cancel"),
            ],
        );

        let form = vec![
            Keybinding::new(K::Tab, A::NextField, "Tab", "Next field"),
            Keybinding::new(K::BackTab, A::PreviousField, "S-Tab", "Previous field"),
            Keybinding::new(K::Up, A::NavigateUp, "Up", "Previous option"),
            Keybinding::new(K::Down, A::NavigateDown, "Down", "Next option"),
            Keybinding::new(K::Enter, A::Select, "Enter", "Pick option"),
            Keybinding::with_modifiers(K::Char('s'), KeyModifiers::CONTROL, A::Submit, "Ctrl+S", "Save"),
            Keybinding::new(K::Esc, A::Cancel, "Esc", "Cancel"),
        ];
        self.screen_bindings.insert(Screen::AdminAdd, form);

        self.screen_bindings.insert(
            Screen::AdminEdit,
            vec![
                Keybinding::new(K::Tab, A::NextField, "Tab", "Next cell"),
                Keybinding::new(K::BackTab, A::PreviousField, "S-Tab", "Previous cell"),
                Keybinding::new(K::Enter, A::Submit, "Enter", "Save"),
                Keybinding::new(K::Esc, A::Cancel, "Esc", "Cancel"),
            ],
        );

        self.screen_bindings.insert(
            Screen::AdminConfirm,
            vec![
                Keybinding::new(K::Char('y'), A::Confirm, "Y", "Delete"),
                Keybinding::new(K::Enter, A::Confirm, "Enter", "Delete"),
                Keybinding::new(K::Char('n'), A::Cancel, "N", "Keep"),
                Keybinding::new(K::Esc, A::Cancel, "Esc", "Keep"),
            ],
        );

        self.screen_bindings.insert(
            Screen::Alert,
            vec![
                Keybinding::new(K::Enter, A::Dismiss, "Enter", "Close"),
                Keybinding::new(K::Esc, A::Dismiss, "Esc", "Close"),
            ],
        );
    }

    /// Keybindings for a screen (includes global bindings where they apply)
    pub fn get_bindings(&self, screen: Screen) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        if let Some(screen_bindings) = self.screen_bindings.get(&screen) {
            bindings.extend(screen_bindings.iter());
        }

        if screen.takes_text() {
            // Ctrl+C still quits while typing
            bindings.extend(
                self.global_bindings
                    .iter()
                    .filter(|b| b.modifiers.contains(KeyModifiers::CONTROL)),
            );
        } else if screen != Screen::Alert {
            bindings.extend(self.global_bindings.iter());
        }

        bindings
    }

    /// Action bound to `event` on `screen`
    pub fn action_for(&self, screen: Screen, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(screen)
            .into_iter()
            .find(|binding| binding.matches(event))
            .map(|binding| binding.action)
    }

    /// Navigation bar items for display
    pub fn get_nav_items(&self, screen: Screen) -> Vec<NavBarItem> {
        let bindings = self.get_bindings(screen);

        let priority_actions: &[KeyAction] = match screen {
            Screen::Question => &[
                KeyAction::NavigateUp,
                KeyAction::Select,
                KeyAction::Next,
                KeyAction::Back,
                KeyAction::Finish,
                KeyAction::Reset,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            Screen::Results => &[
                KeyAction::NavigateUp,
                KeyAction::ToggleCompare,
                KeyAction::Compare,
                KeyAction::Details,
                KeyAction::Back,
                KeyAction::Reset,
                KeyAction::Quit,
            ],
            Screen::Comparison | Screen::Details => {
                &[KeyAction::Back, KeyAction::Reset, KeyAction::Help, KeyAction::Quit]
            }
            Screen::AdminBrowse => &[
                KeyAction::NavigateUp,
                KeyAction::NextTab,
                KeyAction::NextPage,
                KeyAction::Sort,
                KeyAction::Search,
                KeyAction::Add,
                KeyAction::Edit,
                KeyAction::Delete,
                KeyAction::Help,
            ],
            Screen::AdminSearch => &[KeyAction::Submit, KeyAction::Cancel],
            Screen::AdminAdd => &[
                KeyAction::NextField,
                KeyAction::Select,
                KeyAction::Submit,
                KeyAction::Cancel,
            ],
            Screen::AdminEdit => &[KeyAction::NextField, KeyAction::Submit, KeyAction::Cancel],
            Screen::AdminConfirm => &[KeyAction::Confirm, KeyAction::Cancel],
            Screen::Alert => &[KeyAction::Dismiss],
        };

        let mut items: Vec<NavBarItem> = Vec::new();
        for action in priority_actions {
            let Some(binding) = bindings.iter().find(|b| b.action == *action) else {
                continue;
            };
            // Up/Down shown as one item
            if *action == KeyAction::NavigateUp {
                items.push(NavBarItem {
                    key_display: "Up/Dn".to_string(),
                    action_label: "Navigate".to_string(),
                });
            } else {
                items.push(NavBarItem {
                    key_display: binding.display.clone(),
                    action_label: binding.description.clone(),
                });
            }
        }
        items
    }

    /// Full help content for a screen (for the help overlay)
    pub fn get_help_content(&self, screen: Screen) -> Vec<HelpSection> {
        let (navigation, rest): (Vec<&Keybinding>, Vec<&Keybinding>) = self
            .get_bindings(screen)
            .into_iter()
            .partition(|b| is_navigation(b.action));
        let (general, actions): (Vec<&Keybinding>, Vec<&Keybinding>) = rest.into_iter().partition(|b| {
            matches!(
                b.action,
                KeyAction::SwitchMode | KeyAction::Help | KeyAction::Quit
            )
        });

        [("Actions", actions), ("Navigation", navigation), ("General", general)]
            .into_iter()
            .filter(|(_, bindings)| !bindings.is_empty())
            .map(|(title, bindings)| HelpSection {
                title: title.to_string(),
                items: bindings
                    .iter()
                    .map(|b| (b.display.clone(), b.description.clone()))
                    .collect(),
            })
            .collect()
    }
}

fn is_navigation(action: KeyAction) -> bool {
    matches!(
        action,
        KeyAction::NavigateUp
            | KeyAction::NavigateDown
            | KeyAction::SwitchList
            | KeyAction::NextTab
            | KeyAction::PreviousTab
            | KeyAction::NextPage
            | KeyAction::PreviousPage
            | KeyAction::ColumnLeft
            | KeyAction::ColumnRight
            | KeyAction::NextField
            | KeyAction::PreviousField
    )
}

/// Navigation bar item for display
#[derive(Debug, Clone)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_question_bindings() {
        let ctx = KeybindingContext::new();
        assert_eq!(
            ctx.action_for(Screen::Question, &key(KeyCode::Enter)),
            Some(KeyAction::Next)
        );
        assert_eq!(
            ctx.action_for(Screen::Question, &key(KeyCode::Char('Q'))),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn test_backtab_with_shift() {
        let ctx = KeybindingContext::new();
        let backtab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(
            ctx.action_for(Screen::AdminBrowse, &backtab),
            Some(KeyAction::PreviousTab)
        );
    }

    #[test]
    fn test_text_screens_do_not_steal_characters() {
        let ctx = KeybindingContext::new();
        for screen in [Screen::AdminSearch, Screen::AdminAdd, Screen::AdminEdit] {
            assert_eq!(ctx.action_for(screen, &key(KeyCode::Char('q'))), None);
            assert_eq!(ctx.action_for(screen, &key(KeyCode::Char('?'))), None);
        }
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            ctx.action_for(Screen::AdminAdd, &ctrl_c),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn test_same_key_differs_by_screen() {
        let ctx = KeybindingContext::new();
        let space = key(KeyCode::Char(' '));
        assert_eq!(ctx.action_for(Screen::Question, &space), Some(KeyAction::Select));
        assert_eq!(
            ctx.action_for(Screen::Results, &space),
            Some(KeyAction::ToggleCompare)
        );
    }

    #[test]
    fn test_nav_items_combine_up_down() {
        let ctx = KeybindingContext::new();
        let items = ctx.get_nav_items(Screen::Question);
        assert_eq!(items[0].key_display, "Up/Dn");
        assert!(items.iter().all(|i| i.key_display != "Down"));
    }

    #[test]
    fn test_help_lists_every_binding_once() {
        let ctx = KeybindingContext::new();
        let sections = ctx.get_help_content(Screen::AdminBrowse);
        let listed: usize = sections.iter().map(|s| s.items.len()).sum();
        assert_eq!(listed, ctx.get_bindings(Screen::AdminBrowse).len());
        assert_eq!(sections[0].title, "Actions");
    }
}
