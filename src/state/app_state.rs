//! Application state definitions

use super::forms::{FieldKind, FieldSpec, FieldValue, FormEngine, FormSchema};
use super::wish_card::WishCard;
use crate::error::FormError;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Menu,
    Dormitory,
    Course,
    WishCard,
}

impl View {
    /// Entries listed on the menu, in order
    pub const MENU: [View; 3] = [View::Dormitory, View::Course, View::WishCard];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Menu => "Menu",
            Self::Dormitory => "Dormitory Registration",
            Self::Course => "Course Registration",
            Self::WishCard => "Birthday Wish",
        }
    }
}

/// Which registration form a submission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Dormitory,
    Course,
}

impl FormKind {
    pub fn view(self) -> View {
        match self {
            Self::Dormitory => View::Dormitory,
            Self::Course => View::Course,
        }
    }
}

/// A form engine plus the focus state needed to drive it from the keyboard
#[derive(Debug, Clone)]
pub struct FormPage {
    pub engine: FormEngine,
    /// Focused row; `field_count()` means the submit button row
    pub active_field_index: usize,
    /// Highlighted option on choice fields
    pub option_cursor: usize,
}

impl FormPage {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            engine: FormEngine::new(schema),
            active_field_index: 0,
            option_cursor: 0,
        }
    }

    /// Number of input rows, not counting the submit button
    pub fn field_count(&self) -> usize {
        self.engine.schema().len()
    }

    pub fn is_submit_row_active(&self) -> bool {
        self.active_field_index >= self.field_count()
    }

    pub fn active_spec(&self) -> Option<&FieldSpec> {
        self.engine.schema().fields().get(self.active_field_index)
    }

    pub fn next_field(&mut self) {
        let count = self.field_count() + 1;
        self.active_field_index = (self.active_field_index + 1) % count;
        self.option_cursor = 0;
    }

    pub fn prev_field(&mut self) {
        let count = self.field_count() + 1;
        self.active_field_index = if self.active_field_index == 0 {
            count - 1
        } else {
            self.active_field_index - 1
        };
        self.option_cursor = 0;
    }

    pub fn next_option(&mut self) {
        let len = self.active_spec().map_or(0, |s| s.kind.options().len());
        if len > 0 {
            self.option_cursor = (self.option_cursor + 1) % len;
        }
    }

    pub fn prev_option(&mut self) {
        let len = self.active_spec().map_or(0, |s| s.kind.options().len());
        if len > 0 {
            self.option_cursor = (self.option_cursor + len - 1) % len;
        }
    }

    /// Append a character to the focused text field; ignored elsewhere
    pub fn push_char(&mut self, c: char) -> Result<(), FormError> {
        self.edit_text(|text| text.push(c))
    }

    /// Remove the last character of the focused text field
    pub fn pop_char(&mut self) -> Result<(), FormError> {
        self.edit_text(|text| {
            text.pop();
        })
    }

    /// Newline in multiline fields
    pub fn push_newline(&mut self) -> Result<(), FormError> {
        if self.active_spec().is_some_and(|s| s.is_multiline) {
            self.push_char('\n')
        } else {
            Ok(())
        }
    }

    fn edit_text(&mut self, edit: impl FnOnce(&mut String)) -> Result<(), FormError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        if !spec.kind.accepts(&FieldValue::Text(String::new())) {
            return Ok(());
        }
        let key = spec.key.clone();
        let mut text = self
            .engine
            .value(&key)
            .map(|v| v.as_text().to_string())
            .unwrap_or_default();
        edit(&mut text);
        self.engine.set_field(&key, FieldValue::Text(text))
    }

    /// Space on the focused field: flip a checkbox, pick the highlighted
    /// option, or toggle it in a multi-choice set
    pub fn activate(&mut self) -> Result<(), FormError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        let key = spec.key.clone();

        match &spec.kind {
            FieldKind::Boolean => {
                let current = self.engine.value(&key).is_some_and(FieldValue::as_bool);
                self.engine.set_field(&key, FieldValue::Bool(!current))
            }
            FieldKind::SingleChoice(options) => match options.get(self.option_cursor) {
                Some(option) => {
                    let option = option.clone();
                    self.engine.set_field(&key, FieldValue::choice(option))
                }
                None => Ok(()),
            },
            FieldKind::MultiChoice(options) => match options.get(self.option_cursor) {
                Some(option) => {
                    let option = option.clone();
                    self.engine.toggle_multi_choice(&key, &option)
                }
                None => Ok(()),
            },
            // Space is ordinary input in text fields
            _ => self.push_char(' '),
        }
    }
}

/// Main application state
#[derive(Debug)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub menu_index: usize,

    // Pages
    pub dormitory: FormPage,
    pub course: FormPage,
    pub wish_card: WishCard,

    /// Transient notice for the status bar
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dormitory: FormSchema, course: FormSchema) -> Self {
        Self {
            current_view: View::Menu,
            menu_index: 0,
            dormitory: FormPage::new(dormitory),
            course: FormPage::new(course),
            wish_card: WishCard::new(),
            status_message: None,
        }
    }

    pub fn form_mut(&mut self, kind: FormKind) -> &mut FormPage {
        match kind {
            FormKind::Dormitory => &mut self.dormitory,
            FormKind::Course => &mut self.course,
        }
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % View::MENU.len();
    }

    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + View::MENU.len() - 1) % View::MENU.len();
    }

    pub fn selected_menu_view(&self) -> View {
        View::MENU[self.menu_index]
    }
}
