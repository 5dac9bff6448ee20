//! Searchable labeled dropdown, generic over the item type.
//!
//! Widget state lives in [`InputSelect`]; rendering is a thin egui pass over
//! [`InputSelect::list_view`], so the row policy and open/close transitions are
//! testable without a UI context.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use eframe::egui;
use shared::domain::Employee;

pub const EMPTY_LABEL: &str = "No items";

/// Value/label pair used to key and render one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    pub value: String,
    pub label: String,
}

pub trait ItemPresenter<T> {
    fn present(&self, item: &T) -> ParsedItem;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeePresenter;

impl ItemPresenter<Employee> for EmployeePresenter {
    fn present(&self, item: &Employee) -> ParsedItem {
        ParsedItem {
            value: item.id.to_string(),
            label: item.display_name(),
        }
    }
}

/// Bounding box of the trigger element in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriggerGeometry {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl TriggerGeometry {
    pub fn from_rect(rect: egui::Rect) -> Self {
        Self {
            top: rect.top(),
            left: rect.left(),
            width: rect.width(),
            height: rect.height(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DropdownPosition {
    pub top: f32,
    pub left: f32,
}

/// Places the list directly under the trigger, in document coordinates.
pub fn dropdown_position(trigger: TriggerGeometry, scroll: ScrollOffset) -> DropdownPosition {
    DropdownPosition {
        top: scroll.y + trigger.top + trigger.height,
        left: scroll.x + trigger.left,
    }
}

/// Tracks how many dropdowns currently hold scroll/resize listeners.
#[derive(Debug, Clone, Default)]
pub struct ViewportListeners {
    active: Arc<AtomicUsize>,
}

impl ViewportListeners {
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> ViewportSubscription {
        self.active.fetch_add(1, Ordering::SeqCst);
        ViewportSubscription {
            active: self.active.clone(),
        }
    }
}

/// Scroll/resize listener pair held while a dropdown is open. Released on drop.
#[derive(Debug)]
pub struct ViewportSubscription {
    active: Arc<AtomicUsize>,
}

impl Drop for ViewportSubscription {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    pub value: String,
    pub label: String,
    pub highlighted: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Hidden,
    Loading(String),
    Empty,
    Rows(Vec<RowView>),
}

pub struct InputSelect<T, P> {
    id_salt: String,
    label: String,
    loading_label: String,
    presenter: P,
    selected: Option<T>,
    highlighted: Option<usize>,
    position: DropdownPosition,
    last_trigger: Option<TriggerGeometry>,
    subscription: Option<ViewportSubscription>,
    listeners: ViewportListeners,
}

impl<T: Clone, P: ItemPresenter<T>> InputSelect<T, P> {
    pub fn new(
        id_salt: impl Into<String>,
        label: impl Into<String>,
        loading_label: impl Into<String>,
        default_value: Option<T>,
        presenter: P,
        listeners: ViewportListeners,
    ) -> Self {
        Self {
            id_salt: id_salt.into(),
            label: label.into(),
            loading_label: loading_label.into(),
            presenter,
            selected: default_value,
            highlighted: None,
            position: DropdownPosition::default(),
            last_trigger: None,
            subscription: None,
            listeners,
        }
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn selected_label(&self) -> String {
        self.selected
            .as_ref()
            .map(|item| self.presenter.present(item).label)
            .unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn position(&self) -> DropdownPosition {
        self.position
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The only place open state changes; listener ownership follows it.
    pub fn set_open(&mut self, open: bool) {
        match (open, self.subscription.is_some()) {
            (true, false) => self.subscription = Some(self.listeners.acquire()),
            (false, true) => {
                self.subscription = None;
                self.highlighted = None;
                self.last_trigger = None;
            }
            _ => {}
        }
    }

    pub fn toggle(&mut self, trigger: TriggerGeometry, scroll: ScrollOffset) {
        if self.is_open() {
            self.set_open(false);
        } else {
            self.position = dropdown_position(trigger, scroll);
            self.last_trigger = Some(trigger);
            self.set_open(true);
        }
    }

    /// Recomputes placement after a scroll or resize. Ignored while closed.
    pub fn on_viewport_changed(&mut self, trigger: TriggerGeometry, scroll: ScrollOffset) -> bool {
        if self.subscription.is_none() || self.last_trigger == Some(trigger) {
            return false;
        }
        self.position = dropdown_position(trigger, scroll);
        self.last_trigger = Some(trigger);
        true
    }

    pub fn highlight_next(&mut self, len: usize) {
        if len == 0 {
            self.highlighted = None;
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(index) if index + 1 < len => index + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn highlight_prev(&mut self, len: usize) {
        if len == 0 {
            self.highlighted = None;
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => len - 1,
            Some(index) => (index - 1).min(len - 1),
        });
    }

    /// Applies a selection and closes the list. `None` leaves the current
    /// selection untouched. Returns the item to report as changed.
    pub fn select(&mut self, item: Option<T>) -> Option<T> {
        let item = item?;
        self.selected = Some(item.clone());
        self.set_open(false);
        Some(item)
    }

    pub fn select_highlighted(&mut self, items: &[T]) -> Option<T> {
        let item = self.highlighted.and_then(|index| items.get(index)).cloned();
        self.select(item)
    }

    pub fn list_view(&self, items: &[T], is_loading: bool) -> ListView {
        if !self.is_open() {
            return ListView::Hidden;
        }
        if is_loading {
            return ListView::Loading(format!("{}...", self.loading_label));
        }
        if items.is_empty() {
            return ListView::Empty;
        }

        let selected_value = self
            .selected
            .as_ref()
            .map(|item| self.presenter.present(item).value);
        ListView::Rows(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let parsed = self.presenter.present(item);
                    RowView {
                        index,
                        highlighted: self.highlighted == Some(index),
                        selected: selected_value.as_deref() == Some(parsed.value.as_str()),
                        value: parsed.value,
                        label: parsed.label,
                    }
                })
                .collect(),
        )
    }

    /// Renders the label, trigger and (when open) the floating list. Returns
    /// the newly selected item on the frame a selection happens.
    pub fn show(&mut self, ui: &mut egui::Ui, items: &[T], is_loading: bool) -> Option<T> {
        ui.label(egui::RichText::new(&self.label).small().weak());
        ui.add_space(2.0);

        let trigger = ui.add_sized(
            [280.0, 28.0],
            egui::Button::new(self.selected_label()).selected(self.is_open()),
        );
        let geometry = TriggerGeometry::from_rect(trigger.rect);
        if trigger.clicked() {
            self.toggle(geometry, ScrollOffset::default());
        } else {
            self.on_viewport_changed(geometry, ScrollOffset::default());
        }

        if !self.is_open() {
            return None;
        }

        let row_count = if is_loading { 0 } else { items.len() };
        let (down, up, enter, escape) = ui.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if escape {
            self.set_open(false);
            return None;
        }
        if down {
            self.highlight_next(row_count);
        }
        if up {
            self.highlight_prev(row_count);
        }
        if enter && row_count > 0 {
            return self.select_highlighted(items);
        }

        let view = self.list_view(items, is_loading);
        let mut hovered = None;
        let mut clicked = None;
        let area = egui::Area::new(egui::Id::new(("input_select", self.id_salt.as_str())))
            .order(egui::Order::Foreground)
            .fixed_pos(egui::pos2(self.position.left, self.position.top))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(geometry.width);
                    match &view {
                        ListView::Hidden => {}
                        ListView::Loading(text) => {
                            ui.label(egui::RichText::new(text).weak());
                        }
                        ListView::Empty => {
                            ui.label(egui::RichText::new(EMPTY_LABEL).weak());
                        }
                        ListView::Rows(rows) => {
                            for row in rows {
                                let text = if row.selected {
                                    egui::RichText::new(&row.label).strong()
                                } else {
                                    egui::RichText::new(&row.label)
                                };
                                let response = ui.add_sized(
                                    [geometry.width, 24.0],
                                    egui::Button::new(text)
                                        .frame(row.highlighted)
                                        .selected(row.highlighted),
                                );
                                if response.hovered() {
                                    hovered = Some(row.index);
                                }
                                if response.clicked() {
                                    clicked = Some(row.index);
                                }
                            }
                        }
                    }
                });
            });

        if let Some(index) = hovered {
            self.highlighted = Some(index);
        }
        if let Some(index) = clicked {
            return self.select(items.get(index).cloned());
        }
        if area.response.clicked_elsewhere() && !trigger.clicked() {
            self.set_open(false);
        }
        None
    }
}

#[cfg(test)]
#[path = "../tests/input_select_tests.rs"]
mod tests;
