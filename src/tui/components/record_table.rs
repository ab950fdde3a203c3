//! Generic record table: columns-driven rows with capability-gated actions
//!
//! Every list screen renders through this component. Columns carry an
//! explicit accessor per column; the table never reaches into rows by
//! field path itself and never mutates them. Row actions (add / view /
//! edit / delete / report) exist exactly when the owning screen enables
//! them.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::tui::ui::Styles;

/// One table column: label plus the accessor producing its display value
pub struct Column<R> {
    /// Render key, unique within one table
    pub key: &'static str,
    pub title: &'static str,
    accessor: Box<dyn Fn(&R) -> String + Send>,
}

impl<R> Column<R> {
    pub fn new(
        key: &'static str,
        title: &'static str,
        accessor: impl Fn(&R) -> String + Send + 'static,
    ) -> Self {
        Self {
            key,
            title,
            accessor: Box::new(accessor),
        }
    }

    pub fn value(&self, row: &R) -> String {
        (self.accessor)(row)
    }
}

/// Which affordances the table offers. An action key is only handled, and
/// its glyph only rendered, when the corresponding capability is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableActions {
    pub add_new: bool,
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
    pub report: bool,
    pub row_select: bool,
}

impl TableActions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_add_new(mut self) -> Self {
        self.add_new = true;
        self
    }

    pub fn with_view(mut self) -> Self {
        self.view = true;
        self
    }

    pub fn with_edit(mut self) -> Self {
        self.edit = true;
        self
    }

    pub fn with_delete(mut self) -> Self {
        self.delete = true;
        self
    }

    pub fn with_report(mut self) -> Self {
        self.report = true;
        self
    }

    pub fn with_row_select(mut self) -> Self {
        self.row_select = true;
        self
    }
}

/// Event emitted from one key press. At most one per key: an action key
/// never additionally produces `Selected` for the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    AddNew,
    View(usize),
    Edit(usize),
    Delete(usize),
    Report(usize),
    Selected(usize),
}

/// Columns-driven table over projected rows
pub struct RecordTable<R> {
    pub title: String,
    pub add_label: String,
    columns: Vec<Column<R>>,
    rows: Vec<R>,
    state: TableState,
    actions: TableActions,
}

impl<R> RecordTable<R> {
    pub fn new(
        title: &str,
        add_label: &str,
        columns: Vec<Column<R>>,
        actions: TableActions,
    ) -> Self {
        debug_assert!(
            {
                let mut keys: Vec<_> = columns.iter().map(|c| c.key).collect();
                keys.sort_unstable();
                keys.windows(2).all(|w| w[0] != w[1])
            },
            "column keys must be unique within one table"
        );

        Self {
            title: title.to_string(),
            add_label: add_label.to_string(),
            columns,
            rows: Vec::new(),
            state: TableState::default(),
            actions,
        }
    }

    /// Replace rows and reset the selection
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.state = TableState::default();
        if !self.rows.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected().filter(|&i| i < self.rows.len())
    }

    pub fn navigate_up(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        let new_selected = if selected == 0 {
            self.rows.len() - 1
        } else {
            selected - 1
        };
        self.state.select(Some(new_selected));
    }

    pub fn navigate_down(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        self.state.select(Some((selected + 1) % self.rows.len()));
    }

    /// Translate one key press into at most one table event
    pub fn handle_key(&mut self, key: KeyCode) -> Option<TableEvent> {
        match key {
            KeyCode::Up => {
                self.navigate_up();
                self.selection_event()
            }
            KeyCode::Down => {
                self.navigate_down();
                self.selection_event()
            }
            KeyCode::Char('a') if self.actions.add_new => Some(TableEvent::AddNew),
            KeyCode::Enter | KeyCode::Char('v') if self.actions.view => {
                self.selected_index().map(TableEvent::View)
            }
            KeyCode::Char('e') if self.actions.edit => {
                self.selected_index().map(TableEvent::Edit)
            }
            KeyCode::Char('d') if self.actions.delete => {
                self.selected_index().map(TableEvent::Delete)
            }
            KeyCode::Char('r') if self.actions.report => {
                self.selected_index().map(TableEvent::Report)
            }
            _ => None,
        }
    }

    fn selection_event(&self) -> Option<TableEvent> {
        if !self.actions.row_select {
            return None;
        }
        self.selected_index().map(TableEvent::Selected)
    }

    /// Header labels: one per column, plus the trailing actions cell
    pub fn header_cells(&self) -> Vec<String> {
        let mut cells: Vec<String> = self.columns.iter().map(|c| c.title.to_string()).collect();
        cells.push("Actions".to_string());
        cells
    }

    /// Body cells: `rows.len()` rows of `columns.len() + 1` cells each,
    /// in column order
    pub fn body_cells(&self) -> Vec<Vec<String>> {
        let glyphs = self.action_glyphs();
        self.rows
            .iter()
            .map(|row| {
                let mut cells: Vec<String> =
                    self.columns.iter().map(|c| c.value(row)).collect();
                cells.push(glyphs.clone());
                cells
            })
            .collect()
    }

    /// Key hints rendered in the actions cell, one glyph per enabled action
    pub fn action_glyphs(&self) -> String {
        let mut glyphs = Vec::new();
        if self.actions.view {
            glyphs.push("v");
        }
        if self.actions.edit {
            glyphs.push("e");
        }
        if self.actions.delete {
            glyphs.push("d");
        }
        if self.actions.report {
            glyphs.push("r");
        }
        glyphs.join(" ")
    }

    /// Placeholder shown instead of body rows when there is nothing to list
    pub fn empty_message(&self) -> String {
        if self.actions.add_new {
            format!("No records found. Press 'a' to {}.", self.add_label)
        } else {
            "No records found.".to_string()
        }
    }

    fn block_title(&self) -> String {
        let mut title = format!("{} ({})", self.title, self.rows.len());
        if self.actions.add_new {
            title.push_str(&format!(" | a: {}", self.add_label));
        }
        title
    }

    /// Render the table (header and add affordance render even when empty)
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.block_title())
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        if self.rows.is_empty() {
            let header = self.header_cells().join(" | ");
            let text = format!("{}\n\n{}", header, self.empty_message());
            let placeholder = Paragraph::new(text).style(Styles::inactive()).block(block);
            f.render_widget(placeholder, area);
            return;
        }

        let header = Row::new(
            self.header_cells()
                .into_iter()
                .map(|cell| Cell::from(cell).style(Styles::title())),
        );

        let body = self
            .body_cells()
            .into_iter()
            .map(|cells| Row::new(cells.into_iter().map(Cell::from)));

        let column_count = self.columns.len() as u32 + 1;
        let widths: Vec<Constraint> = (0..column_count)
            .map(|_| Constraint::Ratio(1, column_count))
            .collect();

        let table = Table::new(body, widths)
            .header(header)
            .block(block)
            .highlight_style(Styles::selected());

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRow {
        name: &'static str,
        price: f64,
    }

    fn columns() -> Vec<Column<TestRow>> {
        vec![
            Column::new("name", "Name", |r: &TestRow| r.name.to_string()),
            Column::new("price", "Price", |r: &TestRow| format!("{:.2}", r.price)),
        ]
    }

    fn rows() -> Vec<TestRow> {
        vec![
            TestRow { name: "CBC", price: 300.0 },
            TestRow { name: "X-Ray", price: 500.0 },
            TestRow { name: "MRI", price: 4000.0 },
        ]
    }

    #[test]
    fn test_body_has_one_row_per_record_and_one_extra_cell() {
        let mut table = RecordTable::new("Tests", "add", columns(), TableActions::none().with_view());
        table.set_rows(rows());

        let body = table.body_cells();
        assert_eq!(body.len(), 3);
        for row in &body {
            assert_eq!(row.len(), 3); // two columns + actions cell
        }
        // column order is the descriptor order
        assert_eq!(body[0][0], "CBC");
        assert_eq!(body[0][1], "300.00");
        assert_eq!(body[1][0], "X-Ray");
    }

    #[test]
    fn test_empty_rows_render_placeholder_not_body() {
        let table: RecordTable<TestRow> =
            RecordTable::new("Tests", "add a new test", columns(), TableActions::none().with_add_new());
        assert!(table.body_cells().is_empty());
        assert!(table.empty_message().contains("add a new test"));
        // header still present
        assert_eq!(table.header_cells(), vec!["Name", "Price", "Actions"]);
    }

    #[test]
    fn test_action_glyphs_match_enabled_capabilities() {
        let only_view = RecordTable::<TestRow>::new("T", "add", columns(), TableActions::none().with_view());
        assert_eq!(only_view.action_glyphs(), "v");

        let all = RecordTable::<TestRow>::new(
            "T",
            "add",
            columns(),
            TableActions::none().with_view().with_edit().with_delete().with_report(),
        );
        assert_eq!(all.action_glyphs(), "v e d r");

        let none = RecordTable::<TestRow>::new("T", "add", columns(), TableActions::none());
        assert_eq!(none.action_glyphs(), "");
    }

    #[test]
    fn test_disabled_action_keys_are_ignored() {
        let mut table = RecordTable::new("T", "add", columns(), TableActions::none().with_view());
        table.set_rows(rows());

        assert_eq!(table.handle_key(KeyCode::Char('v')), Some(TableEvent::View(0)));
        assert_eq!(table.handle_key(KeyCode::Char('e')), None);
        assert_eq!(table.handle_key(KeyCode::Char('d')), None);
        assert_eq!(table.handle_key(KeyCode::Char('r')), None);
        assert_eq!(table.handle_key(KeyCode::Char('a')), None);
    }

    #[test]
    fn test_action_key_does_not_also_select() {
        let mut table = RecordTable::new(
            "T",
            "add",
            columns(),
            TableActions::none().with_view().with_delete().with_row_select(),
        );
        table.set_rows(rows());

        // one event per key press, never an extra Selected
        assert_eq!(table.handle_key(KeyCode::Char('d')), Some(TableEvent::Delete(0)));
        assert_eq!(table.handle_key(KeyCode::Enter), Some(TableEvent::View(0)));
        // navigation does emit Selected when row_select is enabled
        assert_eq!(table.handle_key(KeyCode::Down), Some(TableEvent::Selected(1)));
    }

    #[test]
    fn test_navigation_wraps_and_resets_on_new_rows() {
        let mut table = RecordTable::new("T", "add", columns(), TableActions::none());
        table.set_rows(rows());
        assert_eq!(table.selected_index(), Some(0));
        table.navigate_up();
        assert_eq!(table.selected_index(), Some(2));
        table.navigate_down();
        assert_eq!(table.selected_index(), Some(0));

        table.set_rows(vec![TestRow { name: "CBC", price: 300.0 }]);
        assert_eq!(table.selected_index(), Some(0));

        table.set_rows(Vec::new());
        assert_eq!(table.selected_index(), None);
        assert_eq!(table.handle_key(KeyCode::Down), None);
    }

    #[test]
    fn test_empty_table_emits_no_action_events() {
        let mut table = RecordTable::new(
            "T",
            "add",
            columns(),
            TableActions::none().with_view().with_add_new(),
        );
        assert_eq!(table.handle_key(KeyCode::Enter), None);
        // add-new needs no selected row
        assert_eq!(table.handle_key(KeyCode::Char('a')), Some(TableEvent::AddNew));
    }
}
