use crate::display::format_plain;
use bodmas::scientific::{self, ScientificFn};
use bodmas::{evaluate_traced, AngleMode, EvalError, EvaluationTrace, Step};
use rand::Rng;
use std::time::{Duration, Instant};
use unicode_segmentation::UnicodeSegmentation;

pub struct HistoryEntry {
    /// Text put back on the input line when the entry is recalled.
    pub input: String,
    /// Value a quick function was applied to.
    pub operand: Option<f64>,
    pub result: Result<f64, EvalError>,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

impl HistoryEntry {
    fn new(input: String, result: Result<f64, EvalError>) -> Self {
        HistoryEntry {
            input,
            operand: None,
            result,
            detailed_steps: Vec::new(),
            detailed_mode: false,
            duration: Duration::ZERO,
        }
    }

    /// What the history list shows, e.g. `sqrt(16)` for `:sqrt` applied to 16.
    pub fn label(&self) -> String {
        match self.operand {
            Some(value) => format!(
                "{}({})",
                self.input.trim_start_matches(':'),
                format_plain(value)
            ),
            None => self.input.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryCommand {
    Clear,
    Recall,
    Add,
    Subtract,
    Store,
}

impl MemoryCommand {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mc" => Some(MemoryCommand::Clear),
            "mr" => Some(MemoryCommand::Recall),
            "m+" => Some(MemoryCommand::Add),
            "m-" => Some(MemoryCommand::Subtract),
            "ms" => Some(MemoryCommand::Store),
            _ => None,
        }
    }
}

pub struct App {
    pub input: String,
    /// Cursor position in graphemes, not bytes.
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub history: Vec<HistoryEntry>,
    pub history_limit: usize,
    pub cursor_history: usize,
    pub angle_mode: AngleMode,
    /// `None` until something is stored.
    pub memory: Option<f64>,
    /// One-line feedback for commands that add no history entry.
    pub notice: Option<String>,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(angle_mode: AngleMode, history_limit: usize) -> Self {
        App {
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            history: Vec::new(),
            history_limit: history_limit.max(1),
            cursor_history: 0,
            angle_mode,
            memory: None,
            notice: None,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    pub fn input_len(&self) -> usize {
        self.input.graphemes(true).count()
    }

    pub fn grapheme_index_to_byte_index(s: &str, index: usize) -> usize {
        s.grapheme_indices(true)
            .nth(index)
            .map(|(i, _)| i)
            .unwrap_or(s.len())
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total = self.input_len();
        let cursor_pos = self.cursor_position;

        if cursor_pos < self.input_scroll {
            self.input_scroll = cursor_pos;
        } else if cursor_pos >= self.input_scroll + visible_width {
            self.input_scroll = cursor_pos - visible_width + 1;
        }

        if self.input_scroll > total.saturating_sub(visible_width) {
            self.input_scroll = total.saturating_sub(visible_width);
        }
    }

    fn reset_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    fn set_input(&mut self, text: String) {
        self.input = text;
        self.cursor_position = self.input_len();
        self.input_scroll = 0;
    }

    /// Last successful result, the value quick functions and memory act on.
    pub fn last_value(&self) -> Option<f64> {
        self.history.iter().rev().find_map(|entry| entry.result.as_ref().ok().copied())
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        if self.history.len() > self.history_limit {
            let excess = self.history.len() - self.history_limit;
            self.history.drain(..excess);
        }
        self.cursor_history = self.history.len().saturating_sub(1);
        self.scroll_to_bottom = true;
    }

    pub fn submit(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }
        self.notice = None;

        let lowered = input.to_lowercase();
        match lowered.as_str() {
            "quit" | "exit" | "q" => {
                self.should_quit = true;
                return;
            }
            "clear" | "reset" => {
                self.history.clear();
                self.cursor_history = 0;
                self.history_scroll = 0;
                self.reset_input();
                return;
            }
            "help" => {
                self.show_help = true;
                self.reset_input();
                return;
            }
            "deg" => {
                self.angle_mode = AngleMode::Degrees;
                self.reset_input();
                return;
            }
            "rad" => {
                self.angle_mode = AngleMode::Radians;
                self.reset_input();
                return;
            }
            "rand" => {
                let value: f64 = rand::thread_rng().gen();
                self.push_entry(HistoryEntry::new("rand".to_string(), Ok(value)));
                self.reset_input();
                return;
            }
            _ => {}
        }

        if let Some(command) = MemoryCommand::from_name(&lowered) {
            self.reset_input();
            self.handle_memory(command);
            return;
        }

        if let Some(name) = input.strip_prefix(':') {
            self.apply_quick_function(name);
            self.reset_input();
            return;
        }

        let (detailed_mode, processed_input) = split_details(&input);

        if processed_input.is_empty() {
            self.push_entry(HistoryEntry::new(input.clone(), Err(EvalError::InvalidExpression)));
            self.reset_input();
            return;
        }

        let start_time = Instant::now();
        let mut trace = EvaluationTrace::new(detailed_mode);
        let result = evaluate_traced(processed_input, self.angle_mode, &mut trace);
        let duration = start_time.elapsed();

        self.push_entry(HistoryEntry {
            input: processed_input.to_string(),
            operand: None,
            result,
            detailed_steps: trace.steps,
            detailed_mode,
            duration,
        });
        self.reset_input();
    }

    fn apply_quick_function(&mut self, name: &str) {
        let entry = match (ScientificFn::from_name(name), self.last_value()) {
            (Some(function), Some(value)) => HistoryEntry {
                operand: Some(value),
                ..HistoryEntry::new(
                    format!(":{}", function.name()),
                    scientific::apply(function, value, self.angle_mode),
                )
            },
            (None, _) => HistoryEntry::new(
                format!(":{}", name.trim()),
                Err(EvalError::UnknownFunction(name.trim().to_string())),
            ),
            (Some(function), None) => HistoryEntry::new(
                format!(":{}", function.name()),
                Err(EvalError::InvalidExpression),
            ),
        };

        self.push_entry(entry);
    }

    fn handle_memory(&mut self, command: MemoryCommand) {
        if command == MemoryCommand::Clear {
            self.memory = None;
            self.notice = Some("Memory cleared".to_string());
            return;
        }

        if command == MemoryCommand::Recall {
            match self.memory {
                Some(value) => {
                    self.set_input(format_plain(value));
                    self.notice = Some("Memory recalled".to_string());
                }
                None => self.notice = Some("Memory is empty".to_string()),
            }
            return;
        }

        let value = match self.last_value() {
            Some(value) if value.is_finite() => value,
            _ => {
                self.notice = Some("No result for memory operation".to_string());
                return;
            }
        };

        let stored = self.memory.unwrap_or(0.0);
        let (memory, notice) = match command {
            MemoryCommand::Add => (stored + value, format!("Added {} to memory", format_plain(value))),
            MemoryCommand::Subtract => (
                stored - value,
                format!("Subtracted {} from memory", format_plain(value)),
            ),
            _ => (value, "Value stored in memory".to_string()),
        };
        self.memory = Some(memory);
        self.notice = Some(notice);
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = Self::grapheme_index_to_byte_index(&self.input, self.cursor_position);
        let before = self.input_len();
        self.input.insert(byte_idx, c);
        // A combining mark joins the previous grapheme instead of adding one.
        if self.input_len() > before {
            self.cursor_position += 1;
        }
    }

    fn remove_grapheme_at(&mut self, index: usize) {
        let start = Self::grapheme_index_to_byte_index(&self.input, index);
        let end = Self::grapheme_index_to_byte_index(&self.input, index + 1);
        if start < end {
            self.input.drain(start..end);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.remove_grapheme_at(self.cursor_position);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor_position < self.input_len() {
            self.remove_grapheme_at(self.cursor_position);
        }
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input_len()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let graphemes: Vec<&str> = self.input.graphemes(true).collect();
        let is_space = |g: &str| g.chars().all(char::is_whitespace);
        let mut pos = self.cursor_position.min(graphemes.len());

        if direction < 0 {
            while pos > 0 && is_space(graphemes[pos - 1]) {
                pos -= 1;
            }
            while pos > 0 && !is_space(graphemes[pos - 1]) {
                pos -= 1;
            }
        } else {
            let len = graphemes.len();
            while pos < len && !is_space(graphemes[pos]) {
                pos += 1;
            }
            while pos < len && is_space(graphemes[pos]) {
                pos += 1;
            }
        }

        self.cursor_position = pos;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len().saturating_sub(1) {
            self.cursor_history += 1;
        }

        if self.cursor_history < self.history.len() {
            self.input = self.history[self.cursor_history].input.clone();
        } else {
            self.input.clear();
        }
        self.cursor_position = self.input_len();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.history.len().saturating_sub(1));
        }

        if self.cursor_history < self.history.len() {
            self.input = self.history[self.cursor_history].input.clone();
        }
        self.cursor_position = self.input_len();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.reset_input();
    }
}

/// Strips a `details` keyword at either end of the line.
fn split_details(input: &str) -> (bool, &str) {
    const KEYWORD: &str = "details";
    let n = KEYWORD.len() + 1;

    if let Some(head) = input.get(..n) {
        if head.eq_ignore_ascii_case("details ") {
            return (true, input[n..].trim());
        }
    }
    if input.len() >= n {
        if let Some(tail) = input.get(input.len() - n..) {
            if tail.eq_ignore_ascii_case(" details") {
                return (true, input[..input.len() - n].trim());
            }
        }
    }
    (false, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_details() {
        assert_eq!(split_details("details 1+2"), (true, "1+2"));
        assert_eq!(split_details("1+2 DETAILS"), (true, "1+2"));
        assert_eq!(split_details("1+2"), (false, "1+2"));
        assert_eq!(split_details("π×2"), (false, "π×2"));
    }

    fn app() -> App {
        App::new(AngleMode::Degrees, 100)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.insert_char(c);
        }
    }

    #[test]
    fn test_submit_records_result() {
        let mut app = app();
        type_str(&mut app, "2(3+4)");
        app.submit();

        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].input, "2(3+4)");
        assert_eq!(app.history[0].result, Ok(14.0));
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn test_errors_are_kept_in_history() {
        let mut app = app();
        type_str(&mut app, "5/0");
        app.submit();
        assert_eq!(app.history[0].result, Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_details_prefix_collects_steps() {
        let mut app = app();
        type_str(&mut app, "details 2+3*4");
        app.submit();

        let entry = &app.history[0];
        assert!(entry.detailed_mode);
        assert_eq!(entry.input, "2+3*4");
        assert_eq!(entry.detailed_steps.len(), 2);
    }

    #[test]
    fn test_angle_mode_commands() {
        let mut app = app();
        type_str(&mut app, "rad");
        app.submit();
        assert_eq!(app.angle_mode, AngleMode::Radians);
        assert!(app.history.is_empty());

        type_str(&mut app, "deg");
        app.submit();
        assert_eq!(app.angle_mode, AngleMode::Degrees);
    }

    #[test]
    fn test_quit_and_clear() {
        let mut app = app();
        type_str(&mut app, "1+1");
        app.submit();
        type_str(&mut app, "clear");
        app.submit();
        assert!(app.history.is_empty());

        type_str(&mut app, "quit");
        app.submit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_quick_function_uses_last_result() {
        let mut app = app();
        type_str(&mut app, "10+6");
        app.submit();
        type_str(&mut app, ":sqrt");
        app.submit();

        assert_eq!(app.history.len(), 2);
        assert_eq!(app.history[1].input, ":sqrt");
        assert_eq!(app.history[1].label(), "sqrt(16)");
        assert_eq!(app.history[1].result, Ok(4.0));
    }

    #[test]
    fn test_recalled_quick_function_reapplies_to_latest_result() {
        let mut app = app();
        type_str(&mut app, "3");
        app.submit();
        type_str(&mut app, ":square");
        app.submit();

        app.navigate_history(0);
        assert_eq!(app.input, ":square");
        app.submit();

        assert_eq!(app.history[2].label(), "square(9)");
        assert_eq!(app.history[2].result, Ok(81.0));
    }

    #[test]
    fn test_rand_produces_unit_interval_value() {
        let mut app = app();
        type_str(&mut app, "rand");
        app.submit();

        let value = app.history[0].result.clone().unwrap();
        assert!((0.0..1.0).contains(&value));
        assert_eq!(app.last_value(), Some(value));
    }

    #[test]
    fn test_memory_store_add_subtract() {
        let mut app = app();
        type_str(&mut app, "10");
        app.submit();
        type_str(&mut app, "ms");
        app.submit();
        assert_eq!(app.memory, Some(10.0));

        type_str(&mut app, "2+3");
        app.submit();
        type_str(&mut app, "m+");
        app.submit();
        assert_eq!(app.memory, Some(15.0));

        type_str(&mut app, "M-");
        app.submit();
        assert_eq!(app.memory, Some(10.0));
        assert_eq!(app.history.len(), 2);
    }

    #[test]
    fn test_memory_recall_and_clear() {
        let mut app = app();
        type_str(&mut app, "mr");
        app.submit();
        assert_eq!(app.notice.as_deref(), Some("Memory is empty"));
        assert!(app.input.is_empty());

        type_str(&mut app, "-2.5");
        app.submit();
        type_str(&mut app, "ms");
        app.submit();
        type_str(&mut app, "mr");
        app.submit();
        assert_eq!(app.input, "-2.5");
        assert_eq!(app.cursor_position, 4);

        app.clear_input();
        type_str(&mut app, "mc");
        app.submit();
        assert_eq!(app.memory, None);
    }

    #[test]
    fn test_memory_needs_a_result() {
        let mut app = app();
        type_str(&mut app, "m+");
        app.submit();
        assert_eq!(app.memory, None);
        assert_eq!(app.notice.as_deref(), Some("No result for memory operation"));

        type_str(&mut app, "1/0");
        app.submit();
        type_str(&mut app, "ms");
        app.submit();
        assert_eq!(app.memory, None);
    }

    #[test]
    fn test_quick_function_errors() {
        let mut app = app();
        type_str(&mut app, ":sqrt");
        app.submit();
        assert_eq!(app.history[0].result, Err(EvalError::InvalidExpression));

        type_str(&mut app, "0-4");
        app.submit();
        type_str(&mut app, ":sqrt");
        app.submit();
        assert!(matches!(app.history[2].result, Err(EvalError::DomainError(_))));

        type_str(&mut app, ":bogus");
        app.submit();
        assert_eq!(
            app.history[3].result,
            Err(EvalError::UnknownFunction("bogus".to_string()))
        );
    }

    #[test]
    fn test_history_limit() {
        let mut app = App::new(AngleMode::Degrees, 3);
        for expr in ["1", "2", "3", "4"] {
            type_str(&mut app, expr);
            app.submit();
        }
        let inputs: Vec<&str> = app.history.iter().map(|e| e.input.as_str()).collect();
        assert_eq!(inputs, vec!["2", "3", "4"]);
        assert_eq!(app.cursor_history, 2);
    }

    #[test]
    fn test_editing_multibyte_input() {
        let mut app = app();
        type_str(&mut app, "2×π");
        assert_eq!(app.cursor_position, 3);

        app.move_cursor(-1);
        app.backspace();
        assert_eq!(app.input, "2π");
        assert_eq!(app.cursor_position, 1);

        app.delete();
        assert_eq!(app.input, "2");
        app.delete();
        assert_eq!(app.input, "2");
    }

    #[test]
    fn test_word_movement() {
        let mut app = app();
        type_str(&mut app, "12 + 345");
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 5);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 3);
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 5);
    }

    #[test]
    fn test_navigate_history_restores_input() {
        let mut app = app();
        type_str(&mut app, "1+1");
        app.submit();
        type_str(&mut app, "2+2");
        app.submit();

        app.navigate_history(-1);
        assert_eq!(app.input, "1+1");
        assert_eq!(app.cursor_position, 3);
        app.navigate_history(1);
        assert_eq!(app.input, "2+2");
    }
}
