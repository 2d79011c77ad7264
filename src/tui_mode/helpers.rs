use bodmas::calc_engine::Function;
use bodmas::ScientificFn;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }

            let mut chunk = String::new();
            let mut chunk_width = 0;
            for c in word.chars() {
                let char_width = UnicodeWidthChar::width(c).unwrap_or(1);
                if chunk_width + char_width > width && !chunk.is_empty() {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_width = 0;
                }
                chunk.push(c);
                chunk_width += char_width;
            }
            current_line = chunk;
            current_width = chunk_width;
            continue;
        }

        if !current_line.is_empty() && current_width + word_width + 1 > width {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        if !current_line.is_empty() {
            current_line.push(' ');
            current_width += 1;
        }
        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^' | '×' | '÷' | '−')
}

/// Spreads binary operators for the history view: `2*(3+4)` → `2 * (3 + 4)`.
/// A minus that starts an operand stays attached to it.
pub fn format_with_spaces(expr: &str) -> String {
    let mut result = String::new();
    let mut prev: Option<char> = None;

    for c in expr.chars().filter(|c| !c.is_whitespace()) {
        let unary = is_operator(prev.unwrap_or('(')) || prev.map_or(true, |p| p == '(');
        if is_operator(c) && !(matches!(c, '-' | '−') && unary) {
            result.push(' ');
            result.push(c);
            result.push(' ');
        } else {
            result.push(c);
        }
        prev = Some(c);
    }

    result.trim().to_string()
}

pub fn is_math_function(word: &str) -> bool {
    Function::from_name(word).is_some()
        || ScientificFn::from_name(word).is_some()
        || matches!(word.to_lowercase().as_str(), "pi" | "e")
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, function_style: Style, base_style: Style) {
    if word.is_empty() {
        return;
    }
    let style = if is_math_function(word) { function_style } else { base_style };
    spans.push(Span::styled(std::mem::take(word), style));
}

fn flush_number(spans: &mut Vec<Span<'static>>, number: &mut String, number_style: Style) {
    if !number.is_empty() {
        spans.push(Span::styled(std::mem::take(number), number_style));
    }
}

pub fn highlight_functions(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let function_style = Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD);

    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let number_style = Style::default().fg(Color::LightGreen);

    let mut spans = Vec::new();
    let mut word = String::new();
    let mut number = String::new();

    for c in expr.chars() {
        if c.is_ascii_digit() || c == '.' {
            flush_word(&mut spans, &mut word, function_style, base_style);
            number.push(c);
        } else if c.is_alphabetic() && c != 'π' {
            flush_number(&mut spans, &mut number, number_style);
            word.push(c);
        } else {
            flush_word(&mut spans, &mut word, function_style, base_style);
            flush_number(&mut spans, &mut number, number_style);

            let style = match c {
                'π' => function_style,
                '%' => operator_style,
                _ if is_operator(c) => operator_style,
                _ => base_style,
            };
            spans.push(Span::styled(c.to_string(), style));
        }
    }

    flush_word(&mut spans, &mut word, function_style, base_style);
    flush_number(&mut spans, &mut number, number_style);

    spans
}
