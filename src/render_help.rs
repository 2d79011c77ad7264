use crate::tui_mode::app::App;
use bodmas::ScientificFn;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn heading(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" bodmas help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let quick_functions = ScientificFn::ALL
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(" ");

    let help_text = vec![
        Line::from(Span::styled(
            format!("bodmas - order-of-operations calculator ({} mode)", app.angle_mode),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Operators (highest precedence first):"),
        Line::from("  ( )   : Grouping; 2(3+4) multiplies implicitly"),
        Line::from("  -x    : Negation        (e.g., -(2+3) = -5)"),
        Line::from("  ^     : Power, left to right (e.g., 2^3^2 = 64)"),
        Line::from("  * ×   : Multiplication  (e.g., 6 × 7 = 42)"),
        Line::from("  / ÷   : Division        (e.g., 15 ÷ 3 = 5)"),
        Line::from("  + -   : Addition and subtraction"),
        Line::from("  x%    : Percent         (e.g., 50% = 0.5)"),
        Line::from(""),
        heading("Functions:"),
        Line::from("  sin(x) cos(x) tan(x) : Trigonometry in the current angle mode"),
        Line::from("  sqrt(x)  : Square root (x >= 0)"),
        Line::from("  log(x)   : Base-10 logarithm (x > 0)"),
        Line::from("  ln(x)    : Natural logarithm (x > 0)"),
        Line::from(""),
        heading("Constants:"),
        Line::from("  π or pi : 3.14159265..."),
        Line::from("  e       : 2.71828182..."),
        Line::from(""),
        heading("Quick functions on the last result:"),
        Line::from("  :<name>  e.g. :sqrt, :fact, :inverse"),
        Line::from(format!("  {}", quick_functions)),
        Line::from(""),
        heading("Memory (acts on the last result):"),
        Line::from("  ms : Store    m+ : Add    m- : Subtract"),
        Line::from("  mr : Recall into the input line    mc : Clear"),
        Line::from(""),
        heading("Commands:"),
        Line::from("  details <expression> : Show each evaluation step with time"),
        Line::from("  deg / rad : Switch angle mode (F2 toggles)"),
        Line::from("  rand      : Random number in [0, 1)"),
        Line::from("  clear     : Clear calculation history"),
        Line::from("  help, F1  : Show this help screen"),
        Line::from("  quit      : Exit the calculator"),
        Line::from(""),
        heading("Navigation:"),
        Line::from("  ← →         : Move cursor left/right"),
        Line::from("  Ctrl+←/→    : Move cursor by words"),
        Line::from("  Home/End    : Move to start/end of line"),
        Line::from("  ↑ ↓         : Recall previous expressions"),
        Line::from("  PgUp/PgDn   : Page through history"),
        Line::from("  Esc, Ctrl+U : Clear current input"),
        Line::from("  Ctrl+C      : Quit"),
        Line::from(""),
        heading("Examples:"),
        Line::from("  2 + 3 × 4"),
        Line::from("  2π"),
        Line::from("  20% × 150"),
        Line::from("  details (1+2)^2 - sqrt(16)"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
