use std::fmt;

/// A source span representing a range of bytes in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Style for diagnostic labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Primary,
    Secondary,
}

/// A label pointing to a specific span in the source
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

/// A complete diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Computes line and column (1-based, in characters) from a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Returns the text of the given 1-based line, without its newline
fn line_content(source: &str, line_num: usize) -> Option<&str> {
    source.lines().nth(line_num - 1)
}

/// Diagnostic renderer for Rust-like error output
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    /// Render a diagnostic to a string
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        self.render_header(&mut output, diagnostic);

        let labels_with_pos: Vec<(&Label, usize, usize)> = diagnostic
            .labels
            .iter()
            .map(|label| {
                let (line, col) = line_col(self.source, label.span.start);
                (label, line, col)
            })
            .collect();

        if let Some((_, line, col)) = labels_with_pos.first() {
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.style_blue("-->"),
                self.file_name,
                line,
                col
            ));

            let max_line = labels_with_pos.iter().map(|(_, l, _)| *l).max().unwrap_or(1);
            let width = max_line.to_string().len();

            output.push_str(&format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|")));
            for (label, line, col) in &labels_with_pos {
                self.render_label(&mut output, label, *line, *col, width);
            }
            output.push_str(&format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|")));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.style_blue("="), note));
        }

        output
    }

    fn render_header(&self, output: &mut String, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => self.style_red_bold("error"),
            Severity::Warning => self.style_yellow_bold("warning"),
        };

        if let Some(code) = &diagnostic.code {
            output.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code,
                self.style_bold(&diagnostic.message)
            ));
        } else {
            output.push_str(&format!(
                "{}: {}\n",
                severity_str,
                self.style_bold(&diagnostic.message)
            ));
        }
    }

    fn render_label(&self, output: &mut String, label: &Label, line: usize, col: usize, width: usize) {
        let content = match line_content(self.source, line) {
            Some(content) => content,
            None => return,
        };

        output.push_str(&format!(
            "{:>width$} {} {}\n",
            self.style_blue(&line.to_string()),
            self.style_blue("|"),
            content,
            width = width + 1
        ));

        // Underline runs to the end of the span or the end of the line,
        // whichever comes first; columns are counted in characters.
        let (end_line, end_col) = line_col(
            self.source,
            label.span.end.max(label.span.start.saturating_add(1)),
        );
        let span_cols = if end_line == line {
            (end_col.saturating_sub(col)).max(1)
        } else {
            (content.chars().count() + 1).saturating_sub(col).max(1)
        };

        let marker = match label.style {
            LabelStyle::Primary => "^".repeat(span_cols),
            LabelStyle::Secondary => "-".repeat(span_cols),
        };
        let styled_marker = match label.style {
            LabelStyle::Primary => self.style_red(&marker),
            LabelStyle::Secondary => self.style_blue(&marker),
        };

        output.push_str(&format!(
            "{} {} {}{}",
            " ".repeat(width + 1),
            self.style_blue("|"),
            " ".repeat(col.saturating_sub(1)),
            styled_marker
        ));
        if !label.message.is_empty() {
            output.push(' ');
            let styled_msg = match label.style {
                LabelStyle::Primary => self.style_red(&label.message),
                LabelStyle::Secondary => self.style_blue(&label.message),
            };
            output.push_str(&styled_msg);
        }
        output.push('\n');
    }

    // Color helpers
    fn style_red(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_red_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_yellow_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;33m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_blue(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[34m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }
}

/// Render multiple diagnostics
pub fn render_diagnostics(
    source: &str,
    file_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if error_count > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            error_count,
            if error_count == 1 { "" } else { "s" }
        ));
    }

    output
}
