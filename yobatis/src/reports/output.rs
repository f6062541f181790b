//! Rendering targets for command reports.

use yobatis_core::Severity;

/// How a list entry is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Plain,
    /// Something this run added, e.g. tables that became live.
    Added,
    /// Something left commented out in the document.
    Commented,
}

impl Mark {
    fn prefix(self) -> &'static str {
        match self {
            Mark::Plain => "-",
            Mark::Added => "+",
            Mark::Commented => "~",
        }
    }
}

/// Where reports go.
///
/// Reports say what a line means (a module in the tree, a context the merge
/// touched, a discovery diagnostic); the target decides how it looks.
pub trait Output {
    fn title(&mut self, text: &str);

    fn section(&mut self, name: &str);

    /// A top-level outcome, e.g. `Updated: <path>`.
    fn status(&mut self, label: &str, value: &str);

    /// A labelled value nested `depth` levels inside the current section.
    fn field(&mut self, depth: usize, key: &str, value: &str);

    fn item(&mut self, mark: Mark, text: &str);

    /// A line of the module tree; `depth` 0 is the root module.
    fn tree_node(&mut self, depth: usize, text: &str);

    fn diagnostic(&mut self, severity: Severity, message: &str);

    /// A whole configuration document, headed by its path.
    fn document(&mut self, path: &str, content: &str);

    fn note(&mut self, text: &str);

    fn newline(&mut self);
}

/// A report that can render itself to an output.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth + 1)
}

fn diagnostic_line(severity: Severity, message: &str) -> String {
    let label = match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "info",
    };
    format!("{}: {}", label, message)
}

/// Plain text on stdout, errors and warnings on stderr.
#[derive(Debug, Default)]
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for TerminalOutput {
    fn title(&mut self, text: &str) {
        println!("{}", text);
        println!("{}", "=".repeat(text.chars().count()));
    }

    fn section(&mut self, name: &str) {
        println!("{}:", name);
    }

    fn status(&mut self, label: &str, value: &str) {
        println!("{}: {}", label, value);
    }

    fn field(&mut self, depth: usize, key: &str, value: &str) {
        println!("{}{}: {}", indent(depth), key, value);
    }

    fn item(&mut self, mark: Mark, text: &str) {
        println!("{}{} {}", indent(0), mark.prefix(), text);
    }

    fn tree_node(&mut self, depth: usize, text: &str) {
        println!("{}{}", indent(depth), text);
    }

    fn diagnostic(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => println!("{}", diagnostic_line(severity, message)),
            _ => eprintln!("{}", diagnostic_line(severity, message)),
        }
    }

    fn document(&mut self, path: &str, content: &str) {
        println!("── {} ──", path);
        println!("{}", content.trim_end());
    }

    fn note(&mut self, text: &str) {
        println!("{}", text);
    }

    fn newline(&mut self) {
        println!();
    }
}

/// Collects rendered lines for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingOutput {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl Output for RecordingOutput {
    fn title(&mut self, text: &str) {
        self.lines.push(format!("# {}", text));
    }

    fn section(&mut self, name: &str) {
        self.lines.push(format!("{}:", name));
    }

    fn status(&mut self, label: &str, value: &str) {
        self.lines.push(format!("{}: {}", label, value));
    }

    fn field(&mut self, depth: usize, key: &str, value: &str) {
        self.lines.push(format!("{}{}: {}", indent(depth), key, value));
    }

    fn item(&mut self, mark: Mark, text: &str) {
        self.lines
            .push(format!("{}{} {}", indent(0), mark.prefix(), text));
    }

    fn tree_node(&mut self, depth: usize, text: &str) {
        self.lines.push(format!("{}{}", indent(depth), text));
    }

    fn diagnostic(&mut self, severity: Severity, message: &str) {
        self.lines.push(diagnostic_line(severity, message));
    }

    fn document(&mut self, path: &str, content: &str) {
        self.lines.push(format!("── {} ──", path));
        self.lines.push(content.trim_end().to_string());
    }

    fn note(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn newline(&mut self) {
        self.lines.push(String::new());
    }
}
