use terminal_size::{terminal_size, Width};

use crate::api::Argument;
use crate::parser::interface::UserInterface;
use crate::parser::{ColumnRenderer, LeftWidth, PaddingWidth, RightWidth, TotalWidth};
use crate::prelude::Usage;

pub(crate) struct ArgumentRow {
    usage: String,
    description: String,
}

impl From<&Argument> for ArgumentRow {
    fn from(value: &Argument) -> Self {
        // Lazy defaults are produced at parse time, so only literals can be documented.
        let description = match value.default().and_then(|d| d.literal()) {
            Some(literal) => format!("{} (default: {literal})", value.description()),
            None => value.description().to_string(),
        };

        ArgumentRow {
            usage: value.usage(),
            description,
        }
    }
}

pub(crate) struct Printer {
    arguments: Vec<ArgumentRow>,
    terminal_width: Option<usize>,
}

const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

impl Printer {
    pub(crate) fn terminal(arguments: Vec<ArgumentRow>) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(arguments, terminal_width)
    }

    pub(crate) fn new(arguments: Vec<ArgumentRow>, terminal_width: Option<usize>) -> Self {
        Self {
            arguments,
            terminal_width,
        }
    }

    pub(crate) fn usage(&self, program: &str) -> String {
        let mut summary = vec![format!("usage: {program}")];
        summary.extend(self.arguments.iter().map(|a| a.usage.clone()));
        summary.join(" ")
    }

    pub(crate) fn print_help(&self, program: &str, user_interface: &(impl UserInterface + ?Sized)) {
        user_interface.print(self.usage(program));

        if self.arguments.is_empty() {
            return;
        }

        let left_column_width = self
            .arguments
            .iter()
            .map(|a| a.usage.chars().count())
            .max()
            .unwrap_or(1);
        let right_column_width = self
            .arguments
            .iter()
            .map(|a| a.description.chars().count())
            .max()
            .unwrap_or(0);
        let padding = PaddingWidth::new(PADDING_WIDTH)
            .expect("internal error - padding width must be valid");
        let left = LeftWidth::new(std::cmp::max(1, left_column_width))
            .expect("internal error - left width must be valid");
        let right = RightWidth::new(std::cmp::max(2, right_column_width))
            .expect("internal error - right width must be valid");

        let column_renderer = match &self.terminal_width {
            Some(tw) => ColumnRenderer::guided(MAIN_INDENT, padding, left, right, TotalWidth(*tw)),
            None => ColumnRenderer::new(padding, left, right),
        };

        user_interface.print("".to_string());
        user_interface.print("arguments:".to_string());

        for ArgumentRow { usage, description } in &self.arguments {
            for line in column_renderer.render(MAIN_INDENT, usage, description) {
                user_interface.print(line);
            }
        }
    }
}

/// The input tokens of a failed dispatch, pointing at the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    index: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(index: usize, tokens: &[&str]) -> Self {
        Self {
            index,
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let projection = self.tokens.join(" ");
        // Every token before the pointed one, plus the space after it.
        let offset: usize = self
            .tokens
            .iter()
            .take(self.index)
            .map(|t| t.chars().count() + 1)
            .sum();

        write!(f, "{projection}\n{:offset$}^", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SemanticType, Value};
    use crate::parser::util::InMemoryInterface;
    use crate::registry::TypeRegistry;
    use rstest::rstest;

    fn rows() -> Vec<ArgumentRow> {
        let registry = TypeRegistry::default();
        vec![
            Argument::builder("file")
                .required()
                .description("The file to read.")
                .build(&registry)
                .unwrap(),
            Argument::builder("count")
                .semantic_type(SemanticType::INTEGER)
                .default(Value::Integer(1))
                .description("How many times.")
                .build(&registry)
                .unwrap(),
            Argument::builder("names")
                .repeats()
                .default_with(|| Value::List(vec![]))
                .description("The names.")
                .build(&registry)
                .unwrap(),
        ]
        .iter()
        .map(ArgumentRow::from)
        .collect()
    }

    #[test]
    fn argument_row() {
        let rows = rows();
        assert_eq!(rows[0].usage, "FILE");
        assert_eq!(rows[0].description, "The file to read.");
        assert_eq!(rows[1].usage, "[COUNT]");
        assert_eq!(rows[1].description, "How many times. (default: 1)");
        assert_eq!(rows[2].usage, "[NAMES ...]");
        assert_eq!(rows[2].description, "The names.");
    }

    #[test]
    fn usage() {
        assert_eq!(
            Printer::new(rows(), None).usage("program"),
            "usage: program FILE [COUNT] [NAMES ...]"
        );
        assert_eq!(
            Printer::new(Vec::default(), None).usage("program"),
            "usage: program"
        );
    }

    #[test]
    fn print_help_empty() {
        let interface = InMemoryInterface::default();
        Printer::new(Vec::default(), None).print_help("program", &interface);
        assert_eq!(interface.consume_message(), "usage: program");
    }

    #[test]
    fn print_help() {
        let interface = InMemoryInterface::default();
        Printer::new(rows(), None).print_help("program", &interface);
        assert_eq!(
            interface.consume_message(),
            r#"usage: program FILE [COUNT] [NAMES ...]

arguments:
 FILE          The file to read.
 [COUNT]       How many times. (default: 1)
 [NAMES ...]   The names."#
        );
    }

    #[test]
    fn print_help_narrow() {
        let interface = InMemoryInterface::default();
        Printer::new(rows(), Some(20)).print_help("program", &interface);
        assert_eq!(
            interface.consume_message(),
            r#"usage: program FILE [COUNT] [NAMES ...]

arguments:
 FILE          The file to read.
 [COUNT]       How many times.
               (default: 1)
 [NAMES ...]   The names."#
        );
    }

    #[rstest]
    #[case(vec!["a", "bc", "d"], 0, "a bc d\n^")]
    #[case(vec!["a", "bc", "d"], 1, "a bc d\n  ^")]
    #[case(vec!["a", "bc", "d"], 2, "a bc d\n     ^")]
    #[case(vec!["a", "bc", "d"], 3, "a bc d\n       ^")]
    #[case(vec![], 0, "\n^")]
    fn error_context(#[case] tokens: Vec<&str>, #[case] index: usize, #[case] expected: &str) {
        assert_eq!(ErrorContext::new(index, &tokens).to_string(), expected);
    }
}
