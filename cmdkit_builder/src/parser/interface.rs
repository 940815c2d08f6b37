use crate::parser::base::DispatchError;
use crate::parser::printer::ErrorContext;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The output streams of a command.
///
/// Implement this to redirect the command's output (ex: into a buffer, for testing).
pub trait UserInterface {
    /// Print a line of regular output.
    fn print(&self, message: String);
    /// Print a dispatch failure.
    fn print_error(&self, error: DispatchError);
    /// Print where in the input tokens a dispatch failure occurred.
    fn print_error_context(&self, error_context: ErrorContext);
}

/// The standard output & error streams.
#[derive(Debug, Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: DispatchError) {
        eprintln!("Parse error: {error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}

#[derive(Debug)]
pub(crate) struct PaddingWidth(usize);

impl PaddingWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // padding must be at least 1
        if width >= 1 {
            Ok(PaddingWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct LeftWidth(usize);

impl LeftWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // left must be at least 1
        if width >= 1 {
            Ok(LeftWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct RightWidth(usize);

impl RightWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // right must be at least 2 (so we can hyphenate)
        if width >= 2 {
            Ok(RightWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct TotalWidth(pub usize);

/// Renders a usage fragment (left) beside its wrapped description (right).
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    padding: PaddingWidth,
    left: LeftWidth,
    right: RightWidth,
}

// We'll target 95% of the total width, to ensure the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_RIGHT_WIDTH: usize = 17;

impl ColumnRenderer {
    /// Produce a renderer which fits within the total width, while keeping the right column at least `MINIMUM_RIGHT_WIDTH`.
    pub(crate) fn guided(
        indent: usize,
        padding: PaddingWidth,
        left: LeftWidth,
        right: RightWidth,
        total_width: TotalWidth,
    ) -> Self {
        let non_right = indent + left.0 + padding.0;
        let target_total_width = (total_width.0 as f64 * TARGET_TOTAL_FACTOR) as usize;

        if right.0 + non_right <= target_total_width {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_right} and right {} fit within the target total {target_total_width}.", right.0);
            }

            Self::new(padding, left, right)
        } else if non_right < target_total_width {
            let calculated_right = std::cmp::max(target_total_width - non_right, MINIMUM_RIGHT_WIDTH);
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_right} fit within the target total {target_total_width}.  Selecting right: {calculated_right}.");
            }

            Self::new(padding, left, RightWidth(calculated_right))
        } else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_right} do not fit within the target total {target_total_width}.  Selecting right: {MINIMUM_RIGHT_WIDTH}.");
            }

            Self::new(padding, left, RightWidth(MINIMUM_RIGHT_WIDTH))
        }
    }

    pub(crate) fn new(padding: PaddingWidth, left: LeftWidth, right: RightWidth) -> Self {
        Self {
            padding,
            left,
            right,
        }
    }

    pub(crate) fn render(&self, indent: usize, left: &str, right: &str) -> Vec<String> {
        let padding = format!("{:width$}", "", width = self.padding.0);
        let left_column_width = self.left.0;
        assert!(left.chars().count() <= left_column_width);
        let mut out = Vec::default();

        for (i, part) in chunk(right, self.right.0).iter().enumerate() {
            if i == 0 {
                out.push(format!(
                    "{:indent$}{:left_column_width$}{padding}{part}",
                    "", left
                ));
            } else {
                out.push(format!(
                    "{:indent$}{:left_column_width$}{padding}{part}",
                    "", ""
                ));
            }
        }

        if out.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        out
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ') {
        if !word.is_empty() {
            if current.is_empty() {
                hyphenate(width, &mut lines, &mut current, word);
            } else if current.chars().count() + word.chars().count() + 1 <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = String::default();
                hyphenate(width, &mut lines, &mut current, word);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while characters.len() - left > width {
        let piece: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}

#[cfg(any(test, feature = "unit_test"))]
pub(crate) mod util {
    use crate::parser::{DispatchError, ErrorContext, UserInterface};
    use std::cell::RefCell;

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// A [`UserInterface`] which records the command's output, for use in testing.
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::{Argument, Command, InMemoryInterface, TypeRegistry};
    ///
    /// let command = Command::new("program")
    ///     .add(
    ///         Argument::builder("name")
    ///             .required()
    ///             .description("Who to greet.")
    ///             .build(&TypeRegistry::default())
    ///             .unwrap(),
    ///     )
    ///     .unwrap();
    ///
    /// let interface = InMemoryInterface::default();
    /// assert_eq!(command.invoke(&[], &interface).unwrap_err(), 1);
    ///
    /// let (message, error, _) = interface.consume();
    /// assert_eq!(message.unwrap(), "usage: program NAME");
    /// assert!(error.unwrap().starts_with("insufficient number of arguments"));
    /// ```
    pub struct InMemoryInterface {
        message: RefCell<Option<Vec<String>>>,
        error: RefCell<Option<String>>,
        error_context: RefCell<Option<ErrorContext>>,
    }

    impl Default for InMemoryInterface {
        fn default() -> Self {
            Self {
                message: RefCell::new(None),
                error: RefCell::new(None),
                error_context: RefCell::new(None),
            }
        }
    }

    impl UserInterface for InMemoryInterface {
        fn print(&self, message: String) {
            // Allows for print() to be called many times, concatenating the messages.
            self.message
                .borrow_mut()
                .get_or_insert_with(Vec::default)
                .push(message);
        }

        fn print_error(&self, error: DispatchError) {
            // Assumes print_error() is only ever called once.
            self.error.borrow_mut().replace(error.to_string());
        }

        fn print_error_context(&self, error_context: ErrorContext) {
            // Assumes print_error_context() is only ever called once.
            self.error_context.borrow_mut().replace(error_context);
        }
    }

    impl InMemoryInterface {
        /// Take the recorded (messages joined by newlines, error, error context).
        pub fn consume(self) -> (Option<String>, Option<String>, Option<ErrorContext>) {
            let InMemoryInterface {
                message,
                error,
                error_context,
            } = self;

            (
                message.take().map(|messages| messages.join("\n")),
                error.take(),
                error_context.take(),
            )
        }

        /// Take the recorded messages joined by newlines, asserting that no error was recorded.
        pub fn consume_message(self) -> String {
            let (message, error, error_context) = self.consume();
            assert_eq!(error, None);
            assert_eq!(error_context, None);
            message.unwrap_or_default()
        }
    }
}
