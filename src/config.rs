// ABOUTME: Configuration and constants: version info and REPL banner text

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "inky-core REPL";
pub const WELCOME_SUBTITLE: &str = "a small Lisp-family interpreter";

pub const HELP_TEXT: &str = r#"
Meta-commands:
  :q, :quit     - Exit the REPL
  :t            - Toggle echoing the parsed value before it is evaluated

Lines starting with ; are comments and are skipped.
Everything else is read as a Lisp expression and evaluated.
"#;

pub const BUILTINS_SUMMARY: &str = r#"
Built-in functions:

Arithmetic:      + - * / min max
Comparison:      < <= > >= == !=
Lists:           list head tail eval join
Binding:         def define =
Control:         lambda \ if defun
Errors:          error error? error-msg
"#;
