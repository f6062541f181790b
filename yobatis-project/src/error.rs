use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for yobatis operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Why a connection field could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// The field was never found anywhere in the import graph.
    Missing,
    /// The field was found but still holds a `${...}` placeholder.
    Unresolved(String),
}

impl std::fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldProblem::Missing => write!(f, "is not configured"),
            FieldProblem::Unresolved(value) => {
                write!(f, "still holds an unresolved placeholder '{}'", value)
            }
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("unsupported project: {message}")]
    #[diagnostic(
        code(yobatis::unsupported_project),
        help(
            "yobatis expects a maven project with a war module whose web.xml configures spring"
        )
    )]
    UnsupportedProject { message: String },

    #[error("invalid configuration in '{path}': {message}")]
    #[diagnostic(code(yobatis::invalid_configuration))]
    InvalidConfiguration { path: String, message: String },

    #[error("database {field} {problem}")]
    #[diagnostic(
        code(yobatis::sql_config_incomplete),
        help("check the datasource bean and the properties files it refers to")
    )]
    SqlConfigIncomplete {
        field: &'static str,
        problem: FieldProblem,
    },

    #[error("{message}")]
    #[diagnostic(code(yobatis::ambiguous_generator_element))]
    AmbiguousGeneratorElement {
        context: String,
        element: String,
        count: usize,
        message: String,
    },

    #[error("the {requires} phase has not run yet")]
    #[diagnostic(code(yobatis::phase_order))]
    PhaseOrder { requires: &'static str },

    #[error("failed to access '{path}'")]
    #[diagnostic(code(yobatis::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(yobatis::settings))]
    Settings {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// Create an unsupported project error
    pub fn unsupported_project(message: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnsupportedProject {
            message: message.into(),
        })
    }

    /// Create an invalid configuration error for a file
    pub fn invalid_configuration(path: impl Into<String>, message: impl Into<String>) -> Box<Self> {
        Box::new(Error::InvalidConfiguration {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Create an incomplete connection error
    pub fn sql_config_incomplete(field: &'static str, problem: FieldProblem) -> Box<Self> {
        Box::new(Error::SqlConfigIncomplete { field, problem })
    }

    /// Create an error for a generator element that is missing or repeated
    pub fn ambiguous_generator_element(
        context: impl Into<String>,
        element: impl Into<String>,
        count: usize,
    ) -> Box<Self> {
        let context = context.into();
        let element = element.into();
        let message = if count == 0 {
            format!(
                "There is no {} configured in context '{}', please set the element and re-run.",
                element, context
            )
        } else {
            format!(
                "More than one {} configured in context '{}', please remove unintentional ones and re-run.",
                element, context
            )
        };
        Box::new(Error::AmbiguousGeneratorElement {
            context,
            element,
            count,
            message,
        })
    }

    /// Create an error for a phase that ran before one it depends on
    pub fn phase_order(requires: &'static str) -> Box<Self> {
        Box::new(Error::PhaseOrder { requires })
    }

    /// Create an I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }

    /// Create a settings parse error from a toml error with source context
    pub fn settings(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Settings {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_config_messages_name_the_field() {
        let missing = Error::sql_config_incomplete("url", FieldProblem::Missing);
        assert_eq!(missing.to_string(), "database url is not configured");

        let unresolved = Error::sql_config_incomplete(
            "password",
            FieldProblem::Unresolved("${unresolved}".to_string()),
        );
        assert_eq!(
            unresolved.to_string(),
            "database password still holds an unresolved placeholder '${unresolved}'"
        );
    }

    #[test]
    fn test_ambiguous_generator_messages() {
        let none = Error::ambiguous_generator_element("ctx", "javaModelGenerator", 0);
        assert!(none.to_string().starts_with("There is no javaModelGenerator configured"));

        let many = Error::ambiguous_generator_element("ctx", "sqlMapGenerator", 2);
        assert!(many.to_string().starts_with("More than one sqlMapGenerator configured"));
    }
}
