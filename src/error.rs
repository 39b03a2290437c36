//! Unified generator error type used across all phases.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Validate,
    Lower,
    IrValidate,
    Codegen,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Validate => write!(f, "Validate"),
            Phase::Lower => write!(f, "Lower"),
            Phase::IrValidate => write!(f, "IR Validate"),
            Phase::Codegen => write!(f, "Codegen"),
        }
    }
}

/// Runtime namespace a binding target lives in. Input variables and nested
/// paths write into the same variable scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingNamespace {
    Input,
    TaskHeader,
}

impl std::fmt::Display for BindingNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingNamespace::Input => write!(f, "input"),
            BindingNamespace::TaskHeader => write!(f, "task header"),
        }
    }
}

/// A fatal generation error. Any of these aborts the invocation; the caller
/// never receives a partially built template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("[Parse:{code}] {message}")]
    Parse { code: &'static str, message: String },

    #[error("[{phase}:{code}] {message} (field '{path}')")]
    Structural {
        code: &'static str,
        phase: Phase,
        message: String,
        /// Full dotted path of the offending field.
        path: String,
    },

    #[error(
        "[Lower:B001] {namespace} binding '{target}' is shared by co-visible properties '{first}' and '{second}'"
    )]
    BindingCollision {
        namespace: BindingNamespace,
        target: String,
        first: String,
        second: String,
    },

    #[error("[IR Validate:{code}] {message}")]
    Assembly {
        code: &'static str,
        message: String,
        path: Option<String>,
    },

    #[error("[Codegen:{code}] {message}")]
    Codegen { code: &'static str, message: String },
}

impl GeneratorError {
    pub fn parse(code: &'static str, message: impl Into<String>) -> Self {
        GeneratorError::Parse {
            code,
            message: message.into(),
        }
    }

    /// Declaration-level structural error found before walking.
    pub fn validate(code: &'static str, message: impl Into<String>, path: impl Into<String>) -> Self {
        GeneratorError::Structural {
            code,
            phase: Phase::Validate,
            message: message.into(),
            path: path.into(),
        }
    }

    /// Structural error found while walking the type graph.
    pub fn structural(code: &'static str, message: impl Into<String>, path: impl Into<String>) -> Self {
        GeneratorError::Structural {
            code,
            phase: Phase::Lower,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn assembly(code: &'static str, message: impl Into<String>, path: Option<String>) -> Self {
        GeneratorError::Assembly {
            code,
            message: message.into(),
            path,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            GeneratorError::Parse { code, .. }
            | GeneratorError::Structural { code, .. }
            | GeneratorError::Assembly { code, .. }
            | GeneratorError::Codegen { code, .. } => code,
            GeneratorError::BindingCollision { .. } => "B001",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            GeneratorError::Parse { .. } => Phase::Parse,
            GeneratorError::Structural { phase, .. } => *phase,
            GeneratorError::BindingCollision { .. } => Phase::Lower,
            GeneratorError::Assembly { .. } => Phase::IrValidate,
            GeneratorError::Codegen { .. } => Phase::Codegen,
        }
    }

    /// Dotted path of the field the error is about, if it concerns one.
    pub fn path(&self) -> Option<&str> {
        match self {
            GeneratorError::Structural { path, .. } => Some(path),
            GeneratorError::BindingCollision { second, .. } => Some(second),
            GeneratorError::Assembly { path, .. } => path.as_deref(),
            GeneratorError::Parse { .. } | GeneratorError::Codegen { .. } => None,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, GeneratorError::Structural { .. })
    }

    pub fn is_binding_collision(&self) -> bool {
        matches!(self, GeneratorError::BindingCollision { .. })
    }
}

/// A recovered problem. Generation still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationWarning {
    /// A property names a group that was never declared; it is kept ungrouped.
    GroupReference { property: String, group: String },
    /// A declared group ended up with no properties and was dropped.
    EmptyGroup { group: String },
    /// A declared type cannot be reached from the input type.
    UnusedType { type_name: String },
}

impl GenerationWarning {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationWarning::GroupReference { .. } => "W001",
            GenerationWarning::EmptyGroup { .. } => "W002",
            GenerationWarning::UnusedType { .. } => "W003",
        }
    }
}

impl std::fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationWarning::GroupReference { property, group } => write!(
                f,
                "[W001] property '{}' references undeclared group '{}'; it is left ungrouped",
                property, group
            ),
            GenerationWarning::EmptyGroup { group } => {
                write!(f, "[W002] declared group '{}' has no properties", group)
            }
            GenerationWarning::UnusedType { type_name } => write!(
                f,
                "[W003] type '{}' is not reachable from the input type",
                type_name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_error_reports_path() {
        let e = GeneratorError::structural("S005", "Field has neither name nor label", "auth.<field 2>");
        assert_eq!(e.code(), "S005");
        assert_eq!(e.phase(), Phase::Lower);
        assert_eq!(e.path(), Some("auth.<field 2>"));
        assert_eq!(
            e.to_string(),
            "[Lower:S005] Field has neither name nor label (field 'auth.<field 2>')"
        );
    }

    #[test]
    fn collision_display_names_both_properties() {
        let e = GeneratorError::BindingCollision {
            namespace: BindingNamespace::Input,
            target: "action.bucket".into(),
            first: "bucket".into(),
            second: "otherBucket".into(),
        };
        assert_eq!(e.code(), "B001");
        assert!(e.is_binding_collision());
        assert!(e.to_string().contains("'bucket' and 'otherBucket'"));
    }
}
