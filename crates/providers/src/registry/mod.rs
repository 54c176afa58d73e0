//! Provider registry and supporting pieces.

mod diagnostics;
mod provider_registry;
mod settings;
mod validator;

pub use diagnostics::{AttemptOutcome, FetchDiagnostics, ProviderAttempt};
pub use provider_registry::{ProviderRegistry, DEFAULT_PROVIDER_TIMEOUT};
pub use settings::{ProviderPriorityEntry, ProviderSettings};
pub use validator::{ItemValidator, ValidationIssue, ValidationSeverity, ValidatorConfig};
