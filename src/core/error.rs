//! Error types for dill-setup with contextual messages and exit codes
//!
//! Configuration errors are fatal and map to a user exit code. A failing build
//! tool is passed through untouched: its exit status becomes ours.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for dill-setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, malformed artifacts, missing files)
  User,
  /// System error (I/O, process spawn)
  System,
  /// The build tool's own exit status
  Passthrough(i32),
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    match self {
      ExitCode::User => 1,
      ExitCode::System => 2,
      ExitCode::Passthrough(code) => code,
    }
  }
}

/// Main error type for dill-setup
#[derive(Debug)]
pub enum SetupError {
  /// Configuration errors (inconsistent or misconfigured source tree)
  Config(ConfigError),

  /// External build tool errors
  Tool(ToolError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl SetupError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    SetupError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    SetupError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      SetupError::Message { message, context, help } => SetupError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      SetupError::Io(err) => SetupError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      SetupError::Config(_) => ExitCode::User,
      SetupError::Tool(e) => e.exit_code(),
      SetupError::Io(_) => ExitCode::System,
      SetupError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      SetupError::Config(e) => e.help_message(),
      SetupError::Tool(e) => e.help_message(),
      SetupError::Message { help, .. } => help.clone(),
      SetupError::Io(_) => None,
    }
  }
}

impl fmt::Display for SetupError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SetupError::Config(e) => write!(f, "{}", e),
      SetupError::Tool(e) => write!(f, "{}", e),
      SetupError::Io(e) => write!(f, "I/O error: {}", e),
      SetupError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for SetupError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      SetupError::Io(e) => Some(e),
      SetupError::Config(ConfigError::LicenseUnreadable { source, .. }) => Some(source),
      SetupError::Config(ConfigError::ArtifactWrite { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for SetupError {
  fn from(err: io::Error) -> Self {
    SetupError::Io(err)
  }
}

impl From<ConfigError> for SetupError {
  fn from(err: ConfigError) -> Self {
    SetupError::Config(err)
  }
}

impl From<ToolError> for SetupError {
  fn from(err: ToolError) -> Self {
    SetupError::Tool(err)
  }
}

impl From<String> for SetupError {
  fn from(msg: String) -> Self {
    SetupError::message(msg)
  }
}

impl From<&str> for SetupError {
  fn from(msg: &str) -> Self {
    SetupError::message(msg)
  }
}

impl From<toml_edit::de::Error> for SetupError {
  fn from(err: toml_edit::de::Error) -> Self {
    SetupError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for SetupError {
  fn from(err: serde_json::Error) -> Self {
    SetupError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for SetupError {
  fn from(err: semver::Error) -> Self {
    SetupError::message(format!("Version parse error: {}", err))
  }
}

/// Configuration-related errors
///
/// All of these mean the source tree is inconsistent and must be fixed before
/// rebuilding. None of them are retried.
#[derive(Debug)]
pub enum ConfigError {
  /// A prior generated module exists but cannot be trusted
  MalformedModule { path: PathBuf, reason: String },

  /// The license file could not be read
  LicenseUnreadable { path: PathBuf, source: io::Error },

  /// The description template override could not be read
  TemplateUnreadable { path: PathBuf, source: io::Error },

  /// A generated artifact could not be written
  ArtifactWrite { path: PathBuf, source: io::Error },

  /// A config value failed validation
  InvalidValue { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MalformedModule { path, .. } => Some(format!(
        "Restore {} from the source distribution, or delete it to recompute the version.",
        path.display()
      )),
      ConfigError::LicenseUnreadable { .. } => {
        Some("The license text is embedded in the generated module; make sure the file exists.".to_string())
      }
      ConfigError::ArtifactWrite { path, .. } => path
        .parent()
        .map(|dir| format!("Check that {} exists and is writable.", dir.display())),
      ConfigError::InvalidValue { .. } => Some("Fix the value in setup.toml and re-run.".to_string()),
      ConfigError::TemplateUnreadable { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MalformedModule { path, reason } => {
        write!(f, "Malformed generated module {}: {}", path.display(), reason)
      }
      ConfigError::LicenseUnreadable { path, source } => {
        write!(f, "Failed to read license file {}: {}", path.display(), source)
      }
      ConfigError::TemplateUnreadable { path, source } => {
        write!(f, "Failed to read description template {}: {}", path.display(), source)
      }
      ConfigError::ArtifactWrite { path, source } => {
        write!(f, "Failed to write {}: {}", path.display(), source)
      }
      ConfigError::InvalidValue { field, reason } => {
        write!(f, "Invalid config value for {}: {}", field, reason)
      }
    }
  }
}

/// External build tool errors
#[derive(Debug)]
pub enum ToolError {
  /// The tool could not be started
  SpawnFailed { program: String, source: io::Error },

  /// The tool ran and reported failure
  Failed { program: String, code: Option<i32> },
}

impl ToolError {
  fn exit_code(&self) -> ExitCode {
    match self {
      ToolError::SpawnFailed { .. } => ExitCode::System,
      // Killed by a signal: no status to forward
      ToolError::Failed { code: None, .. } => ExitCode::System,
      ToolError::Failed { code: Some(code), .. } => ExitCode::Passthrough(*code),
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::SpawnFailed { program, .. } => Some(format!(
        "Make sure `{}` is installed, or set [build_tool] command in setup.toml.",
        program
      )),
      ToolError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::SpawnFailed { program, source } => {
        write!(f, "Failed to start build tool `{}`: {}", program, source)
      }
      ToolError::Failed { program, code: Some(code) } => {
        write!(f, "Build tool `{}` exited with status {}", program, code)
      }
      ToolError::Failed { program, code: None } => {
        write!(f, "Build tool `{}` was terminated by a signal", program)
      }
    }
  }
}

/// Result type alias for dill-setup
pub type SetupResult<T> = Result<T, SetupError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> SetupResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> SetupResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<SetupError>,
{
  fn context(self, ctx: impl Into<String>) -> SetupResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> SetupResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &SetupError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
