//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: Invalid or missing analysis arguments
//! - FetchError: Network or HTTP status failures
//! - ParseError: Response bodies that are not the expected JSON shape
//! - ResolutionError: Constraints that cannot be matched to a published version
//!
//! RegistryError narrows a registry lookup to its fetch and parse failures.

use thiserror::Error;

/// Top-level error for a lag analysis
#[derive(Error, Debug)]
pub enum LagError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Registry or manifest fetch errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Response parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Constraint resolution errors
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Failure of a single registry lookup
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<RegistryError> for LagError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Fetch(e) => LagError::Fetch(e),
            RegistryError::Parse(e) => LagError::Parse(e),
        }
    }
}

/// Errors related to analysis configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither `package`+`version` nor `manifest_url` was supplied
    #[error("missing arguments: {message}")]
    MissingArguments { message: String },

    /// Both modes were supplied at once
    #[error("conflicting arguments: {message}")]
    ConflictingArguments { message: String },

    /// Dependency kind is not a recognized group label
    #[error(
        "unknown dependency kind '{value}': expected 'dependencies', 'devDependencies', \
         'peerDependencies' or 'optionalDependencies'"
    )]
    UnknownKind { value: String },

    /// Package name is empty
    #[error("package name cannot be empty")]
    EmptyPackageName,

    /// Manifest or registry URL is not a valid http(s) URL
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The HTTP client could not be built
    #[error("failed to create HTTP client: {message}")]
    HttpClient { message: String },
}

/// Errors related to fetching documents over HTTP
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered 404
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-success status
    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Transport level failure (DNS, connection refused, TLS, truncated body)
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    /// Request exceeded the configured timeout
    #[error("timeout while fetching {url}")]
    Timeout { url: String },

    /// The server kept answering 429
    #[error("rate limit exceeded for {url}")]
    RateLimited { url: String },
}

/// Errors related to decoding fetched documents
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Body is not JSON at all
    #[error("invalid JSON from {url}: {message}")]
    InvalidJson { url: String, message: String },

    /// Body is JSON but not shaped like the expected document
    #[error("unexpected document shape from {url}: {message}")]
    UnexpectedShape { url: String, message: String },
}

/// Errors related to resolving a declared constraint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Exact version is not in the published list
    #[error("version {version} of '{package}' is not published")]
    ExactNotPublished { package: String, version: String },

    /// No published version satisfies the range
    #[error("no published version of '{package}' satisfies '{constraint}'")]
    NoMatchingVersion { package: String, constraint: String },

    /// Dist-tag does not exist on the package
    #[error("'{package}' has no dist-tag '{tag}'")]
    UnknownTag { package: String, tag: String },

    /// The registry lists no versions at all
    #[error("'{package}' has no published versions")]
    NoVersions { package: String },

    /// Non-registry specifier (git, file, alias, ...)
    #[error("unsupported constraint '{constraint}'")]
    Unsupported { constraint: String },

    /// String is neither a range nor a valid tag name
    #[error("invalid constraint '{constraint}': {message}")]
    InvalidConstraint { constraint: String, message: String },
}

impl ConfigError {
    /// Creates a new MissingArguments error
    pub fn missing(message: impl Into<String>) -> Self {
        ConfigError::MissingArguments {
            message: message.into(),
        }
    }

    /// Creates a new ConflictingArguments error
    pub fn conflicting(message: impl Into<String>) -> Self {
        ConfigError::ConflictingArguments {
            message: message.into(),
        }
    }

    /// Creates a new InvalidUrl error
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl FetchError {
    /// Creates a new Network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Network {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl ParseError {
    /// Classify a serde_json error into a syntax or shape failure
    pub fn from_json(url: impl Into<String>, err: &serde_json::Error) -> Self {
        use serde_json::error::Category;

        let url = url.into();
        let message = err.to_string();
        match err.classify() {
            Category::Data => ParseError::UnexpectedShape { url, message },
            Category::Io | Category::Syntax | Category::Eof => {
                ParseError::InvalidJson { url, message }
            }
        }
    }
}

impl ResolutionError {
    /// Creates a new InvalidConstraint error
    pub fn invalid(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        ResolutionError::InvalidConstraint {
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}
