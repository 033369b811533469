//! Short code generation and format validation.
//!
//! The generator knows nothing about existing codes. Uniqueness is checked by
//! [`crate::application::services::LinkStore`], which retries generation until
//! a free code comes up.

use std::sync::{LazyLock, Mutex, PoisonError};

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

/// Length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Codes that would be shadowed by a top-level route.
pub const RESERVED_SHORTCODES: &[&str] = &["api", "health"];

static SHORTCODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{3,15}$").unwrap());

/// Random shortcode source with an injected RNG.
///
/// Production code seeds from the OS; tests pass a fixed seed to get a
/// reproducible sequence of codes.
///
/// # Examples
///
/// ```
/// use snaplink::utils::code_generator::CodeGenerator;
///
/// let generator = CodeGenerator::from_seed(42);
/// let code = generator.generate(7);
/// assert_eq!(code.len(), 7);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub struct CodeGenerator {
    rng: Mutex<StdRng>,
}

impl CodeGenerator {
    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn from_os_rng() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Draws `length` characters uniformly from `[A-Za-z0-9]`.
    pub fn generate(&self, length: usize) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        (&mut *rng)
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }

    pub fn generate_default(&self) -> String {
        self.generate(DEFAULT_CODE_LENGTH)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

/// Returns true iff `code` is 3-15 ASCII letters or digits.
///
/// # Examples
///
/// ```
/// use snaplink::utils::code_generator::is_valid_format;
///
/// assert!(is_valid_format("abc"));
/// assert!(is_valid_format("Promo2026"));
/// assert!(!is_valid_format("ab"));
/// assert!(!is_valid_format("my-link"));
/// ```
pub fn is_valid_format(code: &str) -> bool {
    SHORTCODE_REGEX.is_match(code)
}

/// Returns true if `/{code}` is already served by another route.
///
/// Routing is case-sensitive, so only the exact spelling is reserved.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_SHORTCODES.contains(&code)
}
