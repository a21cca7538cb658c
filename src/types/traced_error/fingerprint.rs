use crate::types::traced_error::TracedError;
use core::fmt::Write;

/// Configuration builder for customizing fingerprint generation.
///
/// A fingerprint identifies "the same failure" across occurrences, so it hashes what stays
/// stable between them: the type, the message, where the error was raised (package and
/// function only, no line numbers) and the cause chain.
///
/// ```
/// use error_trace::TracedError;
///
/// fn fail(user: &str) -> TracedError {
///     TracedError::new_with_type("quota exceeded", "QuotaError").with_meta("user", user)
/// }
///
/// let a = fail("alice");
/// let b = fail("bob");
/// assert_eq!(a.fingerprint(), b.fingerprint());
///
/// let by_user = |e: &TracedError| e.fingerprint_config().include_metadata_keys(&["user"]).compute();
/// assert_ne!(by_user(&a), by_user(&b));
/// ```
pub struct FingerprintConfig<'a> {
    pub(crate) error: &'a TracedError,
    pub(crate) include_type: bool,
    pub(crate) include_message: bool,
    pub(crate) frame_depth: usize,
    pub(crate) include_causes: bool,
    pub(crate) include_metadata: bool,
    pub(crate) include_keys: Option<&'a [&'a str]>,
    pub(crate) exclude_keys: Option<&'a [&'a str]>,
}

impl<'a> FingerprintConfig<'a> {
    pub(crate) fn new(error: &'a TracedError) -> Self {
        Self {
            error,
            include_type: true,
            include_message: true,
            frame_depth: 1,
            include_causes: true,
            include_metadata: false,
            include_keys: None,
            exclude_keys: None,
        }
    }

    /// Whether to include the type (default: true).
    #[must_use]
    pub fn include_type(mut self, include: bool) -> Self {
        self.include_type = include;
        self
    }

    /// Whether to include the message (default: true).
    #[must_use]
    pub fn include_message(mut self, include: bool) -> Self {
        self.include_message = include;
        self
    }

    /// How many of the nearest frames to include (default: 1, `0` disables).
    #[must_use]
    pub fn frame_depth(mut self, depth: usize) -> Self {
        self.frame_depth = depth;
        self
    }

    /// Whether to include the messages of the cause chain (default: true).
    #[must_use]
    pub fn include_causes(mut self, include: bool) -> Self {
        self.include_causes = include;
        self
    }

    /// Whether to include metadata in the fingerprint (default: false).
    #[must_use]
    pub fn include_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// Explicitly include only these metadata keys in the fingerprint.
    #[must_use]
    pub fn include_metadata_keys(mut self, keys: &'a [&'a str]) -> Self {
        self.include_metadata = true;
        self.include_keys = Some(keys);
        self
    }

    /// Exclude these metadata keys from the fingerprint.
    #[must_use]
    pub fn exclude_metadata_keys(mut self, keys: &'a [&'a str]) -> Self {
        self.include_metadata = true;
        self.exclude_keys = Some(keys);
        self
    }

    /// Computes the fingerprint using the configured options.
    #[must_use]
    pub fn compute(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf29ce484222325;
        let mut hash = FNV_OFFSET;
        let error = self.error;

        if self.include_type {
            hash_bytes(&mut hash, b"type:");
            hash_bytes(&mut hash, error.error_type().as_bytes());
        }

        if self.include_message {
            hash_bytes(&mut hash, b"msg:");
            hash_bytes(&mut hash, error.message().as_bytes());
        }

        for frame in error.stack_trace().iter().take(self.frame_depth) {
            hash_bytes(&mut hash, b"frame:");
            hash_bytes(&mut hash, frame.package().as_bytes());
            hash_bytes(&mut hash, b"::");
            hash_bytes(&mut hash, frame.function_name().as_bytes());
        }

        if self.include_causes {
            for cause in error.chain().skip(1) {
                hash_bytes(&mut hash, b"cause:");
                match cause.downcast_ref::<TracedError>() {
                    Some(traced) => {
                        hash_bytes(&mut hash, traced.error_type().as_bytes());
                        hash_bytes(&mut hash, b"=");
                        hash_bytes(&mut hash, traced.message().as_bytes());
                    },
                    None => {
                        let mut hasher = DisplayHasher::new(&mut hash);
                        let _ = write!(hasher, "{cause}");
                    },
                }
            }
        }

        if self.include_metadata {
            for (key, value) in error.metadata() {
                let key_str = key.as_str();
                let included = self.include_keys.map_or(true, |keys| keys.contains(&key_str));
                let excluded = self.exclude_keys.is_some_and(|keys| keys.contains(&key_str));
                if !included || excluded {
                    continue;
                }

                hash_bytes(&mut hash, b"meta:");
                hash_bytes(&mut hash, key.as_bytes());
                hash_bytes(&mut hash, b"=");
                let mut hasher = DisplayHasher::new(&mut hash);
                let _ = write!(hasher, "{value}");
            }
        }

        hash
    }

    /// Computes the fingerprint and returns it as a hex string.
    #[must_use]
    pub fn compute_hex(&self) -> String {
        format!("{:016x}", self.compute())
    }
}

/// FNV-1a prime constant for 64-bit hash.
const FNV_PRIME: u64 = 0x100000001b3;

#[inline(always)]
fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for &byte in bytes {
        *hash ^= byte as u64;
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}

struct DisplayHasher<'a> {
    hash: &'a mut u64,
}

impl<'a> DisplayHasher<'a> {
    #[inline(always)]
    fn new(hash: &'a mut u64) -> Self {
        Self { hash }
    }
}

impl Write for DisplayHasher<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        hash_bytes(self.hash, s.as_bytes());
        Ok(())
    }
}
