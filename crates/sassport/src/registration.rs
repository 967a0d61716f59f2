use std::path::Path;

use crate::host::HostEnvironment;
use crate::types::{ContentType, Syntax};

/// API generation of the host, detected once at startup from its
/// capability descriptor. One resolver implementation is parameterized by
/// this instead of maintaining parallel variants per host version, and
/// nothing probes the host per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGeneration {
    /// Legacy hosts without typed stylesheet MIMEs: a candidate is
    /// acceptable whenever it is requirable as a stylesheet at all.
    Permissive,
    /// Hosts that type their stylesheet assets: a candidate must resolve
    /// to CSS or to the token's own syntax type.
    Strict,
}

impl ApiGeneration {
    pub fn detect(host: &dyn HostEnvironment) -> Self {
        if host.capabilities().typed_stylesheet_mimes {
            ApiGeneration::Strict
        } else {
            ApiGeneration::Permissive
        }
    }
}

/// Content-type acceptance rule for the active generation.
#[derive(Debug, Clone, Copy)]
pub struct AcceptancePolicy {
    generation: ApiGeneration,
}

impl AcceptancePolicy {
    pub fn select(host: &dyn HostEnvironment) -> Self {
        Self { generation: ApiGeneration::detect(host) }
    }

    pub fn generation(&self) -> ApiGeneration {
        self.generation
    }

    /// Types acceptable for an import written as `token`.
    /// `None` means "gate on requirable only".
    pub fn accept_types(&self, token: &Path) -> Option<Vec<ContentType>> {
        match self.generation {
            ApiGeneration::Permissive => None,
            ApiGeneration::Strict => {
                Some(vec![ContentType::Css, Syntax::of_path(token).content_type()])
            }
        }
    }

    /// Final acceptance check on a resolved candidate. Type gating always
    /// precedes acceptance; an incompatible hit means "try the next
    /// candidate", never "accept".
    pub fn accepts(&self, content_type: &ContentType, token: &Path) -> bool {
        match self.accept_types(token) {
            None => content_type.is_stylesheet(),
            Some(accepted) => accepted.contains(content_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FilesystemHost;
    use tempfile::tempdir;

    #[test]
    fn test_generation_detection() {
        let dir = tempdir().unwrap();
        let strict = FilesystemHost::new(dir.path(), Vec::new());
        assert_eq!(ApiGeneration::detect(&strict), ApiGeneration::Strict);

        let permissive = FilesystemHost::new(dir.path(), Vec::new()).permissive();
        assert_eq!(ApiGeneration::detect(&permissive), ApiGeneration::Permissive);
    }

    #[test]
    fn test_strict_policy_matches_token_syntax() {
        let dir = tempdir().unwrap();
        let host = FilesystemHost::new(dir.path(), Vec::new());
        let policy = AcceptancePolicy::select(&host);

        assert!(policy.accepts(&ContentType::Scss, Path::new("dep")));
        assert!(policy.accepts(&ContentType::Css, Path::new("dep")));
        assert!(policy.accepts(&ContentType::Sass, Path::new("dep.sass")));
        // An extensionless token is an SCSS-syntax import.
        assert!(!policy.accepts(&ContentType::Sass, Path::new("dep")));
        assert!(!policy.accepts(&ContentType::Other("js".into()), Path::new("dep")));
    }

    #[test]
    fn test_permissive_policy_gates_on_stylesheet_only() {
        let dir = tempdir().unwrap();
        let host = FilesystemHost::new(dir.path(), Vec::new()).permissive();
        let policy = AcceptancePolicy::select(&host);

        assert!(policy.accepts(&ContentType::Sass, Path::new("dep")));
        assert!(!policy.accepts(&ContentType::Other("png".into()), Path::new("dep")));
    }
}
