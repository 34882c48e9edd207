//! Processor binding and batch dispatch for injectables.
//!
//! The binding is per-pipeline, not process-global: each validator owns a
//! registry, so concurrent pipelines can carry different overrides.
//! Conformance is enforced by the [`InjectableProcessor`] trait at compile
//! time.

use crate::inject::engine::InjectionEngine;
use crate::protocol::models::Injectable;
use crate::DevpayrError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Capability required of any injectable processor.
///
/// Implement this to decrypt, verify, and persist injectables somewhere
/// other than the default filesystem layout. The returned path (or
/// identifier rendered as a path) names what was written.
pub trait InjectableProcessor: Send + Sync {
    /// Handle a single injectable payload.
    fn handle(
        &self,
        injectable: &Injectable,
        secret: &str,
        base_path: &Path,
        verify: bool,
    ) -> Result<PathBuf, DevpayrError>;
}

/// Options shared by every injectable in a batch.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Secret used to decrypt payloads and verify signatures
    /// (typically the license key).
    pub secret: String,

    /// Base directory targets are resolved under.
    pub base_path: PathBuf,

    /// Whether to verify signatures when present.
    pub verify: bool,
}

/// Binding from "default" to the active injectable processor.
///
/// Holds at most one override; `active` falls back to the default
/// [`InjectionEngine`] when none is bound.
pub struct ProcessorRegistry {
    override_processor: Option<Arc<dyn InjectableProcessor>>,
    default_processor: InjectionEngine,
}

impl ProcessorRegistry {
    /// Create a registry around the given default engine.
    pub fn new(default_processor: InjectionEngine) -> Self {
        Self {
            override_processor: None,
            default_processor,
        }
    }

    /// Bind a custom processor.
    ///
    /// Set-once: rebinding without an intervening [`reset`](Self::reset)
    /// fails with `ProcessorRegistration` and leaves the current binding
    /// active.
    pub fn set_processor(
        &mut self,
        processor: Arc<dyn InjectableProcessor>,
    ) -> Result<(), DevpayrError> {
        if self.override_processor.is_some() {
            return Err(DevpayrError::ProcessorRegistration);
        }
        self.override_processor = Some(processor);
        Ok(())
    }

    /// Drop the override, restoring the default engine.
    pub fn reset(&mut self) {
        self.override_processor = None;
    }

    /// The processor that will handle the next batch.
    pub fn active(&self) -> &dyn InjectableProcessor {
        match self.override_processor.as_deref() {
            Some(processor) => processor,
            None => &self.default_processor,
        }
    }

    /// Dispatch a batch of injectables to the active processor in list
    /// order, stopping at the first error.
    ///
    /// Each injectable's required fields are checked before it reaches the
    /// processor, so a malformed record is rejected before any I/O. There
    /// is no partial-success aggregation: on failure the offending
    /// injectable's error is returned and the rest of the batch is not
    /// attempted.
    pub fn process(
        &self,
        injectables: &[Injectable],
        options: &ProcessOptions,
    ) -> Result<Vec<PathBuf>, DevpayrError> {
        let mut written = Vec::with_capacity(injectables.len());

        for injectable in injectables {
            injectable.require_fields()?;
            let path = self.active().handle(
                injectable,
                &options.secret,
                &options.base_path,
                options.verify,
            )?;
            written.push(path);
        }

        debug!(count = written.len(), "processed injectable batch");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::codec;
    use crate::protocol::models::InjectMode;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const SECRET: &str = "registry-secret";

    fn make_injectable(slug: &str, plaintext: &[u8]) -> Injectable {
        Injectable {
            slug: slug.to_string(),
            target_path: Some(format!("{slug}.txt")),
            encrypted_content: Some(codec::encrypt(plaintext, SECRET)),
            signature: None,
            mode: InjectMode::Replace,
        }
    }

    fn options(dir: &TempDir) -> ProcessOptions {
        ProcessOptions {
            secret: SECRET.to_string(),
            base_path: dir.path().to_path_buf(),
            verify: true,
        }
    }

    /// Processor that records slugs instead of touching the filesystem.
    struct RecordingProcessor {
        seen: Mutex<Vec<String>>,
    }

    impl InjectableProcessor for RecordingProcessor {
        fn handle(
            &self,
            injectable: &Injectable,
            _secret: &str,
            base_path: &Path,
            _verify: bool,
        ) -> Result<PathBuf, DevpayrError> {
            self.seen.lock().unwrap().push(injectable.slug.clone());
            Ok(base_path.join(&injectable.slug))
        }
    }

    #[test]
    fn test_default_processor_writes_files() {
        let dir = TempDir::new().unwrap();
        let registry = ProcessorRegistry::new(InjectionEngine::new(false));

        let written = registry
            .process(&[make_injectable("a", b"1"), make_injectable("b", b"2")], &options(&dir))
            .unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(std::fs::read(&written[0]).unwrap(), b"1");
        assert_eq!(std::fs::read(&written[1]).unwrap(), b"2");
    }

    #[test]
    fn test_override_receives_batch_in_order() {
        let dir = TempDir::new().unwrap();
        let mut registry = ProcessorRegistry::new(InjectionEngine::new(false));
        let recorder = Arc::new(RecordingProcessor {
            seen: Mutex::new(Vec::new()),
        });
        registry.set_processor(recorder.clone()).unwrap();

        registry
            .process(
                &[make_injectable("first", b"1"), make_injectable("second", b"2")],
                &options(&dir),
            )
            .unwrap();

        assert_eq!(*recorder.seen.lock().unwrap(), vec!["first", "second"]);
        // Override bypassed the filesystem engine
        assert!(!dir.path().join("first.txt").exists());
    }

    #[test]
    fn test_set_processor_is_set_once() {
        let mut registry = ProcessorRegistry::new(InjectionEngine::new(false));
        let recorder = Arc::new(RecordingProcessor {
            seen: Mutex::new(Vec::new()),
        });

        registry.set_processor(recorder.clone()).unwrap();
        let result = registry.set_processor(recorder.clone());
        assert!(matches!(
            result,
            Err(DevpayrError::ProcessorRegistration)
        ));

        // Reset restores the default and allows a new binding
        registry.reset();
        assert!(registry.set_processor(recorder).is_ok());
    }

    #[test]
    fn test_batch_stops_at_first_error() {
        let dir = TempDir::new().unwrap();
        let registry = ProcessorRegistry::new(InjectionEngine::new(false));

        let bad = Injectable {
            slug: String::new(),
            target_path: None,
            encrypted_content: Some(codec::encrypt(b"x", SECRET)),
            signature: None,
            mode: InjectMode::Replace,
        };

        let batch = [make_injectable("ok", b"1"), bad, make_injectable("after", b"2")];
        let result = registry.process(&batch, &options(&dir));

        assert!(matches!(
            result,
            Err(DevpayrError::InvalidInjectable { .. })
        ));
        // First injectable landed, the one after the failure did not
        assert!(dir.path().join("ok.txt").exists());
        assert!(!dir.path().join("after.txt").exists());
    }

    #[test]
    fn test_malformed_record_rejected_before_processor_runs() {
        let dir = TempDir::new().unwrap();
        let mut registry = ProcessorRegistry::new(InjectionEngine::new(false));
        let recorder = Arc::new(RecordingProcessor {
            seen: Mutex::new(Vec::new()),
        });
        registry.set_processor(recorder.clone()).unwrap();

        let bad = Injectable {
            slug: "no-content".to_string(),
            target_path: None,
            encrypted_content: None,
            signature: None,
            mode: InjectMode::Replace,
        };

        let result = registry.process(&[bad], &options(&dir));
        assert!(result.is_err());
        assert!(recorder.seen.lock().unwrap().is_empty());
    }
}
