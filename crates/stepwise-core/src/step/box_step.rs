//! BoxStep -- object-safe dynamic dispatch wrapper for Step.
//!
//! Same blanket-impl pattern as the other boxed ports:
//! 1. Define an object-safe `StepDyn` trait with boxed futures
//! 2. Blanket-impl `StepDyn` for all `T: Step`
//! 3. `BoxStep` wraps `Box<dyn StepDyn>` and delegates

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use stepwise_types::run::RunRecord;

use super::contract::{Step, StepError};
use super::owner::StepOwner;

/// Object-safe version of [`Step`] with a boxed future.
///
/// Exists solely to enable `dyn StepDyn`. A blanket implementation is
/// provided for every `Step`.
pub trait StepDyn: Send + Sync {
    fn name(&self) -> &str;

    fn owner(&self) -> &dyn StepOwner;

    fn execute_boxed<'a>(
        &'a self,
        record: RunRecord,
    ) -> Pin<Box<dyn Future<Output = Result<RunRecord, StepError>> + Send + 'a>>;
}

impl<T: Step> StepDyn for T {
    fn name(&self) -> &str {
        Step::name(self)
    }

    fn owner(&self) -> &dyn StepOwner {
        Step::owner(self)
    }

    fn execute_boxed<'a>(
        &'a self,
        record: RunRecord,
    ) -> Pin<Box<dyn Future<Output = Result<RunRecord, StepError>> + Send + 'a>> {
        Box::pin(self.execute(record))
    }
}

/// Type-erased step so a workflow can mix step types in one `Vec<BoxStep>`.
///
/// `Step` uses RPITIT and cannot be a trait object directly; `BoxStep`
/// exposes the same methods and delegates to the inner `StepDyn`.
pub struct BoxStep {
    inner: Box<dyn StepDyn>,
}

impl BoxStep {
    /// Wrap a concrete step.
    pub fn new<T: Step + 'static>(step: T) -> Self {
        Self {
            inner: Box::new(step),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn owner(&self) -> &dyn StepOwner {
        self.inner.owner()
    }

    /// Run one attempt of the step.
    pub async fn execute(&self, record: RunRecord) -> Result<RunRecord, StepError> {
        self.inner.execute_boxed(record).await
    }
}

impl fmt::Debug for BoxStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxStep")
            .field("name", &self.name())
            .field("owner", &self.owner().name())
            .finish()
    }
}
