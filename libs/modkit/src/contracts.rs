use async_trait::async_trait;

/// A unit of startup wiring.
///
/// `init` runs once per process, in the order the host lists its modules. A module
/// registers the bus topics it answers here and may ask topics of modules listed
/// before it.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    /// Name used for config lookup (`modules.<name>`) and logging.
    fn name(&self) -> &'static str;

    async fn init(&self, ctx: &crate::context::ModuleCtx) -> anyhow::Result<()>;
}
