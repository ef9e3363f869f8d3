//! The firmware manager facade.

use std::fmt;
use std::sync::Arc;

use openfirmware_errors::{FirmwareError, FirmwareResult};
use openfirmware_fetch::{AsyncLoadBridge, ResourceLoader};
use openfirmware_inflate::Inflater;
use openfirmware_store::BlobStore;
use tracing::{debug, info, warn};

use crate::config::ManagerConfig;
use crate::descriptor::FirmwareDescriptor;

/// Owns a driver's firmware images.
///
/// Images enter by name lookup in a candidate table, by explicit descriptor,
/// or by external resource fetch. Zlib-framed images are inflated on the way
/// in; [`get`](Self::get) always returns the raw bytes.
///
/// The single-item constructors fail fast. The bulk constructors are
/// best-effort: items that fail are logged and skipped, and construction
/// succeeds as long as the store itself could be created. Bulk items are
/// processed from the end of the list toward the start.
///
/// # Thread Safety
///
/// All operations take `&self` and may be called from any thread. External
/// resource fetches are single-flight: a fetch issued while another one is
/// outstanding fails with [`FirmwareError::FetchInFlight`].
pub struct FirmwareManager {
    config: ManagerConfig,
    inflater: Inflater,
    store: BlobStore,
    bridge: Option<AsyncLoadBridge>,
}

impl FirmwareManager {
    /// Create a manager whose store is not yet initialized.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] if `config` is invalid.
    pub fn new(config: ManagerConfig) -> FirmwareResult<Self> {
        config.validate()?;
        let inflater = Inflater::new(config.inflate.clone())?;
        Ok(Self {
            config,
            inflater,
            store: BlobStore::uninitialized(),
            bridge: None,
        })
    }

    /// Create the store with room for about `capacity` images.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] if `capacity <= 0` or the
    /// store already exists.
    pub fn initialize(&self, capacity: i64) -> FirmwareResult<()> {
        self.store.init(capacity)?;
        info!(capacity, "Firmware manager initialized");
        Ok(())
    }

    /// Attach the loader used by [`add_by_external_resource`](Self::add_by_external_resource).
    ///
    /// Replaces any previously attached loader.
    pub fn attach_loader(&mut self, loader: Arc<dyn ResourceLoader>) {
        self.bridge = Some(AsyncLoadBridge::new(loader).with_timeout(self.config.fetch_timeout));
    }

    /// Empty manager with room for about `capacity` images.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] if `capacity <= 0` or
    /// `config` is invalid.
    pub fn with_capacity(config: ManagerConfig, capacity: i64) -> FirmwareResult<Self> {
        let manager = Self::new(config)?;
        manager.initialize(capacity)?;
        Ok(manager)
    }

    /// Manager holding the candidate named `name`.
    ///
    /// # Errors
    ///
    /// Propagates the failure of [`add_by_name`](Self::add_by_name).
    pub fn with_name(
        config: ManagerConfig,
        name: &str,
        candidates: &[FirmwareDescriptor],
    ) -> FirmwareResult<Self> {
        let manager = Self::with_capacity(config, 1)?;
        manager.add_by_name(name, candidates)?;
        Ok(manager)
    }

    /// Manager holding every candidate in `names` that can be found.
    ///
    /// # Errors
    ///
    /// Fails only if the store cannot be created, which includes an empty
    /// `names` list.
    pub fn with_names(
        config: ManagerConfig,
        names: &[&str],
        candidates: &[FirmwareDescriptor],
    ) -> FirmwareResult<Self> {
        let manager = Self::with_capacity(config, capacity_for(names.len()))?;
        for name in names.iter().rev() {
            if let Err(e) = manager.add_by_name(name, candidates) {
                warn!(name, error = %e, kind = %e.kind(), "Skipping firmware");
            }
        }
        Ok(manager)
    }

    /// Manager holding the image in `descriptor`.
    ///
    /// # Errors
    ///
    /// Propagates the failure of [`add_by_descriptor`](Self::add_by_descriptor).
    pub fn with_descriptor(
        config: ManagerConfig,
        descriptor: &FirmwareDescriptor,
    ) -> FirmwareResult<Self> {
        let manager = Self::with_capacity(config, 1)?;
        manager.add_descriptor(descriptor)?;
        Ok(manager)
    }

    /// Manager holding every image in `descriptors` that can be added.
    ///
    /// # Errors
    ///
    /// Fails only if the store cannot be created, which includes an empty
    /// `descriptors` list.
    pub fn with_descriptors(
        config: ManagerConfig,
        descriptors: &[FirmwareDescriptor],
    ) -> FirmwareResult<Self> {
        let manager = Self::with_capacity(config, capacity_for(descriptors.len()))?;
        for descriptor in descriptors.iter().rev() {
            if let Err(e) = manager.add_descriptor(descriptor) {
                warn!(name = descriptor.name(), error = %e, kind = %e.kind(), "Skipping firmware");
            }
        }
        Ok(manager)
    }

    /// Manager holding `resource_name`, fetched from `resource_ref` through
    /// `loader`. The loader stays attached.
    ///
    /// # Errors
    ///
    /// Propagates the failure of
    /// [`add_by_external_resource`](Self::add_by_external_resource).
    pub fn with_resource(
        config: ManagerConfig,
        loader: Arc<dyn ResourceLoader>,
        resource_ref: &str,
        resource_name: &str,
    ) -> FirmwareResult<Self> {
        let mut manager = Self::with_capacity(config, 1)?;
        manager.attach_loader(loader);
        manager.add_by_external_resource(resource_ref, resource_name)?;
        Ok(manager)
    }

    /// Manager holding every resource in `resources` that can be fetched.
    ///
    /// Each item is an `(resource_ref, resource_name)` pair, so one manager
    /// can gather images owned by different bundles.
    ///
    /// # Errors
    ///
    /// Fails only if the store cannot be created, which includes an empty
    /// `resources` list.
    pub fn with_resources(
        config: ManagerConfig,
        loader: Arc<dyn ResourceLoader>,
        resources: &[(&str, &str)],
    ) -> FirmwareResult<Self> {
        let mut manager = Self::with_capacity(config, capacity_for(resources.len()))?;
        manager.attach_loader(loader);
        for &(resource_ref, resource_name) in resources.iter().rev() {
            if let Err(e) = manager.add_by_external_resource(resource_ref, resource_name) {
                warn!(
                    owner = resource_ref,
                    resource = resource_name,
                    error = %e,
                    kind = %e.kind(),
                    "Skipping firmware resource"
                );
            }
        }
        Ok(manager)
    }

    /// Add the candidate named `name` (exact, case-sensitive match).
    ///
    /// The table is scanned from the end toward the start, so among
    /// duplicate names the last entry wins.
    ///
    /// # Errors
    ///
    /// - [`FirmwareError::Unsupported`] if no candidate matches.
    /// - Any failure of [`add_by_descriptor`](Self::add_by_descriptor).
    pub fn add_by_name(&self, name: &str, candidates: &[FirmwareDescriptor]) -> FirmwareResult<()> {
        let candidate = candidates
            .iter()
            .rev()
            .find(|candidate| candidate.name() == name);
        let Some(candidate) = candidate else {
            warn!(name, candidates = candidates.len(), "Firmware not found in candidate table");
            return Err(FirmwareError::unsupported(name));
        };
        self.add_by_descriptor(name, candidate.data())
    }

    /// Normalize `bytes` and store them under `name`, replacing any
    /// previous image.
    ///
    /// # Errors
    ///
    /// - [`FirmwareError::NotInitialized`] if the store was never created.
    /// - [`FirmwareError::InvalidArgument`] if `bytes` is shorter than two bytes.
    /// - [`FirmwareError::DecompressionFailed`] if inflation fails.
    /// - [`FirmwareError::StoreInsertFailed`] if the store cannot grow.
    pub fn add_by_descriptor(&self, name: &str, bytes: &[u8]) -> FirmwareResult<()> {
        if !self.store.is_initialized() {
            return Err(FirmwareError::NotInitialized);
        }
        let image = self.inflater.decompress(bytes)?;
        self.store.insert(name, &image)?;
        debug!(name, compressed_len = bytes.len(), bytes = image.len(), "Firmware added");
        Ok(())
    }

    /// [`add_by_descriptor`](Self::add_by_descriptor) for a descriptor.
    ///
    /// # Errors
    ///
    /// As for [`add_by_descriptor`](Self::add_by_descriptor).
    pub fn add_descriptor(&self, descriptor: &FirmwareDescriptor) -> FirmwareResult<()> {
        self.add_by_descriptor(descriptor.name(), descriptor.data())
    }

    /// Fetch `resource_name` from `resource_ref`, blocking until the loader
    /// answers, then add it under `resource_name`.
    ///
    /// Without a configured fetch timeout this call blocks forever if the
    /// loader never calls back.
    ///
    /// # Errors
    ///
    /// - [`FirmwareError::NotInitialized`] if the store was never created.
    /// - [`FirmwareError::FetchFailed`] if no loader is attached, or the
    ///   loader fails or returns no data.
    /// - [`FirmwareError::FetchInFlight`] if another fetch is outstanding.
    /// - [`FirmwareError::FetchTimedOut`] if the configured timeout expires.
    /// - Any failure of [`add_by_descriptor`](Self::add_by_descriptor).
    pub fn add_by_external_resource(
        &self,
        resource_ref: &str,
        resource_name: &str,
    ) -> FirmwareResult<()> {
        if !self.store.is_initialized() {
            return Err(FirmwareError::NotInitialized);
        }
        let bridge = self.bridge.as_ref().ok_or_else(|| {
            FirmwareError::fetch_failed(resource_name, "no resource loader attached")
        })?;
        let bytes = bridge.fetch_blocking(resource_ref, resource_name)?;
        self.add_by_descriptor(resource_name, &bytes)
    }

    /// Remove the image stored under `name`. A missing image is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::NotInitialized`] if the store was never created.
    pub fn remove(&self, name: &str) -> FirmwareResult<()> {
        self.store.remove(name)
    }

    /// Remove every image.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::NotInitialized`] if the store was never created.
    pub fn remove_all(&self) -> FirmwareResult<()> {
        self.store.remove_all()
    }

    /// The raw image stored under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<[u8]>> {
        self.store.get(name)
    }

    /// Whether an image is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no images are stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Sorted names of the stored images.
    pub fn names(&self) -> Vec<String> {
        self.store.names()
    }

    /// Whether the store exists.
    pub fn is_initialized(&self) -> bool {
        self.store.is_initialized()
    }

    /// The manager's configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Drop every image and return to the uninitialized state.
    ///
    /// [`initialize`](Self::initialize) may be called again afterwards.
    pub fn teardown(&self) {
        if self.store.is_initialized() {
            self.store.teardown();
            info!("Firmware manager torn down");
        }
    }
}

impl Drop for FirmwareManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for FirmwareManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirmwareManager")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("loader_attached", &self.bridge.is_some())
            .finish()
    }
}

fn capacity_for(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
