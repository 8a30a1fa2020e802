// Bridge assembly.
//
// The host constructs its store clients, hands them in as trait objects, and
// gets back the three surfaces: the storage adapter for the auth library,
// the linker for sign-in hooks, and the guard for protected routes. All
// three share one logger; nothing here is global.

use std::sync::Arc;

use schoolbridge_core::logger::BridgeLogger;
use schoolbridge_store::identity::IdentityStore;
use schoolbridge_store::teachers::TeacherDirectory;

use crate::adapter::IdentityAdapter;
use crate::guard::SessionGuard;
use crate::linking::IdentityLinker;
use crate::options::BridgeOptions;

/// The assembled auth bridge.
#[derive(Debug, Clone)]
pub struct SchoolBridge {
    adapter: IdentityAdapter,
    linker: IdentityLinker,
    guard: SessionGuard,
    logger: BridgeLogger,
}

impl SchoolBridge {
    pub fn new(
        options: BridgeOptions,
        store: Arc<dyn IdentityStore>,
        teachers: Arc<dyn TeacherDirectory>,
    ) -> Self {
        let logger = BridgeLogger::new(options.logger.clone());
        let adapter = IdentityAdapter::new(store.clone(), logger.clone());
        let linker = IdentityLinker::new(store, teachers, logger.clone());
        let guard = SessionGuard::new(
            linker.clone(),
            logger.clone(),
            options.session_clock_skew_secs,
        );
        Self {
            adapter,
            linker,
            guard,
            logger,
        }
    }

    /// The storage backend to register with the external auth library.
    pub fn adapter(&self) -> &IdentityAdapter {
        &self.adapter
    }

    pub fn linker(&self) -> &IdentityLinker {
        &self.linker
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn logger(&self) -> &BridgeLogger {
        &self.logger
    }
}
