//! Request tickets per output surface
//!
//! A surface shows the result of its most recent request only. Each new
//! request takes a fresh [`RequestId`]; an outcome whose id is no longer the
//! latest for its surface is stale and must be dropped.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::{RequestId, SurfaceId};

/// Issues and checks request tickets, last write wins
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    latest: Mutex<HashMap<SurfaceId, u64>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request on `surface`, superseding any in flight
    pub fn begin(&self, surface: &SurfaceId) -> RequestId {
        self.begin_with(surface, |_| ()).0
    }

    /// Whether `request` is still the latest request for `surface`
    pub fn is_current(&self, surface: &SurfaceId, request: RequestId) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(surface).copied() == Some(request.value())
    }

    /// Start a new request and run `present` before any other ticket moves
    ///
    /// Used to show the first panel of a request (loading or rejection) so
    /// an older outcome cannot land on top of it.
    pub fn begin_with<R>(
        &self,
        surface: &SurfaceId,
        present: impl FnOnce(RequestId) -> R,
    ) -> (RequestId, R) {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let counter = latest.entry(surface.clone()).or_insert(0);
        *counter += 1;
        let request = RequestId::new(*counter);
        (request, present(request))
    }

    /// Run `present` only while `request` is the latest for `surface`
    ///
    /// The ticket lock is held until `present` returns, so no newer request
    /// can start between the check and the write. Returns `None` for a
    /// stale request.
    pub fn if_current<R>(
        &self,
        surface: &SurfaceId,
        request: RequestId,
        present: impl FnOnce() -> R,
    ) -> Option<R> {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        if latest.get(surface).copied() != Some(request.value()) {
            return None;
        }
        Some(present())
    }

    /// Number of surfaces that have seen at least one request
    pub fn surface_count(&self) -> usize {
        self.latest.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
