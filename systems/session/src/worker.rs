//! Worker-boundary resolution: a request/response channel pair running
//! the identical pure resolution function used in process.
//!
//! All data crosses the boundary by value in wire form; no mutable
//! state is shared, and exactly one request is outstanding at a time.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{spawn, JoinHandle};

use tracing::debug;
use vanguard_core::wire::{decode_action, encode_action_response, EncodedAction};
use vanguard_system_actions::resolve;
use vanguard_system_effects::Effects;
use vanguard_world::{MapData, PlainMap, Vision};

/// A resolution request shipped to the worker.
#[derive(Clone, Debug)]
pub struct ResolveRequest {
    /// Map snapshot in wire form.
    pub map: PlainMap,
    /// Effect configuration, passed through untouched.
    pub effects: Effects,
    /// Encoded action to resolve.
    pub action: EncodedAction,
}

/// The worker's answer to a [`ResolveRequest`].
#[derive(Clone, Debug)]
pub struct ResolveResponse {
    /// Encoded responses in resolution order; empty when the action was
    /// rejected or the request was malformed.
    pub responses: Vec<String>,
    /// The resulting map, when resolution produced one.
    pub map: Option<PlainMap>,
    /// Effect configuration handed back to the caller.
    pub effects: Effects,
}

/// Runs one request through the pure resolution path.
///
/// This is the same function the worker loop runs; tests and
/// single-threaded callers invoke it directly, which keeps the
/// in-process and out-of-process paths byte-identical.
#[must_use]
pub fn execute(request: &ResolveRequest) -> ResolveResponse {
    let rejected = ResolveResponse {
        responses: Vec::new(),
        map: None,
        effects: request.effects.clone(),
    };

    let Ok(map) = MapData::from_plain(&request.map) else {
        return rejected;
    };
    let Ok(action) = decode_action(&request.action) else {
        return rejected;
    };
    let vision = Vision::compute(&map, map.current_player_id());
    match resolve(&map, &vision, &action) {
        Ok(Some(resolution)) => ResolveResponse {
            responses: resolution
                .responses
                .iter()
                .map(encode_action_response)
                .collect(),
            map: Some(resolution.map.to_plain()),
            effects: request.effects.clone(),
        },
        Ok(None) | Err(_) => rejected,
    }
}

/// Handle to a worker thread draining one request at a time.
#[derive(Debug)]
pub struct Worker {
    requests: Sender<ResolveRequest>,
    responses: Receiver<ResolveResponse>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawns the worker loop.
    #[must_use]
    pub fn start() -> Self {
        let (request_sender, request_receiver) = channel::<ResolveRequest>();
        let (response_sender, response_receiver) = channel::<ResolveResponse>();
        let handle = spawn(move || {
            while let Ok(request) = request_receiver.recv() {
                let response = execute(&request);
                if response_sender.send(response).is_err() {
                    break;
                }
            }
            debug!("resolution worker drained");
        });
        Self {
            requests: request_sender,
            responses: response_receiver,
            handle: Some(handle),
        }
    }

    /// Ships one request and blocks for its response. With exactly one
    /// outstanding request the pairing is unambiguous.
    pub fn resolve(&self, request: ResolveRequest) -> Option<ResolveResponse> {
        self.requests.send(request).ok()?;
        self.responses.recv().ok()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let (sender, _) = channel();
        // Replacing the sender closes the request channel and lets the
        // worker loop exit before the join.
        self.requests = sender;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
