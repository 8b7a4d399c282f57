//! Delivery of narration requests off the tick path.
//!
//! The machine only ever submits one request and then polls. Replies come
//! back as values, so every mutation of history and scrollback still happens
//! on the tick thread.

use std::{
    io,
    sync::mpsc::{self, Receiver, Sender, TryRecvError},
    thread,
};

use log::{debug, warn};

use super::service::{NarrationRequest, NarrativeService, ServiceError};

pub type NarrationReply = Result<String, ServiceError>;

pub trait NarrationDispatcher {
    /// Hands a request over. Fails only when the request cannot be queued.
    fn submit(&mut self, request: NarrationRequest) -> Result<(), ServiceError>;

    /// Returns the reply once it is available.
    fn poll(&mut self) -> Option<NarrationReply>;
}

/// Runs the service synchronously inside `submit`.
pub struct InlineDispatcher<S> {
    service: S,
    ready: Option<NarrationReply>,
}

impl<S: NarrativeService> InlineDispatcher<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            ready: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: NarrativeService> NarrationDispatcher for InlineDispatcher<S> {
    fn submit(&mut self, request: NarrationRequest) -> Result<(), ServiceError> {
        self.ready = Some(self.service.narrate(&request));
        Ok(())
    }

    fn poll(&mut self) -> Option<NarrationReply> {
        self.ready.take()
    }
}

/// Runs the service on a dedicated worker thread.
pub struct ThreadedDispatcher {
    requests: Sender<NarrationRequest>,
    replies: Receiver<NarrationReply>,
}

impl ThreadedDispatcher {
    pub fn spawn<S>(mut service: S) -> io::Result<Self>
    where
        S: NarrativeService + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<NarrationRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<NarrationReply>();

        thread::Builder::new()
            .name("narrator".into())
            .spawn(move || {
                for request in request_rx {
                    debug!("narrator: sending {} turns", request.turns.len());
                    let reply = service.narrate(&request);
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
                debug!("narrator: worker exiting");
            })?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
        })
    }
}

impl NarrationDispatcher for ThreadedDispatcher {
    fn submit(&mut self, request: NarrationRequest) -> Result<(), ServiceError> {
        self.requests
            .send(request)
            .map_err(|_| ServiceError::fatal("narration worker stopped"))
    }

    fn poll(&mut self) -> Option<NarrationReply> {
        match self.replies.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("narrator: worker disconnected");
                Some(Err(ServiceError::fatal("narration worker stopped")))
            }
        }
    }
}
