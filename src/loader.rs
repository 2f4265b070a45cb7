//! Background picture loading for the viewer
//!
//! Loads run as tokio tasks and report back over a channel, so the UI keeps
//! drawing while a request is in flight. Every load carries the id it was
//! issued with; the app uses it to drop responses that a newer load has
//! superseded.

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::data::{ApodServerClient, ClientFetchError, PictureRecord};

/// A load issued by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    /// Monotonic id assigned by the app
    pub id: u64,
    /// Date to load, `None` for today
    pub date: Option<NaiveDate>,
}

/// Result of a load, sent from the background task to the app
#[derive(Debug)]
pub struct LoadMessage {
    /// Id of the request this answers
    pub request_id: u64,
    /// The loaded picture or the reason it failed
    pub result: Result<PictureRecord, ClientFetchError>,
}

/// Handle for issuing loads and receiving their results
pub struct LoadHandle {
    /// Channel for receiving load results
    pub receiver: mpsc::Receiver<LoadMessage>,
    sender: mpsc::Sender<LoadMessage>,
    client: ApodServerClient,
}

impl LoadHandle {
    /// Creates a LoadHandle that fetches through `client`
    pub fn new(client: ApodServerClient) -> Self {
        let (sender, receiver) = mpsc::channel(16);
        Self {
            receiver,
            sender,
            client,
        }
    }

    /// Starts `request` in the background
    ///
    /// Must be called from within a tokio runtime. Loads are never cancelled;
    /// each one reports exactly once.
    pub fn spawn(&self, request: LoadRequest) {
        let client = self.client.clone();
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let result = client.fetch(request.date).await;
            let _ = tx
                .send(LoadMessage {
                    request_id: request.id,
                    result,
                })
                .await;
        });
    }
}

/// Checks for a finished load without blocking
///
/// # Arguments
/// * `handle` - The LoadHandle to check
///
/// # Returns
/// * `Some(LoadMessage)` if a load has finished
/// * `None` if no results are pending
pub fn try_recv(handle: &mut LoadHandle) -> Option<LoadMessage> {
    handle.receiver.try_recv().ok()
}
