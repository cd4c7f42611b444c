use crate::download_client::DownloadClient;
use crate::error::LoadError;
use crate::launcher::{EngineLauncher, LaunchParameters};
use crate::request::DownloadRequest;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Progress of a single load. `HandedOff` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Downloading,
    Succeeded,
    HandedOff,
    Failed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadState::Idle => "idle",
            LoadState::Downloading => "downloading",
            LoadState::Succeeded => "succeeded",
            LoadState::HandedOff => "handed off",
            LoadState::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn advance(state: &mut LoadState, next: LoadState) {
    tracing::debug!("Load state: {} -> {}", state, next);
    *state = next;
}

/// Downloads the bundle described by `request`, then hands it to `launcher`.
///
/// The bundle file is complete before the launcher is called. On a failed
/// download the launcher is never called. A transfer that breaks off midway
/// may leave a partial file behind; it is not removed.
pub async fn download_and_launch<D, L>(
    request: DownloadRequest,
    client: &D,
    launcher: &L,
) -> Result<LaunchParameters, LoadError>
where
    D: DownloadClient,
    L: EngineLauncher + ?Sized,
{
    let mut state = LoadState::Idle;

    advance(&mut state, LoadState::Downloading);
    tracing::debug!(
        "Downloading {} to {}",
        request.source_url,
        request.destination_path.display()
    );
    match client
        .download(&request.source_url, &request.destination_path)
        .await
    {
        Ok(bytes) => {
            advance(&mut state, LoadState::Succeeded);
            tracing::debug!("Downloaded {bytes} bytes");
        }
        Err(e) => {
            advance(&mut state, LoadState::Failed);
            return Err(e.into());
        }
    }

    let params = LaunchParameters {
        uri: request.destination_path.to_string_lossy().into_owned(),
        md5: request.checksum,
    };

    if let Err(e) = launcher.launch(params.clone()) {
        advance(&mut state, LoadState::Failed);
        return Err(e);
    }
    advance(&mut state, LoadState::HandedOff);

    Ok(params)
}

type LoadReply = oneshot::Sender<Result<LaunchParameters, LoadError>>;

/// Runs loads one at a time on a single worker task, in submission order.
///
/// Each submission gets its own result channel, so failures reach the caller
/// instead of only the log.
pub struct LoadQueue {
    sender: mpsc::UnboundedSender<(DownloadRequest, LoadReply)>,
    pending: Arc<AtomicUsize>,
    worker: JoinHandle<()>,
}

impl LoadQueue {
    pub fn spawn<D, L>(client: D, launcher: L) -> Self
    where
        D: DownloadClient + 'static,
        L: EngineLauncher + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<(DownloadRequest, LoadReply)>();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker_pending = pending.clone();

        let worker = tokio::spawn(async move {
            while let Some((request, reply)) = receiver.recv().await {
                let outcome = download_and_launch(request, &client, &launcher).await;
                worker_pending.fetch_sub(1, Ordering::SeqCst);
                if reply.send(outcome).is_err() {
                    tracing::debug!("Load finished but nobody was waiting for the result");
                }
            }
        });

        Self {
            sender,
            pending,
            worker,
        }
    }

    pub fn submit(
        &self,
        request: DownloadRequest,
    ) -> oneshot::Receiver<Result<LaunchParameters, LoadError>> {
        let (reply, receiver) = oneshot::channel();
        self.pending.fetch_add(1, Ordering::SeqCst);

        if let Err(mpsc::error::SendError((_, reply))) = self.sender.send((request, reply)) {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            let _ = reply.send(Err(LoadError::QueueClosed));
        }

        receiver
    }

    /// Submits `request` and waits for its outcome.
    pub async fn load(&self, request: DownloadRequest) -> Result<LaunchParameters, LoadError> {
        self.submit(request)
            .await
            .unwrap_or(Err(LoadError::QueueClosed))
    }

    /// True while any submitted load has not finished yet.
    pub fn is_busy(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Stops accepting work and waits for queued loads to finish.
    pub async fn shutdown(self) {
        drop(self.sender);
        if let Err(e) = self.worker.await {
            tracing::warn!("Load worker stopped abnormally: {e}");
        }
    }
}
