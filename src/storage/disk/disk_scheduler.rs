use std::sync::Arc;
use std::thread;

use crossbeam::channel::{Receiver, Sender};
use tokio::sync::oneshot;

use crate::storage::disk::DiskManager;
use crate::storage::page::Page;

/// Represents a Write or Read request for the DiskManager to execute.
pub enum DiskRequest {
    Read {
        /// The page being read from disk.
        page: Page,
        /// Callback used to signal to the request issuer when the request has
        /// been completed.
        callback: oneshot::Sender<()>,
    },
    Write {
        /// The page being written out to disk.
        page: Page,
        /// Callback used to signal to the request issuer when the request has
        /// been completed.
        callback: oneshot::Sender<()>,
    },
}

/// The DiskScheduler schedules disk read and write operations.
///
/// A request is scheduled by calling [`DiskScheduler::schedule`] with an
/// appropriate [`DiskRequest`]. The scheduler maintains a background worker
/// thread that processes the scheduled requests using the disk manager. The
/// background thread is created in the constructor and joined on drop.
pub struct DiskScheduler {
    /// A shared queue to concurrently schedule and process requests. When the
    /// DiskScheduler is dropped, `None` is put into the queue to signal to
    /// the background thread to stop execution.
    request_queue: Sender<Option<DiskRequest>>,

    /// The background thread responsible for issuing scheduled requests to
    /// the disk manager.
    background_thread: Option<thread::JoinHandle<()>>,

    disk_manager: Arc<DiskManager>,
}

impl DiskScheduler {
    pub fn new(disk_manager: Arc<DiskManager>) -> Self {
        let (tx, rx) = crossbeam::channel::unbounded();
        let worker_disk_manager = disk_manager.clone();
        Self {
            request_queue: tx,
            background_thread: Some(thread::spawn(move || {
                Self::start_worker_thread(rx, worker_disk_manager)
            })),
            disk_manager,
        }
    }

    /// Schedules a request for the DiskManager to execute.
    pub fn schedule(&self, r: DiskRequest) {
        self.request_queue.send(Some(r)).unwrap();
    }

    pub fn disk_manager(&self) -> &Arc<DiskManager> {
        &self.disk_manager
    }

    /// Background worker thread function that processes scheduled requests
    /// until the scheduler is dropped.
    fn start_worker_thread(rx: Receiver<Option<DiskRequest>>, disk_manager: Arc<DiskManager>) {
        while let Ok(r) = rx.recv() {
            match r {
                Some(DiskRequest::Read { page, callback }) => {
                    disk_manager.read_page(page.page_id(), &mut *page.data_mut());
                    callback.send(()).unwrap();
                }
                Some(DiskRequest::Write { page, callback }) => {
                    disk_manager.write_page(page.page_id(), &*page.data());
                    callback.send(()).unwrap();
                }
                None => break,
            }
        }
    }
}

impl Drop for DiskScheduler {
    fn drop(&mut self) {
        // Put a `None` in the queue to signal the worker to exit the loop
        self.request_queue.send(None).unwrap();
        self.background_thread.take().unwrap().join().unwrap();
    }
}
