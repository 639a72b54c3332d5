use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use log::debug;

use crate::common::config::{PageId, PAGE_SIZE};

/// DiskManager performs the reading and writing of pages to and from disk,
/// providing a logical file layer within the context of a database
/// management system.
pub struct DiskManager {
    // Stream to write db file
    // Protects file access with multiple buffer pool instances
    db_io: Mutex<File>,
    file_name: String,
    // Number of disk reads
    num_reads: AtomicUsize,
    // Number of disk writes
    num_writes: AtomicUsize,
}

impl DiskManager {
    /// Creates a new disk manager that writes to the specified database file.
    pub fn new(db_file: &str) -> Self {
        // Ensure the db file is open, create it if it doesn't exist
        let db_io = OpenOptions::new()
            .read(true)
            .write(true)
            .open(db_file)
            .or_else(|_| {
                OpenOptions::new()
                    .create(true)
                    .read(true)
                    .write(true)
                    .open(db_file)
            })
            .unwrap();

        Self {
            db_io: Mutex::new(db_io),
            file_name: db_file.to_string(),
            num_reads: AtomicUsize::new(0),
            num_writes: AtomicUsize::new(0),
        }
    }

    /// Write a page to the database file.
    pub fn write_page(&self, page_id: PageId, page_data: &[u8]) {
        assert_eq!(page_data.len(), PAGE_SIZE);
        assert!(page_id >= 0, "writing invalid page id {}", page_id);

        let offset = page_id as usize * PAGE_SIZE;
        self.num_writes.fetch_add(1, Ordering::SeqCst);

        let mut db_io = self.db_io.lock().unwrap();
        db_io.seek(SeekFrom::Start(offset as u64)).unwrap();
        if let Err(e) = db_io.write_all(page_data) {
            panic!("I/O error while writing: {:?}", e);
        }
        // needs to flush to keep disk file in sync
        db_io.flush().unwrap();
    }

    /// Read a page from the database file.
    pub fn read_page(&self, page_id: PageId, page_data: &mut [u8]) {
        assert_eq!(page_data.len(), PAGE_SIZE);
        assert!(page_id >= 0, "reading invalid page id {}", page_id);

        let offset = page_id as usize * PAGE_SIZE;
        self.num_reads.fetch_add(1, Ordering::SeqCst);

        let mut db_io = self.db_io.lock().unwrap();
        // reads past the current end of file yield a zeroed page
        if offset >= db_io.metadata().unwrap().len() as usize {
            debug!("Read past end of file");
            page_data.fill(0);
            return;
        }
        db_io.seek(SeekFrom::Start(offset as u64)).unwrap();
        match db_io.read(page_data) {
            Ok(read_count) => {
                // if file ends before reading PAGE_SIZE
                if read_count < PAGE_SIZE {
                    debug!("Read less than a page");
                    // fill the rest of the buffer with 0
                    page_data[read_count..].fill(0);
                }
            }
            Err(e) => panic!("I/O error while reading: {:?}", e),
        };
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the number of disk reads.
    pub fn num_reads(&self) -> usize {
        self.num_reads.load(Ordering::SeqCst)
    }

    /// Returns the number of disk writes.
    pub fn num_writes(&self) -> usize {
        self.num_writes.load(Ordering::SeqCst)
    }
}
