mod mpsc_job_queue;

pub use mpsc_job_queue::{MpscJobQueue, MpscTaskSource, job_channel};
