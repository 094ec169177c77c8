use crate::data_model::DocumentTask;
use crate::error::Result;

/// Source of the tasks for one run.
pub trait BaseReader {
    fn read_tasks(&self) -> Result<Vec<DocumentTask>>;
}
