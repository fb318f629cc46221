use crate::constants::ports::MAX_PORT;
use crate::errors::SyncError;
use std::collections::HashSet;

pub fn allocate_free_port(used: &HashSet<String>, floor: u16) -> Result<u16, SyncError> {
    let mut candidate = u32::from(floor);
    while candidate <= u32::from(MAX_PORT) {
        if !used.contains(candidate.to_string().as_str()) {
            return Ok(candidate as u16);
        }
        candidate += 1;
    }
    Err(SyncError::port_exhausted(format!(
        "No free port between {} and {}",
        floor, MAX_PORT
    )))
}
