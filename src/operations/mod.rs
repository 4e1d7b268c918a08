pub mod imaging_op;
pub mod op_helper;
pub mod time_sync_op;
