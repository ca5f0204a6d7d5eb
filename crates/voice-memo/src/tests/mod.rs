mod error;
mod fs_store;
