mod fakes;
mod format;
mod tracker;
